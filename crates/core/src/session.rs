use std::fmt;

use thiserror::Error;

use crate::model::{AnswerRecord, AttemptId, OPTION_COUNT, Question, QuizReport, SessionLabels};
use crate::time::{Clock, Countdown};

/// Seconds on the clock per question in an attempt.
pub const SECONDS_PER_QUESTION: u32 = 45;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionConfigError {
    #[error("cannot start a session without questions")]
    NoQuestions,
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of one attempt.
///
/// `Confirming` is a UX safeguard between "student asked to finish" and the
/// actual scoring; `force_finish` skips it. Once `Finished`, every mutating
/// operation is a silent no-op so duplicate UI events cannot corrupt state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Confirming,
    Finished,
}

/// Called with the final report, exactly once per session.
pub type CompletionCallback = Box<dyn FnOnce(&QuizReport) + Send>;

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// One proctored quiz attempt, from first question to the emitted report.
///
/// The session is a synchronous state machine driven by three outside event
/// sources: a 1 Hz tick, user operations (select/navigate/finish), and
/// focus-loss notifications. None of its methods block, and the `Finished`
/// phase is the single re-entrancy guard: the first `force_finish` scores the
/// attempt, fires the completion callback, and freezes every state field.
pub struct QuizSession {
    questions: Vec<Question>,
    labels: SessionLabels,
    selected: Vec<Option<u8>>,
    current: usize,
    countdown: Countdown,
    focus_lost: bool,
    violation_count: u32,
    phase: SessionPhase,
    clock: Clock,
    attempt_id: AttemptId,
    on_complete: Option<CompletionCallback>,
    report: Option<QuizReport>,
}

impl QuizSession {
    /// Start an attempt over the given questions.
    ///
    /// The time limit is `questions.len() × SECONDS_PER_QUESTION` seconds.
    ///
    /// # Errors
    ///
    /// Returns `SessionConfigError::NoQuestions` for an empty question list.
    pub fn new(
        questions: Vec<Question>,
        labels: SessionLabels,
        clock: Clock,
    ) -> Result<Self, SessionConfigError> {
        if questions.is_empty() {
            return Err(SessionConfigError::NoQuestions);
        }

        let limit = u32::try_from(questions.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(SECONDS_PER_QUESTION);
        let selected = vec![None; questions.len()];

        Ok(Self {
            questions,
            labels,
            selected,
            current: 0,
            countdown: Countdown::new(limit),
            focus_lost: false,
            violation_count: 0,
            phase: SessionPhase::Active,
            clock,
            attempt_id: AttemptId::generate(),
            on_complete: None,
            report: None,
        })
    }

    /// Install the completion callback; it is taken and fired exactly once.
    #[must_use]
    pub fn with_on_complete(
        mut self,
        callback: impl FnOnce(&QuizReport) + Send + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    //
    // ─── USER OPERATIONS ───────────────────────────────────────────────────────
    //

    /// Record an answer for the question on screen.
    ///
    /// Re-selecting overwrites; the system never clears a slot on its own.
    /// Out-of-range options and post-terminal calls are silent no-ops.
    pub fn select_answer(&mut self, option: u8) {
        if self.is_finished() || usize::from(option) >= OPTION_COUNT {
            return;
        }
        self.selected[self.current] = Some(option);
    }

    /// Move to the next question; clamps on the last one (never auto-finishes).
    pub fn go_next(&mut self) {
        if self.is_finished() {
            return;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    /// Move to the previous question; clamps at the first.
    pub fn go_previous(&mut self) {
        if self.is_finished() {
            return;
        }
        self.current = self.current.saturating_sub(1);
    }

    /// Ask to finish; the attempt is only scored after explicit confirmation.
    pub fn request_finish(&mut self) {
        if self.phase == SessionPhase::Active {
            self.phase = SessionPhase::Confirming;
        }
    }

    /// Back out of the finish confirmation.
    pub fn cancel_finish(&mut self) {
        if self.phase == SessionPhase::Confirming {
            self.phase = SessionPhase::Active;
        }
    }

    /// Score the attempt and terminate.
    ///
    /// This is the sole termination path, reached by user confirmation, the
    /// timer hitting zero, or the proctoring "end now" action. The first call
    /// scores the answers, stamps the report, and fires the completion
    /// callback; every later call hands back the stored report untouched.
    pub fn force_finish(&mut self) -> &QuizReport {
        let report = match self.report.take() {
            Some(existing) => existing,
            None => {
                self.phase = SessionPhase::Finished;
                let report = self.assemble_report();
                if let Some(notify) = self.on_complete.take() {
                    notify(&report);
                }
                report
            }
        };
        self.report.insert(report)
    }

    //
    // ─── EXTERNAL SIGNALS ──────────────────────────────────────────────────────
    //

    /// One second of the countdown has passed.
    ///
    /// Reaching zero finishes the attempt immediately, without confirmation.
    pub fn tick(&mut self) {
        if self.is_finished() {
            return;
        }
        if self.countdown.tick() == 0 {
            self.force_finish();
        }
    }

    /// The viewing surface stopped being the active foreground.
    ///
    /// Edge-triggered: the violation counter moves only on the focused →
    /// unfocused transition, no matter how many signals arrive while the
    /// surface stays hidden. Page-visibility and window-blur both land here.
    pub fn mark_focus_lost(&mut self) {
        if self.is_finished() || self.focus_lost {
            return;
        }
        self.focus_lost = true;
        self.violation_count += 1;
    }

    /// The student chose to continue after a focus violation.
    pub fn resume(&mut self) {
        if self.is_finished() {
            return;
        }
        self.focus_lost = false;
    }

    /// The proctoring overlay's "end now" action.
    pub fn end_session(&mut self) -> &QuizReport {
        self.force_finish()
    }

    //
    // ─── STATE ACCESS ──────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// Answer recorded for the question on screen, if any.
    #[must_use]
    pub fn current_selection(&self) -> Option<u8> {
        self.selected[self.current]
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.countdown.limit()
    }

    #[must_use]
    pub fn focus_lost(&self) -> bool {
        self.focus_lost
    }

    #[must_use]
    pub fn violation_count(&self) -> u32 {
        self.violation_count
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selected.iter().filter(|s| s.is_some()).count()
    }

    /// The emitted report, present once the session has terminated.
    #[must_use]
    pub fn report(&self) -> Option<&QuizReport> {
        self.report.as_ref()
    }

    /// Whether leaving the page should still prompt a warning.
    #[must_use]
    pub fn warns_on_exit(&self) -> bool {
        !self.is_finished()
    }

    #[must_use]
    pub fn labels(&self) -> &SessionLabels {
        &self.labels
    }

    fn assemble_report(&self) -> QuizReport {
        let answers: Vec<AnswerRecord> = self
            .questions
            .iter()
            .zip(&self.selected)
            .map(|(question, selection)| AnswerRecord {
                question_id: question.id(),
                selected_option: *selection,
                is_correct: selection.is_some_and(|option| question.is_correct(option)),
            })
            .collect();

        QuizReport {
            attempt_id: self.attempt_id,
            score: answers.iter().filter(|a| a.is_correct).count(),
            answered_count: self.answered_count(),
            total_questions: self.questions.len(),
            time_spent_secs: self.countdown.elapsed(),
            answers,
            finished_at: self.clock.now(),
            category: self.labels.category.clone(),
            topic: self.labels.topic.clone(),
            sub_topic: self.labels.sub_topic.clone(),
            test_type: self.labels.test_type,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("attempt_id", &self.attempt_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("time_remaining", &self.countdown.remaining())
            .field("violation_count", &self.violation_count)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::{QuestionId, TestType};
    use crate::time::{fixed_clock, fixed_now};

    fn question(id: u64, correct: u8) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("question {id}"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            "explained",
        )
        .unwrap()
    }

    fn labels() -> SessionLabels {
        SessionLabels::new("Mathematics", TestType::AiGenerated)
            .with_topic("Algebra")
            .with_sub_topic("Linear Equations")
    }

    /// Session over `n` questions whose correct option is always 1.
    fn session(n: usize) -> QuizSession {
        let questions = (0..n).map(|i| question(i as u64, 1)).collect();
        QuizSession::new(questions, labels(), fixed_clock()).unwrap()
    }

    fn tick_times(s: &mut QuizSession, times: u32) {
        for _ in 0..times {
            s.tick();
        }
    }

    #[test]
    fn rejects_empty_question_list() {
        let err = QuizSession::new(Vec::new(), labels(), fixed_clock()).unwrap_err();
        assert_eq!(err, SessionConfigError::NoQuestions);
    }

    #[test]
    fn timer_starts_at_45_seconds_per_question() {
        let s = session(5);
        assert_eq!(s.time_limit(), 225);
        assert_eq!(s.time_remaining(), 225);
    }

    #[test]
    fn timer_is_monotonic_and_never_negative() {
        let mut s = session(1);
        let mut previous = s.time_remaining();
        for _ in 0..60 {
            s.tick();
            assert!(s.time_remaining() <= previous);
            previous = s.time_remaining();
        }
        assert_eq!(s.time_remaining(), 0);
    }

    #[test]
    fn timeout_finishes_with_whatever_was_answered() {
        // one question, never answered, timer runs out
        let mut s = session(1);
        tick_times(&mut s, 45);

        assert!(s.is_finished());
        let report = s.report().unwrap();
        assert_eq!(report.score, 0);
        assert_eq!(report.answered_count, 0);
        assert_eq!(report.time_spent_secs, 45);
    }

    #[test]
    fn select_answer_overwrites_previous_choice() {
        let mut s = session(2);
        s.select_answer(0);
        assert_eq!(s.current_selection(), Some(0));
        s.select_answer(3);
        assert_eq!(s.current_selection(), Some(3));
    }

    #[test]
    fn select_answer_ignores_out_of_range_options() {
        let mut s = session(1);
        s.select_answer(4);
        assert_eq!(s.current_selection(), None);
        s.select_answer(200);
        assert_eq!(s.current_selection(), None);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut s = session(3);
        s.go_previous();
        assert_eq!(s.current_index(), 0);
        s.go_next();
        s.go_next();
        assert_eq!(s.current_index(), 2);
        s.go_next();
        assert_eq!(s.current_index(), 2);
        assert!(!s.is_finished(), "next on the last question never finishes");
    }

    #[test]
    fn request_and_cancel_finish_toggle_confirmation() {
        let mut s = session(2);
        s.request_finish();
        assert_eq!(s.phase(), SessionPhase::Confirming);
        s.cancel_finish();
        assert_eq!(s.phase(), SessionPhase::Active);
    }

    #[test]
    fn force_finish_skips_confirmation() {
        let mut s = session(2);
        s.force_finish();
        assert!(s.is_finished());
    }

    #[test]
    fn scoring_counts_only_correct_selections() {
        // five questions, answers: 0,1,2 correct, 3 wrong, 4 left blank,
        // finish confirmed with 100 seconds still on the clock
        let mut s = session(5);
        for index in 0..4 {
            let option = if index < 3 { 1 } else { 0 };
            s.select_answer(option);
            s.go_next();
        }
        tick_times(&mut s, 125);
        let report = s.force_finish().clone();

        assert_eq!(report.score, 3);
        assert_eq!(report.answered_count, 4);
        assert_eq!(report.total_questions, 5);
        assert_eq!(report.time_spent_secs, 125);
        assert_eq!(report.answers[4].selected_option, None);
        assert!(!report.answers[4].is_correct);
        assert!(report.answers[3].selected_option.is_some());
        assert!(!report.answers[3].is_correct);
    }

    #[test]
    fn answered_count_is_independent_of_correctness() {
        let mut s = session(3);
        s.select_answer(0); // wrong
        s.go_next();
        s.select_answer(1); // right
        let report = s.force_finish();

        assert_eq!(report.answered_count, 2);
        assert_eq!(report.score, 1);
    }

    #[test]
    fn completion_callback_fires_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut s = session(2).with_on_complete(move |_report| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        s.force_finish();
        s.force_finish();
        s.tick();
        s.end_session();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeated_finish_returns_the_same_report() {
        let mut s = session(2);
        s.select_answer(1);
        let first = s.force_finish().clone();
        let second = s.force_finish().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn violation_counting_is_edge_triggered() {
        let mut s = session(2);
        s.mark_focus_lost();
        s.mark_focus_lost();
        s.mark_focus_lost();
        assert_eq!(s.violation_count(), 1);
        assert!(s.focus_lost());

        s.resume();
        assert!(!s.focus_lost());
        assert_eq!(s.violation_count(), 1, "resume never touches the counter");

        s.mark_focus_lost();
        assert_eq!(s.violation_count(), 2);
    }

    #[test]
    fn violations_survive_to_the_timeout_path() {
        // backgrounded twice, resumed each time, then the timer runs out
        let mut s = session(1);
        s.mark_focus_lost();
        s.resume();
        s.mark_focus_lost();
        s.resume();
        tick_times(&mut s, 45);

        assert!(s.is_finished());
        assert_eq!(s.violation_count(), 2);
        assert!(s.report().is_some());
    }

    #[test]
    fn time_spent_plus_remaining_equals_limit() {
        let mut s = session(4);
        tick_times(&mut s, 37);
        let report = s.force_finish().clone();
        assert_eq!(
            report.time_spent_secs + s.time_remaining(),
            s.time_limit()
        );
        assert_eq!(report.time_spent_secs, 37);
    }

    #[test]
    fn finished_session_is_frozen() {
        let mut s = session(3);
        s.select_answer(1);
        s.force_finish();

        let report_before = s.report().unwrap().clone();
        s.select_answer(2);
        s.go_next();
        s.go_previous();
        s.tick();
        s.mark_focus_lost();
        s.resume();
        s.request_finish();

        assert_eq!(s.current_index(), 0);
        assert_eq!(s.current_selection(), Some(1));
        assert_eq!(s.time_remaining(), s.time_limit());
        assert_eq!(s.violation_count(), 0);
        assert_eq!(s.phase(), SessionPhase::Finished);
        assert_eq!(s.report().unwrap(), &report_before);
    }

    #[test]
    fn report_carries_labels_and_finish_time() {
        let mut s = session(2);
        let attempt_id = s.attempt_id();
        let report = s.force_finish();

        assert_eq!(report.category, "Mathematics");
        assert_eq!(report.topic.as_deref(), Some("Algebra"));
        assert_eq!(report.sub_topic.as_deref(), Some("Linear Equations"));
        assert_eq!(report.test_type, TestType::AiGenerated);
        assert_eq!(report.finished_at, fixed_now());
        assert_eq!(report.attempt_id, attempt_id);
    }

    #[test]
    fn exit_warning_stops_at_termination() {
        let mut s = session(1);
        assert!(s.warns_on_exit());
        s.request_finish();
        assert!(s.warns_on_exit());
        s.force_finish();
        assert!(!s.warns_on_exit());
    }

    #[test]
    fn end_session_is_a_finish_path() {
        let mut s = session(2);
        s.select_answer(1);
        s.mark_focus_lost();
        let report = s.end_session().clone();

        assert_eq!(report.score, 1);
        assert!(s.is_finished());
        assert_eq!(s.violation_count(), 1);
    }

    #[test]
    fn selecting_while_confirming_still_lands_on_current_question() {
        let mut s = session(2);
        s.request_finish();
        s.select_answer(2);
        assert_eq!(s.current_selection(), Some(2));
    }
}

use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic timestamps in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

/// A whole-second countdown that only ever moves toward zero.
///
/// The session engine is driven by an external 1 Hz tick; this type keeps the
/// bookkeeping honest: `tick` saturates at zero, and the elapsed/remaining
/// split always sums to the starting limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    limit: u32,
    remaining: u32,
}

impl Countdown {
    /// Creates a countdown with `limit` seconds on the clock.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Consumes one second; returns the seconds left afterwards.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Seconds consumed so far.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.limit - self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

/// Deterministic timestamp for tests and examples (2025-06-15T15:06:40Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_750_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), fixed_now());
    }

    #[test]
    fn advance_moves_fixed_clocks_only() {
        let mut fixed = fixed_clock();
        fixed.advance(Duration::seconds(90));
        assert_eq!(fixed.now(), fixed_now() + Duration::seconds(90));

        let mut system = Clock::default_clock();
        system.advance(Duration::seconds(90));
        assert!(matches!(system, Clock::Default));
    }

    #[test]
    fn countdown_saturates_at_zero() {
        let mut countdown = Countdown::new(2);
        assert_eq!(countdown.tick(), 1);
        assert_eq!(countdown.tick(), 0);
        assert_eq!(countdown.tick(), 0);
        assert!(countdown.is_expired());
        assert_eq!(countdown.limit(), 2);
    }

    #[test]
    fn countdown_elapsed_and_remaining_sum_to_limit() {
        let mut countdown = Countdown::new(10);
        for _ in 0..4 {
            countdown.tick();
        }
        assert_eq!(countdown.elapsed() + countdown.remaining(), countdown.limit());
        assert_eq!(countdown.elapsed(), 4);
    }
}

//! Built-in subject catalog shown on the setup screen.

/// A named group of topics inside a subject ("Grammar", "Algebra", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSection {
    name: &'static str,
    topics: &'static [&'static str],
}

impl SubjectSection {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    #[must_use]
    pub fn topics(&self) -> &[&'static str] {
        self.topics
    }
}

/// One selectable subject with its sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    name: &'static str,
    sections: &'static [SubjectSection],
}

impl Subject {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    #[must_use]
    pub fn sections(&self) -> &[SubjectSection] {
        self.sections
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&SubjectSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Whether any section of this subject lists the topic.
    #[must_use]
    pub fn has_topic(&self, topic: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.topics.iter().any(|t| *t == topic))
    }
}

/// The catalog of subjects AI quizzes can be configured from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectCatalog {
    subjects: &'static [Subject],
}

impl SubjectCatalog {
    /// The built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self { subjects: SUBJECTS }
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        self.subjects
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Whether `topic` appears anywhere under `subject`.
    #[must_use]
    pub fn contains_topic(&self, subject: &str, topic: &str) -> bool {
        self.find(subject).is_some_and(|s| s.has_topic(topic))
    }
}

const SUBJECTS: &[Subject] = &[
    Subject {
        name: "English",
        sections: &[
            SubjectSection {
                name: "Grammar",
                topics: &[
                    "Verb Tenses",
                    "Articles & Nouns",
                    "Conditionals",
                    "Passive Voice",
                    "Relative Clauses",
                ],
            },
            SubjectSection {
                name: "Vocabulary",
                topics: &[
                    "Essential Words",
                    "Phrasal Verbs",
                    "Idioms",
                    "Business English",
                    "Collocations",
                ],
            },
        ],
    },
    Subject {
        name: "Mathematics",
        sections: &[
            SubjectSection {
                name: "Algebra",
                topics: &[
                    "Linear Equations",
                    "Quadratic Equations",
                    "Inequalities",
                    "Functions",
                    "Logarithms",
                    "Sequences",
                ],
            },
            SubjectSection {
                name: "Geometry",
                topics: &["Plane Geometry", "Solid Geometry", "Vectors", "Trigonometry"],
            },
        ],
    },
    Subject {
        name: "Physics",
        sections: &[
            SubjectSection {
                name: "Mechanics",
                topics: &["Kinematics", "Dynamics", "Statics", "Work & Energy"],
            },
            SubjectSection {
                name: "Thermodynamics",
                topics: &[
                    "Kinetic Theory",
                    "Heat Transfer",
                    "Laws of Thermodynamics",
                ],
            },
        ],
    },
    Subject {
        name: "Chemistry",
        sections: &[
            SubjectSection {
                name: "Organic Chemistry",
                topics: &["Alkanes", "Alkenes & Alkynes", "Alcohols", "Carboxylic Acids"],
            },
            SubjectSection {
                name: "Inorganic Chemistry",
                topics: &["Metals & Nonmetals", "Oxides", "Acids & Salts", "Periodic Trends"],
            },
        ],
    },
    Subject {
        name: "Biology",
        sections: &[
            SubjectSection {
                name: "Botany",
                topics: &["Plant Cells", "Flowering Plants", "Photosynthesis"],
            },
            SubjectSection {
                name: "Zoology",
                topics: &["Invertebrates", "Mammals", "Insects", "Animal Ecology"],
            },
            SubjectSection {
                name: "Human Anatomy",
                topics: &["Skeletal System", "Circulation", "Nervous System", "Digestion"],
            },
        ],
    },
];

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_builtin_subjects() {
        let catalog = SubjectCatalog::builtin();
        assert!(catalog.subjects().len() >= 5);
        assert!(catalog.find("Mathematics").is_some());
        assert!(catalog.find("Astrology").is_none());
    }

    #[test]
    fn section_lookup_finds_topics() {
        let catalog = SubjectCatalog::builtin();
        let math = catalog.find("Mathematics").unwrap();
        let algebra = math.section("Algebra").unwrap();
        assert!(algebra.topics().contains(&"Linear Equations"));
    }

    #[test]
    fn contains_topic_crosses_sections() {
        let catalog = SubjectCatalog::builtin();
        assert!(catalog.contains_topic("Physics", "Kinematics"));
        assert!(catalog.contains_topic("Physics", "Heat Transfer"));
        assert!(!catalog.contains_topic("Physics", "Photosynthesis"));
    }

    #[test]
    fn every_section_has_at_least_one_topic() {
        for subject in SubjectCatalog::builtin().subjects() {
            for section in subject.sections() {
                assert!(!section.topics().is_empty(), "{}", section.name());
            }
        }
    }
}

//! Record types produced by the extractors.
//!
//! K_i: These types represent the structured output of the pipeline.
//! Every record is an immutable value created by one extraction call and
//! handed to the caller; nothing here is shared or long-lived.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of topics in every curriculum.
pub const CURRICULUM_TOPICS: usize = 5;

/// An ordered curriculum of exactly five topic names.
///
/// K_i: The length invariant is structural. A parse that yields any other
/// count never constructs this type; it falls back to the default record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRecord {
    topics: [String; CURRICULUM_TOPICS],
}

impl CurriculumRecord {
    /// Build a curriculum from exactly five names, in order.
    pub fn new(topics: [String; CURRICULUM_TOPICS]) -> Self {
        Self { topics }
    }

    /// Build from a parsed name list. Returns None unless the count is
    /// exactly five; partial curricula are not a thing.
    pub fn from_names(names: Vec<String>) -> Option<Self> {
        let topics: [String; CURRICULUM_TOPICS] = names.try_into().ok()?;
        Some(Self { topics })
    }

    /// The deterministic default curriculum for a topic.
    pub fn fallback(topic: &str) -> Self {
        Self {
            topics: [
                format!("Introduction to {topic}"),
                format!("Fundamental Concepts of {topic}"),
                format!("Practical Applications of {topic}"),
                format!("Advanced Topics in {topic}"),
                format!("Mastering {topic}"),
            ],
        }
    }

    /// Topic names in teaching order.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

impl fmt::Display for CurriculumRecord {
    /// Render as a numbered learning path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, topic) in self.topics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", i + 1, topic)?;
        }
        Ok(())
    }
}

/// A generated lesson.
///
/// Fields may be empty (a section the model skipped) but are never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    /// Learning objectives for the topic
    pub objectives: String,

    /// Introduction and motivation
    pub introduction: String,

    /// Main concepts with explanations
    pub core_concepts: String,

    /// Worked examples
    pub examples: String,

    /// Practice question posed to the learner
    pub practice: String,
}

impl LessonRecord {
    /// The deterministic default lesson for a topic.
    pub fn fallback(topic: &str) -> Self {
        Self {
            objectives: format!(
                "Understand the fundamentals of {topic}.\n\
                 Apply {topic} to simple problems.\n\
                 Explain {topic} in your own words."
            ),
            introduction: format!(
                "This lesson introduces {topic}: what it is, why it matters, \
                 and how it connects to what you already know."
            ),
            core_concepts: format!(
                "Start with the basic building blocks of {topic}, then work \
                 toward how they combine in practice."
            ),
            examples: format!("Think of a situation where {topic} shows up in the real world."),
            practice: format!("Explain a key concept of {topic} and provide an example."),
        }
    }
}

/// Overall judgment of a learner's answer.
///
/// K_i: Closed set; classification is a total function of the mastery
/// average (inclusive lower bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    /// Average mastery score of 4 or above
    Correct,
    /// Average mastery score in [3, 4)
    Partial,
    /// Average mastery score below 3
    Incorrect,
}

impl Evaluation {
    /// Classify a mastery average.
    pub fn from_average(average: f64) -> Self {
        if average >= 4.0 {
            Self::Correct
        } else if average >= 3.0 {
            Self::Partial
        } else {
            Self::Incorrect
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Correct => write!(f, "correct"),
            Evaluation::Partial => write!(f, "partial"),
            Evaluation::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// A structured evaluation of a learner's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Overall judgment derived from the mastery scores
    pub evaluation: Evaluation,

    /// What the learner understood (may be empty)
    pub understanding: String,

    /// Specific feedback on the answer (may be empty)
    pub feedback: String,

    /// Recommended next steps (may be empty)
    pub next_steps: String,

    /// Whether the learner is ready for the next topic
    pub move_on: bool,
}

impl EvaluationRecord {
    /// The deterministic fallback evaluation.
    pub fn fallback() -> Self {
        Self {
            evaluation: Evaluation::Partial,
            understanding: "Your answer shows some understanding of the concepts.".to_string(),
            feedback: "Consider providing more specific examples and explaining your reasoning."
                .to_string(),
            next_steps: "Review the core concepts and try to connect them to real-world \
                         applications."
                .to_string(),
            move_on: false,
        }
    }
}

/// Why an extraction substituted a default record.
///
/// Epistemic split:
/// - I^B materialized: the model was unreachable → worth telling the user
/// - B_i falsified: the model answered but off-schema → routine, silent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Generation failed outright (retry budget exhausted, transport error)
    Unavailable(String),

    /// Output arrived but did not match the expected shape
    Malformed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Unavailable(reason) => write!(f, "model unavailable: {reason}"),
            FallbackReason::Malformed(reason) => write!(f, "malformed output: {reason}"),
        }
    }
}

/// Tagged outcome of one extraction.
///
/// Callers (and tests) can distinguish "the model produced valid structured
/// output" from "a fallback was substituted" without either case being an
/// error: every extraction yields a usable record.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    /// The record was extracted from model output
    Complete(T),

    /// A default record was substituted
    Defaulted {
        /// The substituted record
        record: T,
        /// Why the default was used
        reason: FallbackReason,
    },
}

impl<T> Extraction<T> {
    /// The record, regardless of how it was produced.
    pub fn record(&self) -> &T {
        match self {
            Extraction::Complete(record) => record,
            Extraction::Defaulted { record, .. } => record,
        }
    }

    /// Consume the outcome, yielding the record.
    pub fn into_record(self) -> T {
        match self {
            Extraction::Complete(record) => record,
            Extraction::Defaulted { record, .. } => record,
        }
    }

    /// Whether a default was substituted.
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Extraction::Defaulted { .. })
    }

    /// User-visible advisory, present only when the model was unreachable.
    /// Malformed output degrades silently.
    pub fn advisory(&self) -> Option<String> {
        match self {
            Extraction::Defaulted {
                reason: FallbackReason::Unavailable(reason),
                ..
            } => Some(format!(
                "The model could not be reached ({reason}); showing default content."
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curriculum_requires_exactly_five_names() {
        let four = vec!["a", "b", "c", "d"].into_iter().map(String::from).collect();
        assert!(CurriculumRecord::from_names(four).is_none());

        let six = vec!["a", "b", "c", "d", "e", "f"]
            .into_iter()
            .map(String::from)
            .collect();
        assert!(CurriculumRecord::from_names(six).is_none());

        let five: Vec<String> = (1..=5).map(|i| format!("t{i}")).collect();
        let record = CurriculumRecord::from_names(five).unwrap();
        assert_eq!(record.topics().len(), 5);
        assert_eq!(record.topics()[0], "t1");
    }

    #[test]
    fn curriculum_display_is_a_numbered_list() {
        let record = CurriculumRecord::fallback("Recursion");
        let rendered = record.to_string();
        assert!(rendered.starts_with("1. Introduction to Recursion"));
        assert!(rendered.ends_with("5. Mastering Recursion"));
        assert_eq!(rendered.lines().count(), 5);
    }

    #[test]
    fn evaluation_classification_bounds_are_inclusive_below() {
        assert_eq!(Evaluation::from_average(4.0), Evaluation::Correct);
        assert_eq!(Evaluation::from_average(4.5), Evaluation::Correct);
        assert_eq!(Evaluation::from_average(3.99), Evaluation::Partial);
        assert_eq!(Evaluation::from_average(3.0), Evaluation::Partial);
        assert_eq!(Evaluation::from_average(2.99), Evaluation::Incorrect);
        assert_eq!(Evaluation::from_average(2.0), Evaluation::Incorrect);
    }

    #[test]
    fn advisory_only_for_unavailable() {
        let unavailable: Extraction<LessonRecord> = Extraction::Defaulted {
            record: LessonRecord::fallback("Graphs"),
            reason: FallbackReason::Unavailable("timeout".to_string()),
        };
        assert!(unavailable.advisory().is_some());

        let malformed: Extraction<LessonRecord> = Extraction::Defaulted {
            record: LessonRecord::fallback("Graphs"),
            reason: FallbackReason::Malformed("0 topic lines".to_string()),
        };
        assert!(malformed.advisory().is_none());
        assert!(malformed.is_defaulted());

        let complete = Extraction::Complete(LessonRecord::fallback("Graphs"));
        assert!(complete.advisory().is_none());
        assert!(!complete.is_defaulted());
    }
}

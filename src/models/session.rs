//! Session-level types owned by the caller.
//!
//! The core stays stateless between calls; the presentation layer threads a
//! `SessionState` value through its loop instead of the tutor holding
//! topics and a cursor as long-lived mutable state.

use crate::models::CurriculumRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Learner level, as offered by the original level selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "Beginner"),
            Level::Intermediate => write!(f, "Intermediate"),
            Level::Advanced => write!(f, "Advanced"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Caller-owned progress through one curriculum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Subject area (e.g. "Mathematics")
    pub subject: String,

    /// Learner level
    pub level: Level,

    /// The overall topic the curriculum was generated for
    pub topic: String,

    /// Topic names in teaching order
    pub topics: Vec<String>,

    /// Index of the topic currently being taught
    pub current_topic_index: usize,

    /// The last practice question posed, if any
    pub last_question: Option<String>,
}

impl SessionState {
    /// Start a session at the first topic of a curriculum.
    pub fn new(
        subject: impl Into<String>,
        level: Level,
        topic: impl Into<String>,
        curriculum: &CurriculumRecord,
    ) -> Self {
        Self {
            subject: subject.into(),
            level,
            topic: topic.into(),
            topics: curriculum.topics().to_vec(),
            current_topic_index: 0,
            last_question: None,
        }
    }

    /// The topic currently being taught, or None once the path is finished.
    pub fn current_topic(&self) -> Option<&str> {
        self.topics.get(self.current_topic_index).map(String::as_str)
    }

    /// Advance to the next topic. Returns false when the path is finished.
    pub fn advance(&mut self) -> bool {
        self.current_topic_index += 1;
        self.last_question = None;
        !self.is_finished()
    }

    /// Whether every topic has been taught.
    pub fn is_finished(&self) -> bool {
        self.current_topic_index >= self.topics.len()
    }
}

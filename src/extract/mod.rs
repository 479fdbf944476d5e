//! Extractors: prompt building, response parsing, default fallback.
//!
//! Each extractor turns one generation round-trip into a fixed-schema
//! record. Failures never escape: an unreachable model or off-schema output
//! resolves to the deterministic default record, tagged with why.

pub mod curriculum;
pub mod evaluation;
pub mod lesson;
pub mod question;

pub use question::{Difficulty, QuestionKind};

//! didact - Structured tutoring content from unreliable LLM output.
//!
//! ## Architecture
//!
//! didact turns free-text model responses into fixed-schema records:
//! - **Curricula**: exactly five ordered subtopic names
//! - **Lessons**: five named sections (objectives through practice)
//! - **Evaluations**: mastery scores, judgment and feedback
//! - **Questions**: practice questions, optionally performance-adaptive
//!
//! Every extraction is total: an unreachable model or off-schema output
//! resolves into a deterministic default record, tagged with why.
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Compile-time enforced invariants (types, enums, the
//!   five-topic curriculum array)
//! - B_i (Beliefs): Runtime fallible operations (Result, Option)
//! - I^R (Resolvable): User-configurable parameters (config file)
//! - I^B (Bounded): Network/API uncertainties (bounded retry, backoff,
//!   deterministic fallbacks)

pub mod client;
pub mod extract;
pub mod models;
pub mod parse;
pub mod tutor;

// Re-exports for convenience
pub use client::{LlmClient, RetryingGenerator, TextGenerator};
pub use extract::{Difficulty, QuestionKind};
pub use models::{
    Config, CurriculumRecord, DidactError, Evaluation, EvaluationRecord, Extraction,
    FallbackReason, LessonRecord, Level, Result, SessionState,
};
pub use parse::{parse_sections, SectionMap};
pub use tutor::Tutor;

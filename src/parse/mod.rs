//! Parsers for semi-structured model output.

mod scores;
mod sections;

pub use scores::{average_score, extract_scores};
pub use sections::{parse_sections, SectionMap};

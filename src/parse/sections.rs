//! Section-tagged text parser.
//!
//! Model output is requested in blocks delimited by bracket headers:
//!
//! ```text
//! [OBJECTIVES]
//! line one
//! line two
//! [PRACTICE]
//! a question
//! ```
//!
//! K_i: One linear pass, no state beyond the open section and its lines.
//! B_i: The model may skip, reorder or invent sections; the mapping layer
//! above treats missing keys as empty fields.

use std::collections::HashMap;

/// Mapping from lowercased section name to newline-joined section body.
///
/// A header that accumulated no non-empty lines is absent from the map, not
/// an empty entry; downstream per-field defaults key off that absence.
pub type SectionMap = HashMap<String, String>;

/// Split text into bracket-delimited sections.
///
/// A header line is one that, after trimming, starts with `[` and ends with
/// `]`; its key is the trimmed interior, lowercased. Non-empty lines after a
/// header accumulate into its body in order. Lines before the first header
/// are discarded. The final open section is flushed at end of input.
pub fn parse_sections(text: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current_section: Option<String> = None;
    let mut current_content: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if is_header(trimmed) {
            commit(&mut sections, current_section.take(), &mut current_content);
            current_section = Some(trimmed[1..trimmed.len() - 1].trim().to_lowercase());
        } else if !trimmed.is_empty() && current_section.is_some() {
            current_content.push(trimmed);
        }
    }

    commit(&mut sections, current_section, &mut current_content);
    sections
}

fn is_header(trimmed: &str) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']')
}

fn commit(sections: &mut SectionMap, section: Option<String>, content: &mut Vec<&str>) {
    if let Some(key) = section {
        if !content.is_empty() {
            sections.insert(key, content.join("\n"));
        }
    }
    content.clear();
}

//! Curriculum extraction: five ordered subtopic names.

use crate::client::{RetryingGenerator, TextGenerator};
use crate::models::{CurriculumRecord, Extraction, FallbackReason, Level};
use tracing::{debug, warn};

/// Generate a five-topic curriculum.
///
/// Exactly five well-formed topic lines make a Complete record; anything
/// else (wrong count, malformed numbering, unreachable model) yields the
/// default curriculum for the topic.
pub async fn extract<G: TextGenerator>(
    generator: &RetryingGenerator<G>,
    subject: &str,
    level: Level,
    topic: &str,
) -> Extraction<CurriculumRecord> {
    let prompt = build_prompt(subject, level, topic);

    let text = match generator.call(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(topic = %topic, error = %e, "Curriculum generation failed, using default");
            return Extraction::Defaulted {
                record: CurriculumRecord::fallback(topic),
                reason: FallbackReason::Unavailable(e.to_string()),
            };
        }
    };

    let names = match parse_topic_lines(&text) {
        Ok(names) => names,
        Err(reason) => return malformed(topic, reason),
    };

    let count = names.len();
    match CurriculumRecord::from_names(names) {
        Some(record) => Extraction::Complete(record),
        None => malformed(topic, format!("expected 5 topic lines, found {count}")),
    }
}

fn malformed(topic: &str, reason: String) -> Extraction<CurriculumRecord> {
    debug!(topic = %topic, reason = %reason, "Curriculum output off-schema, using default");
    Extraction::Defaulted {
        record: CurriculumRecord::fallback(topic),
        reason: FallbackReason::Malformed(reason),
    }
}

fn build_prompt(subject: &str, level: Level, topic: &str) -> String {
    format!(
        "Create exactly 5 sequential subtopics for teaching {topic} in {subject} at {level} level.\n\
         \n\
         Format your response EXACTLY like this example:\n\
         1. Basic Foundations - Understanding core principles\n\
         2. Key Components - Exploring main elements\n\
         3. Practical Applications - Real-world usage\n\
         4. Advanced Concepts - Deeper insights\n\
         5. Integration & Synthesis - Bringing it all together\n\
         \n\
         Make sure each subtopic:\n\
         - Builds progressively on previous knowledge\n\
         - Is appropriate for {level} level\n\
         - Relates specifically to {topic}\n\
         - Has clear learning outcomes"
    )
}

/// Scan response lines for numbered topics.
///
/// The matching rule is deliberately confined to this function so it can be
/// swapped for a stricter matcher without touching retry or fallback logic.
/// A line qualifies when it starts with a digit and contains both `". "`
/// and `" - "`; the name is the text between the first occurrence of each.
/// A qualifying line whose `". "` only appears after the `" - "` poisons
/// the whole parse.
fn parse_topic_lines(text: &str) -> Result<Vec<String>, String> {
    let mut names = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let qualifies = line.chars().next().is_some_and(|c| c.is_ascii_digit())
            && line.contains(". ")
            && line.contains(" - ");
        if !qualifies {
            continue;
        }

        let Some(dash) = line.find(" - ") else {
            continue;
        };
        match line[..dash].split_once(". ") {
            Some((_, name)) => names.push(name.trim().to_string()),
            None => return Err(format!("numbered line without '. ' before ' - ': {line:?}")),
        }
    }

    Ok(names)
}

//! Lesson extraction: five named sections into a fixed record.

use crate::client::{RetryingGenerator, TextGenerator};
use crate::models::{Extraction, FallbackReason, LessonRecord, Level};
use crate::parse::parse_sections;
use tracing::warn;

/// Generate a lesson for one topic.
///
/// Sections the model skipped come back as empty fields rather than
/// dragging the whole record down to the default; only an unreachable
/// model does that.
pub async fn extract<G: TextGenerator>(
    generator: &RetryingGenerator<G>,
    topic: &str,
    level: Level,
) -> Extraction<LessonRecord> {
    let prompt = build_prompt(topic, level);

    let text = match generator.call(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(topic = %topic, error = %e, "Lesson generation failed, using default");
            return Extraction::Defaulted {
                record: LessonRecord::fallback(topic),
                reason: FallbackReason::Unavailable(e.to_string()),
            };
        }
    };

    let sections = parse_sections(&text);
    let field = |key: &str| sections.get(key).cloned().unwrap_or_default();

    Extraction::Complete(LessonRecord {
        objectives: field("objectives"),
        introduction: field("introduction"),
        core_concepts: field("core concepts"),
        examples: field("examples"),
        practice: field("practice"),
    })
}

fn build_prompt(topic: &str, level: Level) -> String {
    format!(
        "Create a comprehensive lesson about {topic} for {level} level students.\n\
         \n\
         You must format your response with exactly these sections and markers:\n\
         \n\
         [OBJECTIVES]\n\
         List exactly three learning objectives for {topic}.\n\
         \n\
         [INTRODUCTION]\n\
         Write 2-3 paragraphs introducing {topic}: why it matters, real-world\n\
         applications, and the connection to previous knowledge.\n\
         \n\
         [CORE CONCEPTS]\n\
         Explain the three main concepts of {topic}, each with a detailed\n\
         explanation, key terms, examples, and common mistakes.\n\
         \n\
         [EXAMPLES]\n\
         Give a basic step-by-step example and an advanced real-world example.\n\
         \n\
         [PRACTICE]\n\
         Create a question that tests understanding of {topic}, with success\n\
         criteria and the key points to address."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedGenerator;
    use crate::models::RetryConfig;

    fn retrying(scripted: ScriptedGenerator) -> RetryingGenerator<ScriptedGenerator> {
        RetryingGenerator::new(scripted, &RetryConfig::default())
    }

    #[tokio::test]
    async fn sections_map_onto_record_fields() {
        let response = "\
[OBJECTIVES]\nknow things\n\
[INTRODUCTION]\nwelcome\n\
[CORE CONCEPTS]\nthe meat\n\
[EXAMPLES]\nfor instance\n\
[PRACTICE]\nnow you try";
        let generator = retrying(ScriptedGenerator::ok(response));
        let outcome = extract(&generator, "Closures", Level::Intermediate).await;

        let Extraction::Complete(lesson) = outcome else {
            panic!("expected Complete");
        };
        assert_eq!(lesson.objectives, "know things");
        assert_eq!(lesson.introduction, "welcome");
        assert_eq!(lesson.core_concepts, "the meat");
        assert_eq!(lesson.examples, "for instance");
        assert_eq!(lesson.practice, "now you try");
    }

    #[tokio::test]
    async fn missing_sections_degrade_to_empty_fields_not_the_default() {
        let response = "[OBJECTIVES]\nknow things\n[PRACTICE]\nnow you try";
        let generator = retrying(ScriptedGenerator::ok(response));
        let outcome = extract(&generator, "Closures", Level::Intermediate).await;

        let Extraction::Complete(lesson) = outcome else {
            panic!("expected Complete");
        };
        assert_eq!(lesson.objectives, "know things");
        assert_eq!(lesson.introduction, "");
        assert_eq!(lesson.core_concepts, "");
        assert_eq!(lesson.examples, "");
        assert_eq!(lesson.practice, "now you try");
    }

    #[tokio::test]
    async fn core_concepts_key_carries_the_space() {
        let response = "[CORE CONCEPTS]\nmapped with a space in the header";
        let generator = retrying(ScriptedGenerator::ok(response));
        let outcome = extract(&generator, "Closures", Level::Beginner).await;
        assert_eq!(
            outcome.record().core_concepts,
            "mapped with a space in the header"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_generation_yields_the_full_default() {
        let generator = retrying(ScriptedGenerator::fail(3));
        let outcome = extract(&generator, "Closures", Level::Beginner).await;

        assert_eq!(*outcome.record(), LessonRecord::fallback("Closures"));
        assert!(outcome.advisory().is_some());
    }

    #[tokio::test]
    async fn prompt_requests_every_section_marker() {
        let generator = retrying(ScriptedGenerator::ok("[OBJECTIVES]\nx"));
        let _ = extract(&generator, "Closures", Level::Beginner).await;

        let prompts = generator.inner().prompts();
        for marker in [
            "[OBJECTIVES]",
            "[INTRODUCTION]",
            "[CORE CONCEPTS]",
            "[EXAMPLES]",
            "[PRACTICE]",
        ] {
            assert!(prompts[0].contains(marker), "missing {marker}");
        }
    }
}

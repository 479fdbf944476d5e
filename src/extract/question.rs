//! Practice question generation, with adaptive difficulty.
//!
//! Unlike the other extractors, the question is consumed as raw text: the
//! requested [SCENARIO]/[QUESTION]/[POINTS TO CONSIDER] structure is for
//! the learner's eyes, not for parsing.

use crate::client::{RetryingGenerator, TextGenerator};
use crate::models::{Extraction, FallbackReason, Level};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// What a question probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Understanding of the idea itself
    Conceptual,
    /// Using the idea on a concrete problem
    Application,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Conceptual => write!(f, "conceptual"),
            QuestionKind::Application => write!(f, "application"),
        }
    }
}

/// Difficulty tier for adaptive questioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Foundational,
    Moderate,
    Challenging,
}

impl Difficulty {
    /// Map a previous-performance ratio (0.0 - 1.0) to a tier.
    pub fn from_performance(performance: f64) -> Self {
        if performance > 0.8 {
            Self::Challenging
        } else if performance > 0.5 {
            Self::Moderate
        } else {
            Self::Foundational
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Foundational => write!(f, "foundational"),
            Difficulty::Moderate => write!(f, "moderate"),
            Difficulty::Challenging => write!(f, "challenging"),
        }
    }
}

/// Generate a practice question for a topic at the learner's level.
pub async fn generate<G: TextGenerator>(
    generator: &RetryingGenerator<G>,
    topic: &str,
    level: Level,
    kind: QuestionKind,
) -> Extraction<String> {
    generate_for_audience(generator, topic, &level.to_string(), kind).await
}

/// Generate a question tuned to previous performance.
///
/// Performance above 0.7 earns an application question; the difficulty
/// descriptor replaces the level in the prompt.
pub async fn generate_adaptive<G: TextGenerator>(
    generator: &RetryingGenerator<G>,
    topic: &str,
    previous_performance: f64,
) -> Extraction<String> {
    let difficulty = Difficulty::from_performance(previous_performance);
    let kind = if previous_performance > 0.7 {
        QuestionKind::Application
    } else {
        QuestionKind::Conceptual
    };
    generate_for_audience(generator, topic, &difficulty.to_string(), kind).await
}

async fn generate_for_audience<G: TextGenerator>(
    generator: &RetryingGenerator<G>,
    topic: &str,
    audience: &str,
    kind: QuestionKind,
) -> Extraction<String> {
    let prompt = build_prompt(topic, audience, kind);

    match generator.call(&prompt).await {
        Ok(text) => Extraction::Complete(text.trim().to_string()),
        Err(e) => {
            warn!(topic = %topic, error = %e, "Question generation failed, using fallback");
            Extraction::Defaulted {
                record: fallback_question(topic),
                reason: FallbackReason::Unavailable(e.to_string()),
            }
        }
    }
}

fn fallback_question(topic: &str) -> String {
    format!("Explain a key concept of {topic} and provide an example.")
}

fn build_prompt(topic: &str, audience: &str, kind: QuestionKind) -> String {
    format!(
        "Create a thought-provoking {kind} question about {topic} appropriate \
         for {audience} level students.\n\
         \n\
         The question should:\n\
         1. Test deep understanding rather than memorization\n\
         2. Connect to real-world applications\n\
         3. Require critical thinking\n\
         4. Allow for multiple valid approaches\n\
         5. Build on fundamental concepts\n\
         \n\
         Format as:\n\
         [SCENARIO]\n\
         A brief, engaging real-world scenario\n\
         \n\
         [QUESTION]\n\
         The specific question to answer\n\
         \n\
         [POINTS TO CONSIDER]\n\
         The key points a good answer addresses"
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

    #[test]
    fn difficulty_tiers_follow_performance() {
        assert_eq!(Difficulty::from_performance(0.9), Difficulty::Challenging);
        assert_eq!(Difficulty::from_performance(0.8), Difficulty::Moderate);
        assert_eq!(Difficulty::from_performance(0.6), Difficulty::Moderate);
        assert_eq!(Difficulty::from_performance(0.5), Difficulty::Foundational);
        assert_eq!(Difficulty::from_performance(0.1), Difficulty::Foundational);
    }

    #[tokio::test]
    async fn question_text_is_returned_verbatim_trimmed() {
        let generator = retrying(ScriptedGenerator::ok("\n[SCENARIO]\nA cafe queue\n"));
        let outcome = generate(&generator, "Queues", Level::Beginner, QuestionKind::Conceptual).await;
        assert_eq!(outcome.record(), "[SCENARIO]\nA cafe queue");
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_generation_yields_the_fallback_question() {
        let generator = retrying(ScriptedGenerator::fail(3));
        let outcome = generate(&generator, "Queues", Level::Beginner, QuestionKind::Conceptual).await;
        assert_eq!(outcome.record(), "Explain a key concept of Queues and provide an example.");
    }

    #[tokio::test]
    async fn adaptive_prompt_uses_difficulty_and_kind() {
        let generator = retrying(ScriptedGenerator::ok("q"));
        let _ = generate_adaptive(&generator, "Graphs", 0.9).await;

        let prompts = generator.inner().prompts();
        assert!(prompts[0].contains("challenging"));
        assert!(prompts[0].contains("application"));
    }

    #[tokio::test]
    async fn low_performance_asks_a_foundational_conceptual_question() {
        let generator = retrying(ScriptedGenerator::ok("q"));
        let _ = generate_adaptive(&generator, "Graphs", 0.3).await;

        let prompts = generator.inner().prompts();
        assert!(prompts[0].contains("foundational"));
        assert!(prompts[0].contains("conceptual"));
    }
}

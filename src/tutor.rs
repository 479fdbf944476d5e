//! Tutor facade: the outbound boundary of the core.
//!
//! One value owns the retrying generator and exposes the extraction
//! operations. Every operation is total: failures resolve into default
//! records inside the extractors, so nothing here returns an Err once the
//! tutor is constructed.

use crate::client::{LlmClient, RetryingGenerator, TextGenerator};
use crate::extract::{curriculum, evaluation, lesson, question, QuestionKind};
use crate::models::{
    Config, CurriculumRecord, EvaluationRecord, Extraction, LessonRecord, Level, Result,
    RetryConfig,
};

/// Stateless tutoring engine over any text generator.
///
/// Holds no session state: callers thread a
/// [`SessionState`](crate::models::SessionState) through their own loop.
pub struct Tutor<G> {
    generator: RetryingGenerator<G>,
}

impl Tutor<LlmClient> {
    /// Build a production tutor from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let client = LlmClient::new(&config.model, api_key)?;
        Ok(Self::new(client, &config.retry))
    }
}

impl<G: TextGenerator> Tutor<G> {
    /// Wrap a generator with the given retry policy.
    pub fn new(inner: G, retry: &RetryConfig) -> Self {
        Self {
            generator: RetryingGenerator::new(inner, retry),
        }
    }

    /// The underlying generator (e.g. for health checks).
    pub fn client(&self) -> &G {
        self.generator.inner()
    }

    /// Generate a five-topic curriculum for a topic.
    pub async fn build_curriculum(
        &self,
        subject: &str,
        level: Level,
        topic: &str,
    ) -> Extraction<CurriculumRecord> {
        curriculum::extract(&self.generator, subject, level, topic).await
    }

    /// Generate a lesson for one curriculum topic.
    pub async fn build_lesson(&self, topic: &str, level: Level) -> Extraction<LessonRecord> {
        lesson::extract(&self.generator, topic, level).await
    }

    /// Evaluate a learner's answer to a practice question.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        level: Level,
    ) -> Extraction<EvaluationRecord> {
        evaluation::extract(&self.generator, question, answer, level).await
    }

    /// Generate a practice question for a topic.
    pub async fn pose_question(
        &self,
        topic: &str,
        level: Level,
        kind: QuestionKind,
    ) -> Extraction<String> {
        question::generate(&self.generator, topic, level, kind).await
    }

    /// Generate a question tuned to previous performance.
    pub async fn pose_adaptive_question(
        &self,
        topic: &str,
        previous_performance: f64,
    ) -> Extraction<String> {
        question::generate_adaptive(&self.generator, topic, previous_performance).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedGenerator;
    use crate::models::SessionState;

    #[tokio::test]
    async fn a_session_can_be_driven_end_to_end_through_the_facade() {
        let curriculum_text = "\
1. Intro - a\n2. Basics - b\n3. Middle - c\n4. Depth - d\n5. Mastery - e";
        let lesson_text = "[OBJECTIVES]\no\n[PRACTICE]\nq?";
        let evaluation_text =
            "[MASTERY]\nConcept: 4\nApplication: 4\nCommunication: 4\n[MOVE_ON]\nyes";

        let scripted = ScriptedGenerator::new(vec![
            Ok(curriculum_text.to_string()),
            Ok(lesson_text.to_string()),
            Ok(evaluation_text.to_string()),
        ]);
        let tutor = Tutor::new(scripted, &RetryConfig::default());

        let curriculum = tutor
            .build_curriculum("CS", Level::Beginner, "Parsing")
            .await;
        assert!(!curriculum.is_defaulted());

        let mut session =
            SessionState::new("CS", Level::Beginner, "Parsing", curriculum.record());
        assert_eq!(session.current_topic(), Some("Intro"));

        let lesson = tutor
            .build_lesson(session.current_topic().unwrap(), session.level)
            .await
            .into_record();
        session.last_question = Some(lesson.practice.clone());

        let evaluation = tutor
            .evaluate_answer(&lesson.practice, "an answer", session.level)
            .await
            .into_record();
        assert!(evaluation.move_on);
        assert!(session.advance());
        assert_eq!(session.current_topic(), Some("Basics"));
    }
}

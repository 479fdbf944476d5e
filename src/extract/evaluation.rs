//! Answer evaluation: mastery scores, judgment and feedback sections.

use crate::client::{RetryingGenerator, TextGenerator};
use crate::models::{Evaluation, EvaluationRecord, Extraction, FallbackReason, Level};
use crate::parse::{average_score, extract_scores, parse_sections};
use tracing::{debug, warn};

/// Evaluate a learner's answer to a practice question.
///
/// The mastery section feeds an average score that classifies the answer;
/// a missing or unparseable mastery section averages to the neutral 3
/// ("partial"). Feedback sections degrade per-field to empty strings.
pub async fn extract<G: TextGenerator>(
    generator: &RetryingGenerator<G>,
    question: &str,
    answer: &str,
    level: Level,
) -> Extraction<EvaluationRecord> {
    let prompt = build_prompt(question, answer, level);

    let text = match generator.call(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Evaluation generation failed, using fallback");
            return Extraction::Defaulted {
                record: EvaluationRecord::fallback(),
                reason: FallbackReason::Unavailable(e.to_string()),
            };
        }
    };

    let sections = parse_sections(&text);
    let field = |key: &str| sections.get(key).cloned().unwrap_or_default();

    let scores = sections
        .get("mastery")
        .map(|body| extract_scores(body))
        .unwrap_or_default();
    let average = average_score(&scores);

    let move_on = sections
        .get("move_on")
        .is_some_and(|body| body.to_lowercase().contains("yes"));

    debug!(
        scores = ?scores,
        average = average,
        move_on = move_on,
        "Answer evaluated"
    );

    Extraction::Complete(EvaluationRecord {
        evaluation: Evaluation::from_average(average),
        understanding: field("understanding"),
        feedback: field("feedback"),
        next_steps: field("next steps"),
        move_on,
    })
}

fn build_prompt(question: &str, answer: &str, level: Level) -> String {
    format!(
        "Evaluate this {level}-level response.\n\
         \n\
         Question: {question}\n\
         Student's Answer: {answer}\n\
         \n\
         Provide a detailed evaluation following this structure:\n\
         \n\
         [UNDERSTANDING]\n\
         Which concepts the student understood correctly, any misunderstandings\n\
         or gaps, and the depth of understanding shown.\n\
         \n\
         [FEEDBACK]\n\
         Strong aspects of the response, areas needing improvement, and concrete\n\
         suggestions for strengthening the answer.\n\
         \n\
         [NEXT STEPS]\n\
         Specific topics to review, additional practice areas, and skills to\n\
         develop.\n\
         \n\
         [MASTERY]\n\
         Rate each area 1-5 (5 being highest):\n\
         Conceptual Understanding: <1-5>\n\
         Application of Knowledge: <1-5>\n\
         Communication: <1-5>\n\
         \n\
         [MOVE_ON]\n\
         yes or no, based on overall understanding."
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

    async fn evaluate(response: &str) -> Extraction<EvaluationRecord> {
        let generator = retrying(ScriptedGenerator::ok(response));
        extract(&generator, "What is a closure?", "It captures variables", Level::Beginner).await
    }

    #[tokio::test]
    async fn high_mastery_average_is_correct() {
        let response = "\
[UNDERSTANDING]\nsolid grasp\n\
[FEEDBACK]\nwell argued\n\
[NEXT STEPS]\nread more\n\
[MASTERY]\nConcept: 5\nApplication: 4\nCommunication: 3\n\
[MOVE_ON]\nYes, because the fundamentals are in place";
        let outcome = evaluate(response).await;

        let Extraction::Complete(record) = outcome else {
            panic!("expected Complete");
        };
        assert_eq!(record.evaluation, Evaluation::Correct);
        assert_eq!(record.understanding, "solid grasp");
        assert_eq!(record.feedback, "well argued");
        assert_eq!(record.next_steps, "read more");
        assert!(record.move_on);
    }

    #[tokio::test]
    async fn low_mastery_average_is_incorrect() {
        let response = "[MASTERY]\nConcept: 2\nApplication: 2\nCommunication: 2\n[MOVE_ON]\nNo";
        let outcome = evaluate(response).await;

        let record = outcome.record();
        assert_eq!(record.evaluation, Evaluation::Incorrect);
        assert!(!record.move_on);
    }

    #[tokio::test]
    async fn absent_mastery_section_defaults_to_partial() {
        let response = "[UNDERSTANDING]\nsome grasp\n[MOVE_ON]\nNo";
        let outcome = evaluate(response).await;
        assert_eq!(outcome.record().evaluation, Evaluation::Partial);
    }

    #[tokio::test]
    async fn absent_move_on_section_means_false() {
        let response = "[MASTERY]\nConcept: 5\nApplication: 5\nCommunication: 5";
        let outcome = evaluate(response).await;
        assert!(!outcome.record().move_on);
    }

    #[tokio::test]
    async fn missing_feedback_sections_degrade_to_empty_strings() {
        let response = "[MASTERY]\nConcept: 4\nApplication: 4\nCommunication: 4";
        let outcome = evaluate(response).await;

        let record = outcome.record();
        assert_eq!(record.understanding, "");
        assert_eq!(record.feedback, "");
        assert_eq!(record.next_steps, "");
        assert!(!outcome.is_defaulted());
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_generation_yields_the_fallback_record() {
        let generator = retrying(ScriptedGenerator::fail(3));
        let outcome = extract(&generator, "q", "a", Level::Beginner).await;

        assert_eq!(*outcome.record(), EvaluationRecord::fallback());
        assert!(outcome.advisory().is_some());
    }
}

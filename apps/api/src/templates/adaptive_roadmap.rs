//! Adaptive Roadmap — refines the plan from the student's quiz answers.
//!
//! The model refines a capability description and rewrites the roadmap as
//! freeform text; the caller reparses the adjusted roadmap and falls back
//! to raw display. Raw-fallback policy applies to the envelope too: an
//! unparseable reply is coerced wholesale into the adjusted-roadmap text.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{parse_json, prompts::JSON_ONLY_SYSTEM, strip_json_fences, ModelClient};
use crate::templates::{FallbackPolicy, TemplateName};

const PROMPT_TEMPLATE: &str = r#"You are an AI career coach that specializes in creating personalized roadmaps for students.

Based on the student's background and quiz results, you will refine the student's capability vector and dynamically adjust the roadmap to align with their skills and progress.

Student Background: {background}
Quiz Results: {quizResults}

Return a JSON object with this EXACT schema (no extra fields):
{"refinedCapabilityVector": "...", "adjustedRoadmap": "..."}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveRoadmapOutput {
    pub refined_capability_vector: String,
    /// Freeform; the caller attempts a structured reparse.
    pub adjusted_roadmap: String,
}

pub struct AdaptiveRoadmapInput<'a> {
    pub background: &'a str,
    /// Newline-joined "question: answer" transcript.
    pub quiz_results: &'a str,
}

impl AdaptiveRoadmapInput<'_> {
    fn validate(&self) -> Result<(), AppError> {
        if self.background.trim().is_empty() {
            return Err(AppError::Validation(
                "background: must not be empty".to_string(),
            ));
        }
        if self.quiz_results.trim().is_empty() {
            return Err(AppError::Validation(
                "quizResults: must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        PROMPT_TEMPLATE
            .replace("{background}", self.background)
            .replace("{quizResults}", self.quiz_results)
    }
}

pub async fn invoke(
    llm: &dyn ModelClient,
    input: AdaptiveRoadmapInput<'_>,
) -> Result<AdaptiveRoadmapOutput, AppError> {
    let template = TemplateName::AdaptiveRoadmap;
    input.validate()?;

    let reply = llm
        .complete(JSON_ONLY_SYSTEM, &input.render())
        .await
        .map_err(|e| AppError::Generation(format!("{} call failed: {e}", template.as_str())))?;

    let output = match parse_json::<AdaptiveRoadmapOutput>(&reply) {
        Ok(output) => output,
        Err(e) if template.fallback_policy() == FallbackPolicy::RawText => {
            warn!(
                "{} reply failed structured parse ({e}) — coercing whole reply to adjusted roadmap",
                template.as_str()
            );
            AdaptiveRoadmapOutput {
                refined_capability_vector: String::new(),
                adjusted_roadmap: strip_json_fences(&reply).to_string(),
            }
        }
        Err(e) => {
            return Err(AppError::Generation(format!(
                "{} parse failed: {e}",
                template.as_str()
            )))
        }
    };

    if output.adjusted_roadmap.trim().is_empty() {
        return Err(AppError::Generation(format!(
            "{} returned an empty adjusted roadmap",
            template.as_str()
        )));
    }
    info!("Adaptive roadmap produced");

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StaticModel;

    fn input() -> AdaptiveRoadmapInput<'static> {
        AdaptiveRoadmapInput {
            background: "{\"education\": \"BS Computer Science\"}",
            quiz_results: "How would you rate your confidence in Python programming?: Advanced",
        }
    }

    #[tokio::test]
    async fn test_structured_envelope_parses() {
        let model = StaticModel::new(
            r#"{"refinedCapabilityVector": "strong python, weak cloud", "adjustedRoadmap": "Skip phase 1."}"#,
        );
        let output = invoke(&model, input()).await.unwrap();
        assert_eq!(output.refined_capability_vector, "strong python, weak cloud");
        assert_eq!(output.adjusted_roadmap, "Skip phase 1.");
    }

    #[tokio::test]
    async fn test_prose_reply_coerces_into_adjusted_roadmap() {
        let model = StaticModel::new("Given your answers, skip the Python basics module.");
        let output = invoke(&model, input()).await.unwrap();
        assert!(output.refined_capability_vector.is_empty());
        assert!(output.adjusted_roadmap.contains("skip the Python basics"));
    }

    #[tokio::test]
    async fn test_empty_adjusted_roadmap_is_a_generation_error() {
        let model = StaticModel::new(
            r#"{"refinedCapabilityVector": "x", "adjustedRoadmap": "  "}"#,
        );
        let err = invoke(&model, input()).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn test_empty_transcript_is_a_validation_error() {
        let model = StaticModel::new("{}");
        let err = invoke(
            &model,
            AdaptiveRoadmapInput {
                background: "{}",
                quiz_results: " ",
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("quizResults")));
        assert_eq!(model.call_count(), 0);
    }
}

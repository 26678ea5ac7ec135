//! Skill Suggestion — predicts relevant skills from the student's education.
//!
//! Runs when the skills step loads, so the student picks from suggestions
//! instead of typing everything by hand.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{parse_json, prompts::JSON_ONLY_SYSTEM, ModelClient};
use crate::templates::TemplateName;

/// The prompt asks for at least this many skills; shorter lists are logged
/// but accepted.
const EXPECTED_MIN_SKILLS: usize = 30;

const PROMPT_TEMPLATE: &str = r#"You are an expert career advisor. Based on the provided educational background, predict a list of relevant technical and soft skills. Provide a comprehensive list of at least 30 skills.

Education: {education}

Return a JSON object with this EXACT schema (no extra fields):
{"skills": ["skill one", "skill two"]}"#;

#[derive(Debug, Deserialize)]
struct SkillSuggestionOutput {
    skills: Vec<String>,
}

pub struct SkillSuggestionInput<'a> {
    pub education: &'a str,
}

impl SkillSuggestionInput<'_> {
    fn validate(&self) -> Result<(), AppError> {
        if self.education.trim().is_empty() {
            return Err(AppError::Validation(
                "education: must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        PROMPT_TEMPLATE.replace("{education}", self.education)
    }
}

pub async fn invoke(
    llm: &dyn ModelClient,
    input: SkillSuggestionInput<'_>,
) -> Result<Vec<String>, AppError> {
    let template = TemplateName::SkillSuggestion;
    input.validate()?;

    let reply = llm
        .complete(JSON_ONLY_SYSTEM, &input.render())
        .await
        .map_err(|e| AppError::Generation(format!("{} call failed: {e}", template.as_str())))?;

    let output: SkillSuggestionOutput = parse_json(&reply)
        .map_err(|e| AppError::Generation(format!("{} parse failed: {e}", template.as_str())))?;

    if output.skills.is_empty() {
        return Err(AppError::Generation(format!(
            "{} returned no skills",
            template.as_str()
        )));
    }
    if output.skills.len() < EXPECTED_MIN_SKILLS {
        warn!(
            "{} returned {} skills (asked for >= {EXPECTED_MIN_SKILLS})",
            template.as_str(),
            output.skills.len()
        );
    }
    info!("Suggested {} skills", output.skills.len());

    Ok(output.skills)
}

//! Chat Assistant — free-form Q&A over the active roadmap.
//!
//! Only the current query is sent; the model has no memory of prior turns
//! beyond the roadmap/background context supplied with each call. Missing
//! optional context renders as the literal "Not available." rather than an
//! omitted slot.

use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::{
    parse_json,
    prompts::{JSON_ONLY_SYSTEM, NOT_AVAILABLE},
    ModelClient,
};
use crate::templates::TemplateName;

const PROMPT_TEMPLATE: &str = r#"You are a helpful AI career advisor assistant. Your goal is to help students modify their career roadmaps and answer any questions they have about the plan.

You have access to the student's current career roadmap (if available), their background information (if available), and their current query.

Use this information to provide helpful and informative responses. If the roadmap is provided, help the student modify it based on their query. If the background information is provided, use it to tailor your responses to the student's specific situation.

If the student asks a question, answer it to the best of your ability.

Roadmap:
{roadmap}

Background Information:
{background}

Query: {query}

Return a JSON object with this EXACT schema (no extra fields):
{"response": "..."}"#;

#[derive(Debug, Deserialize)]
struct ChatAssistantOutput {
    response: String,
}

pub struct ChatAssistantInput<'a> {
    pub query: &'a str,
    pub roadmap: Option<&'a str>,
    pub background: Option<&'a str>,
}

impl ChatAssistantInput<'_> {
    fn validate(&self) -> Result<(), AppError> {
        if self.query.trim().is_empty() {
            return Err(AppError::Validation("query: must not be empty".to_string()));
        }
        Ok(())
    }

    fn render(&self) -> String {
        PROMPT_TEMPLATE
            .replace("{roadmap}", self.roadmap.unwrap_or(NOT_AVAILABLE))
            .replace("{background}", self.background.unwrap_or(NOT_AVAILABLE))
            .replace("{query}", self.query)
    }
}

pub async fn invoke(
    llm: &dyn ModelClient,
    input: ChatAssistantInput<'_>,
) -> Result<String, AppError> {
    let template = TemplateName::ChatAssistant;
    input.validate()?;

    let reply = llm
        .complete(JSON_ONLY_SYSTEM, &input.render())
        .await
        .map_err(|e| AppError::Generation(format!("{} call failed: {e}", template.as_str())))?;

    let output: ChatAssistantOutput = parse_json(&reply)
        .map_err(|e| AppError::Generation(format!("{} parse failed: {e}", template.as_str())))?;

    Ok(output.response)
}

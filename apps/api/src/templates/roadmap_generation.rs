//! Roadmap Generation — builds the phased learning plan for the selected
//! career.
//!
//! Raw-fallback policy: when the reply does not parse as a structured
//! roadmap, the text is coerced once into the raw variant rather than
//! failing, so the student still sees a plan.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{parse_json, prompts::JSON_ONLY_SYSTEM, strip_json_fences, ModelClient};
use crate::models::roadmap::{Roadmap, RoadmapPayload};
use crate::templates::{FallbackPolicy, TemplateName};

const PROMPT_TEMPLATE: &str = r#"You are a world-class AI career consultant. Your task is to create a highly personalized, structured, and actionable career roadmap for a student.

The roadmap should be broken down into logical phases. Each phase should have a title that includes a suggested timeframe (e.g., "Phase 1: Foundations (Months 1-3)").

Within each phase, create several modules. Each module must have:
- A clear, concise title.
- A list of specific daily or weekly tasks. These should be practical and actionable.
- A list of curated, high-quality learning resources.
- A single, measurable checkpoint or project to validate learning for that module.

Base the entire roadmap on the user's specific background and their chosen career path. Personalize the tasks and resource suggestions to align with their existing skills and fill their identified gaps.

**Student Profile:**
{background}

**Chosen Career:**
{career}

Generate a roadmap with at least 3 phases. Return a JSON object with this EXACT schema:
{"phases": [{"title": "...", "modules": [{"title": "...", "tasks": ["..."], "resources": ["..."], "checkpoint": "..."}]}]}"#;

pub struct RoadmapGenerationInput<'a> {
    pub career: &'a str,
    /// Serialized student background, education through interests.
    pub background: &'a str,
}

impl RoadmapGenerationInput<'_> {
    fn validate(&self) -> Result<(), AppError> {
        if self.career.trim().is_empty() {
            return Err(AppError::Validation(
                "career: must not be empty".to_string(),
            ));
        }
        if self.background.trim().is_empty() {
            return Err(AppError::Validation(
                "background: must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        PROMPT_TEMPLATE
            .replace("{background}", self.background)
            .replace("{career}", self.career)
    }
}

pub async fn invoke(
    llm: &dyn ModelClient,
    input: RoadmapGenerationInput<'_>,
) -> Result<Roadmap, AppError> {
    let template = TemplateName::RoadmapGeneration;
    input.validate()?;

    let reply = llm
        .complete(JSON_ONLY_SYSTEM, &input.render())
        .await
        .map_err(|e| AppError::Generation(format!("{} call failed: {e}", template.as_str())))?;

    // Structured first; one coercion into the raw variant on mismatch.
    let roadmap = match parse_json::<RoadmapPayload>(&reply) {
        Ok(payload) => Roadmap::from_payload(payload),
        Err(e) if template.fallback_policy() == FallbackPolicy::RawText => {
            warn!(
                "{} reply failed structured parse ({e}) — coercing to raw text",
                template.as_str()
            );
            let text = strip_json_fences(&reply).to_string();
            Roadmap::from_payload(RoadmapPayload {
                phases: vec![],
                raw: Some(text),
            })
        }
        Err(e) => {
            return Err(AppError::Generation(format!(
                "{} parse failed: {e}",
                template.as_str()
            )))
        }
    };

    let roadmap = roadmap.ok_or_else(|| {
        AppError::Generation(format!("{} returned an empty roadmap", template.as_str()))
    })?;

    match &roadmap {
        Roadmap::Structured { phases } => {
            if phases.len() < 3 {
                warn!(
                    "{} returned {} phases (asked for >= 3)",
                    template.as_str(),
                    phases.len()
                );
            }
            info!("Generated roadmap with {} phases", phases.len());
        }
        Roadmap::Raw { .. } => info!("Generated roadmap as raw text"),
    }

    Ok(roadmap)
}

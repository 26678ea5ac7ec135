//! Prompt template registry.
//!
//! One module per capability; each pairs a validated input type, a prompt
//! with named interpolation slots, a typed output, and an explicit fallback
//! policy. [`TemplateName`] enumerates the registry for logging and policy
//! lookups — every invocation funnels through a template listed here.

pub mod adaptive_roadmap;
pub mod career_suggestion;
pub mod chat_assistant;
pub mod roadmap_generation;
pub mod skill_suggestion;

/// What a template does when the model's reply fails the structured parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Parse failure is a `GenerationError` — no coercion.
    Strict,
    /// The reply is coerced once into a raw-text variant before giving up.
    RawText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    SkillSuggestion,
    CareerSuggestion,
    RoadmapGeneration,
    AdaptiveRoadmap,
    ChatAssistant,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::SkillSuggestion => "skillSuggestion",
            TemplateName::CareerSuggestion => "careerSuggestion",
            TemplateName::RoadmapGeneration => "roadmapGeneration",
            TemplateName::AdaptiveRoadmap => "adaptiveRoadmap",
            TemplateName::ChatAssistant => "chatAssistant",
        }
    }

    /// Roadmap-shaped templates tolerate a raw-text fallback; the rest fail
    /// hard on a parse mismatch.
    pub fn fallback_policy(&self) -> FallbackPolicy {
        match self {
            TemplateName::RoadmapGeneration | TemplateName::AdaptiveRoadmap => {
                FallbackPolicy::RawText
            }
            TemplateName::SkillSuggestion
            | TemplateName::CareerSuggestion
            | TemplateName::ChatAssistant => FallbackPolicy::Strict,
        }
    }
}

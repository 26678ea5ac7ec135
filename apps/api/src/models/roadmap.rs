//! Roadmap domain type.
//!
//! A roadmap is either a structured phase/module tree or an unstructured raw
//! string — mutually exclusive variants of the same entity. The tagged enum
//! forces every consumer to handle both branches; the permissive wire shape
//! (`{phases, raw?}`) lives in [`RoadmapPayload`] and is only converted at
//! the boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapModule {
    pub title: String,
    /// Daily or weekly tasks, in order.
    pub tasks: Vec<String>,
    /// Curated resources, in order.
    pub resources: Vec<String>,
    /// The single measurable goal that closes the module.
    pub checkpoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    /// Includes a timeframe, e.g. "Phase 1: Foundations (Months 1-3)".
    pub title: String,
    pub modules: Vec<RoadmapModule>,
}

/// The permissive shape the model emits and the API serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadmapPayload {
    #[serde(default)]
    pub phases: Vec<RoadmapPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Roadmap {
    Structured { phases: Vec<RoadmapPhase> },
    Raw { text: String },
}

impl Roadmap {
    /// Collapses the permissive payload into the tagged variant. A non-empty
    /// phase list wins; otherwise any raw text is shown verbatim rather than
    /// an empty phase list. `None` means the payload carried nothing usable.
    pub fn from_payload(payload: RoadmapPayload) -> Option<Roadmap> {
        if !payload.phases.is_empty() {
            return Some(Roadmap::Structured {
                phases: payload.phases,
            });
        }
        match payload.raw {
            Some(text) if !text.trim().is_empty() => Some(Roadmap::Raw { text }),
            _ => None,
        }
    }

    /// Reconciles the adaptive-roadmap / chat replacement text: attempt a
    /// structured reparse first, fall back to raw display.
    pub fn from_adjusted_text(text: &str) -> Roadmap {
        if let Ok(payload) = serde_json::from_str::<RoadmapPayload>(text) {
            if let Some(roadmap) = Roadmap::from_payload(payload) {
                return roadmap;
            }
        }
        Roadmap::Raw {
            text: text.to_string(),
        }
    }

    pub fn to_payload(&self) -> RoadmapPayload {
        match self {
            Roadmap::Structured { phases } => RoadmapPayload {
                phases: phases.clone(),
                raw: None,
            },
            Roadmap::Raw { text } => RoadmapPayload {
                phases: vec![],
                raw: Some(text.clone()),
            },
        }
    }

    /// Textual form handed to the chat assistant as context.
    pub fn display_text(&self) -> String {
        match self {
            Roadmap::Structured { .. } => {
                serde_json::to_string_pretty(&self.to_payload()).unwrap_or_default()
            }
            Roadmap::Raw { text } => text.clone(),
        }
    }
}

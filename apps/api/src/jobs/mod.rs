//! Job-listing lookup — the one callable tool the model may invoke while
//! generating career suggestions.
//!
//! Contract: given a role name, return an ordered list of listings. The
//! default backend is a static table keyed by fuzzy substring match against
//! four canonical roles. Swap in a real job-board integration by
//! implementing [`JobListingSource`]; the tool contract does not change.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::llm_client::{LlmError, ToolDef, ToolHandler};
use crate::models::profile::JobListing;

pub const JOB_LISTING_TOOL: &str = "job_listing_lookup";

#[async_trait]
pub trait JobListingSource: Send + Sync {
    async fn lookup(&self, role: &str) -> Vec<JobListing>;
}

/// Tool declaration handed to the model during career suggestion.
pub fn job_listing_tool_def() -> ToolDef {
    ToolDef {
        name: JOB_LISTING_TOOL.to_string(),
        description: "Look up current job listings for a suggested career. \
            Call this once per suggested career, passing the career's role name."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "role": {
                    "type": "string",
                    "description": "The role name to find listings for, e.g. 'Data Scientist'"
                }
            },
            "required": ["role"]
        }),
    }
}

/// Bridges a [`JobListingSource`] into the model's tool loop.
pub struct JobsToolHandler<'a>(pub &'a dyn JobListingSource);

#[derive(Deserialize)]
struct LookupInput {
    role: String,
}

#[async_trait]
impl ToolHandler for JobsToolHandler<'_> {
    async fn call(&self, name: &str, input: &Value) -> Result<Value, LlmError> {
        if name != JOB_LISTING_TOOL {
            return Err(LlmError::Tool(
                name.to_string(),
                "unknown tool".to_string(),
            ));
        }
        let input: LookupInput = serde_json::from_value(input.clone())
            .map_err(|e| LlmError::Tool(name.to_string(), e.to_string()))?;
        let listings = self.0.lookup(&input.role).await;
        serde_json::to_value(listings).map_err(LlmError::Parse)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static backend
// ────────────────────────────────────────────────────────────────────────────

const DEFAULT_ROLE: &str = "Software Engineer";

/// Mock job board: four canonical roles, matched by case-insensitive
/// substring in either direction. Unmatched roles fall back to the default
/// role's listings, flagged with a warning so the mismatch never passes
/// silently.
pub struct StaticJobBoard;

struct RoleEntry {
    role: &'static str,
    listings: &'static [(&'static str, &'static str, &'static str, &'static str)],
}

const ROLE_TABLE: &[RoleEntry] = &[
    RoleEntry {
        role: "Software Engineer",
        listings: &[
            (
                "Software Engineer - Backend",
                "Meridian Labs",
                "Bengaluru, India",
                "https://jobs.example.com/meridian/swe-backend",
            ),
            (
                "Junior Software Developer",
                "Northwind Systems",
                "Remote",
                "https://jobs.example.com/northwind/junior-dev",
            ),
            (
                "Full Stack Engineer",
                "Brightline",
                "Pune, India",
                "https://jobs.example.com/brightline/fullstack",
            ),
        ],
    },
    RoleEntry {
        role: "Data Scientist",
        listings: &[
            (
                "Data Scientist I",
                "Helios Analytics",
                "Hyderabad, India",
                "https://jobs.example.com/helios/ds-1",
            ),
            (
                "Machine Learning Analyst",
                "Cobalt AI",
                "Remote",
                "https://jobs.example.com/cobalt/ml-analyst",
            ),
        ],
    },
    RoleEntry {
        role: "UI/UX Designer",
        listings: &[
            (
                "Product Designer",
                "Lumen Studio",
                "Mumbai, India",
                "https://jobs.example.com/lumen/product-designer",
            ),
            (
                "UX Designer - Early Career",
                "Fernwood",
                "Remote",
                "https://jobs.example.com/fernwood/ux",
            ),
        ],
    },
    RoleEntry {
        role: "Product Manager",
        listings: &[
            (
                "Associate Product Manager",
                "Skylark",
                "Gurugram, India",
                "https://jobs.example.com/skylark/apm",
            ),
            (
                "Product Manager - Platform",
                "Meridian Labs",
                "Bengaluru, India",
                "https://jobs.example.com/meridian/pm-platform",
            ),
        ],
    },
];

fn entry_for(role: &str) -> Option<&'static RoleEntry> {
    let needle = role.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    ROLE_TABLE.iter().find(|entry| {
        let canonical = entry.role.to_lowercase();
        canonical.contains(&needle) || needle.contains(&canonical)
    })
}

#[async_trait]
impl JobListingSource for StaticJobBoard {
    async fn lookup(&self, role: &str) -> Vec<JobListing> {
        let entry = match entry_for(role) {
            Some(entry) => entry,
            None => {
                warn!("No job table entry matches role '{role}'; serving '{DEFAULT_ROLE}' listings");
                ROLE_TABLE
                    .iter()
                    .find(|e| e.role == DEFAULT_ROLE)
                    .expect("default role present in table")
            }
        };
        entry
            .listings
            .iter()
            .map(|(title, company, location, url)| JobListing {
                title: title.to_string(),
                company: company.to_string(),
                location: location.to_string(),
                url: url.to_string(),
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

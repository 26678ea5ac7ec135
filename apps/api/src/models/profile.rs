use serde::{Deserialize, Serialize};

/// The student's background, accumulated one field-group at a time as the
/// wizard advances. Earlier fields may be absent when a later step has not
/// run yet; downstream consumers must tolerate that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBackground {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    /// Ordered, duplicate-free. Order is the order the student picked them in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

impl UserBackground {
    /// All four field-groups populated — the wizard may submit.
    pub fn is_complete(&self) -> bool {
        self.education.is_some()
            && !self.skills.is_empty()
            && self.projects.is_some()
            && self.interests.is_some()
    }

    /// Merges a batch of skills, suppressing duplicates while keeping the
    /// order entries first appeared in.
    pub fn add_skills(&mut self, skills: Vec<String>) {
        for skill in skills {
            let skill = skill.trim().to_string();
            if !skill.is_empty() && !self.skills.contains(&skill) {
                self.skills.push(skill);
            }
        }
    }

    /// Serialized form interpolated into prompts as the student profile.
    pub fn prompt_block(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// A job listing returned by the job-listing lookup tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
}

/// One career suggestion out of the three produced per wizard completion.
/// Field names stay camelCase on the wire — they are the contract with the
/// model's output schema and with stored payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSuggestion {
    pub career: String,
    /// 0–100.
    pub fit_score: u8,
    pub rationale: String,
    pub skill_gaps: String,
    pub starter_roles: String,
    pub salary_range: String,
    pub future_outlook: String,
    /// 1–10.
    pub work_life_balance: u8,
    pub five_year_trajectory: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_listings: Vec<JobListing>,
}

//! Career Suggestion — the wizard's terminal call.
//!
//! Takes the complete background and returns exactly three suggestions,
//! each populated with live listings via the job-listing tool. Strict
//! policy: a wrong count or an out-of-range score is a generation error,
//! never silently accepted.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::{job_listing_tool_def, JobListingSource, JobsToolHandler};
use crate::llm_client::{parse_json, prompts::JSON_ONLY_SYSTEM, ModelClient};
use crate::models::profile::{CareerSuggestion, UserBackground};
use crate::templates::TemplateName;

const EXPECTED_SUGGESTIONS: usize = 3;

const PROMPT_TEMPLATE: &str = r#"You are a career counselor providing personalized career suggestions to students.

Based on the student's background, skills, projects, and interests, suggest exactly 3 potential career paths that align with their profile. For each suggested career, call the job_listing_lookup tool with the career's role name and include the listings it returns.

Education: {education}
Skills: {skills}
Projects: {projects}
Interests: {interests}

Return a JSON array of exactly 3 career suggestions with this EXACT schema per element (no extra fields):
{
  "career": "the suggested career path",
  "fitScore": 85,
  "rationale": "why this career matches the profile",
  "skillGaps": "skills the student needs to develop",
  "starterRoles": "entry-level roles for this path",
  "salaryRange": "typical salary range",
  "futureOutlook": "demand and growth outlook",
  "workLifeBalance": 7,
  "fiveYearTrajectory": "where the student could be in five years",
  "jobListings": [{"title": "...", "company": "...", "location": "...", "url": "..."}]
}

fitScore is an integer from 0 to 100. workLifeBalance is an integer from 1 to 10."#;

#[derive(Debug, Serialize)]
pub struct CareerSuggestionInput<'a> {
    pub education: &'a str,
    pub skills: &'a [String],
    pub projects: &'a str,
    pub interests: &'a str,
}

impl<'a> CareerSuggestionInput<'a> {
    /// Builds the input from a background the wizard has finished filling.
    pub fn from_background(background: &'a UserBackground) -> Result<Self, AppError> {
        let missing = |field: &str| {
            AppError::Validation(format!("{field}: required before requesting suggestions"))
        };
        Ok(Self {
            education: background
                .education
                .as_deref()
                .ok_or_else(|| missing("education"))?,
            skills: &background.skills,
            projects: background
                .projects
                .as_deref()
                .ok_or_else(|| missing("projects"))?,
            interests: background
                .interests
                .as_deref()
                .ok_or_else(|| missing("interests"))?,
        })
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.education.trim().is_empty() {
            return Err(AppError::Validation(
                "education: must not be empty".to_string(),
            ));
        }
        if self.skills.is_empty() {
            return Err(AppError::Validation(
                "skills: at least one skill is required".to_string(),
            ));
        }
        if self.projects.trim().is_empty() {
            return Err(AppError::Validation(
                "projects: must not be empty".to_string(),
            ));
        }
        if self.interests.trim().is_empty() {
            return Err(AppError::Validation(
                "interests: must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        PROMPT_TEMPLATE
            .replace("{education}", self.education)
            .replace("{skills}", &self.skills.join(", "))
            .replace("{projects}", self.projects)
            .replace("{interests}", self.interests)
    }
}

fn validate_suggestions(suggestions: &[CareerSuggestion]) -> Result<(), AppError> {
    let template = TemplateName::CareerSuggestion;
    if suggestions.len() != EXPECTED_SUGGESTIONS {
        return Err(AppError::Generation(format!(
            "{} returned {} suggestions, expected exactly {EXPECTED_SUGGESTIONS}",
            template.as_str(),
            suggestions.len()
        )));
    }
    for suggestion in suggestions {
        if suggestion.fit_score > 100 {
            return Err(AppError::Generation(format!(
                "{}: fitScore {} for '{}' is outside 0-100",
                template.as_str(),
                suggestion.fit_score,
                suggestion.career
            )));
        }
        if !(1..=10).contains(&suggestion.work_life_balance) {
            return Err(AppError::Generation(format!(
                "{}: workLifeBalance {} for '{}' is outside 1-10",
                template.as_str(),
                suggestion.work_life_balance,
                suggestion.career
            )));
        }
    }
    Ok(())
}

pub async fn invoke(
    llm: &dyn ModelClient,
    jobs: &dyn JobListingSource,
    input: CareerSuggestionInput<'_>,
) -> Result<Vec<CareerSuggestion>, AppError> {
    let template = TemplateName::CareerSuggestion;
    input.validate()?;

    let tools = [job_listing_tool_def()];
    let handler = JobsToolHandler(jobs);

    let reply = llm
        .complete_with_tools(JSON_ONLY_SYSTEM, &input.render(), &tools, &handler)
        .await
        .map_err(|e| AppError::Generation(format!("{} call failed: {e}", template.as_str())))?;

    let suggestions: Vec<CareerSuggestion> = parse_json(&reply)
        .map_err(|e| AppError::Generation(format!("{} parse failed: {e}", template.as_str())))?;

    validate_suggestions(&suggestions)?;
    info!(
        "Career suggestions ready: {}",
        suggestions
            .iter()
            .map(|s| s.career.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(suggestions)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::jobs::StaticJobBoard;
    use crate::llm_client::testing::StaticModel;

    pub(crate) fn suggestion_json(career: &str, fit: u8, wlb: u8) -> String {
        format!(
            r#"{{
                "career": "{career}",
                "fitScore": {fit},
                "rationale": "r",
                "skillGaps": "g",
                "starterRoles": "s",
                "salaryRange": "6-12 LPA",
                "futureOutlook": "strong",
                "workLifeBalance": {wlb},
                "fiveYearTrajectory": "t",
                "jobListings": []
            }}"#
        )
    }

    pub(crate) fn three_suggestions() -> String {
        format!(
            "[{},{},{}]",
            suggestion_json("Software Engineer", 92, 7),
            suggestion_json("Data Scientist", 85, 6),
            suggestion_json("Product Manager", 71, 8)
        )
    }

    fn complete_background() -> UserBackground {
        UserBackground {
            education: Some("BS Computer Science".to_string()),
            skills: vec!["Python".to_string()],
            projects: Some("Built a CLI tool".to_string()),
            interests: Some("AI".to_string()),
        }
    }

    #[tokio::test]
    async fn test_scenario_a_three_suggestions_with_bounded_scores() {
        let model = StaticModel::new(three_suggestions());
        let background = complete_background();
        let input = CareerSuggestionInput::from_background(&background).unwrap();

        let suggestions = invoke(&model, &StaticJobBoard, input).await.unwrap();

        assert_eq!(suggestions.len(), 3);
        for s in &suggestions {
            assert!(s.fit_score <= 100);
            assert!((1..=10).contains(&s.work_life_balance));
        }
    }

    #[tokio::test]
    async fn test_wrong_count_is_rejected() {
        let model = StaticModel::new(format!("[{}]", suggestion_json("Software Engineer", 90, 7)));
        let background = complete_background();
        let input = CareerSuggestionInput::from_background(&background).unwrap();

        let err = invoke(&model, &StaticJobBoard, input).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(msg) if msg.contains("expected exactly 3")));
    }

    #[tokio::test]
    async fn test_out_of_range_fit_score_is_rejected() {
        let model = StaticModel::new(format!(
            "[{},{},{}]",
            suggestion_json("A", 120, 7),
            suggestion_json("B", 80, 6),
            suggestion_json("C", 70, 8)
        ));
        let background = complete_background();
        let input = CareerSuggestionInput::from_background(&background).unwrap();

        let err = invoke(&model, &StaticJobBoard, input).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(msg) if msg.contains("fitScore")));
    }

    #[tokio::test]
    async fn test_out_of_range_work_life_balance_is_rejected() {
        let model = StaticModel::new(format!(
            "[{},{},{}]",
            suggestion_json("A", 90, 0),
            suggestion_json("B", 80, 6),
            suggestion_json("C", 70, 8)
        ));
        let background = complete_background();
        let input = CareerSuggestionInput::from_background(&background).unwrap();

        let err = invoke(&model, &StaticJobBoard, input).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(msg) if msg.contains("workLifeBalance")));
    }

    #[tokio::test]
    async fn test_incomplete_background_fails_validation_before_the_model() {
        let model = StaticModel::new(three_suggestions());
        let background = UserBackground {
            education: Some("BS Computer Science".to_string()),
            ..Default::default()
        };

        let err = CareerSuggestionInput::from_background(&background).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("projects")));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_interpolates_every_slot() {
        let background = complete_background();
        let input = CareerSuggestionInput::from_background(&background).unwrap();
        let prompt = input.render();

        assert!(prompt.contains("Education: BS Computer Science"));
        assert!(prompt.contains("Skills: Python"));
        assert!(prompt.contains("Projects: Built a CLI tool"));
        assert!(prompt.contains("Interests: AI"));
        assert!(!prompt.contains('{') || !prompt.contains("{education}"));
    }
}

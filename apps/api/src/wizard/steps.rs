//! Wizard state machine: Education → Skills → Projects → Interests →
//! Submitted.
//!
//! Each state's exit requires local validation of that step's fields; each
//! state's entry requires every earlier step's data to be present in the
//! store. Steps cannot be skipped — loading a later page without its
//! prerequisites redirects to the wizard start.

use crate::errors::AppError;
use crate::models::profile::UserBackground;

pub const MIN_EDUCATION_CHARS: usize = 10;
pub const MIN_SKILLS: usize = 1;
pub const MIN_PROJECTS_CHARS: usize = 10;
pub const MIN_INTERESTS_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Education,
    Skills,
    Projects,
    Interests,
    Submitted,
}

impl WizardStep {
    pub fn route(&self) -> &'static str {
        match self {
            WizardStep::Education => "/start",
            WizardStep::Skills => "/start/skills",
            WizardStep::Projects => "/start/projects",
            WizardStep::Interests => "/start/interests",
            WizardStep::Submitted => "/careers",
        }
    }

    /// Transition on successful validation. `Submitted` is terminal.
    pub fn next(&self) -> WizardStep {
        match self {
            WizardStep::Education => WizardStep::Skills,
            WizardStep::Skills => WizardStep::Projects,
            WizardStep::Projects => WizardStep::Interests,
            WizardStep::Interests => WizardStep::Submitted,
            WizardStep::Submitted => WizardStep::Submitted,
        }
    }

    /// Whether the stored background carries everything the steps before
    /// this one should have written.
    pub fn prerequisites_met(&self, background: Option<&UserBackground>) -> bool {
        let Some(bg) = background else {
            return matches!(self, WizardStep::Education);
        };
        match self {
            WizardStep::Education => true,
            WizardStep::Skills => bg.education.is_some(),
            WizardStep::Projects => bg.education.is_some() && !bg.skills.is_empty(),
            WizardStep::Interests => {
                bg.education.is_some() && !bg.skills.is_empty() && bg.projects.is_some()
            }
            WizardStep::Submitted => bg.is_complete(),
        }
    }
}

pub fn validate_education(education: &str) -> Result<(), AppError> {
    if education.trim().chars().count() < MIN_EDUCATION_CHARS {
        return Err(AppError::Validation(
            "education: Please provide more details about your education.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_skills(skills: &[String]) -> Result<(), AppError> {
    if skills.iter().filter(|s| !s.trim().is_empty()).count() < MIN_SKILLS {
        return Err(AppError::Validation(
            "skills: Please select at least one skill.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_projects(projects: &str) -> Result<(), AppError> {
    if projects.trim().chars().count() < MIN_PROJECTS_CHARS {
        return Err(AppError::Validation(
            "projects: Please describe at least one project.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_interests(interests: &str) -> Result<(), AppError> {
    if interests.trim().chars().count() < MIN_INTERESTS_CHARS {
        return Err(AppError::Validation(
            "interests: Please list at least one interest.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::Education.next(), WizardStep::Skills);
        assert_eq!(WizardStep::Skills.next(), WizardStep::Projects);
        assert_eq!(WizardStep::Projects.next(), WizardStep::Interests);
        assert_eq!(WizardStep::Interests.next(), WizardStep::Submitted);
        assert_eq!(WizardStep::Submitted.next(), WizardStep::Submitted);
    }

    #[test]
    fn test_education_minimum_length() {
        assert!(validate_education("BS in CS").is_err()); // 8 chars
        assert!(validate_education("BS Computer Science").is_ok());
        // Whitespace does not count toward the minimum
        assert!(validate_education("   a      ").is_err());
    }

    #[test]
    fn test_skills_require_one_real_entry() {
        assert!(validate_skills(&[]).is_err());
        assert!(validate_skills(&["  ".to_string()]).is_err());
        assert!(validate_skills(&["Python".to_string()]).is_ok());
    }

    #[test]
    fn test_projects_minimum_length() {
        assert!(validate_projects("none yet").is_err());
        assert!(validate_projects("Built a CLI tool").is_ok());
    }

    #[test]
    fn test_interests_minimum_length() {
        assert!(validate_interests("AI").is_err());
        assert!(validate_interests("AI and robotics").is_ok());
    }

    #[test]
    fn test_validation_errors_name_the_field() {
        let err = validate_education("short").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("education:")));
        let err = validate_interests("x").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("interests:")));
    }

    #[test]
    fn test_prerequisites_walk_the_stored_background() {
        assert!(WizardStep::Education.prerequisites_met(None));
        assert!(!WizardStep::Skills.prerequisites_met(None));

        let mut bg = UserBackground::default();
        bg.education = Some("BS Computer Science".to_string());
        assert!(WizardStep::Skills.prerequisites_met(Some(&bg)));
        assert!(!WizardStep::Projects.prerequisites_met(Some(&bg)));

        bg.skills = vec!["Python".to_string()];
        assert!(WizardStep::Projects.prerequisites_met(Some(&bg)));
        assert!(!WizardStep::Interests.prerequisites_met(Some(&bg)));

        bg.projects = Some("Built a CLI tool".to_string());
        assert!(WizardStep::Interests.prerequisites_met(Some(&bg)));
        assert!(!WizardStep::Submitted.prerequisites_met(Some(&bg)));

        bg.interests = Some("AI".to_string());
        assert!(WizardStep::Submitted.prerequisites_met(Some(&bg)));
    }
}

//! Wizard route handlers.
//!
//! Flow per step: check prerequisites (redirect to `/start` when missing) →
//! validate the submitted fields → merge into the stored background → point
//! the client at the next route. The terminal step additionally invokes the
//! Career Suggestion template and only persists on success.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::UserBackground;
use crate::state::AppState;
use crate::templates::{career_suggestion, skill_suggestion};
use crate::wizard::steps::{
    validate_education, validate_interests, validate_projects, validate_skills, WizardStep,
};

/// Every request names its session; store keys are scoped by it.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SessionQuery {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct NextResponse {
    pub next: &'static str,
}

fn redirect_to_start() -> Response {
    Redirect::to(WizardStep::Education.route()).into_response()
}

async fn guarded_background(
    state: &AppState,
    session: Uuid,
    step: WizardStep,
) -> Result<UserBackground, Response> {
    let background = state.store.background(session).await;
    if !step.prerequisites_met(background.as_ref()) {
        return Err(redirect_to_start());
    }
    Ok(background.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EducationView {
    pub education: Option<String>,
}

/// GET /start. First wizard step; pre-populates from the store so "Back"
/// never loses entered data.
pub async fn get_education(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<EducationView>, AppError> {
    let background = state.store.background(q.session_id).await;
    Ok(Json(EducationView {
        education: background.and_then(|b| b.education),
    }))
}

#[derive(Debug, Deserialize)]
pub struct EducationForm {
    pub education: String,
}

/// POST /start
pub async fn submit_education(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
    Json(form): Json<EducationForm>,
) -> Result<Json<NextResponse>, AppError> {
    validate_education(&form.education)?;

    let mut background = state.store.background(q.session_id).await.unwrap_or_default();
    background.education = Some(form.education.trim().to_string());
    state.store.save_background(q.session_id, &background).await?;

    Ok(Json(NextResponse {
        next: WizardStep::Education.next().route(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SkillsView {
    /// AI-suggested skills derived from the education step.
    pub suggested_skills: Vec<String>,
    /// Skills the student already picked (pre-populates on "Back").
    pub skills: Vec<String>,
}

/// GET /start/skills. Invokes the Skill Suggestion template on load so the
/// student picks from suggestions instead of typing everything by hand.
pub async fn get_skills(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Response, AppError> {
    let background = match guarded_background(&state, q.session_id, WizardStep::Skills).await {
        Ok(bg) => bg,
        Err(redirect) => return Ok(redirect),
    };
    let education = background.education.as_deref().unwrap_or_default();

    let suggested_skills = skill_suggestion::invoke(
        state.llm.as_ref(),
        skill_suggestion::SkillSuggestionInput { education },
    )
    .await?;

    Ok(Json(SkillsView {
        suggested_skills,
        skills: background.skills,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct SkillsForm {
    pub skills: Vec<String>,
}

/// POST /start/skills. The form submits the full selection, so the stored
/// set is replaced (deduplicated, order preserved), not appended to.
pub async fn submit_skills(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
    Json(form): Json<SkillsForm>,
) -> Result<Response, AppError> {
    validate_skills(&form.skills)?;

    let mut background = match guarded_background(&state, q.session_id, WizardStep::Skills).await {
        Ok(bg) => bg,
        Err(redirect) => return Ok(redirect),
    };
    background.skills.clear();
    background.add_skills(form.skills);
    state.store.save_background(q.session_id, &background).await?;

    Ok(Json(NextResponse {
        next: WizardStep::Skills.next().route(),
    })
    .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProjectsView {
    pub projects: Option<String>,
}

/// GET /start/projects
pub async fn get_projects(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Response, AppError> {
    match guarded_background(&state, q.session_id, WizardStep::Projects).await {
        Ok(bg) => Ok(Json(ProjectsView {
            projects: bg.projects,
        })
        .into_response()),
        Err(redirect) => Ok(redirect),
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectsForm {
    pub projects: String,
}

/// POST /start/projects
pub async fn submit_projects(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
    Json(form): Json<ProjectsForm>,
) -> Result<Response, AppError> {
    validate_projects(&form.projects)?;

    let mut background = match guarded_background(&state, q.session_id, WizardStep::Projects).await
    {
        Ok(bg) => bg,
        Err(redirect) => return Ok(redirect),
    };
    background.projects = Some(form.projects.trim().to_string());
    state.store.save_background(q.session_id, &background).await?;

    Ok(Json(NextResponse {
        next: WizardStep::Projects.next().route(),
    })
    .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Interests (terminal step)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InterestsView {
    pub interests: Option<String>,
}

/// GET /start/interests
pub async fn get_interests(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Response, AppError> {
    match guarded_background(&state, q.session_id, WizardStep::Interests).await {
        Ok(bg) => Ok(Json(InterestsView {
            interests: bg.interests,
        })
        .into_response()),
        Err(redirect) => Ok(redirect),
    }
}

#[derive(Debug, Deserialize)]
pub struct InterestsForm {
    pub interests: String,
}

/// POST /start/interests: Interests → Submitted.
///
/// Invokes the Career Suggestion template with the completed background.
/// Nothing is persisted until the call succeeds: on failure the stored
/// background still describes the Projects step and the client stays put.
pub async fn submit_interests(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
    Json(form): Json<InterestsForm>,
) -> Result<Response, AppError> {
    validate_interests(&form.interests)?;

    let mut background =
        match guarded_background(&state, q.session_id, WizardStep::Interests).await {
            Ok(bg) => bg,
            Err(redirect) => return Ok(redirect),
        };
    background.interests = Some(form.interests.trim().to_string());

    let input = career_suggestion::CareerSuggestionInput::from_background(&background)?;
    let suggestions =
        career_suggestion::invoke(state.llm.as_ref(), state.jobs.as_ref(), input).await?;

    state.store.save_background(q.session_id, &background).await?;
    state
        .store
        .save_suggestions(q.session_id, &suggestions)
        .await?;

    Ok(Json(NextResponse {
        next: WizardStep::Interests.next().route(),
    })
    .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Start over
// ────────────────────────────────────────────────────────────────────────────

/// POST /reset. Explicit "start over": drops every stored key and the chat
/// transcript, then points the client back at the wizard.
pub async fn reset(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<NextResponse>, AppError> {
    state.store.clear_all(q.session_id).await?;
    state.chats.clear(q.session_id);
    Ok(Json(NextResponse {
        next: WizardStep::Education.route(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

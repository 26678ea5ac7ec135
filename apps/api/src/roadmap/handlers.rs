//! Roadmap view and its two secondary interactions (adaptive quiz, chat).
//!
//! The roadmap is regenerated from the selected career on every load,
//! never persisted. Quiz and chat replacements are wholesale and atomic:
//! the response carries the full new roadmap (structured or raw), never a
//! field-by-field merge.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::models::roadmap::{Roadmap, RoadmapPayload};
use crate::roadmap::quiz::{self, QuizQuestion, QUIZ_QUESTIONS};
use crate::state::AppState;
use crate::templates::{adaptive_roadmap, roadmap_generation};
use crate::wizard::handlers::SessionQuery;
use crate::wizard::steps::WizardStep;

#[derive(Debug, Serialize)]
pub struct RoadmapView {
    pub career: String,
    pub roadmap: RoadmapPayload,
}

/// GET /roadmap. Needs both the selected career and the background;
/// anything missing sends the session back to the wizard start.
pub async fn get_roadmap(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Response, AppError> {
    let (career, background) = match (
        state.store.selected_career(q.session_id).await,
        state.store.background(q.session_id).await,
    ) {
        (Some(career), Some(background)) => (career, background),
        _ => return Ok(Redirect::to(WizardStep::Education.route()).into_response()),
    };

    let roadmap = roadmap_generation::invoke(
        state.llm.as_ref(),
        roadmap_generation::RoadmapGenerationInput {
            career: &career.career,
            background: &background.prompt_block(),
        },
    )
    .await?;

    Ok(Json(RoadmapView {
        career: career.career,
        roadmap: roadmap.to_payload(),
    })
    .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Adaptive quiz
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct QuizView {
    pub questions: &'static [QuizQuestion],
}

/// GET /roadmap/quiz
pub async fn get_quiz() -> Json<QuizView> {
    Json(QuizView {
        questions: &QUIZ_QUESTIONS,
    })
}

#[derive(Debug, Deserialize)]
pub struct QuizForm {
    /// One answer per question, in question order.
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub refined_capability_vector: String,
    /// The wholesale replacement for the displayed roadmap.
    pub roadmap: RoadmapPayload,
}

/// POST /roadmap/quiz. On model failure nothing is replaced; the existing
/// roadmap stays on screen and the quiz can be resubmitted.
pub async fn submit_quiz(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
    Json(form): Json<QuizForm>,
) -> Result<Json<QuizResponse>, AppError> {
    quiz::validate_answers(&form.answers)?;

    let background = state
        .store
        .background(q.session_id)
        .await
        .ok_or_else(|| AppError::NotFound("no stored background for this session".to_string()))?;

    let output = adaptive_roadmap::invoke(
        state.llm.as_ref(),
        adaptive_roadmap::AdaptiveRoadmapInput {
            background: &background.prompt_block(),
            quiz_results: &quiz::transcript(&form.answers),
        },
    )
    .await?;

    // Structured reparse first, raw display otherwise.
    let roadmap = Roadmap::from_adjusted_text(&output.adjusted_roadmap);

    Ok(Json(QuizResponse {
        refined_capability_vector: output.refined_capability_vector,
        roadmap: roadmap.to_payload(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Chat assistant
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
}

/// GET /roadmap/chat
pub async fn get_chat(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Json<ChatView> {
    Json(ChatView {
        messages: state.chats.history(q.session_id),
    })
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub query: String,
    /// The roadmap currently on screen, if any. The view owns it, so the
    /// client supplies it as context.
    #[serde(default)]
    pub roadmap: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: ChatMessage,
}

/// POST /roadmap/chat
pub async fn send_chat(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
    Json(form): Json<ChatForm>,
) -> Result<Json<ChatResponse>, AppError> {
    let background = state
        .store
        .background(q.session_id)
        .await
        .map(|b| b.prompt_block());

    let reply = state
        .chats
        .send(
            state.llm.as_ref(),
            q.session_id,
            &form.query,
            form.roadmap.as_deref(),
            background.as_deref(),
        )
        .await?;

    Ok(Json(ChatResponse { reply }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

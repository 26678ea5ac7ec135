pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::careers::handlers as careers;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

/// Route table — the wizard's state machine lives in these paths. Loading
/// any page without its prerequisite stored data redirects to `/start`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard: Education → Skills → Projects → Interests
        .route("/start", get(wizard::get_education).post(wizard::submit_education))
        .route(
            "/start/skills",
            get(wizard::get_skills).post(wizard::submit_skills),
        )
        .route(
            "/start/projects",
            get(wizard::get_projects).post(wizard::submit_projects),
        )
        .route(
            "/start/interests",
            get(wizard::get_interests).post(wizard::submit_interests),
        )
        // Suggestions
        .route("/careers", get(careers::get_careers))
        .route("/careers/select", post(careers::select_career))
        // Roadmap + secondary interactions
        .route("/roadmap", get(roadmap::get_roadmap))
        .route(
            "/roadmap/quiz",
            get(roadmap::get_quiz).post(roadmap::submit_quiz),
        )
        .route(
            "/roadmap/chat",
            get(roadmap::get_chat).post(roadmap::send_chat),
        )
        // Start over
        .route("/reset", post(wizard::reset))
        .with_state(state)
}

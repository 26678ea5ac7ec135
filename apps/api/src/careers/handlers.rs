//! Career suggestions view: list the three matches, let the student pick
//! one as the active career for the roadmap stage.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::CareerSuggestion;
use crate::state::AppState;
use crate::wizard::handlers::{NextResponse, SessionQuery};
use crate::wizard::steps::WizardStep;

#[derive(Debug, Serialize)]
pub struct CareersView {
    pub suggestions: Vec<CareerSuggestion>,
}

/// GET /careers — requires a stored suggestion list; otherwise the session
/// never finished the wizard and goes back to the start.
pub async fn get_careers(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Response, AppError> {
    match state.store.suggestions(q.session_id).await {
        Some(suggestions) => Ok(Json(CareersView { suggestions }).into_response()),
        None => Ok(Redirect::to(WizardStep::Education.route()).into_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectCareerForm {
    /// Index into the stored suggestion list.
    pub index: usize,
}

/// POST /careers/select — the chosen suggestion becomes the active career.
/// It is immutable thereafter except by starting over.
pub async fn select_career(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
    Json(form): Json<SelectCareerForm>,
) -> Result<Response, AppError> {
    let suggestions = match state.store.suggestions(q.session_id).await {
        Some(suggestions) => suggestions,
        None => return Ok(Redirect::to(WizardStep::Education.route()).into_response()),
    };

    let career = suggestions.get(form.index).ok_or_else(|| {
        AppError::Validation(format!(
            "index: {} is out of range for {} suggestions",
            form.index,
            suggestions.len()
        ))
    })?;

    state
        .store
        .save_selected_career(q.session_id, career)
        .await?;

    Ok(Json(NextResponse { next: "/roadmap" }).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::jobs::StaticJobBoard;
    use crate::llm_client::testing::StaticModel;
    use crate::state::testing::test_state;

    fn suggestion(career: &str) -> CareerSuggestion {
        CareerSuggestion {
            career: career.to_string(),
            fit_score: 80,
            rationale: "r".to_string(),
            skill_gaps: "g".to_string(),
            starter_roles: "s".to_string(),
            salary_range: "6-12 LPA".to_string(),
            future_outlook: "strong".to_string(),
            work_life_balance: 7,
            five_year_trajectory: "t".to_string(),
            job_listings: vec![],
        }
    }

    #[tokio::test]
    async fn test_careers_without_suggestions_redirects() {
        let state = test_state(Arc::new(StaticModel::new("{}")), Arc::new(StaticJobBoard));
        let q = SessionQuery {
            session_id: Uuid::new_v4(),
        };
        let response = get_careers(State(state), Query(q)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_select_persists_the_chosen_career() {
        let state = test_state(Arc::new(StaticModel::new("{}")), Arc::new(StaticJobBoard));
        let q = SessionQuery {
            session_id: Uuid::new_v4(),
        };
        state
            .store
            .save_suggestions(
                q.session_id,
                &[suggestion("Software Engineer"), suggestion("Data Scientist")],
            )
            .await
            .unwrap();

        select_career(
            State(state.clone()),
            Query(q),
            Json(SelectCareerForm { index: 1 }),
        )
        .await
        .unwrap();

        let selected = state.store.selected_career(q.session_id).await.unwrap();
        assert_eq!(selected.career, "Data Scientist");
    }

    #[tokio::test]
    async fn test_select_out_of_range_is_a_validation_error() {
        let state = test_state(Arc::new(StaticModel::new("{}")), Arc::new(StaticJobBoard));
        let q = SessionQuery {
            session_id: Uuid::new_v4(),
        };
        state
            .store
            .save_suggestions(q.session_id, &[suggestion("Software Engineer")])
            .await
            .unwrap();

        let err = select_career(State(state), Query(q), Json(SelectCareerForm { index: 5 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

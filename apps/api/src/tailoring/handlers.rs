//! Axum route handlers for the tailoring API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::session::SessionId;
use crate::state::AppState;
use crate::tailoring::orchestrator::{tailor_resume, TailorRequest, TailorResponse};

/// POST /api/tailor-resume
///
/// Returns tailored suggestions for a resume against a job description.
/// Falls back to demo suggestions when the model service is out of capacity.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    session: SessionId,
    payload: Result<Json<TailorRequest>, JsonRejection>,
) -> Result<Json<TailorResponse>, AppError> {
    let Json(request) = payload?;
    let response = tailor_resume(
        &state.store,
        state.suggester.as_ref(),
        Some(session.as_str()),
        request,
    )
    .await?;

    Ok(Json(response))
}

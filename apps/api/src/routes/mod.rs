pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::session::track_session;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Tailoring
        .route("/api/tailor-resume", post(tailoring::handle_tailor_resume))
        // Analytics
        .route("/api/analytics/overview", get(analytics::handle_overview))
        .route("/api/analytics/daily", get(analytics::handle_daily))
        .route("/api/analytics/keywords", get(analytics::handle_keywords))
        .route("/api/analytics/jobs", get(analytics::handle_jobs))
        .route("/api/analytics/track", post(analytics::handle_track))
        .layer(middleware::from_fn_with_state(state.clone(), track_session))
        .with_state(state)
}

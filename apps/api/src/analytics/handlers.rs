use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::analytics::events::ConversionKind;
use crate::analytics::reports::{
    DEFAULT_DAILY_WINDOW_DAYS, DEFAULT_JOB_LIMIT, DEFAULT_KEYWORD_LIMIT,
};
use crate::errors::AppError;
use crate::models::analytics::{
    AnalyticsOverview, DailyStat, KeywordStat, PopularJobDescription,
};
use crate::session::SessionId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(rename = "eventType", default)]
    pub event_type: Option<String>,
}

fn positive(name: &str, value: Option<i64>, default: i64) -> Result<i64, AppError> {
    match value {
        None => Ok(default),
        Some(v) if v > 0 => Ok(v),
        Some(v) => Err(AppError::Validation(format!(
            "{name} must be a positive integer, got {v}"
        ))),
    }
}

/// GET /api/analytics/overview
pub async fn handle_overview(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsOverview>, AppError> {
    Ok(Json(state.store.overview().await?))
}

/// GET /api/analytics/daily?days=N
pub async fn handle_daily(
    State(state): State<AppState>,
    Query(params): Query<DaysQuery>,
) -> Result<Json<Vec<DailyStat>>, AppError> {
    let days = positive("days", params.days, DEFAULT_DAILY_WINDOW_DAYS)?;
    Ok(Json(state.store.daily_stats(days).await?))
}

/// GET /api/analytics/keywords?limit=N
pub async fn handle_keywords(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<KeywordStat>>, AppError> {
    let limit = positive("limit", params.limit, DEFAULT_KEYWORD_LIMIT)?;
    Ok(Json(state.store.top_keywords(limit).await?))
}

/// GET /api/analytics/jobs?limit=N
pub async fn handle_jobs(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<PopularJobDescription>>, AppError> {
    let limit = positive("limit", params.limit, DEFAULT_JOB_LIMIT)?;
    Ok(Json(state.store.popular_job_descriptions(limit).await?))
}

/// POST /api/analytics/track
///
/// Records a conversion event for the caller's session.
pub async fn handle_track(
    State(state): State<AppState>,
    session: SessionId,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let label = req
        .event_type
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("eventType is required".to_string()))?;
    let kind = label
        .trim()
        .parse::<ConversionKind>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .store
        .track_conversion(Some(session.as_str()), kind)
        .await?;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_defaults_and_rejects() {
        assert_eq!(positive("limit", None, 20).unwrap(), 20);
        assert_eq!(positive("limit", Some(3), 20).unwrap(), 3);
        assert!(matches!(
            positive("limit", Some(0), 20),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            positive("days", Some(-5), 30),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_track_request_uses_camel_case_field() {
        let req: TrackRequest = serde_json::from_str(r#"{"eventType":"download"}"#).unwrap();
        assert_eq!(req.event_type.as_deref(), Some("download"));

        let req: TrackRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.event_type, None);
    }
}

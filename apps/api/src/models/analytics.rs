use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[cfg(test)]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub id: i64,
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
    pub last_activity: NaiveDateTime,
}

#[cfg(test)]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TailoringEventRow {
    pub id: i64,
    pub session_id: Option<String>,
    pub resume_length: i64,
    pub job_description_length: i64,
    pub job_keywords: String,
    pub processing_time_ms: i64,
    pub success: bool,
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: i64,
    pub content_hash: String,
    pub content: String,
    pub keywords: String,
    pub industry: String,
    pub experience_level: String,
    pub usage_count: i64,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
}

// ── Aggregates ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TailoringSummary {
    pub total_tailoring_attempts: i64,
    pub successful_tailoring: i64,
    /// `None` until at least one attempt is recorded.
    pub avg_processing_time: Option<f64>,
    pub avg_resume_length: Option<f64>,
    pub avg_job_length: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeywordStat {
    pub keyword: String,
    pub frequency: i64,
    pub last_used: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PopularJobDescription {
    pub content: String,
    pub keywords: String,
    pub industry: String,
    pub experience_level: String,
    pub usage_count: i64,
    pub last_seen: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FunnelStep {
    pub event_type: String,
    pub count: i64,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyStat {
    pub date: String,
    pub tailoring_attempts: i64,
    pub successful_tailoring: i64,
    pub avg_processing_time: Option<f64>,
}

/// Combined payload for the analytics dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub tailoring_stats: TailoringSummary,
    pub top_keywords: Vec<KeywordStat>,
    pub popular_jobs: Vec<PopularJobDescription>,
    pub conversion_funnel: Vec<FunnelStep>,
}

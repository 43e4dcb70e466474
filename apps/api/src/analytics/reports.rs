//! Analytics Aggregator: read-only reporting queries over the Event Store.

use crate::db::{EventStore, StoreResult};
use crate::models::analytics::{
    AnalyticsOverview, DailyStat, FunnelStep, KeywordStat, PopularJobDescription,
    TailoringSummary,
};

pub const DEFAULT_KEYWORD_LIMIT: i64 = 20;
pub const DEFAULT_JOB_LIMIT: i64 = 10;
pub const DEFAULT_DAILY_WINDOW_DAYS: i64 = 30;

const OVERVIEW_KEYWORD_LIMIT: i64 = 10;
const OVERVIEW_JOB_LIMIT: i64 = 5;

impl EventStore {
    pub async fn tailoring_summary(&self) -> StoreResult<TailoringSummary> {
        Ok(sqlx::query_as::<_, TailoringSummary>(
            r#"
            SELECT
                COUNT(*)                                    AS total_tailoring_attempts,
                COALESCE(SUM(CASE WHEN success = 1 THEN 1 ELSE 0 END), 0)
                                                            AS successful_tailoring,
                AVG(processing_time_ms)                     AS avg_processing_time,
                AVG(resume_length)                          AS avg_resume_length,
                AVG(job_description_length)                 AS avg_job_length
            FROM tailoring_events
            "#,
        )
        .fetch_one(self.pool())
        .await?)
    }

    /// Most frequent keywords first.
    pub async fn top_keywords(&self, limit: i64) -> StoreResult<Vec<KeywordStat>> {
        Ok(sqlx::query_as::<_, KeywordStat>(
            r#"
            SELECT keyword, frequency, last_used
            FROM keyword_usage
            ORDER BY frequency DESC, keyword ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?)
    }

    /// Most reused job descriptions first.
    pub async fn popular_job_descriptions(
        &self,
        limit: i64,
    ) -> StoreResult<Vec<PopularJobDescription>> {
        Ok(sqlx::query_as::<_, PopularJobDescription>(
            r#"
            SELECT content, keywords, industry, experience_level, usage_count, last_seen
            FROM job_descriptions
            ORDER BY usage_count DESC, last_seen DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?)
    }

    /// Conversion counts per event type per calendar day, newest day first.
    pub async fn conversion_funnel(&self) -> StoreResult<Vec<FunnelStep>> {
        Ok(sqlx::query_as::<_, FunnelStep>(
            r#"
            SELECT
                event_type,
                COUNT(*)         AS count,
                DATE(created_at) AS date
            FROM conversions
            GROUP BY event_type, DATE(created_at)
            ORDER BY date DESC, event_type
            "#,
        )
        .fetch_all(self.pool())
        .await?)
    }

    /// Per-day tailoring rollup over the trailing `days` days, newest day first.
    pub async fn daily_stats(&self, days: i64) -> StoreResult<Vec<DailyStat>> {
        let window = format!("-{days} days");
        Ok(sqlx::query_as::<_, DailyStat>(
            r#"
            SELECT
                DATE(created_at) AS date,
                COUNT(*)         AS tailoring_attempts,
                COALESCE(SUM(CASE WHEN success = 1 THEN 1 ELSE 0 END), 0)
                                 AS successful_tailoring,
                AVG(processing_time_ms) AS avg_processing_time
            FROM tailoring_events
            WHERE created_at >= datetime('now', ?)
            GROUP BY DATE(created_at)
            ORDER BY date DESC
            "#,
        )
        .bind(window)
        .fetch_all(self.pool())
        .await?)
    }

    pub async fn overview(&self) -> StoreResult<AnalyticsOverview> {
        Ok(AnalyticsOverview {
            tailoring_stats: self.tailoring_summary().await?,
            top_keywords: self.top_keywords(OVERVIEW_KEYWORD_LIMIT).await?,
            popular_jobs: self.popular_job_descriptions(OVERVIEW_JOB_LIMIT).await?,
            conversion_funnel: self.conversion_funnel().await?,
        })
    }
}

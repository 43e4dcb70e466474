//! Event Store writes: sessions, tailoring attempts, job descriptions,
//! keyword counters and conversions.
//!
//! Every write is a single statement. Counters use `INSERT … ON CONFLICT …
//! DO UPDATE` so concurrent identical submissions increment instead of racing
//! into duplicate rows. All timestamps come from `CURRENT_TIMESTAMP`.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::db::{classify_write_error, EventStore, StoreResult};
#[cfg(test)]
use crate::models::analytics::{JobDescriptionRow, SessionRow, TailoringEventRow};
use crate::tailoring::classifier::{ExperienceLevel, Industry};

/// Known user actions tracked in the conversion funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    ViewMain,
    View,
    Tailor,
    SuccessfulTailor,
    FailedTailor,
    Download,
    Share,
}

impl ConversionKind {
    pub const ALL: [ConversionKind; 7] = [
        ConversionKind::ViewMain,
        ConversionKind::View,
        ConversionKind::Tailor,
        ConversionKind::SuccessfulTailor,
        ConversionKind::FailedTailor,
        ConversionKind::Download,
        ConversionKind::Share,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionKind::ViewMain => "view_main",
            ConversionKind::View => "view",
            ConversionKind::Tailor => "tailor",
            ConversionKind::SuccessfulTailor => "successful_tailor",
            ConversionKind::FailedTailor => "failed_tailor",
            ConversionKind::Download => "download",
            ConversionKind::Share => "share",
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConversionKind(pub String);

impl fmt::Display for UnknownConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type '{}'", self.0)
    }
}

impl std::error::Error for UnknownConversionKind {}

impl FromStr for ConversionKind {
    type Err = UnknownConversionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownConversionKind(s.to_string()))
    }
}

/// One tailoring attempt, as appended to `tailoring_events`.
pub struct NewTailoringEvent<'a> {
    pub session_id: Option<&'a str>,
    pub resume_length: i64,
    pub job_description_length: i64,
    pub job_keywords: &'a str,
    pub processing_time_ms: i64,
    pub success: bool,
    pub error_message: Option<&'a str>,
}

/// Content fingerprint used to deduplicate job descriptions.
pub fn fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

impl EventStore {
    /// Creates the session on first sight; afterwards refreshes origin, agent
    /// and last activity. Creation time is never rewritten.
    pub async fn touch_session(
        &self,
        session_id: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (session_id, ip_address, user_agent)
            VALUES (?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                ip_address    = COALESCE(excluded.ip_address, user_sessions.ip_address),
                user_agent    = COALESCE(excluded.user_agent, user_sessions.user_agent),
                last_activity = MAX(user_sessions.last_activity, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(session_id)
        .bind(ip_address)
        .bind(user_agent)
        .execute(self.pool())
        .await
        .map_err(|e| classify_write_error("session", session_id, e))?;

        Ok(())
    }

    /// Appends a tailoring attempt and returns its row id.
    pub async fn record_tailoring_event(&self, event: NewTailoringEvent<'_>) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO tailoring_events
                (session_id, resume_length, job_description_length, job_keywords,
                 processing_time_ms, success, error_message)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.session_id)
        .bind(event.resume_length)
        .bind(event.job_description_length)
        .bind(event.job_keywords)
        .bind(event.processing_time_ms)
        .bind(event.success)
        .bind(event.error_message)
        .execute(self.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts a job description, or bumps `usage_count`/`last_seen` when the
    /// same text was seen before. The first submission's keywords and labels
    /// are kept on repeats. Returns the row id.
    pub async fn track_job_description(
        &self,
        content: &str,
        keywords: &str,
        industry: Industry,
        experience_level: ExperienceLevel,
    ) -> StoreResult<i64> {
        let content_hash = fingerprint(content);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_descriptions
                (content_hash, content, keywords, industry, experience_level)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(content_hash) DO UPDATE SET
                usage_count = job_descriptions.usage_count + 1,
                last_seen   = CURRENT_TIMESTAMP
            RETURNING id
            "#,
        )
        .bind(&content_hash)
        .bind(content)
        .bind(keywords)
        .bind(industry.as_str())
        .bind(experience_level.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(|e| classify_write_error("job description", &content_hash, e))?;

        debug!("Tracked job description {content_hash} (row {id})");
        Ok(id)
    }

    /// Increments the counter for every keyword in a comma-joined list.
    /// Keywords are trimmed and lower-cased; empty entries are skipped.
    /// Returns how many increments were applied.
    pub async fn track_keywords(&self, keywords: &str) -> StoreResult<usize> {
        let mut tracked = 0;

        for keyword in keywords
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
        {
            sqlx::query(
                r#"
                INSERT INTO keyword_usage (keyword) VALUES (?)
                ON CONFLICT(keyword) DO UPDATE SET
                    frequency = keyword_usage.frequency + 1,
                    last_used = CURRENT_TIMESTAMP
                "#,
            )
            .bind(&keyword)
            .execute(self.pool())
            .await
            .map_err(|e| classify_write_error("keyword", &keyword, e))?;
            tracked += 1;
        }

        Ok(tracked)
    }

    pub async fn track_conversion(
        &self,
        session_id: Option<&str>,
        kind: ConversionKind,
    ) -> StoreResult<i64> {
        let result = sqlx::query("INSERT INTO conversions (session_id, event_type) VALUES (?, ?)")
            .bind(session_id)
            .bind(kind.as_str())
            .execute(self.pool())
            .await?;

        Ok(result.last_insert_rowid())
    }
}

// Row readers; no route exposes them.
#[cfg(test)]
impl EventStore {
    pub async fn get_session(&self, session_id: &str) -> StoreResult<Option<SessionRow>> {
        Ok(
            sqlx::query_as::<_, SessionRow>("SELECT * FROM user_sessions WHERE session_id = ?")
                .bind(session_id)
                .fetch_optional(self.pool())
                .await?,
        )
    }

    /// Looks a job description up by its text.
    pub async fn get_job_description(&self, content: &str) -> StoreResult<Option<JobDescriptionRow>> {
        Ok(sqlx::query_as::<_, JobDescriptionRow>(
            "SELECT * FROM job_descriptions WHERE content_hash = ?",
        )
        .bind(fingerprint(content))
        .fetch_optional(self.pool())
        .await?)
    }

    pub async fn count_tailoring_events(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM tailoring_events")
            .fetch_one(self.pool())
            .await?)
    }

    /// Most recent attempts first.
    pub async fn recent_tailoring_events(&self, limit: i64) -> StoreResult<Vec<TailoringEventRow>> {
        Ok(sqlx::query_as::<_, TailoringEventRow>(
            "SELECT * FROM tailoring_events ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?)
    }
}

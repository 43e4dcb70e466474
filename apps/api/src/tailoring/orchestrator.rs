//! Request Orchestrator — the tailoring pipeline.
//!
//! received → classifying → dispatching-external → (succeeded | fallback-used | failed)
//!          → event-recorded → responded
//!
//! Only the suggestion call decides the outcome. Every analytics write is
//! best-effort: failures are logged and the request carries on.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analytics::events::{ConversionKind, NewTailoringEvent};
use crate::db::EventStore;
use crate::errors::AppError;
use crate::llm_client::{LlmError, SuggestionClient};
use crate::tailoring::classifier::JobProfile;
use crate::tailoring::prompts::{build_tailor_prompt, DEMO_SUGGESTIONS, TAILOR_SYSTEM};

pub const MISSING_INPUT_MESSAGE: &str = "Both resume and job description are required";

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub suggestions: String,
}

/// How the suggestion step resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailorOutcome {
    Succeeded(String),
    /// Upstream reported exhausted capacity; the demo text was served.
    FallbackUsed,
    Failed(String),
}

impl TailorOutcome {
    fn from_result(result: Result<String, LlmError>) -> Self {
        match result {
            Ok(text) => TailorOutcome::Succeeded(text),
            Err(e) if e.is_rate_limited() => {
                warn!("Suggestion service out of capacity, serving demo suggestions: {e}");
                TailorOutcome::FallbackUsed
            }
            Err(e) => TailorOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, TailorOutcome::Failed(_))
    }

    fn error_message(&self) -> Option<&str> {
        match self {
            TailorOutcome::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    fn into_response(self) -> Result<TailorResponse, AppError> {
        match self {
            TailorOutcome::Succeeded(suggestions) => Ok(TailorResponse { suggestions }),
            TailorOutcome::FallbackUsed => Ok(TailorResponse {
                suggestions: DEMO_SUGGESTIONS.to_string(),
            }),
            TailorOutcome::Failed(details) => Err(AppError::Tailoring { details }),
        }
    }
}

/// Treats absent and empty fields alike.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// Runs one tailoring request end to end.
///
/// Once input validation passes, exactly one tailoring event is appended,
/// whatever the outcome.
pub async fn tailor_resume(
    store: &EventStore,
    suggester: &dyn SuggestionClient,
    session_id: Option<&str>,
    request: TailorRequest,
) -> Result<TailorResponse, AppError> {
    let (Some(resume), Some(job)) = (required(request.resume), required(request.job)) else {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    };

    let started = Instant::now();

    let profile = JobProfile::analyze(&job);
    let keywords = profile.joined_keywords();

    if let Err(e) = store
        .track_job_description(&job, &keywords, profile.industry, profile.experience_level)
        .await
    {
        warn!("Failed to track job description: {e}");
    }
    if let Err(e) = store.track_keywords(&keywords).await {
        warn!("Failed to track keywords: {e}");
    }

    let prompt = build_tailor_prompt(&resume, &job);
    let outcome = TailorOutcome::from_result(suggester.suggest(TAILOR_SYSTEM, &prompt).await);

    if outcome.is_success() {
        if let Err(e) = store
            .track_conversion(session_id, ConversionKind::Tailor)
            .await
        {
            warn!("Failed to track tailor conversion: {e}");
        }
    }

    let processing_time_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
    if let Err(e) = store
        .record_tailoring_event(NewTailoringEvent {
            session_id,
            resume_length: char_len(&resume),
            job_description_length: char_len(&job),
            job_keywords: &keywords,
            processing_time_ms,
            success: outcome.is_success(),
            error_message: outcome.error_message(),
        })
        .await
    {
        warn!("Failed to record tailoring event: {e}");
    }

    info!(
        "Tailoring finished in {processing_time_ms}ms: industry={}, level={}, success={}",
        profile.industry.as_str(),
        profile.experience_level.as_str(),
        outcome.is_success()
    );

    outcome.into_response()
}

fn char_len(text: &str) -> i64 {
    i64::try_from(text.chars().count()).unwrap_or(i64::MAX)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{LlmError, SuggestionClient};

    /// Scripted stand-in for the suggestion service.
    pub enum Script {
        Reply(&'static str),
        RateLimited,
        ApiError(&'static str),
    }

    pub struct StubSuggester {
        script: Script,
        pub prompts: Mutex<Vec<(String, String)>>,
    }

    impl StubSuggester {
        pub fn new(script: Script) -> Self {
            Self {
                script,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SuggestionClient for StubSuggester {
        async fn suggest(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            match self.script {
                Script::Reply(text) => Ok(text.to_string()),
                Script::RateLimited => Err(LlmError::RateLimited {
                    message: "quota exceeded".to_string(),
                }),
                Script::ApiError(message) => Err(LlmError::Api {
                    status: 500,
                    message: message.to_string(),
                }),
            }
        }
    }
}

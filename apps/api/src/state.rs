use std::sync::Arc;

use crate::db::EventStore;
use crate::llm_client::SuggestionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: EventStore,
    /// Pluggable suggestion backend. Default: the Anthropic-backed `LlmClient`.
    pub suggester: Arc<dyn SuggestionClient>,
}

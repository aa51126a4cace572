use std::sync::Arc;

use crate::auth::session::SessionRegistry;
use crate::auth::CredentialProvider;
use crate::config::Config;
use crate::llm_client::LlmProvider;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    /// Pluggable completion backend. Default: GroqClient.
    pub llm: Arc<dyn LlmProvider>,
    /// Pluggable credential check. Default: the two-account reference table.
    pub credentials: Arc<dyn CredentialProvider>,
    pub sessions: SessionRegistry,
    pub config: Config,
}

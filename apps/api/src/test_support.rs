//! Shared fixtures for unit and router tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::auth::session::SessionRegistry;
use crate::auth::StaticCredentialTable;
use crate::config::Config;
use crate::llm_client::{LlmError, LlmProvider};
use crate::state::AppState;
use crate::store::DocumentStore;

/// Canned completion backend. Records every prompt it receives.
pub struct StubLlm {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the provider returned 503.
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        groq_api_key: "test-key".to_string(),
        curricula_file: dir.path().join("curricula.json"),
        pdf_output_path: dir.path().join("curriculum.pdf"),
        session_idle_ttl: Duration::from_secs(600),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(dir: &TempDir, llm: Arc<StubLlm>) -> AppState {
    let config = test_config(dir);
    AppState {
        store: DocumentStore::new(config.curricula_file.clone()),
        llm,
        credentials: Arc::new(StaticCredentialTable::reference()),
        sessions: SessionRegistry::new(config.session_idle_ttl),
        config,
    }
}

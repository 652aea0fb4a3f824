use crate::config::Config;
use crate::llm_client::LlmClient;
use std::sync::Arc;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm_client: Arc<LlmClient>,
}

impl AppState {
    pub fn new(config: Config, http_client: Arc<reqwest::Client>) -> Self {
        let llm_client = Arc::new(LlmClient::new(http_client, &config));
        AppState {
            config: Arc::new(config),
            llm_client,
        }
    }
}

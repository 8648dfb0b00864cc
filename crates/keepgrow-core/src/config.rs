//! Provider configuration loaded from the environment.
//!
//! Model ids and endpoints for the three external capabilities: streaming
//! chat, structured analysis, and the realtime live session. Unset values
//! fall back to the defaults below; change behavior without code edits.

use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_LIVE_URL: &str =
    "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";
const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_LIVE_MODEL: &str = "gemini-2.5-flash-native-audio-preview-09-2025";

/// Provider configuration loaded from environment.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | KEEPGROW_API_KEY / GEMINI_API_KEY | — | Provider API key (required for live calls). |
/// | KEEPGROW_CHAT_MODEL | gemini-2.5-flash | Streaming chat + analysis model. |
/// | KEEPGROW_LIVE_MODEL | gemini-2.5-flash-native-audio-preview-09-2025 | Realtime audio model. |
/// | KEEPGROW_API_BASE_URL | v1beta REST endpoint | Override for tests/proxies. |
/// | KEEPGROW_LIVE_URL | v1beta websocket endpoint | Override for tests/proxies. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub chat_model: String,
    pub live_model: String,
    pub base_url: String,
    pub live_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            live_model: DEFAULT_LIVE_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            live_url: DEFAULT_LIVE_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Load from environment. Unset or blank values use the defaults.
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt_string("KEEPGROW_API_KEY")
                .or_else(|| env_opt_string("GEMINI_API_KEY")),
            chat_model: env_opt_string("KEEPGROW_CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            live_model: env_opt_string("KEEPGROW_LIVE_MODEL")
                .unwrap_or_else(|| DEFAULT_LIVE_MODEL.to_string()),
            base_url: env_opt_string("KEEPGROW_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            live_url: env_opt_string("KEEPGROW_LIVE_URL")
                .unwrap_or_else(|| DEFAULT_LIVE_URL.to_string()),
        }
    }

    /// Key to use for requests, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|s| !s.trim().is_empty())
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

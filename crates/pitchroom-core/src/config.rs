//! Runtime configuration loaded from the environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | PITCHROOM_API_BASE | https://openrouter.ai/api/v1 | OpenAI-compatible API base URL. |
//! | PITCHROOM_API_KEY | (none) | Bearer key for the AI backend. |
//! | PITCHROOM_MODEL | meta-llama/llama-3.3-70b-instruct | Default chat model. |
//! | PITCHROOM_LANGUAGE | en | Default session language code. |
//! | PITCHROOM_REQUEST_TIMEOUT_SECS | 60 | Per-request HTTP timeout. |
//! | PITCHROOM_DATA_DIR | ./data/pitchroom | Sled store location for session records. |

use serde::{Deserialize, Serialize};

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "meta-llama/llama-3.3-70b-instruct".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_data_dir() -> String {
    "./data/pitchroom".to_string()
}

/// Process-level configuration. Load `.env` with `dotenvy` before calling
/// `from_env` if a dotfile is in use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// PITCHROOM_API_BASE: OpenAI-compatible API base URL, no trailing slash.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// PITCHROOM_API_KEY: bearer key. `None` means no remote provider can be built.
    #[serde(default)]
    pub api_key: Option<String>,
    /// PITCHROOM_MODEL: default chat model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// PITCHROOM_LANGUAGE: default language code for new sessions.
    #[serde(default = "default_language")]
    pub language: String,
    /// PITCHROOM_REQUEST_TIMEOUT_SECS: HTTP timeout for backend calls.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// PITCHROOM_DATA_DIR: sled store path for transcripts and analyses.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            language: default_language(),
            request_timeout_secs: default_timeout_secs(),
            data_dir: default_data_dir(),
        }
    }
}

impl RuntimeConfig {
    /// Load from environment. Unset or invalid values fall back to defaults
    /// (see the field docs).
    pub fn from_env() -> Self {
        Self {
            api_base: env_string("PITCHROOM_API_BASE", default_api_base()),
            api_key: env_opt_string("PITCHROOM_API_KEY"),
            model: env_string("PITCHROOM_MODEL", default_model()),
            language: env_string("PITCHROOM_LANGUAGE", default_language()),
            request_timeout_secs: env_u64("PITCHROOM_REQUEST_TIMEOUT_SECS", default_timeout_secs()),
            data_dir: env_string("PITCHROOM_DATA_DIR", default_data_dir()),
        }
    }
}

fn env_string(name: &str, default: String) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default,
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

use serde::{Deserialize, Serialize};

use crate::content_generator::AuthType;
use crate::model_catalog::DEFAULT_GEMINI_FLASH_MODEL;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Gemini model id used when a request does not name one.
    /// TOML: `basic.model`. Default: `gemini-2.5-flash`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Which credential set drives generator construction.
    /// TOML: `basic.auth_type`. Default: `openrouter`.
    #[serde(default = "default_auth_type")]
    pub auth_type: AuthType,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            loglevel: default_loglevel(),
            model: default_model(),
            auth_type: default_auth_type(),
        }
    }
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_model() -> String {
    DEFAULT_GEMINI_FLASH_MODEL.to_string()
}

fn default_auth_type() -> AuthType {
    AuthType::UseOpenRouter
}

use serde::{Deserialize, Serialize};

use super::deserialize_optional_string_lax;

/// Direct Gemini credentials.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// TOML: `providers.gemini.api_key`. Env: `GEMINI_API_KEY`.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string_lax",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<String>,
}

mod gemini;
mod openrouter;

pub use gemini::GeminiConfig;
pub use openrouter::{OpenRouterConfig, OpenRouterResolvedConfig};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Global provider defaults (used when provider-level config is unset).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProviderDefaults {
    /// Optional upstream HTTP proxy. If set, used for reqwest clients.
    /// TOML: `providers.defaults.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing for reqwest clients; disabled forces HTTP/1.
    /// TOML: `providers.defaults.enable_multiplexing`. Default: `false`.
    #[serde(default)]
    pub enable_multiplexing: bool,
}

/// All provider configurations.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProvidersConfig {
    /// Global defaults for providers (overridden per provider if set).
    #[serde(default)]
    pub defaults: ProviderDefaults,

    /// OpenRouter chat-completions upstream.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Direct Gemini key, only consulted for `gemini-api-key` auth.
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Accepts a string or a number; blank strings and null become `None`.
pub(super) fn deserialize_optional_string_lax<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected a string or a number for an api key",
        )),
    }
}

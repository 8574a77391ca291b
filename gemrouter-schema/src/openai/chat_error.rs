use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenRouter error envelope: `{ "error": { "code": ..., "message": "...", "metadata": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenRouterErrorBody {
    #[serde(rename = "error")]
    pub inner: OpenRouterErrorObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenRouterErrorObject {
    /// HTTP-like number from OpenRouter, or a string code from OpenAI-style providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,

    #[serde(default)]
    pub message: String,

    /// Provider-specific details (`provider_name`, `raw`, moderation reasons, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl OpenRouterErrorObject {
    /// Upstream provider that produced the error, when OpenRouter reports one.
    pub fn provider_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("provider_name")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_code_and_metadata() {
        let body: OpenRouterErrorBody = serde_json::from_value(json!({
            "error": {
                "code": 429,
                "message": "Rate limit exceeded",
                "metadata": {"provider_name": "Google AI Studio", "raw": "..."}
            }
        }))
        .unwrap();

        assert_eq!(body.inner.code, Some(json!(429)));
        assert_eq!(body.inner.message, "Rate limit exceeded");
        assert_eq!(body.inner.provider_name(), Some("Google AI Studio"));
    }

    #[test]
    fn parses_string_code_without_metadata() {
        let body: OpenRouterErrorBody = serde_json::from_value(json!({
            "error": {"code": "invalid_api_key", "message": "No auth credentials found"}
        }))
        .unwrap();

        assert_eq!(body.inner.code, Some(json!("invalid_api_key")));
        assert!(body.inner.provider_name().is_none());
    }
}

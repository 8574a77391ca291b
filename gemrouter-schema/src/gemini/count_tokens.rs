use serde::{Deserialize, Serialize};

/// `countTokens` result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensResponse {
    pub total_tokens: u32,

    /// Tokens served from cached content. Always `0` when caching is unsupported.
    #[serde(default)]
    pub cached_content_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_gemini_field_names() {
        let resp = CountTokensResponse {
            total_tokens: 5,
            cached_content_token_count: 0,
        };
        assert_eq!(
            serde_json::to_value(resp).unwrap(),
            json!({"totalTokens": 5, "cachedContentTokenCount": 0})
        );
    }
}

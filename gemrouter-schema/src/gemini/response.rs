use super::{Content, FunctionCall};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Gemini v1beta `GenerateContentResponse`; also used for each streamed chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponseBody {
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GeminiResponseBody {
    /// Answer text of the first candidate, thoughts excluded.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content.visible_text();
        (!text.is_empty()).then_some(text)
    }

    /// Function calls requested by the first candidate.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.function_call.as_ref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_content_token_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::Part;
    use serde_json::json;

    #[test]
    fn serializes_camel_case_and_skips_empty_fields() {
        let body = GeminiResponseBody {
            candidates: vec![Candidate {
                content: Some(Content::model(vec![Part::text("hi")])),
                index: Some(0),
                finish_reason: Some("STOP".to_string()),
                extra: BTreeMap::new(),
            }],
            usage_metadata: Some(UsageMetadata {
                prompt_token_count: Some(3),
                candidates_token_count: Some(1),
                total_token_count: Some(4),
                ..Default::default()
            }),
            response_id: Some("gen-1".to_string()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "hi"}]},
                    "index": 0,
                    "finishReason": "STOP"
                }],
                "usageMetadata": {
                    "promptTokenCount": 3,
                    "candidatesTokenCount": 1,
                    "totalTokenCount": 4
                },
                "responseId": "gen-1"
            })
        );
    }

    #[test]
    fn text_and_function_calls_read_first_candidate() {
        let body = GeminiResponseBody {
            candidates: vec![Candidate {
                content: Some(Content::model(vec![
                    Part::thought("hmm"),
                    Part::text("Hello"),
                    Part::function_call(FunctionCall {
                        id: None,
                        name: "ls".to_string(),
                        args: Some(json!({})),
                    }),
                ])),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(body.text().as_deref(), Some("Hello"));
        assert_eq!(body.function_calls().len(), 1);
        assert_eq!(body.function_calls()[0].name, "ls");
    }

    #[test]
    fn empty_response_has_no_text() {
        let body = GeminiResponseBody::default();
        assert!(body.text().is_none());
        assert!(body.function_calls().is_empty());
    }
}

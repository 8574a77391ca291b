use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::ChatToolCall;

/// `POST /chat/completions` request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,

    pub messages: Vec<ChatMessage>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// OpenRouter extension; ignored by providers without top-k sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ChatTool>>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One chat message. `role` stays a raw string for transparent pass-through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,

    /// `None` only for assistant messages that carry nothing but tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChatToolCall>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new("tool", content)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// `tools[]` entry; only `"function"` tools exist today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTool {
    #[serde(rename = "type")]
    pub kind: String,

    pub function: ChatFunctionDefinition,
}

impl ChatTool {
    pub fn function(function: ChatFunctionDefinition) -> Self {
        Self {
            kind: "function".to_string(),
            function,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatFunctionDefinition {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_request_omits_unset_fields() {
        let req = ChatCompletionRequest {
            model: "google/gemini-2.5-flash".to_string(),
            messages: vec![ChatMessage::user("hi")],
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "google/gemini-2.5-flash",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn streaming_request_carries_stream_options() {
        let req = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![],
            stream: true,
            stream_options: Some(StreamOptions {
                include_usage: true,
            }),
            max_tokens: Some(64),
            ..Default::default()
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["stream"], json!(true));
        assert_eq!(value["stream_options"], json!({"include_usage": true}));
        assert_eq!(value["max_tokens"], json!(64));
    }

    #[test]
    fn tool_result_message_shape() {
        let msg = ChatMessage::tool_result("call_1", r#"{"ok":true}"#);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "tool", "content": "{\"ok\":true}", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn function_tool_serializes_type_field() {
        let tool = ChatTool::function(ChatFunctionDefinition {
            name: "run".to_string(),
            description: None,
            parameters: Some(json!({"type": "object"})),
        });
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({"type": "function", "function": {"name": "run", "parameters": {"type": "object"}}})
        );
    }
}

use serde::{Deserialize, Serialize, de::Error};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Request `contents`: either a bare prompt string or ordered conversation turns.
///
/// A bare string is treated as a single `user` turn when a request is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentInput {
    Text(String),
    Turns(Vec<Content>),
}

impl ContentInput {
    /// All textual content in order, with no separator between parts.
    ///
    /// Non-text parts (function calls, inline data, ...) contribute nothing.
    pub fn concatenated_text(&self) -> Cow<'_, str> {
        match self {
            ContentInput::Text(text) => Cow::Borrowed(text.as_str()),
            ContentInput::Turns(turns) => {
                Cow::Owned(turns.iter().flat_map(Content::text_parts).collect())
            }
        }
    }

    /// Normalizes into conversation turns.
    pub fn into_turns(self) -> Vec<Content> {
        match self {
            ContentInput::Text(text) => vec![Content::user(text)],
            ContentInput::Turns(turns) => turns,
        }
    }
}

impl From<&str> for ContentInput {
    fn from(text: &str) -> Self {
        ContentInput::Text(text.to_string())
    }
}

impl From<String> for ContentInput {
    fn from(text: String) -> Self {
        ContentInput::Text(text)
    }
}

impl From<Vec<Content>> for ContentInput {
    fn from(turns: Vec<Content>) -> Self {
        ContentInput::Turns(turns)
    }
}

/// A single conversation turn or system instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Usually `"user"` or `"model"`. Absent for `systemInstruction`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(deserialize_with = "deserialize_parts")]
    pub parts: Vec<Part>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", vec![Part::text(text)])
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self::with_role("model", parts)
    }

    pub fn with_role(role: &str, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts,
            extra: BTreeMap::new(),
        }
    }

    /// Text of every part carrying `text`, in order.
    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| part.text.as_deref())
    }

    /// Non-thought text parts joined with no separator.
    pub fn visible_text(&self) -> String {
        self.parts
            .iter()
            .filter(|part| !part.is_thought())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// One atomic piece of content inside a `Content` turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Marks model reasoning text rather than answer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn thought(text: impl Into<String>) -> Self {
        Self {
            thought: Some(true),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            function_call: Some(call),
            ..Default::default()
        }
    }

    pub fn function_response(response: FunctionResponse) -> Self {
        Self {
            function_response: Some(response),
            ..Default::default()
        }
    }

    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// Function call produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

/// Result of a function call, sent back as context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

fn deserialize_parts<'de, D>(deserializer: D) -> Result<Vec<Part>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let parts = Vec::<Part>::deserialize(deserializer)?;

    for (index, part) in parts.iter().enumerate() {
        let data_fields_count = usize::from(part.text.is_some())
            + usize::from(part.inline_data.is_some())
            + usize::from(part.file_data.is_some())
            + usize::from(part.function_call.is_some())
            + usize::from(part.function_response.is_some());

        if data_fields_count > 1 {
            return Err(D::Error::custom(format!(
                "parts[{index}] must contain at most one data field among text, inlineData, fileData, functionCall, functionResponse"
            )));
        }
    }

    Ok(parts)
}

use super::{Content, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Optional `config` of a `generateContent` / `generateContentStream` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentConfig {
    /// Accepts a bare string or a `Content`; normalized to a single role-less text part.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_system_instruction"
    )]
    pub system_instruction: Option<Content>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_temperature"
    )]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GenerateContentConfig {
    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = normalize_system_instruction(Content {
            role: None,
            parts: vec![Part::text(text)],
            extra: BTreeMap::new(),
        });
        self
    }

    /// Function declarations across every `tools[]` entry, in order.
    pub fn function_declarations(&self) -> impl Iterator<Item = &FunctionDeclaration> {
        self.tools
            .iter()
            .flatten()
            .flat_map(|tool| tool.function_declarations.iter().flatten())
    }
}

/// `tools[]` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_declarations: Option<Vec<FunctionDeclaration>>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Declaration of a callable function tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// OpenAPI-style parameters schema (upper-case type names).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    /// JSON Schema parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_json_schema: Option<Value>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SystemInstructionInput {
    Text(String),
    Content(Content),
}

fn deserialize_system_instruction<'de, D>(deserializer: D) -> Result<Option<Content>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let content = match Option::<SystemInstructionInput>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(SystemInstructionInput::Text(text)) => Content {
            role: None,
            parts: vec![Part::text(text)],
            extra: BTreeMap::new(),
        },
        Some(SystemInstructionInput::Content(content)) => content,
    };

    Ok(normalize_system_instruction(content))
}

/// Drops the role and merges non-blank text parts; empty instructions become `None`.
fn normalize_system_instruction(content: Content) -> Option<Content> {
    let merged_text = content
        .parts
        .into_iter()
        .filter_map(|part| part.text.filter(|text| !text.trim().is_empty()))
        .collect::<Vec<_>>()
        .join("\n\n");

    (!merged_text.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part::text(merged_text)],
        extra: BTreeMap::new(),
    })
}

fn deserialize_temperature<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|value| value.clamp(0.0, 2.0)))
}

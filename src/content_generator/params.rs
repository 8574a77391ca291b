use gemrouter_schema::{ContentInput, GeminiResponseBody, GenerateContentConfig};
use serde::{Deserialize, Serialize};

/// One generation response, or one streamed chunk of it.
pub type GenerateContentResponse = GeminiResponseBody;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentParameters {
    /// Bare Gemini id or an already vendor-qualified id. Empty uses the configured model.
    #[serde(default)]
    pub model: String,
    pub contents: ContentInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GenerateContentConfig>,
}

impl GenerateContentParameters {
    pub fn new(model: impl Into<String>, contents: impl Into<ContentInput>) -> Self {
        Self {
            model: model.into(),
            contents: contents.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountTokensParameters {
    #[serde(default)]
    pub model: String,
    pub contents: ContentInput,
}

impl CountTokensParameters {
    pub fn new(model: impl Into<String>, contents: impl Into<ContentInput>) -> Self {
        Self {
            model: model.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedContentParameters {
    pub model: String,
    pub contents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedContentResponse {
    #[serde(default)]
    pub embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_tokens_params_accept_string_or_turns() {
        let params: CountTokensParameters = serde_json::from_str(
            r#"{"model":"google/gemini-2.5-flash","contents":"Hello world"}"#,
        )
        .unwrap();
        assert_eq!(params.contents, ContentInput::Text("Hello world".to_string()));

        let params: CountTokensParameters = serde_json::from_str(
            r#"{"model":"m","contents":[{"role":"user","parts":[{"text":"Hi"}]}]}"#,
        )
        .unwrap();
        assert!(matches!(params.contents, ContentInput::Turns(ref t) if t.len() == 1));
    }

    #[test]
    fn generate_params_builder() {
        let params = GenerateContentParameters::new("gemini-2.5-pro", "Hi")
            .with_config(GenerateContentConfig::default().with_system_instruction("Be brief."));
        assert_eq!(params.model, "gemini-2.5-pro");
        assert!(params.config.is_some());
    }
}

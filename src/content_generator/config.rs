use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

use crate::error::GeneratorError;
use crate::model_catalog::{DEFAULT_GEMINI_MODEL, to_openrouter_model};

pub static DEFAULT_OPENROUTER_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://openrouter.ai/api/v1").expect("fixed OpenRouter base URL must parse")
});

/// How the caller authenticated; selects which generator the factory builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthType {
    #[serde(rename = "oauth-personal")]
    LoginWithGoogle,
    #[serde(rename = "gemini-api-key")]
    UseGemini,
    #[serde(rename = "vertex-ai")]
    UseVertexAi,
    #[serde(rename = "cloud-shell")]
    CloudShell,
    #[serde(rename = "openrouter")]
    UseOpenRouter,
}

impl AuthType {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::LoginWithGoogle => "oauth-personal",
            AuthType::UseGemini => "gemini-api-key",
            AuthType::UseVertexAi => "vertex-ai",
            AuthType::CloudShell => "cloud-shell",
            AuthType::UseOpenRouter => "openrouter",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable generator settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentGeneratorConfig {
    /// Upstream model id. Already vendor-qualified for OpenRouter.
    pub model: String,
    /// Always `Some` for `AuthType::UseOpenRouter`.
    pub api_key: Option<String>,
    pub auth_type: AuthType,
    pub openrouter_base_url: Url,
}

/// Keys resolved by the configuration layer. Nothing here reads the environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: Option<Url>,
    pub gemini_api_key: Option<String>,
}

/// Transport options supplied by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpOptions {
    /// Attached to every request as default headers.
    pub headers: BTreeMap<String, String>,
    pub proxy: Option<Url>,
    /// Off forces HTTP/1.1 with short-lived connections.
    pub enable_multiplexing: bool,
}

impl HttpOptions {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Builds the generator config for `auth_type`, failing fast on a missing key.
///
/// For OpenRouter the model id is translated to its vendor-qualified form.
/// An empty `model` selects the default Gemini model.
pub fn create_content_generator_config(
    model: &str,
    auth_type: AuthType,
    credentials: &ProviderCredentials,
) -> Result<ContentGeneratorConfig, GeneratorError> {
    let model = if model.trim().is_empty() {
        DEFAULT_GEMINI_MODEL
    } else {
        model.trim()
    };
    let openrouter_base_url = credentials
        .openrouter_base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.clone());

    let (model, api_key) = match auth_type {
        AuthType::UseOpenRouter => {
            let key = non_blank(credentials.openrouter_api_key.as_deref())
                .ok_or(GeneratorError::MissingApiKey("OPENROUTER_API_KEY"))?;
            (to_openrouter_model(model).to_string(), Some(key))
        }
        AuthType::UseGemini => {
            let key = non_blank(credentials.gemini_api_key.as_deref())
                .ok_or(GeneratorError::MissingApiKey("GEMINI_API_KEY"))?;
            (model.to_string(), Some(key))
        }
        AuthType::LoginWithGoogle | AuthType::UseVertexAi | AuthType::CloudShell => {
            (model.to_string(), None)
        }
    };

    Ok(ContentGeneratorConfig {
        model,
        api_key,
        auth_type,
        openrouter_base_url,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

use serde::{Deserialize, Serialize};
use url::Url;

use super::{ProviderDefaults, deserialize_optional_string_lax};
use crate::content_generator::{DEFAULT_OPENROUTER_BASE_URL, HttpOptions};

/// OpenRouter provider configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// Chat-completions API root.
    /// TOML: `providers.openrouter.base_url`. Env: `OPENROUTER_BASE_URL`.
    /// Default: `https://openrouter.ai/api/v1`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// TOML: `providers.openrouter.api_key`. Env: `OPENROUTER_API_KEY`.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string_lax",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<String>,

    /// Optional upstream HTTP proxy.
    /// TOML: `providers.openrouter.proxy`.
    /// Falls back to `providers.defaults.proxy` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing for reqwest clients; disabled forces HTTP/1.
    /// TOML: `providers.openrouter.enable_multiplexing`.
    /// Falls back to `providers.defaults.enable_multiplexing`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_multiplexing: Option<bool>,

    /// Attribution sent as `HTTP-Referer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    /// Attribution sent as `X-Title`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// TOML: `providers.openrouter.user_agent`. Default: `gemrouter/<version>`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct OpenRouterResolvedConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub proxy: Option<Url>,
    pub enable_multiplexing: bool,
    pub referer: Option<String>,
    pub title: Option<String>,
    pub user_agent: String,
}

impl OpenRouterConfig {
    pub fn resolve(&self, defaults: &ProviderDefaults) -> OpenRouterResolvedConfig {
        OpenRouterResolvedConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            proxy: self.proxy.clone().or_else(|| defaults.proxy.clone()),
            enable_multiplexing: self
                .enable_multiplexing
                .unwrap_or(defaults.enable_multiplexing),
            referer: self.referer.clone(),
            title: self.title.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl OpenRouterResolvedConfig {
    /// Transport options handed to the generator factory.
    pub fn http_options(&self) -> HttpOptions {
        let mut options = HttpOptions {
            proxy: self.proxy.clone(),
            enable_multiplexing: self.enable_multiplexing,
            ..HttpOptions::default()
        };
        options
            .headers
            .insert("User-Agent".to_string(), self.user_agent.clone());
        if let Some(referer) = self.referer.as_deref().filter(|s| !s.trim().is_empty()) {
            options
                .headers
                .insert("HTTP-Referer".to_string(), referer.to_string());
        }
        if let Some(title) = self.title.as_deref().filter(|s| !s.trim().is_empty()) {
            options.headers.insert("X-Title".to_string(), title.to_string());
        }
        options
    }
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            proxy: None,
            enable_multiplexing: None,
            referer: None,
            title: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> Url {
    DEFAULT_OPENROUTER_BASE_URL.clone()
}

fn default_user_agent() -> String {
    concat!("gemrouter/", env!("CARGO_PKG_VERSION")).to_string()
}

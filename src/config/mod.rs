mod basic;
mod providers;

pub use basic::BasicConfig;
pub use providers::{
    GeminiConfig, OpenRouterConfig, OpenRouterResolvedConfig, ProviderDefaults, ProvidersConfig,
};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::content_generator::{HttpOptions, ProviderCredentials};
use crate::utils::logging::redacted;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core settings (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Upstream settings (see `providers` table in config.toml).
    #[serde(default)]
    pub providers: ProvidersConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variables honoured on top of `config.toml`, and the keys they land on.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("OPENROUTER_API_KEY", "providers.openrouter.api_key"),
    ("OPENROUTER_BASE_URL", "providers.openrouter.base_url"),
    ("GEMINI_API_KEY", "providers.gemini.api_key"),
    ("GEMROUTER_MODEL", "basic.model"),
    ("GEMROUTER_AUTH_TYPE", "basic.auth_type"),
    ("LOGLEVEL", "basic.loglevel"),
];

impl Config {
    /// Builds a Figment that merges defaults, `config.toml` if present, then known env vars.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(env_overrides())
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn openrouter(&self) -> OpenRouterResolvedConfig {
        self.providers.openrouter.resolve(&self.providers.defaults)
    }

    /// Credentials resolved at the edge, for `create_content_generator_config`.
    pub fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials {
            openrouter_api_key: self.providers.openrouter.api_key.clone(),
            openrouter_base_url: Some(self.providers.openrouter.base_url.clone()),
            gemini_api_key: self.providers.gemini.api_key.clone(),
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        self.openrouter().http_options()
    }

    pub fn log_effective(&self) {
        let openrouter = self.openrouter();
        info!(
            loglevel = %self.basic.loglevel,
            model = %self.basic.model,
            auth_type = %self.basic.auth_type,
            "Basic config loaded"
        );
        info!(
            openrouter_base_url = %openrouter.base_url,
            openrouter_api_key = redacted(openrouter.api_key.as_deref()),
            openrouter_proxy = %openrouter.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
            openrouter_enable_multiplexing = openrouter.enable_multiplexing,
            openrouter_user_agent = %openrouter.user_agent,
            gemini_api_key = redacted(self.providers.gemini.api_key.as_deref()),
            "OpenRouter config (effective)"
        );
    }
}

fn env_overrides() -> Env {
    Env::raw().filter_map(|key| {
        ENV_OVERRIDES
            .iter()
            .find(|(name, _)| key == *name)
            .map(|(_, path)| (*path).into())
    })
}

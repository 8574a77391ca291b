//! Provider-neutral content generation surface.

mod config;
mod params;

pub use config::{
    AuthType, ContentGeneratorConfig, DEFAULT_OPENROUTER_BASE_URL, HttpOptions,
    ProviderCredentials, create_content_generator_config,
};
pub use params::{
    ContentEmbedding, CountTokensParameters, EmbedContentParameters, EmbedContentResponse,
    GenerateContentParameters, GenerateContentResponse,
};

use async_trait::async_trait;
use futures::stream::BoxStream;
use gemrouter_schema::CountTokensResponse;

use crate::error::GeneratorError;
use crate::providers::openrouter::OpenRouterContentGenerator;

/// Ordered, finite, non-restartable chunks of one generation.
pub type ContentStream = BoxStream<'static, Result<GenerateContentResponse, GeneratorError>>;

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(
        &self,
        request: GenerateContentParameters,
    ) -> Result<GenerateContentResponse, GeneratorError>;

    /// The returned stream has already been opened upstream.
    async fn generate_content_stream(
        &self,
        request: GenerateContentParameters,
    ) -> Result<ContentStream, GeneratorError>;

    async fn count_tokens(
        &self,
        request: CountTokensParameters,
    ) -> Result<CountTokensResponse, GeneratorError>;

    async fn embed_content(
        &self,
        request: EmbedContentParameters,
    ) -> Result<EmbedContentResponse, GeneratorError>;
}

/// Builds the generator selected by `config.auth_type`.
///
/// Only OpenRouter is served here; native Gemini auth types are rejected.
pub fn create_content_generator(
    config: &ContentGeneratorConfig,
    http_options: &HttpOptions,
) -> Result<Box<dyn ContentGenerator>, GeneratorError> {
    match config.auth_type {
        AuthType::UseOpenRouter => Ok(Box::new(OpenRouterContentGenerator::new(
            config.clone(),
            http_options,
        )?)),
        other => Err(GeneratorError::UnsupportedAuthType(other)),
    }
}

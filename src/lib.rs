pub mod config;
pub mod content_generator;
pub mod error;
pub mod model_catalog;
pub mod providers;
pub mod token_estimate;
mod utils;

pub use content_generator::{
    AuthType, ContentGenerator, ContentGeneratorConfig, ContentStream, CountTokensParameters,
    EmbedContentParameters, GenerateContentParameters, GenerateContentResponse, HttpOptions,
    ProviderCredentials, create_content_generator, create_content_generator_config,
};
pub use error::GeneratorError;
pub use providers::openrouter::{OpenRouterContentGenerator, create_openrouter_content_generator};

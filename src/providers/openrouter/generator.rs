use async_trait::async_trait;
use futures::{StreamExt, stream};
use gemrouter_schema::CountTokensResponse;
use std::sync::Arc;
use tracing::{debug, info};

use super::client::{ChatTransport, ChunkStream, ReqwestTransport};
use super::convert::{ChunkConverter, build_chat_request, chat_response_to_gemini};
use crate::content_generator::{
    ContentGenerator, ContentGeneratorConfig, ContentStream, CountTokensParameters,
    EmbedContentParameters, EmbedContentResponse, GenerateContentParameters,
    GenerateContentResponse, HttpOptions,
};
use crate::error::GeneratorError;
use crate::model_catalog::{is_known_gemini_model, to_openrouter_model};
use crate::token_estimate;

/// `ContentGenerator` backed by OpenRouter's chat-completions API.
pub struct OpenRouterContentGenerator {
    config: ContentGeneratorConfig,
    transport: Arc<dyn ChatTransport>,
}

impl OpenRouterContentGenerator {
    /// No network activity happens here.
    pub fn new(
        config: ContentGeneratorConfig,
        http_options: &HttpOptions,
    ) -> Result<Self, GeneratorError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GeneratorError::MissingApiKey("OPENROUTER_API_KEY"))?;
        let transport = ReqwestTransport::new(&config.openrouter_base_url, api_key, http_options)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ContentGeneratorConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ContentGeneratorConfig {
        &self.config
    }

    fn upstream_model<'a>(&'a self, requested: &'a str) -> &'a str {
        let requested = requested.trim();
        if requested.is_empty() {
            &self.config.model
        } else if is_known_gemini_model(requested) {
            to_openrouter_model(requested)
        } else {
            debug!(
                channel = "openrouter",
                model = %requested,
                "Model id not in catalog; passing through unchanged"
            );
            requested
        }
    }
}

pub fn create_openrouter_content_generator(
    config: ContentGeneratorConfig,
    http_options: &HttpOptions,
) -> Result<OpenRouterContentGenerator, GeneratorError> {
    OpenRouterContentGenerator::new(config, http_options)
}

#[async_trait]
impl ContentGenerator for OpenRouterContentGenerator {
    async fn generate_content(
        &self,
        request: GenerateContentParameters,
    ) -> Result<GenerateContentResponse, GeneratorError> {
        let model = self.upstream_model(&request.model).to_string();
        info!(
            channel = "openrouter",
            req.model = %model,
            req.requested_model = %request.model,
            req.stream = false,
            "generate_content"
        );
        let body = build_chat_request(&model, request, false)?;
        let resp = self.transport.send_chat_completion(&body).await?;
        Ok(chat_response_to_gemini(resp))
    }

    async fn generate_content_stream(
        &self,
        request: GenerateContentParameters,
    ) -> Result<ContentStream, GeneratorError> {
        let model = self.upstream_model(&request.model).to_string();
        info!(
            channel = "openrouter",
            req.model = %model,
            req.requested_model = %request.model,
            req.stream = true,
            "generate_content_stream"
        );
        let body = build_chat_request(&model, request, true)?;
        let chunks = self.transport.stream_chat_completion(&body).await?;
        Ok(into_content_stream(chunks))
    }

    async fn count_tokens(
        &self,
        request: CountTokensParameters,
    ) -> Result<CountTokensResponse, GeneratorError> {
        let resp = token_estimate::count_tokens(&request.contents);
        debug!(
            channel = "openrouter",
            req.model = %request.model,
            total_tokens = resp.total_tokens,
            "Estimated tokens locally"
        );
        Ok(resp)
    }

    async fn embed_content(
        &self,
        request: EmbedContentParameters,
    ) -> Result<EmbedContentResponse, GeneratorError> {
        debug!(
            channel = "openrouter",
            req.model = %request.model,
            inputs = request.contents.len(),
            "Rejecting embeddings request"
        );
        Err(GeneratorError::embeddings_unsupported())
    }
}

enum StreamState {
    Open(ChunkStream, ChunkConverter),
    Done,
}

/// Converts chunks in order. Ends after the first error, flushing open tool calls on clean end.
fn into_content_stream(chunks: ChunkStream) -> ContentStream {
    stream::unfold(
        StreamState::Open(chunks, ChunkConverter::new()),
        |state| async move {
            let StreamState::Open(mut chunks, mut converter) = state else {
                return None;
            };
            loop {
                match chunks.next().await {
                    Some(Ok(chunk)) => {
                        if let Some(resp) = converter.push(chunk) {
                            return Some((Ok(resp), StreamState::Open(chunks, converter)));
                        }
                    }
                    Some(Err(e)) => return Some((Err(e), StreamState::Done)),
                    None => {
                        return converter
                            .finish()
                            .map(|resp| (Ok(resp), StreamState::Done));
                    }
                }
            }
        },
    )
    .boxed()
}

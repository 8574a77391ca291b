use async_trait::async_trait;
use futures::stream::BoxStream;
use gemrouter_schema::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};
use reqwest::header::{CONNECTION, HeaderMap, HeaderName, HeaderValue};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use super::api::OpenRouterApi;
use super::stream::decode_chunk_stream;
use crate::content_generator::HttpOptions;
use crate::error::{GeneratorError, from_upstream_response};
use crate::utils::logging::with_pretty_json_debug;

pub type ChunkStream = BoxStream<'static, Result<ChatCompletionChunk, GeneratorError>>;

/// One chat-completions round trip. No retries happen behind this trait.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat_completion(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GeneratorError>;

    async fn stream_chat_completion(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChunkStream, GeneratorError>;
}

/// `ChatTransport` over a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    chat_url: Url,
    api_key: String,
}

impl ReqwestTransport {
    pub fn new(
        base_url: &Url,
        api_key: impl Into<String>,
        http_options: &HttpOptions,
    ) -> Result<Self, GeneratorError> {
        let client = build_client(http_options)?;
        Self::with_client(client, base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &Url,
        api_key: impl Into<String>,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            client,
            chat_url: OpenRouterApi::chat_completions_url(base_url)?,
            api_key: api_key.into(),
        })
    }

    async fn post(&self, body: &ChatCompletionRequest) -> Result<reqwest::Response, GeneratorError> {
        with_pretty_json_debug(body, |pretty| {
            debug!(channel = "openrouter", body = %pretty, "Chat completions request");
        });

        let start = Instant::now();
        let req = OpenRouterApi::build_chat_request(&self.client, &self.chat_url, &self.api_key, body)?;
        let resp = self.client.execute(req).await?;
        info!(
            channel = "openrouter",
            req.model = %body.model,
            req.stream = body.stream,
            status = %resp.status(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "[OpenRouter] POST chat/completions -> {}",
            body.model
        );

        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(from_upstream_response(resp).await)
        }
    }
}

#[async_trait]
impl ChatTransport for ReqwestTransport {
    async fn send_chat_completion(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GeneratorError> {
        let resp = self.post(body).await?;
        let bytes = resp.bytes().await?;
        let parsed = serde_json::from_slice::<ChatCompletionResponse>(&bytes)?;
        with_pretty_json_debug(&parsed, |pretty| {
            debug!(channel = "openrouter", body = %pretty, "Chat completions response");
        });
        Ok(parsed)
    }

    async fn stream_chat_completion(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChunkStream, GeneratorError> {
        let resp = self.post(body).await?;
        Ok(decode_chunk_stream(resp.bytes_stream()))
    }
}

/// Shared client: 10s connect, 10 min overall, no redirects.
///
/// Without multiplexing the client is pinned to HTTP/1.1 and never reuses connections.
pub fn build_client(http_options: &HttpOptions) -> Result<reqwest::Client, GeneratorError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &http_options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| GeneratorError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| GeneratorError::InvalidHeader(format!("{name}: {e}")))?;
        headers.insert(name, value);
    }

    let mut builder = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(10 * 60));

    if let Some(proxy_url) = &http_options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    if http_options.enable_multiplexing {
        builder = builder.http2_adaptive_window(true);
    } else {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        builder = builder
            .http1_only()
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Duration::from_secs(0));
    }

    Ok(builder.default_headers(headers).build()?)
}

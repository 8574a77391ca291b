use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use gemrouter::content_generator::DEFAULT_OPENROUTER_BASE_URL;
use gemrouter::providers::openrouter::{ChatTransport, ChunkStream};
use gemrouter::{
    AuthType, ContentGenerator, ContentGeneratorConfig, GenerateContentParameters,
    GenerateContentResponse, GeneratorError, OpenRouterContentGenerator,
};
use gemrouter_schema::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, Content,
    GenerateContentConfig,
};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// In-memory transport that records every request body it sees.
#[derive(Default)]
struct RecordingTransport {
    requests: Mutex<Vec<ChatCompletionRequest>>,
    response: Option<ChatCompletionResponse>,
    chunks: Vec<serde_json::Value>,
    fail_status: Option<StatusCode>,
}

impl RecordingTransport {
    fn replying(response: serde_json::Value) -> Self {
        Self {
            response: Some(serde_json::from_value(response).unwrap()),
            ..Self::default()
        }
    }

    fn streaming(chunks: Vec<serde_json::Value>) -> Self {
        Self {
            chunks,
            ..Self::default()
        }
    }

    fn failing(status: StatusCode) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    fn recorded(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, body: &ChatCompletionRequest) -> Result<(), GeneratorError> {
        self.requests.lock().unwrap().push(body.clone());
        match self.fail_status {
            Some(status) => Err(GeneratorError::UpstreamStatus {
                status,
                message: "Rate limit exceeded".to_string(),
                body: String::new(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_chat_completion(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GeneratorError> {
        self.record(body)?;
        Ok(self.response.clone().unwrap_or_default())
    }

    async fn stream_chat_completion(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChunkStream, GeneratorError> {
        self.record(body)?;
        let chunks: Vec<Result<ChatCompletionChunk, GeneratorError>> = self
            .chunks
            .iter()
            .map(|c| serde_json::from_value(c.clone()).map_err(GeneratorError::from))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}

fn generator(transport: Arc<RecordingTransport>) -> OpenRouterContentGenerator {
    let config = ContentGeneratorConfig {
        model: "google/gemini-2.5-pro".to_string(),
        api_key: Some("test-api-key".to_string()),
        auth_type: AuthType::UseOpenRouter,
        openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.clone(),
    };
    OpenRouterContentGenerator::with_transport(config, transport)
}

#[tokio::test]
async fn generate_translates_model_and_converts_reply() {
    let transport = Arc::new(RecordingTransport::replying(json!({
        "id": "gen-42",
        "model": "google/gemini-2.5-flash",
        "created": 1735689600,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Paris."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14}
    })));
    let generator = generator(transport.clone());

    let request = GenerateContentParameters::new(
        "gemini-2.5-flash",
        vec![Content::user("Capital of France?")],
    )
    .with_config(GenerateContentConfig::default().with_system_instruction("Answer briefly."));
    let resp = generator.generate_content(request).await.unwrap();

    assert_eq!(resp.text().as_deref(), Some("Paris."));
    assert_eq!(resp.response_id.as_deref(), Some("gen-42"));
    assert_eq!(resp.candidates[0].finish_reason.as_deref(), Some("STOP"));
    assert_eq!(resp.usage_metadata.unwrap().total_token_count, Some(14));

    let sent = transport.recorded();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].model, "google/gemini-2.5-flash");
    assert!(!sent[0].stream);
    assert_eq!(sent[0].messages[0].role, "system");
    assert_eq!(sent[0].messages[1].content.as_deref(), Some("Capital of France?"));
}

#[tokio::test]
async fn unknown_and_empty_models() {
    let transport = Arc::new(RecordingTransport::replying(json!({"choices": []})));
    let generator = generator(transport.clone());

    generator
        .generate_content(GenerateContentParameters::new("my-custom-model", "hi"))
        .await
        .unwrap();
    generator
        .generate_content(GenerateContentParameters::new("", "hi"))
        .await
        .unwrap();

    let sent = transport.recorded();
    assert_eq!(sent[0].model, "my-custom-model");
    assert_eq!(sent[1].model, "google/gemini-2.5-pro");
}

#[tokio::test]
async fn upstream_errors_propagate_unchanged() {
    let transport = Arc::new(RecordingTransport::failing(StatusCode::TOO_MANY_REQUESTS));
    let generator = generator(transport.clone());

    let err = generator
        .generate_content(GenerateContentParameters::new("gemini-2.5-pro", "hi"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));

    let err = generator
        .generate_content_stream(GenerateContentParameters::new("gemini-2.5-pro", "hi"))
        .await
        .err()
        .expect("stream open should fail");
    assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));

    // one round trip per call, no retries
    assert_eq!(transport.recorded().len(), 2);
}

#[tokio::test]
async fn stream_yields_ordered_chunks() {
    let transport = Arc::new(RecordingTransport::streaming(vec![
        json!({"id": "gen-s", "model": "google/gemini-2.5-flash",
               "choices": [{"index": 0, "delta": {"role": "assistant", "content": "Hel"}}]}),
        json!({"choices": [{"index": 0, "delta": {"content": "lo"}}]}),
        json!({"choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]}),
        json!({"choices": [], "usage": {"prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}}),
    ]));
    let generator = generator(transport.clone());

    let chunks: Vec<GenerateContentResponse> = generator
        .generate_content_stream(GenerateContentParameters::new("gemini-2.5-flash", "hi"))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let text: String = chunks.iter().filter_map(GenerateContentResponse::text).collect();
    assert_eq!(text, "Hello");
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[2].candidates[0].finish_reason.as_deref(), Some("STOP"));
    assert_eq!(
        chunks[3].usage_metadata.as_ref().and_then(|u| u.total_token_count),
        Some(3)
    );
    assert!(chunks.iter().all(|c| c.response_id.as_deref() == Some("gen-s")));

    let sent = transport.recorded();
    assert!(sent[0].stream);
    assert_eq!(sent[0].model, "google/gemini-2.5-flash");
    assert!(sent[0].stream_options.is_some_and(|o| o.include_usage));
}

#[tokio::test]
async fn stream_reassembles_tool_calls() {
    let transport = Arc::new(RecordingTransport::streaming(vec![
        json!({"choices": [{"index": 0, "delta": {"tool_calls": [
            {"index": 0, "id": "call_7", "function": {"name": "search", "arguments": "{\"q\""}}
        ]}}]}),
        json!({"choices": [{"index": 0, "delta": {"tool_calls": [
            {"index": 0, "function": {"arguments": ":\"rust\"}"}}
        ]}}]}),
        json!({"choices": [{"index": 0, "delta": {}, "finish_reason": "tool_calls"}]}),
    ]));
    let generator = generator(transport);

    let chunks: Vec<GenerateContentResponse> = generator
        .generate_content_stream(GenerateContentParameters::new("gemini-2.5-pro", "find rust"))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(chunks.len(), 1);
    let calls = chunks[0].function_calls();
    assert_eq!(calls[0].id.as_deref(), Some("call_7"));
    assert_eq!(calls[0].name, "search");
    assert_eq!(calls[0].args, Some(json!({"q": "rust"})));
}

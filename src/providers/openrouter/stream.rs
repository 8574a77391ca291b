use eventsource_stream::Eventsource;
use futures::{Stream, TryStreamExt, future};
use gemrouter_schema::ChatCompletionChunk;
use std::fmt::Display;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::error;

use super::client::ChunkStream;
use crate::error::GeneratorError;

pub(crate) const STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Decodes an SSE byte stream into chat-completion chunks.
///
/// Stops at `[DONE]`. Empty events and keep-alive comments are skipped; a chunk carrying
/// `error` is surfaced as `UpstreamStreamError`.
pub(crate) fn decode_chunk_stream<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let events = bytes
        .eventsource()
        .timeout(STREAM_IDLE_TIMEOUT)
        .map(|item| match item {
            Ok(Ok(event)) => Ok(event),
            Ok(Err(e)) => Err(GeneratorError::StreamProtocolError(e.to_string())),
            Err(_) => {
                error!(channel = "openrouter", "Upstream SSE stream timed out (idle > 60s)");
                Err(GeneratorError::StreamProtocolError(
                    "Stream idle timeout".to_string(),
                ))
            }
        });

    let chunks = events
        .try_take_while(|event| future::ready(Ok(event.data.trim() != "[DONE]")))
        .try_filter_map(|event| future::ready(parse_chunk(&event.data)));

    Box::pin(chunks)
}

fn parse_chunk(data: &str) -> Result<Option<ChatCompletionChunk>, GeneratorError> {
    if data.trim().is_empty() {
        return Ok(None);
    }
    let chunk = serde_json::from_str::<ChatCompletionChunk>(data)?;
    if let Some(err) = chunk.error {
        error!(
            channel = "openrouter",
            code = ?err.code,
            message = %err.message,
            "Upstream error inside stream"
        );
        return Err(GeneratorError::UpstreamStreamError {
            code: err.code,
            message: err.message,
        });
    }
    Ok(Some(chunk))
}

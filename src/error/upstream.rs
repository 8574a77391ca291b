use gemrouter_schema::OpenRouterErrorBody;
use reqwest::StatusCode;

use super::{GeneratorError, UPSTREAM_BODY_PREVIEW_CHARS};
use crate::utils::logging::with_pretty_json_debug;

/// Consumes a non-2xx response into `GeneratorError::UpstreamStatus`.
pub(crate) async fn from_upstream_response(resp: reqwest::Response) -> GeneratorError {
    let status = resp.status();
    match resp.bytes().await {
        Ok(bytes) => from_upstream_body(status, &bytes),
        Err(e) => GeneratorError::Reqwest(e),
    }
}

pub(crate) fn from_upstream_body(status: StatusCode, bytes: &[u8]) -> GeneratorError {
    let raw_body = String::from_utf8_lossy(bytes);
    let body = format!("{:.len$}", raw_body, len = UPSTREAM_BODY_PREVIEW_CHARS);

    if let Ok(error) = serde_json::from_slice::<OpenRouterErrorBody>(bytes) {
        with_pretty_json_debug(&error, |pretty_error| {
            tracing::debug!(%status, body = %pretty_error, "Upstream structured error");
        });
        tracing::warn!(
            %status,
            code = ?error.inner.code,
            provider = error.inner.provider_name().unwrap_or("<none>"),
            message = %error.inner.message,
            "OpenRouter returned an error"
        );

        let message = if error.inner.message.is_empty() {
            fallback_message(status)
        } else {
            error.inner.message
        };
        return GeneratorError::UpstreamStatus {
            status,
            message,
            body,
        };
    }

    tracing::warn!(%status, body = %body, "Upstream unstructured error");
    GeneratorError::UpstreamStatus {
        status,
        message: fallback_message(status),
        body,
    }
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Upstream error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_body_message_is_extracted() {
        let raw = br#"{"error":{"code":401,"message":"No auth credentials found"}}"#;
        let err = from_upstream_body(StatusCode::UNAUTHORIZED, raw);
        match err {
            GeneratorError::UpstreamStatus {
                status,
                message,
                body,
            } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "No auth credentials found");
                assert!(body.contains("No auth credentials found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unstructured_body_falls_back_to_reason_phrase() {
        let err = from_upstream_body(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        match err {
            GeneratorError::UpstreamStatus { message, body, .. } => {
                assert_eq!(message, "Bad Gateway");
                assert_eq!(body, "<html>bad gateway</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn long_bodies_are_truncated() {
        let raw = "x".repeat(UPSTREAM_BODY_PREVIEW_CHARS * 2);
        let err = from_upstream_body(StatusCode::INTERNAL_SERVER_ERROR, raw.as_bytes());
        let GeneratorError::UpstreamStatus { body, .. } = err else {
            panic!("expected upstream status error");
        };
        assert_eq!(body.len(), UPSTREAM_BODY_PREVIEW_CHARS);
    }
}

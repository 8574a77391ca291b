use chrono::{DateTime, SecondsFormat};
use gemrouter_schema::openai::{ChatChoice, ChatUsage};
use gemrouter_schema::{
    Candidate, ChatCompletionResponse, Content, FunctionCall, Part, UsageMetadata,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::content_generator::GenerateContentResponse;

/// Chat-completions `finish_reason` -> Gemini `finishReason`.
pub fn map_finish_reason(reason: &str) -> &'static str {
    match reason {
        "stop" | "tool_calls" | "function_call" => "STOP",
        "length" => "MAX_TOKENS",
        "content_filter" => "SAFETY",
        _ => "OTHER",
    }
}

pub fn chat_response_to_gemini(resp: ChatCompletionResponse) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: resp.choices.into_iter().map(choice_to_candidate).collect(),
        usage_metadata: resp.usage.map(usage_metadata),
        model_version: resp.model,
        response_id: resp.id,
        create_time: resp.created.and_then(create_time),
        ..GenerateContentResponse::default()
    }
}

fn choice_to_candidate(choice: ChatChoice) -> Candidate {
    let message = choice.message;
    let mut parts = Vec::new();
    if let Some(reasoning) = message.reasoning.filter(|r| !r.is_empty()) {
        parts.push(Part::thought(reasoning));
    }
    if let Some(text) = message.content.filter(|t| !t.is_empty()) {
        parts.push(Part::text(text));
    }
    for call in message.tool_calls.into_iter().flatten() {
        parts.push(function_call_part(
            Some(call.id),
            call.function.name,
            &call.function.arguments,
        ));
    }

    candidate(choice.index, parts, choice.finish_reason.as_deref())
}

pub(super) fn candidate(index: u32, parts: Vec<Part>, finish_reason: Option<&str>) -> Candidate {
    Candidate {
        content: Some(Content::model(parts)),
        index: Some(index),
        finish_reason: finish_reason.map(|r| map_finish_reason(r).to_string()),
        extra: BTreeMap::new(),
    }
}

pub(super) fn usage_metadata(usage: ChatUsage) -> UsageMetadata {
    UsageMetadata {
        prompt_token_count: Some(usage.prompt_tokens),
        candidates_token_count: Some(usage.completion_tokens),
        total_token_count: Some(usage.total_tokens),
        ..UsageMetadata::default()
    }
}

/// Unix seconds -> RFC 3339, e.g. `2025-01-01T00:00:00Z`.
pub(super) fn create_time(created: i64) -> Option<String> {
    DateTime::from_timestamp(created, 0).map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Arguments that are not a JSON object are kept verbatim under `raw`.
pub(super) fn function_call_part(id: Option<String>, name: String, arguments: &str) -> Part {
    let args = if arguments.trim().is_empty() {
        json!({})
    } else {
        match serde_json::from_str::<Value>(arguments) {
            Ok(value @ Value::Object(_)) => value,
            _ => json!({ "raw": arguments }),
        }
    };
    Part::function_call(FunctionCall {
        id: id.filter(|id| !id.is_empty()),
        name,
        args: Some(args),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reasons() {
        assert_eq!(map_finish_reason("stop"), "STOP");
        assert_eq!(map_finish_reason("tool_calls"), "STOP");
        assert_eq!(map_finish_reason("length"), "MAX_TOKENS");
        assert_eq!(map_finish_reason("content_filter"), "SAFETY");
        assert_eq!(map_finish_reason("error"), "OTHER");
    }

    #[test]
    fn text_completion_maps_to_model_candidate() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "gen-123",
            "model": "google/gemini-2.5-flash",
            "created": 1735689600,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi there"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6}
        }))
        .unwrap();

        let gemini = chat_response_to_gemini(resp);
        assert_eq!(gemini.text().as_deref(), Some("Hi there"));
        assert_eq!(gemini.response_id.as_deref(), Some("gen-123"));
        assert_eq!(gemini.model_version.as_deref(), Some("google/gemini-2.5-flash"));
        assert_eq!(gemini.create_time.as_deref(), Some("2025-01-01T00:00:00Z"));

        let candidate = &gemini.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(
            candidate.content.as_ref().unwrap().role.as_deref(),
            Some("model")
        );

        let usage = gemini.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, Some(4));
        assert_eq!(usage.candidates_token_count, Some(2));
        assert_eq!(usage.total_token_count, Some(6));
    }

    #[test]
    fn tool_calls_become_function_call_parts() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "call_a", "type": "function",
                         "function": {"name": "get_weather", "arguments": "{\"city\":\"Oslo\"}"}},
                        {"id": "call_b", "type": "function",
                         "function": {"name": "echo", "arguments": "not json"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        let gemini = chat_response_to_gemini(resp);
        let calls = gemini.function_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id.as_deref(), Some("call_a"));
        assert_eq!(calls[0].args, Some(json!({"city": "Oslo"})));
        assert_eq!(calls[1].args, Some(json!({"raw": "not json"})));
        assert!(gemini.text().is_none());
        assert_eq!(gemini.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn reasoning_is_a_thought_part() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {"content": "42", "reasoning": "Let me think"},
                "finish_reason": "length"
            }]
        }))
        .unwrap();
        let gemini = chat_response_to_gemini(resp);
        let parts = &gemini.candidates[0].content.as_ref().unwrap().parts;
        assert!(parts[0].is_thought());
        assert_eq!(gemini.text().as_deref(), Some("42"));
        assert_eq!(gemini.candidates[0].finish_reason.as_deref(), Some("MAX_TOKENS"));
        assert!(gemini.create_time.is_none());
    }

    #[test]
    fn empty_arguments_become_empty_object() {
        let part = function_call_part(None, "noop".to_string(), "");
        assert_eq!(part.function_call.unwrap().args, Some(json!({})));
    }
}

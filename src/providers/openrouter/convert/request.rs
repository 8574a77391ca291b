use gemrouter_schema::gemini::FunctionDeclaration;
use gemrouter_schema::openai::{ChatFunctionDefinition, ChatTool, ChatToolCall, StreamOptions};
use gemrouter_schema::{ChatCompletionRequest, ChatMessage, Content, GenerateContentConfig};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::content_generator::GenerateContentParameters;
use crate::error::GeneratorError;

/// Builds the chat-completions body for `model` (already translated).
pub fn build_chat_request(
    model: &str,
    params: GenerateContentParameters,
    stream: bool,
) -> Result<ChatCompletionRequest, GeneratorError> {
    let config = params.config.unwrap_or_default();

    let mut messages = Vec::new();
    if let Some(system) = config.system_instruction.as_ref() {
        let text = system.visible_text();
        if !text.trim().is_empty() {
            messages.push(ChatMessage::system(text));
        }
    }

    let mut calls = CallIds::default();
    for (turn_idx, turn) in params.contents.into_turns().into_iter().enumerate() {
        push_turn(&mut messages, &mut calls, turn_idx, turn)?;
    }

    Ok(ChatCompletionRequest {
        model: model.to_string(),
        messages,
        stream,
        stream_options: stream.then_some(StreamOptions {
            include_usage: true,
        }),
        temperature: config.temperature,
        top_p: config.top_p,
        top_k: config.top_k,
        max_tokens: config.max_output_tokens,
        stop: config.stop_sequences.clone().filter(|stop| !stop.is_empty()),
        tools: chat_tools(&config),
        ..ChatCompletionRequest::default()
    })
}

fn map_role(role: Option<&str>) -> String {
    match role.map(str::to_ascii_lowercase).as_deref() {
        None | Some("" | "user" | "function") => "user".to_string(),
        Some("model") => "assistant".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Ids handed out to calls that arrived without one, queued per function name.
#[derive(Default)]
struct CallIds {
    unanswered: HashMap<String, VecDeque<String>>,
}

impl CallIds {
    fn for_call(&mut self, id: Option<&str>, name: &str, turn_idx: usize, part_idx: usize) -> String {
        let id = id
            .filter(|id| !id.is_empty())
            .map_or_else(|| format!("call_{turn_idx}_{part_idx}"), str::to_string);
        self.unanswered
            .entry(name.to_string())
            .or_default()
            .push_back(id.clone());
        id
    }

    /// An explicit id answers its own call; only id-less responses take the oldest open one.
    fn for_response(&mut self, id: Option<&str>, name: &str) -> String {
        let queue = self.unanswered.get_mut(name);
        match id.filter(|id| !id.is_empty()) {
            Some(id) => {
                let pos = queue.as_ref().and_then(|q| q.iter().position(|open| open == id));
                if let (Some(queue), Some(pos)) = (queue, pos) {
                    queue.remove(pos);
                }
                id.to_string()
            }
            None => queue
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| name.to_string()),
        }
    }
}

fn push_turn(
    messages: &mut Vec<ChatMessage>,
    calls: &mut CallIds,
    turn_idx: usize,
    turn: Content,
) -> Result<(), GeneratorError> {
    let role = map_role(turn.role.as_deref());
    let mut text = String::new();
    let mut tool_calls = Vec::new();
    let mut tool_results = Vec::new();

    for (part_idx, part) in turn.parts.into_iter().enumerate() {
        if part.is_thought() {
            continue;
        }
        if let Some(call) = part.function_call {
            let id = calls.for_call(call.id.as_deref(), &call.name, turn_idx, part_idx);
            let args = call.args.unwrap_or_else(|| Value::Object(Default::default()));
            tool_calls.push(ChatToolCall::function(
                id,
                call.name,
                serde_json::to_string(&args)?,
            ));
        } else if let Some(resp) = part.function_response {
            let id = calls.for_response(resp.id.as_deref(), &resp.name);
            let body = resp
                .response
                .unwrap_or_else(|| Value::Object(Default::default()));
            tool_results.push(ChatMessage::tool_result(id, serde_json::to_string(&body)?));
        } else if let Some(t) = part.text {
            text.push_str(&t);
        } else if part.inline_data.is_some() || part.file_data.is_some() {
            debug!(channel = "openrouter", turn = turn_idx, "Dropping non-text media part");
        }
    }

    messages.extend(tool_results);
    if !text.is_empty() || !tool_calls.is_empty() {
        messages.push(ChatMessage {
            role,
            content: (!text.is_empty()).then_some(text),
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            tool_call_id: None,
        });
    }
    Ok(())
}

fn chat_tools(config: &GenerateContentConfig) -> Option<Vec<ChatTool>> {
    let tools: Vec<ChatTool> = config
        .function_declarations()
        .map(|decl| ChatTool::function(function_definition(decl)))
        .collect();
    (!tools.is_empty()).then_some(tools)
}

fn function_definition(decl: &FunctionDeclaration) -> ChatFunctionDefinition {
    let parameters = decl.parameters_json_schema.clone().or_else(|| {
        decl.parameters.clone().map(|mut schema| {
            lowercase_schema_types(&mut schema);
            schema
        })
    });
    ChatFunctionDefinition {
        name: decl.name.clone(),
        description: (!decl.description.is_empty()).then(|| decl.description.clone()),
        parameters,
    }
}

/// Gemini OpenAPI schemas spell types as `STRING`, `OBJECT`, ...; JSON Schema wants lowercase.
fn lowercase_schema_types(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                match value {
                    Value::String(s) if key == "type" => *s = s.to_ascii_lowercase(),
                    _ => lowercase_schema_types(value),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(lowercase_schema_types),
        _ => {}
    }
}

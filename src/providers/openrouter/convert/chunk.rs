use gemrouter_schema::openai::{ChunkChoice, ToolCallDelta};
use gemrouter_schema::{ChatCompletionChunk, Part};
use std::collections::{BTreeMap, HashMap};

use super::response::{candidate, create_time, function_call_part, usage_metadata};
use crate::content_generator::GenerateContentResponse;

/// Turns streamed chat-completion chunks into Gemini response chunks.
///
/// Tool-call fragments are buffered per `(choice, tool index)` and emitted whole
/// on the chunk that carries the choice's `finish_reason`. A fragment bringing a
/// new id to an occupied index opens a fresh call, so parallel calls sent without
/// `index` stay apart.
#[derive(Debug, Default)]
pub struct ChunkConverter {
    /// `(choice, seq)` -> call, in arrival order.
    pending: BTreeMap<(u32, u32), PendingToolCall>,
    /// `(choice, tool index)` -> seq of the call currently receiving fragments.
    slots: HashMap<(u32, u32), u32>,
    next_seq: u32,
    response_id: Option<String>,
    model_version: Option<String>,
    create_time: Option<String>,
}

#[derive(Debug, Default)]
struct PendingToolCall {
    id: Option<String>,
    name: String,
    arguments: String,
}

impl ChunkConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the chunk carries nothing worth emitting yet.
    pub fn push(&mut self, chunk: ChatCompletionChunk) -> Option<GenerateContentResponse> {
        if self.response_id.is_none() {
            self.response_id = chunk.id;
        }
        if self.model_version.is_none() {
            self.model_version = chunk.model;
        }
        if self.create_time.is_none() {
            self.create_time = chunk.created.and_then(create_time);
        }

        let candidates: Vec<_> = chunk
            .choices
            .into_iter()
            .filter_map(|choice| self.convert_choice(choice))
            .collect();
        let usage_metadata = chunk.usage.map(usage_metadata);

        if candidates.is_empty() && usage_metadata.is_none() {
            return None;
        }
        Some(self.response(candidates, usage_metadata))
    }

    /// Flushes tool calls left open by a stream that ended without `finish_reason`.
    pub fn finish(&mut self) -> Option<GenerateContentResponse> {
        if self.pending.is_empty() {
            return None;
        }
        self.slots.clear();
        let mut by_choice: BTreeMap<u32, Vec<Part>> = BTreeMap::new();
        for ((choice, _), call) in std::mem::take(&mut self.pending) {
            by_choice.entry(choice).or_default().push(call.into_part());
        }
        let candidates = by_choice
            .into_iter()
            .map(|(index, parts)| candidate(index, parts, None))
            .collect();
        Some(self.response(candidates, None))
    }

    fn convert_choice(&mut self, choice: ChunkChoice) -> Option<gemrouter_schema::Candidate> {
        let delta = choice.delta;
        let mut parts = Vec::new();

        if let Some(reasoning) = delta.reasoning.filter(|r| !r.is_empty()) {
            parts.push(Part::thought(reasoning));
        }
        if let Some(text) = delta.content.filter(|t| !t.is_empty()) {
            parts.push(Part::text(text));
        }
        for fragment in delta.tool_calls.into_iter().flatten() {
            self.accumulate(choice.index, fragment);
        }

        if choice.finish_reason.is_some() {
            parts.extend(self.drain_choice(choice.index));
        }
        if parts.is_empty() && choice.finish_reason.is_none() {
            return None;
        }
        Some(candidate(choice.index, parts, choice.finish_reason.as_deref()))
    }

    fn accumulate(&mut self, choice: u32, fragment: ToolCallDelta) {
        let id = fragment.id.filter(|id| !id.is_empty());
        let slot = (choice, fragment.index);
        let current = self.slots.get(&slot).copied().filter(|seq| {
            let open_id = self.pending.get(&(choice, *seq)).and_then(|c| c.id.as_deref());
            match (open_id, id.as_deref()) {
                (Some(open), Some(incoming)) => open == incoming,
                _ => true,
            }
        });
        let seq = match current {
            Some(seq) => seq,
            None => {
                let seq = self.next_seq;
                self.next_seq = self.next_seq.wrapping_add(1);
                self.slots.insert(slot, seq);
                seq
            }
        };

        let call = self.pending.entry((choice, seq)).or_default();
        if id.is_some() {
            call.id = id;
        }
        if let Some(function) = fragment.function {
            if let Some(name) = function.name {
                call.name.push_str(&name);
            }
            if let Some(arguments) = function.arguments {
                call.arguments.push_str(&arguments);
            }
        }
    }

    fn drain_choice(&mut self, choice: u32) -> Vec<Part> {
        self.slots.retain(|(c, _), _| *c != choice);
        let keys: Vec<_> = self
            .pending
            .range((choice, 0)..=(choice, u32::MAX))
            .map(|(key, _)| *key)
            .collect();
        keys.into_iter()
            .filter_map(|key| self.pending.remove(&key))
            .map(PendingToolCall::into_part)
            .collect()
    }

    fn response(
        &self,
        candidates: Vec<gemrouter_schema::Candidate>,
        usage_metadata: Option<gemrouter_schema::UsageMetadata>,
    ) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates,
            usage_metadata,
            model_version: self.model_version.clone(),
            response_id: self.response_id.clone(),
            create_time: self.create_time.clone(),
            ..GenerateContentResponse::default()
        }
    }
}

impl PendingToolCall {
    fn into_part(self) -> Part {
        function_call_part(self.id, self.name, &self.arguments)
    }
}

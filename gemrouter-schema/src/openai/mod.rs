//! OpenAI-compatible chat-completions wire types, as served by OpenRouter.

mod chat_chunk;
mod chat_error;
mod chat_request;
mod chat_response;

pub use chat_chunk::{
    ChatCompletionChunk, ChunkChoice, ChunkDelta, FunctionCallDelta, ToolCallDelta,
};
pub use chat_error::{OpenRouterErrorBody, OpenRouterErrorObject};
pub use chat_request::{
    ChatCompletionRequest, ChatFunctionDefinition, ChatMessage, ChatTool, StreamOptions,
};
pub use chat_response::{
    ChatChoice, ChatCompletionResponse, ChatFunctionCall, ChatResponseMessage, ChatToolCall,
    ChatUsage,
};

pub mod gemini;
pub mod openai;

pub use gemini::{
    Candidate, Content, ContentInput, CountTokensResponse, FunctionCall, FunctionResponse,
    GeminiResponseBody, GenerateContentConfig, Part, Tool, UsageMetadata,
};
pub use openai::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    OpenRouterErrorBody, OpenRouterErrorObject,
};

//! Gemini request/response shapes <-> OpenAI-compatible chat completions.

mod chunk;
mod request;
mod response;

pub use chunk::ChunkConverter;
pub use request::build_chat_request;
pub use response::{chat_response_to_gemini, map_finish_reason};

mod content;
mod count_tokens;
mod generate_content_config;
mod response;

pub use content::{Content, ContentInput, FunctionCall, FunctionResponse, Part};
pub use count_tokens::CountTokensResponse;
pub use generate_content_config::{FunctionDeclaration, GenerateContentConfig, Tool};
pub use response::{Candidate, GeminiResponseBody, UsageMetadata};

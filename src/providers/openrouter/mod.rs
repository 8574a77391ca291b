//! OpenRouter-backed content generator.

mod api;
pub mod client;
pub mod convert;
mod generator;
mod stream;

pub use api::OpenRouterApi;
pub use client::{ChatTransport, ChunkStream, ReqwestTransport, build_client};
pub use generator::{OpenRouterContentGenerator, create_openrouter_content_generator};

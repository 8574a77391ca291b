mod generator;
mod upstream;

pub use generator::{EMBEDDINGS_UNSUPPORTED_MESSAGE, GeneratorError};
pub(crate) use upstream::from_upstream_response;

/// Max characters of a raw upstream body kept in logs and error values.
pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 300;

//! Gemini model ids and their OpenRouter vendor-qualified equivalents.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Bare Gemini id -> OpenRouter id. Order is kept for listings.
pub const OPENROUTER_MODEL_NAMES: &[(&str, &str)] = &[
    ("gemini-2.5-pro", "google/gemini-2.5-pro"),
    ("gemini-2.5-flash", "google/gemini-2.5-flash"),
    ("gemini-2.5-flash-lite", "google/gemini-2.5-flash-lite"),
    ("gemini-2.0-flash", "google/gemini-2.0-flash-001"),
    ("gemini-2.0-flash-lite", "google/gemini-2.0-flash-lite-001"),
    ("gemini-1.5-pro", "google/gemini-pro-1.5"),
    ("gemini-1.5-flash", "google/gemini-flash-1.5"),
    ("gemini-1.5-flash-8b", "google/gemini-flash-1.5-8b"),
];

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_FLASH_MODEL: &str = "gemini-2.5-flash";

static MODEL_NAME_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| OPENROUTER_MODEL_NAMES.iter().copied().collect());

/// Translates a bare Gemini id into its OpenRouter id.
///
/// Unknown ids, including ids that are already vendor-qualified, pass through unchanged.
pub fn to_openrouter_model(model: &str) -> &str {
    MODEL_NAME_MAP.get(model).copied().unwrap_or(model)
}

/// Whether `model` has an entry in the translation table.
pub fn is_known_gemini_model(model: &str) -> bool {
    MODEL_NAME_MAP.contains_key(model)
}

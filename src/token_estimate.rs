//! Local token estimation used when the upstream tokenizer is unavailable.

use gemrouter_schema::{ContentInput, CountTokensResponse};

/// Characters assumed per token.
pub const CHARS_PER_TOKEN: usize = 4;

/// `ceil(len / 4)`, where `len` counts UTF-16 code units, so characters outside
/// the Basic Multilingual Plane count twice.
pub fn estimate_tokens(text: &str) -> u32 {
    let units = text.encode_utf16().count();
    u32::try_from(units.div_ceil(CHARS_PER_TOKEN)).unwrap_or(u32::MAX)
}

/// Estimates request size from its concatenated text. Caching is never reported.
pub fn count_tokens(contents: &ContentInput) -> CountTokensResponse {
    CountTokensResponse {
        total_tokens: estimate_tokens(&contents.concatenated_text()),
        cached_content_token_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemrouter_schema::Content;

    #[test]
    fn known_estimates() {
        assert_eq!(estimate_tokens("Hello world"), 3);
        assert_eq!(estimate_tokens("Hello, how are you?"), 5);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn empty_text_is_zero_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        let resp = count_tokens(&ContentInput::Turns(vec![]));
        assert_eq!(resp.total_tokens, 0);
        assert_eq!(resp.cached_content_token_count, 0);
    }

    #[test]
    fn counts_utf16_units_not_bytes() {
        // four units, ten bytes
        assert_eq!(estimate_tokens("日本語!"), 1);
        // three scalars, six units
        assert_eq!(estimate_tokens("😀😀😀"), 2);
    }

    #[test]
    fn monotonic_in_length() {
        let mut text = String::new();
        let mut previous = 0;
        for _ in 0..64 {
            text.push('a');
            let current = estimate_tokens(&text);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn turns_concatenate_without_separator() {
        let contents = ContentInput::Turns(vec![Content::user("Hello, "), Content::user("world")]);
        // 12 chars
        assert_eq!(count_tokens(&contents).total_tokens, 3);
        assert_eq!(count_tokens(&contents), count_tokens(&contents));
    }
}

use crate::constants::UPSTREAM_EXCERPT_MAX_CHARS;
use crate::utils::truncate_chars;

const MODEL_SELECTION_TERMS: [&str; 4] = ["model", "decommissioned", "not found", "invalid"];

/// Heuristic: does an upstream error body blame the requested model?
///
/// Keyword match on the raw body, case-insensitive. Replace with a structured
/// error code check if the provider starts returning one.
pub fn looks_like_model_selection_error(body: &str) -> bool {
    let body = body.to_lowercase();
    MODEL_SELECTION_TERMS.iter().any(|term| body.contains(term))
}

/// Whether a failed call with `requested` should be retried on `default_model`
pub fn should_fallback(requested: &str, default_model: &str, body: &str) -> bool {
    requested != default_model && looks_like_model_selection_error(body)
}

/// Trimmed upstream body, at most 200 characters
pub fn upstream_excerpt(body: &str) -> String {
    truncate_chars(body.trim(), UPSTREAM_EXCERPT_MAX_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::char_len;

    #[test]
    fn test_model_selection_terms() {
        assert!(looks_like_model_selection_error(
            r#"{"error":{"message":"The model `llama-3.1-70b` has been decommissioned"}}"#
        ));
        assert!(looks_like_model_selection_error("Model Not Found"));
        assert!(looks_like_model_selection_error("INVALID request"));
        assert!(!looks_like_model_selection_error("rate limit exceeded"));
        assert!(!looks_like_model_selection_error(""));
    }

    #[test]
    fn test_no_fallback_to_same_model() {
        assert!(!should_fallback("stable", "stable", "model decommissioned"));
        assert!(should_fallback("preview", "stable", "model decommissioned"));
        assert!(!should_fallback("preview", "stable", "internal server error"));
    }

    #[test]
    fn test_upstream_excerpt_bounded() {
        let body = "é".repeat(500);
        assert_eq!(char_len(&upstream_excerpt(&body)), 200);
        assert_eq!(upstream_excerpt("  short  "), "short");
    }
}

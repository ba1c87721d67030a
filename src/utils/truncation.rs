const MAX_SUMMARY_LENGTH: usize = 1_000;
const MAX_ERROR_LENGTH: usize = 500;

/// Cut `text` to at most `max_chars` characters, never splitting a UTF-8
/// sequence. Appends `...` when something was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
    }
}

/// AI summaries are shown in a table cell; keep them bounded.
pub fn truncate_summary(summary: &str) -> String {
    truncate_chars(summary.trim(), MAX_SUMMARY_LENGTH)
}

/// Error messages persisted on scan rows.
pub fn truncate_error(error: &str) -> String {
    truncate_chars(error, MAX_ERROR_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_chars("hola", 10), "hola");
        assert_eq!(truncate_chars("hola", 4), "hola");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        assert_eq!(truncate_chars("café con leche", 4), "café...");
        assert_eq!(truncate_chars("ñññññ", 2), "ññ...");
    }

    #[test]
    fn test_truncate_error_bounded() {
        let long = "x".repeat(2_000);
        assert_eq!(truncate_error(&long).chars().count(), MAX_ERROR_LENGTH + 3);
    }
}

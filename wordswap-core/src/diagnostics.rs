//! Helpers for logging page text without leaking it.
//!
//! Page content can be private (mail, chat, banking), so debug logs describe
//! text by length unless `WORDSWAP_ALLOW_DEBUG_TEXT=true` is set.

use once_cell::sync::Lazy;

static DEBUG_TEXT_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("WORDSWAP_ALLOW_DEBUG_TEXT")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

pub fn describe_text(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[TEXT]".to_string()
    } else {
        format!("[TEXT: {} chars]", s.chars().count())
    }
}

/// Returns `text` itself when debug text is allowed, otherwise a length summary.
pub fn loggable(text: &str) -> String {
    if *DEBUG_TEXT_ALLOWED {
        text.to_string()
    } else {
        describe_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_by_length() {
        assert_eq!(describe_text("short"), "[TEXT]");
        assert_eq!(describe_text("a much longer sentence"), "[TEXT: 22 chars]");
    }
}

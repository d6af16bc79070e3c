//! Anti-bypass guard: heuristic detection of raw tags in user text.
//!
//! This is a second layer for [`FormatterMode::Strict`](crate::FormatterMode),
//! not a security boundary. It is not an HTML tokenizer: prose like
//! `a <b> c` trips it, and `< 1>` or an unclosed `<img` do not. Escaping is
//! what keeps the output inert.

use std::sync::LazyLock;

use regex::Regex;

/// An opening tag, optionally followed by a closing tag.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<\s*[A-Za-z_]+\s*.*/?\s*>(?:.*<\s*/[\sA-Za-z_]+>)?")
        .expect("invalid tag regex")
});

/// Check whether raw input appears to embed an HTML tag.
///
/// # Examples
///
/// ```
/// use coffeeco_richtext::looks_like_tag;
///
/// assert!(looks_like_tag("<script>alert(1)</script>"));
/// assert!(!looks_like_tag("1 < 2 and 3 > 2"));
/// ```
#[must_use]
pub fn looks_like_tag(input: &str) -> bool {
    TAG_PATTERN.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_script() {
        assert!(looks_like_tag("<script>alert(1)</script>"));
    }

    #[test]
    fn test_detects_self_closing_with_attributes() {
        assert!(looks_like_tag(r#"<img src=x onerror="alert(1)"/>"#));
    }

    #[test]
    fn test_detects_across_lines() {
        assert!(looks_like_tag("hello\n< div\n class=x>"));
    }

    #[test]
    fn test_plain_text_passes() {
        assert!(!looks_like_tag("just a post about coffee"));
        assert!(!looks_like_tag("a -> b"));
    }

    #[test]
    fn test_false_positive_on_prose() {
        // Known over-trigger: looks like a tag, is just text.
        assert!(looks_like_tag("I <3 coffee <so> much"));
    }

    #[test]
    fn test_false_negative_on_unclosed_tag() {
        // Known under-trigger: no closing `>`.
        assert!(!looks_like_tag("<img src=x onerror=alert(1)"));
    }
}

//! HTML escaping for user-authored text.
//!
//! Every character of user text that reaches the output passes through
//! [`escape`]. [`unescape`] is its inverse and exists so callers (and tests)
//! can recover the displayed text from formatter output.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Matches a named, decimal, or hex character reference.
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z]+);")
        .expect("invalid reference regex")
});

/// Escape HTML special characters.
///
/// Maps `&`, `<`, `>`, `"`, `'` and the backtick to character references.
/// Existing references are escaped again: input is always raw user text,
/// never markup.
///
/// # Examples
///
/// ```
/// use coffeeco_richtext::escape;
///
/// assert_eq!(escape("<b>"), "&lt;b&gt;");
/// assert_eq!(escape("&amp;"), "&amp;amp;");
/// ```
#[must_use]
pub fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    escape_into(s, &mut result);
    result
}

/// Escape `s` and append it to `out`.
pub(crate) fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            _ => out.push(c),
        }
    }
}

/// Decode character references back into text.
///
/// Understands everything [`escape`] produces plus `&apos;`, `&grave;` and
/// arbitrary decimal/hex references. Unknown names and references to invalid
/// code points are left untouched.
///
/// # Examples
///
/// ```
/// use coffeeco_richtext::{escape, unescape};
///
/// let raw = "it's <not> `code` & more";
/// assert_eq!(unescape(&escape(raw)), raw);
/// ```
#[must_use]
pub fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_owned();
    }

    REFERENCE_PATTERN
        .replace_all(s, |caps: &Captures<'_>| {
            decode_reference(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

/// Decode the body of a single reference (the part between `&` and `;`).
fn decode_reference(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    Some(match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "grave" => '`',
        "nbsp" => '\u{00a0}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(
            escape("a&b<c>d\"e'f`g"),
            "a&amp;b&lt;c&gt;d&quot;e&#x27;f&#x60;g"
        );
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape("hello world"), "hello world");
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_keeps_non_ascii() {
        assert_eq!(escape("café ☕ <3"), "café ☕ &lt;3");
    }

    #[test]
    fn test_escape_double_escapes_references() {
        assert_eq!(escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_unescape_own_output() {
        assert_eq!(
            unescape("&lt;b&gt; &amp; &quot;x&quot; &#x27;y&#x27; &#x60;"),
            "<b> & \"x\" 'y' `"
        );
    }

    #[test]
    fn test_unescape_numeric_and_named() {
        assert_eq!(unescape("&#65;&#x42;&apos;&grave;"), "AB'`");
    }

    #[test]
    fn test_unescape_unknown_reference_kept() {
        assert_eq!(unescape("&bogus; &#xFFFFFF; &"), "&bogus; &#xFFFFFF; &");
    }

    #[test]
    fn test_unescape_single_pass() {
        // `&amp;lt;` decodes to the literal text `&lt;`, not to `<`.
        assert_eq!(unescape("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_round_trip() {
        for raw in [
            "",
            "plain",
            "<script>alert('x')</script>",
            "&amp; already escaped",
            "```code``` and `tick`",
            "emoji 🎉 & ünïcödé",
            "&#x27;&#39;&",
        ] {
            assert_eq!(unescape(&escape(raw)), raw, "round trip failed for {raw:?}");
        }
    }
}

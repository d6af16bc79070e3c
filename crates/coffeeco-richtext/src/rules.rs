//! Built-in rules and the ordered [`RuleSet`].
//!
//! # Default order
//!
//! | # | Rule | Syntax |
//! |---|------|--------|
//! | 1 | `monospace` | ` ```text``` ` |
//! | 2 | `code` | `` `text` `` |
//! | 3 | `mention` | `@name` |
//! | 4 | `hashtag` | `#tag` |
//! | 5 | `bold` | `*text*` |
//! | 6 | `italic` | `_text_` |
//! | 7 | `strikethrough` | `~text~` |
//! | 8 | `autolink` | `https://example.com/path` |
//!
//! Order is precedence. Monospace runs before inline code so triple
//! backticks are not eaten by the single-backtick rule. Code spans freeze
//! their content. Mentions and hashtags come before the styles so that
//! `@jane_doe` is not cut up by italic; the styles can still wrap the anchors
//! they produce. Bold, italic and strikethrough keep their content open to
//! the rules after them. Overlapping delimiters such as `*_x*_` are settled by
//! this order, not by a grammar.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape;
use crate::rule::{Replacement, Rule};
use crate::theme::{Style, Theme};

static MONOSPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(.+?)```").expect("invalid monospace regex"));

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.+?)`").expect("invalid code regex"));

static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("invalid bold regex"));

static ITALIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.+?)_").expect("invalid italic regex"));

static STRIKETHROUGH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~(.+?)~").expect("invalid strikethrough regex"));

static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([0-9A-Za-z_]+)").expect("invalid mention regex"));

static HASHTAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9A-Za-z]+)").expect("invalid hashtag regex"));

/// URL-shaped token: optional scheme and `www.`, a host ending in a
/// 2-6 letter TLD, then any path/query characters.
///
/// Heuristic, not a URL grammar. Trailing punctuation that is also a path
/// character (`.`, `?`) ends up inside the link. `:` is not a host character,
/// so a match can only begin with `http://`, `https://` or a host.
static AUTOLINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?[-a-zA-Z0-9@%._+~#=]{2,256}\.[a-z]{2,6}\b[-a-zA-Z0-9@:%_+.~#?&/=]*",
    )
    .expect("invalid autolink regex")
});

/// `<span class="...">` opening tag.
fn span_open(class: &str) -> String {
    format!(r#"<span class="{class}">"#)
}

/// Rule whose captured text becomes a frozen, escaped span.
fn frozen_span(name: &'static str, pattern: &Regex, class: &str) -> Rule {
    let open = span_open(class);
    Rule::from_regex(name, pattern.clone(), move |caps: &Captures<'_>| {
        Replacement::markup(format!("{open}{}</span>", escape(&caps[1])))
    })
}

/// Rule whose captured text stays open to later rules.
fn wrapping_span(name: &'static str, pattern: &Regex, class: &str) -> Rule {
    let open = span_open(class);
    Rule::from_regex(name, pattern.clone(), move |caps: &Captures<'_>| {
        Replacement::wrap(open.clone(), &caps[1], "</span>")
    })
}

/// Rule for a sigil-prefixed token (`@name`, `#tag`).
fn sigil_link(name: &'static str, pattern: &Regex, sigil: char, class: &str) -> Rule {
    let open = format!(r#"<a class="{class}">{sigil}"#);
    Rule::from_regex(name, pattern.clone(), move |caps: &Captures<'_>| {
        Replacement::markup(format!("{open}{}</a>", escape(&caps[1])))
    })
}

/// Triple-backtick span rendered in a monospace font.
#[must_use]
pub fn monospace(theme: &Theme) -> Rule {
    frozen_span("monospace", &MONOSPACE_PATTERN, theme.class(Style::Monospace))
}

/// Single-backtick inline code span.
#[must_use]
pub fn code(theme: &Theme) -> Rule {
    frozen_span("code", &CODE_PATTERN, theme.class(Style::Code))
}

/// `*bold*`
#[must_use]
pub fn bold(theme: &Theme) -> Rule {
    wrapping_span("bold", &BOLD_PATTERN, theme.class(Style::Bold))
}

/// `_italic_`
#[must_use]
pub fn italic(theme: &Theme) -> Rule {
    wrapping_span("italic", &ITALIC_PATTERN, theme.class(Style::Italic))
}

/// `~strikethrough~`
#[must_use]
pub fn strikethrough(theme: &Theme) -> Rule {
    wrapping_span(
        "strikethrough",
        &STRIKETHROUGH_PATTERN,
        theme.class(Style::Strikethrough),
    )
}

/// `@name` mention of ASCII letters, digits and `_`. Purely lexical: the
/// user is not looked up.
#[must_use]
pub fn mention(theme: &Theme) -> Rule {
    sigil_link("mention", &MENTION_PATTERN, '@', theme.class(Style::Mention))
}

/// `#tag` hashtag.
#[must_use]
pub fn hashtag(theme: &Theme) -> Rule {
    sigil_link("hashtag", &HASHTAG_PATTERN, '#', theme.class(Style::Hashtag))
}

/// Bare URL turned into an anchor whose `href` and text are the URL itself.
#[must_use]
pub fn autolink(theme: &Theme) -> Rule {
    let class = theme.class(Style::Link).to_owned();
    Rule::from_regex("autolink", AUTOLINK_PATTERN.clone(), move |caps: &Captures<'_>| {
        let url = escape(&caps[0]);
        Replacement::markup(format!(r#"<a href="{url}" class="{class}">{url}</a>"#))
    })
}

/// Ordered, immutable collection of rules.
///
/// Build one per process and share it; it is `Send + Sync`.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Default rules with the given theme.
    #[must_use]
    pub fn with_theme(theme: &Theme) -> Self {
        Self::builder().defaults(theme).build()
    }

    /// Start an empty builder.
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Rule names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::with_theme(&Theme::default())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Builder for a [`RuleSet`]. Rules run in the order they are pushed.
///
/// # Example
///
/// ```
/// use coffeeco_richtext::{rules, RuleSet, Theme};
///
/// let theme = Theme::default();
/// let set = RuleSet::builder()
///     .push(rules::bold(&theme))
///     .push(rules::mention(&theme))
///     .build();
/// assert_eq!(set.names(), ["bold", "mention"]);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    /// Append a rule.
    #[must_use]
    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append all built-in rules in their default order.
    #[must_use]
    pub fn defaults(self, theme: &Theme) -> Self {
        self.push(monospace(theme))
            .push(code(theme))
            .push(mention(theme))
            .push(hashtag(theme))
            .push(bold(theme))
            .push(italic(theme))
            .push(strikethrough(theme))
            .push(autolink(theme))
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rule: &Rule, text: &str) -> Vec<Replacement> {
        rule.pattern()
            .captures_iter(text)
            .map(|caps| rule.replace(&caps))
            .collect()
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            RuleSet::default().names(),
            [
                "monospace",
                "code",
                "mention",
                "hashtag",
                "bold",
                "italic",
                "strikethrough",
                "autolink"
            ]
        );
    }

    #[test]
    fn test_rule_set_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleSet>();
    }

    #[test]
    fn test_code_escapes_capture() {
        let out = apply(&code(&Theme::default()), "`<b>`");
        assert_eq!(
            out,
            [Replacement::markup(
                r#"<span class="px-1 bg-button/75 rounded text-white">&lt;b&gt;</span>"#
            )]
        );
    }

    #[test]
    fn test_bold_is_non_greedy() {
        let out = apply(&bold(&Theme::default()), "*a* b *c*");
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0],
            Replacement::wrap(r#"<span class="font-semibold">"#, "a", "</span>")
        );
    }

    #[test]
    fn test_bold_needs_content() {
        assert!(apply(&bold(&Theme::default()), "**").is_empty());
    }

    #[test]
    fn test_mention_word_chars() {
        let out = apply(&mention(&Theme::coloured()), "hi @jane_doe42!");
        assert_eq!(
            out,
            [Replacement::markup(
                r#"<a class="text-sienna-400">@jane_doe42</a>"#
            )]
        );
    }

    #[test]
    fn test_mention_stops_at_non_ascii() {
        let out = apply(&mention(&Theme::default()), "@josé");
        assert_eq!(
            out,
            [Replacement::markup(r#"<a class="text-accent">@jos</a>"#)]
        );
    }

    #[test]
    fn test_hashtag_stops_at_underscore() {
        let out = apply(&hashtag(&Theme::default()), "#rust_lang");
        assert_eq!(
            out,
            [Replacement::markup(r#"<a class="text-accent">#rust</a>"#)]
        );
    }

    #[test]
    fn test_autolink_matches() {
        for (text, url) in [
            ("see https://example.com/path?q=1 now", "https://example.com/path?q=1"),
            ("go to www.coffee.co", "www.coffee.co"),
            ("plain example.org", "example.org"),
            ("http://localhost.dev:8080/x", "http://localhost.dev:8080/x"),
        ] {
            let found = AUTOLINK_PATTERN.find(text).map(|m| m.as_str());
            assert_eq!(found, Some(url), "for {text:?}");
        }
    }

    #[test]
    fn test_autolink_never_uses_foreign_scheme() {
        let found = AUTOLINK_PATTERN
            .find("javascript:alert.com")
            .map(|m| m.as_str());
        assert_eq!(found, Some("alert.com"));
    }

    #[test]
    fn test_autolink_ignores_plain_words() {
        assert!(AUTOLINK_PATTERN.find("no links here, e.g. none").is_none());
    }

    #[test]
    fn test_autolink_captures_trailing_dot() {
        let found = AUTOLINK_PATTERN.find("read example.com.").map(|m| m.as_str());
        assert_eq!(found, Some("example.com."));
    }

    #[test]
    fn test_autolink_escapes_href() {
        let out = apply(&autolink(&Theme::default()), "ab.com/?x=1&y=2");
        let Replacement::Markup(html) = &out[0] else {
            panic!("expected markup");
        };
        assert!(html.starts_with(r#"<a href="ab.com/?x=1&amp;y=2""#));
    }

    #[test]
    fn test_builder_custom_order() {
        let theme = Theme::default();
        let set = RuleSet::builder()
            .push(hashtag(&theme))
            .push(mention(&theme))
            .build();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), ["hashtag", "mention"]);
        assert!(!set.is_empty());
        assert!(RuleSet::builder().build().is_empty());
    }
}

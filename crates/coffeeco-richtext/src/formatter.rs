//! Rewrite driver: runs a [`RuleSet`] over user text.
//!
//! The working text is a list of segments. A *live* segment is user text that
//! rules may still rewrite; the other segments are trusted markup produced by
//! a rule: self-contained markup, or the opening and closing templates of a
//! wrapping rule. Frozen markup is never rewritten, so a later rule cannot
//! split markup produced by an earlier one (autolink never touches an anchor a
//! mention produced).
//!
//! Each rule searches the live text with every frozen segment replaced by a
//! single placeholder character. A match may only cover frozen segments with
//! its first capture group, and only when the rule wraps that group: this is
//! how `*hi @bob*` puts the mention anchor inside the bold span. Delimiters
//! must sit in live text, and a wrap must enclose whole spans.
//!
//! Live text is escaped exactly once, when the segments are joined. This is
//! the always-escape policy: no character of user text reaches the output
//! unescaped, whatever rules ran.

use std::iter::Peekable;
use std::ops::Range;
use std::sync::LazyLock;
use std::vec;

use regex::Captures;

use crate::escape::escape_into;
use crate::guard::looks_like_tag;
use crate::rule::{Replacement, Rule};
use crate::rules::RuleSet;
use crate::theme::{Style, Theme};

static DEFAULT_FORMATTER: LazyLock<Formatter> = LazyLock::new(Formatter::default);

/// Prefix of the literal rendering used for rejected input.
const REJECTED_PREFIX: &str = "Bypassed message: ";

/// How the formatter treats input that looks like it contains a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FormatterMode {
    /// Escape everything and apply the rules. No input is special.
    #[default]
    Escape,
    /// Run the anti-bypass guard first and render matching input as a
    /// literal warning instead of applying the rules.
    Strict,
}

/// What happened to a formatting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Outcome {
    /// Rules were applied.
    Rendered,
    /// Strict mode rejected the input; the markup is the literal fallback.
    Rejected,
}

/// Result of formatting one input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Formatted {
    /// Markup safe to inject as HTML.
    pub markup: String,
    /// Whether rules were applied or the input was rejected.
    pub outcome: Outcome,
}

impl Formatted {
    /// Check if strict mode rejected the input.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.outcome == Outcome::Rejected
    }
}

/// Stand-in for a frozen segment in the text a rule searches.
const PLACEHOLDER: char = '\u{FFFC}';

/// Piece of the working text.
#[derive(Debug)]
enum Segment {
    Live(String),
    Markup(String),
    Open(String),
    Close(String),
}

/// Live text of a segment list, with a placeholder per frozen segment.
struct View {
    text: String,
    /// Byte offset of each placeholder and the segment it stands for.
    frozen: Vec<(usize, Segment)>,
}

impl View {
    fn new(segments: Vec<Segment>) -> Self {
        let mut text = String::new();
        let mut frozen = Vec::new();
        for segment in segments {
            match segment {
                Segment::Live(live) => text.push_str(&live),
                segment => {
                    frozen.push((text.len(), segment));
                    text.push(PLACEHOLDER);
                }
            }
        }
        Self { text, frozen }
    }

    /// Frozen segments whose placeholder lies in `range`.
    fn frozen_in(&self, range: Range<usize>) -> &[(usize, Segment)] {
        let start = self.frozen.partition_point(|(offset, _)| *offset < range.start);
        let end = self.frozen.partition_point(|(offset, _)| *offset < range.end);
        &self.frozen[start..end]
    }
}

/// Accepted rewrite of one match.
enum Edit {
    Replace(Replacement),
    /// Wrap a view range that holds frozen segments.
    WrapRange {
        open: String,
        inner: Range<usize>,
        close: String,
    },
}

/// Formats user text into safe markup.
///
/// # Example
///
/// ```
/// use coffeeco_richtext::{Formatter, FormatterMode, Outcome};
///
/// let formatter = Formatter::default().with_mode(FormatterMode::Strict);
/// let result = formatter.format("<b>hi</b>");
/// assert_eq!(result.outcome, Outcome::Rejected);
/// assert!(!result.markup.contains("<b>"));
/// ```
#[derive(Debug)]
pub struct Formatter {
    rules: RuleSet,
    mode: FormatterMode,
    warning_class: String,
}

impl Formatter {
    /// Create a formatter over a rule set.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            mode: FormatterMode::default(),
            warning_class: Theme::default().class(Style::Warning).to_owned(),
        }
    }

    /// Default rules and warning class from a theme.
    #[must_use]
    pub fn with_theme(theme: &Theme) -> Self {
        Self::new(RuleSet::with_theme(theme)).with_warning_class(theme.class(Style::Warning))
    }

    /// Set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: FormatterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the class of the strict-mode warning wrapper.
    #[must_use]
    pub fn with_warning_class(mut self, class: impl Into<String>) -> Self {
        self.warning_class = class.into();
        self
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> FormatterMode {
        self.mode
    }

    /// Rules in application order.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Format `input`.
    ///
    /// Never fails: unmatched delimiters stay as literal, escaped text.
    pub fn format(&self, input: &str) -> Formatted {
        if self.mode == FormatterMode::Strict && looks_like_tag(input) {
            tracing::warn!(len = input.len(), "Rejected input that looks like raw HTML");
            return Formatted {
                markup: self.rejected(input),
                outcome: Outcome::Rejected,
            };
        }

        Formatted {
            markup: rewrite(input, &self.rules),
            outcome: Outcome::Rendered,
        }
    }

    /// Literal rendering of rejected input.
    fn rejected(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() + self.warning_class.len() + 48);
        out.push_str(r#"<span class=""#);
        out.push_str(&self.warning_class);
        out.push_str(r#"">"#);
        out.push_str(REJECTED_PREFIX);
        escape_into(input, &mut out);
        out.push_str("</span>");
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::with_theme(&Theme::default())
    }
}

/// Format with the default rules in [`FormatterMode::Escape`].
///
/// # Examples
///
/// ```
/// use coffeeco_richtext::format;
///
/// assert_eq!(
///     format("hello @world"),
///     r#"hello <a class="text-accent">@world</a>"#
/// );
/// assert_eq!(format("<script>"), "&lt;script&gt;");
/// ```
#[must_use]
pub fn format(input: &str) -> String {
    DEFAULT_FORMATTER.format(input).markup
}

/// Format with a caller-supplied rule set in [`FormatterMode::Escape`].
#[must_use]
pub fn format_with(input: &str, rules: &RuleSet) -> String {
    rewrite(input, rules)
}

/// Apply every rule in order, then join the segments.
fn rewrite(input: &str, rules: &RuleSet) -> String {
    let mut segments = vec![Segment::Live(input.to_owned())];
    for rule in rules {
        segments = apply_rule(rule, segments);
    }

    tracing::debug!(
        len = input.len(),
        segments = segments.len(),
        "Formatted rich text"
    );

    join(&segments, input.len())
}

/// Replace every match of `rule` in the live text.
fn apply_rule(rule: &Rule, segments: Vec<Segment>) -> Vec<Segment> {
    let view = View::new(segments);
    let edits = find_edits(rule, &view);

    let View { text, frozen } = view;
    let mut frozen = frozen.into_iter().peekable();
    let mut out = Vec::with_capacity(frozen.len() + edits.len() * 3 + 1);
    let mut last = 0;

    for (range, edit) in edits {
        emit(&text, last..range.start, &mut frozen, &mut out);
        match edit {
            Edit::Replace(Replacement::Markup(html)) => out.push(Segment::Markup(html)),
            Edit::Replace(Replacement::Wrap { open, inner, close }) => {
                out.push(Segment::Open(open));
                push_live(&mut out, &inner);
                out.push(Segment::Close(close));
            }
            Edit::WrapRange { open, inner, close } => {
                out.push(Segment::Open(open));
                emit(&text, inner, &mut frozen, &mut out);
                out.push(Segment::Close(close));
            }
        }
        last = range.end;
    }
    emit(&text, last..text.len(), &mut frozen, &mut out);

    out
}

/// Leftmost-first, non-overlapping matches of `rule` that can be rewritten.
///
/// A match that covers frozen segments anywhere but inside a wrapped first
/// group is skipped, and the search resumes one character after its start.
fn find_edits(rule: &Rule, view: &View) -> Vec<(Range<usize>, Edit)> {
    let text = view.text.as_str();
    let mut edits = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = rule.pattern().captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        let edit = if view.frozen_in(whole.range()).is_empty() {
            Some(Edit::Replace(rule.replace(&caps)))
        } else {
            wrap_over_frozen(rule, view, &caps)
        };

        let resume = match edit {
            Some(edit) => {
                edits.push((whole.range(), edit));
                if whole.is_empty() {
                    next_char(text, whole.end())
                } else {
                    Some(whole.end())
                }
            }
            None => next_char(text, whole.start()),
        };
        match resume {
            Some(next) => pos = next,
            None => break,
        }
    }

    edits
}

/// Accept a match that covers frozen segments if it wraps them whole.
fn wrap_over_frozen(rule: &Rule, view: &View, caps: &Captures<'_>) -> Option<Edit> {
    let whole = caps.get(0)?;
    let group = caps.get(1)?;
    let touched = view.frozen_in(whole.range());
    if view.frozen_in(group.range()).len() != touched.len() || !balanced(touched) {
        return None;
    }

    match rule.replace(caps) {
        Replacement::Wrap { open, inner, close } if inner == group.as_str() => {
            Some(Edit::WrapRange {
                open,
                inner: group.range(),
                close,
            })
        }
        _ => None,
    }
}

/// Every opening template has its closing template, in order.
fn balanced(frozen: &[(usize, Segment)]) -> bool {
    let mut depth = 0usize;
    for (_, segment) in frozen {
        match segment {
            Segment::Open(_) => depth += 1,
            Segment::Close(_) => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            Segment::Live(_) | Segment::Markup(_) => {}
        }
    }
    depth == 0
}

fn next_char(text: &str, at: usize) -> Option<usize> {
    text[at..].chars().next().map(|c| at + c.len_utf8())
}

/// Push the view text in `range`, restoring the frozen segments it covers.
fn emit(
    text: &str,
    range: Range<usize>,
    frozen: &mut Peekable<vec::IntoIter<(usize, Segment)>>,
    out: &mut Vec<Segment>,
) {
    let mut pos = range.start;
    while let Some((offset, segment)) = frozen.next_if(|(offset, _)| *offset < range.end) {
        push_live(out, &text[pos..offset]);
        out.push(segment);
        pos = offset + PLACEHOLDER.len_utf8();
    }
    push_live(out, &text[pos..range.end]);
}

fn push_live(out: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        out.push(Segment::Live(text.to_owned()));
    }
}

/// Emit frozen segments verbatim and live segments escaped.
fn join(segments: &[Segment], hint: usize) -> String {
    let mut out = String::with_capacity(hint + hint / 2);
    for segment in segments {
        match segment {
            Segment::Live(text) => escape_into(text, &mut out),
            Segment::Markup(html) | Segment::Open(html) | Segment::Close(html) => {
                out.push_str(html);
            }
        }
    }
    out
}

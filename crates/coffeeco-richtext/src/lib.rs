//! Rule-based rich text formatter for `CoffeeCo` posts and comments.
//!
//! Turns user-authored text into inline HTML that is safe to inject into a
//! page: mentions, hashtags, `*bold*`, `_italic_`, `~strikethrough~`,
//! `` `code` ``, ` ```monospace``` ` and bare URLs become styled markup, and
//! every other character of user text is escaped.
//!
//! # Architecture
//!
//! - [`escape`]/[`unescape`]: character reference encoding.
//! - [`Rule`]: a regex paired with a replacement function.
//! - [`RuleSet`]: the ordered rules; [`rules`] holds the built-ins.
//! - [`Formatter`]: the rewrite driver, with an optional strict mode that
//!   runs the [`looks_like_tag`] heuristic first.
//!
//! # Example
//!
//! ```
//! use coffeeco_richtext::format;
//!
//! let html = format("*Fresh* brew by @barista, see #latte");
//! assert!(html.starts_with(r#"<span class="font-semibold">Fresh</span>"#));
//! assert_eq!(format("<img src=x>"), "&lt;img src=x&gt;");
//! ```

mod escape;
mod formatter;
mod guard;
mod rule;
pub mod rules;
mod theme;

pub use escape::{escape, unescape};
pub use formatter::{Formatted, Formatter, FormatterMode, Outcome, format, format_with};
pub use guard::looks_like_tag;
pub use rule::{Replacement, Rule, RuleError, Transform};
pub use rules::{RuleSet, RuleSetBuilder};
pub use theme::{Style, Theme, ThemePreset, UnknownTheme};

//! A single rewrite rule: a pattern paired with a replacement function.

use std::borrow::Cow;
use std::fmt;

use regex::{Captures, Regex};

/// Output of a rule's replacement function for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Finished markup. Emitted verbatim and never rewritten by later rules, so
    /// the transform must escape any user text it embeds.
    Markup(String),
    /// Trusted `open`/`close` templates around user text that later rules
    /// still get to rewrite. `inner` is escaped on emission.
    Wrap {
        /// Opening template, emitted verbatim.
        open: String,
        /// User text between the delimiters.
        inner: String,
        /// Closing template, emitted verbatim.
        close: String,
    },
}

impl Replacement {
    /// Create a [`Replacement::Markup`].
    pub fn markup(html: impl Into<String>) -> Self {
        Self::Markup(html.into())
    }

    /// Create a [`Replacement::Wrap`].
    pub fn wrap(
        open: impl Into<String>,
        inner: impl Into<String>,
        close: impl Into<String>,
    ) -> Self {
        Self::Wrap {
            open: open.into(),
            inner: inner.into(),
            close: close.into(),
        }
    }
}

/// Replacement function signature.
///
/// Must be pure: identical captures produce identical replacements.
pub type Transform = dyn Fn(&Captures<'_>) -> Replacement + Send + Sync;

/// Error building a custom rule.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The pattern is not a valid regular expression.
    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        /// Rule name.
        name: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// One piece of inline syntax: where it matches and what it becomes.
pub struct Rule {
    name: Cow<'static, str>,
    pattern: Regex,
    transform: Box<Transform>,
}

impl Rule {
    /// Compile a rule from a pattern string.
    ///
    /// # Example
    ///
    /// ```
    /// use coffeeco_richtext::{escape, Replacement, Rule};
    ///
    /// let rule = Rule::new("kbd", r"\[\[(.+?)\]\]", |caps| {
    ///     Replacement::markup(format!("<kbd>{}</kbd>", escape(&caps[1])))
    /// })
    /// .unwrap();
    /// assert_eq!(rule.name(), "kbd");
    /// ```
    pub fn new<F>(
        name: impl Into<Cow<'static, str>>,
        pattern: &str,
        transform: F,
    ) -> Result<Self, RuleError>
    where
        F: Fn(&Captures<'_>) -> Replacement + Send + Sync + 'static,
    {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            name: name.clone().into_owned(),
            source,
        })?;
        Ok(Self::from_regex(name, pattern, transform))
    }

    /// Build a rule from an already compiled regex.
    pub fn from_regex<F>(name: impl Into<Cow<'static, str>>, pattern: Regex, transform: F) -> Self
    where
        F: Fn(&Captures<'_>) -> Replacement + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            pattern,
            transform: Box::new(transform),
        }
    }

    /// Rule name (e.g., "bold", "mention").
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled match pattern.
    #[must_use]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Apply the replacement function to one match.
    pub(crate) fn replace(&self, caps: &Captures<'_>) -> Replacement {
        (self.transform)(caps)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_rule() -> Rule {
        Rule::new("upper", r"\^(\w+)", |caps| {
            Replacement::markup(caps[1].to_uppercase())
        })
        .unwrap()
    }

    #[test]
    fn test_rule_name_and_pattern() {
        let rule = upper_rule();
        assert_eq!(rule.name(), "upper");
        assert_eq!(rule.pattern().as_str(), r"\^(\w+)");
    }

    #[test]
    fn test_rule_replace() {
        let rule = upper_rule();
        let caps = rule.pattern().captures("say ^hi").unwrap();
        assert_eq!(rule.replace(&caps), Replacement::Markup("HI".to_owned()));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Rule::new("broken", r"(unclosed", |_| Replacement::markup("")).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref name, .. } if name == "broken"));
        assert!(err.to_string().starts_with("Invalid pattern for rule 'broken'"));
    }

    #[test]
    fn test_debug_omits_transform() {
        let debug = format!("{:?}", upper_rule());
        assert!(debug.contains("upper"));
        assert!(debug.contains(".."));
    }

    #[test]
    fn test_wrap_constructor() {
        assert_eq!(
            Replacement::wrap("<b>", "x", "</b>"),
            Replacement::Wrap {
                open: "<b>".to_owned(),
                inner: "x".to_owned(),
                close: "</b>".to_owned(),
            }
        );
    }
}

//! CSS classes placed into the built-in rule templates.

use std::fmt;
use std::str::FromStr;

/// A styled element produced by the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Bold,
    Italic,
    Strikethrough,
    Monospace,
    Code,
    Mention,
    Hashtag,
    Link,
    /// Wrapper for inputs rejected by the anti-bypass guard.
    Warning,
}

impl Style {
    /// All styles, in template order.
    pub const ALL: [Self; 9] = [
        Self::Bold,
        Self::Italic,
        Self::Strikethrough,
        Self::Monospace,
        Self::Code,
        Self::Mention,
        Self::Hashtag,
        Self::Link,
        Self::Warning,
    ];

    /// Lowercase name, as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::Monospace => "monospace",
            Self::Code => "code",
            Self::Mention => "mention",
            Self::Hashtag => "hashtag",
            Self::Link => "link",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class strings for every [`Style`].
///
/// Classes are inserted into `class="..."` attributes verbatim, so they are
/// trusted: do not build a theme from user input without validating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    bold: String,
    italic: String,
    strikethrough: String,
    monospace: String,
    code: String,
    mention: String,
    hashtag: String,
    link: String,
    warning: String,
}

impl Theme {
    /// Classes used by the post/comment rich text view.
    #[must_use]
    pub fn rich_text() -> Self {
        Self {
            bold: "font-semibold".to_owned(),
            italic: "italic".to_owned(),
            strikethrough: "line-through".to_owned(),
            monospace: "font-mono".to_owned(),
            code: "px-1 bg-button/75 rounded text-white".to_owned(),
            mention: "text-accent".to_owned(),
            hashtag: "text-accent".to_owned(),
            link: "text-accent font-bold underline decoration-2 decoration-accent".to_owned(),
            warning: "font-mono text-sandy-500".to_owned(),
        }
    }

    /// Classes used by the older coloured-text view.
    #[must_use]
    pub fn coloured() -> Self {
        Self {
            bold: "font-bold".to_owned(),
            code: "bg-slate-400/25 font-mono rounded px-1".to_owned(),
            mention: "text-sienna-400".to_owned(),
            hashtag: "text-sienna-400".to_owned(),
            ..Self::rich_text()
        }
    }

    /// Class string for a style.
    #[must_use]
    pub fn class(&self, style: Style) -> &str {
        match style {
            Style::Bold => &self.bold,
            Style::Italic => &self.italic,
            Style::Strikethrough => &self.strikethrough,
            Style::Monospace => &self.monospace,
            Style::Code => &self.code,
            Style::Mention => &self.mention,
            Style::Hashtag => &self.hashtag,
            Style::Link => &self.link,
            Style::Warning => &self.warning,
        }
    }

    /// Replace the class string for a style.
    pub fn set_class(&mut self, style: Style, class: impl Into<String>) {
        let slot = match style {
            Style::Bold => &mut self.bold,
            Style::Italic => &mut self.italic,
            Style::Strikethrough => &mut self.strikethrough,
            Style::Monospace => &mut self.monospace,
            Style::Code => &mut self.code,
            Style::Mention => &mut self.mention,
            Style::Hashtag => &mut self.hashtag,
            Style::Link => &mut self.link,
            Style::Warning => &mut self.warning,
        };
        *slot = class.into();
    }

    /// Builder-style [`set_class`](Self::set_class).
    #[must_use]
    pub fn with_class(mut self, style: Style, class: impl Into<String>) -> Self {
        self.set_class(style, class);
        self
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::rich_text()
    }
}

/// Named theme presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreset {
    #[default]
    RichText,
    Coloured,
}

impl ThemePreset {
    /// Build the theme for this preset.
    #[must_use]
    pub fn theme(self) -> Theme {
        match self {
            Self::RichText => Theme::rich_text(),
            Self::Coloured => Theme::coloured(),
        }
    }

    /// Preset name, as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RichText => "rich-text",
            Self::Coloured => "coloured",
        }
    }
}

/// Error parsing a [`ThemePreset`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown theme '{0}' (expected 'rich-text' or 'coloured')")]
pub struct UnknownTheme(pub String);

impl FromStr for ThemePreset {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rich-text" | "rich_text" => Ok(Self::RichText),
            "coloured" | "colored" => Ok(Self::Coloured),
            other => Err(UnknownTheme(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_rich_text() {
        assert_eq!(Theme::default(), Theme::rich_text());
    }

    #[test]
    fn test_coloured_overrides() {
        let theme = Theme::coloured();
        assert_eq!(theme.class(Style::Mention), "text-sienna-400");
        assert_eq!(theme.class(Style::Bold), "font-bold");
        // Not part of the coloured palette, inherited from rich text
        assert_eq!(theme.class(Style::Strikethrough), "line-through");
    }

    #[test]
    fn test_with_class() {
        let theme = Theme::rich_text().with_class(Style::Link, "link");
        assert_eq!(theme.class(Style::Link), "link");
        assert_eq!(theme.class(Style::Bold), "font-semibold");
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("rich-text".parse::<ThemePreset>(), Ok(ThemePreset::RichText));
        assert_eq!("colored".parse::<ThemePreset>(), Ok(ThemePreset::Coloured));
        assert_eq!(
            "neon".parse::<ThemePreset>(),
            Err(UnknownTheme("neon".to_owned()))
        );
    }

    #[test]
    fn test_style_names_unique() {
        let mut names: Vec<_> = Style::ALL.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Style::ALL.len());
    }
}

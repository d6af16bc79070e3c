//! Configuration management for the `CoffeeCo` formatter.
//!
//! Parses `coffeeco.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [formatter]
//! mode = "strict"
//! theme = "coloured"
//! max_input_len = 240
//!
//! [formatter.classes]
//! link = "underline"
//! ```

use std::path::{Path, PathBuf};

use coffeeco_richtext::{Formatter, FormatterMode, Style, Theme, ThemePreset};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the formatter mode.
    pub mode: Option<FormatterMode>,
    /// Override the theme preset.
    pub theme: Option<ThemePreset>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "coffeeco.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Formatter configuration (raw strings from TOML).
    formatter: FormatterConfigRaw,

    /// Resolved formatter configuration (set after loading).
    #[serde(skip)]
    pub formatter_resolved: FormatterConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw formatter configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormatterConfigRaw {
    mode: Option<String>,
    theme: Option<String>,
    max_input_len: Option<usize>,
    classes: ClassOverrides,
}

/// Per-style class overrides from `[formatter.classes]`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ClassOverrides {
    bold: Option<String>,
    italic: Option<String>,
    strikethrough: Option<String>,
    monospace: Option<String>,
    code: Option<String>,
    mention: Option<String>,
    hashtag: Option<String>,
    link: Option<String>,
    warning: Option<String>,
}

impl ClassOverrides {
    fn get(&self, style: Style) -> Option<&str> {
        match style {
            Style::Bold => self.bold.as_deref(),
            Style::Italic => self.italic.as_deref(),
            Style::Strikethrough => self.strikethrough.as_deref(),
            Style::Monospace => self.monospace.as_deref(),
            Style::Code => self.code.as_deref(),
            Style::Mention => self.mention.as_deref(),
            Style::Hashtag => self.hashtag.as_deref(),
            Style::Link => self.link.as_deref(),
            Style::Warning => self.warning.as_deref(),
        }
    }
}

/// Resolved formatter configuration.
#[derive(Debug, Default)]
pub struct FormatterConfig {
    /// Formatter mode.
    pub mode: FormatterMode,
    /// Theme preset the classes start from.
    pub preset: ThemePreset,
    /// Final classes (preset plus overrides).
    pub theme: Theme,
    /// Longest accepted input in characters, if limited.
    pub max_input_len: Option<usize>,
}

impl FormatterConfig {
    /// Build a formatter from this configuration.
    #[must_use]
    pub fn formatter(&self) -> Formatter {
        Formatter::with_theme(&self.theme).with_mode(self.mode)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a class string to be safe inside a quoted attribute.
fn require_attribute_safe(value: &str, field: &str) -> Result<(), ConfigError> {
    if let Some(c) = value.chars().find(|c| matches!(c, '"' | '\'' | '<' | '>' | '&')) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain '{c}'"
        )));
    }
    Ok(())
}

/// Parse a mode name.
fn parse_mode(value: &str) -> Result<FormatterMode, ConfigError> {
    match value {
        "escape" => Ok(FormatterMode::Escape),
        "strict" => Ok(FormatterMode::Strict),
        other => Err(ConfigError::Validation(format!(
            "formatter.mode must be 'escape' or 'strict', got '{other}'"
        ))),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `coffeeco.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// A theme override replaces the preset but keeps file-level class
    /// overrides on top of it.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(mode) = settings.mode {
            self.formatter_resolved.mode = mode;
        }
        if let Some(preset) = settings.theme {
            self.formatter_resolved.preset = preset;
            self.formatter_resolved.theme = self.build_theme(preset);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate raw values and fill in the resolved configuration.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        self.validate()?;

        let raw = &self.formatter;
        let mode = raw.mode.as_deref().map(parse_mode).transpose()?.unwrap_or_default();
        let preset = raw
            .theme
            .as_deref()
            .map(str::parse::<ThemePreset>)
            .transpose()
            .map_err(|e| ConfigError::Validation(format!("formatter.theme: {e}")))?
            .unwrap_or_default();

        self.formatter_resolved = FormatterConfig {
            mode,
            preset,
            theme: self.build_theme(preset),
            max_input_len: raw.max_input_len,
        };

        Ok(())
    }

    /// Preset classes with the file's overrides applied.
    fn build_theme(&self, preset: ThemePreset) -> Theme {
        let mut theme = preset.theme();
        for style in Style::ALL {
            if let Some(class) = self.formatter.classes.get(style) {
                theme.set_class(style, class);
            }
        }
        theme
    }

    /// Validate configuration values.
    ///
    /// Called automatically after parsing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_formatter()?;
        self.validate_classes()?;
        Ok(())
    }

    /// Validate formatter limits.
    fn validate_formatter(&self) -> Result<(), ConfigError> {
        if self.formatter.max_input_len == Some(0) {
            return Err(ConfigError::Validation(
                "formatter.max_input_len must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate class overrides. They end up inside `class="..."` verbatim.
    fn validate_classes(&self) -> Result<(), ConfigError> {
        for style in Style::ALL {
            if let Some(class) = self.formatter.classes.get(style) {
                let field = format!("formatter.classes.{style}");
                require_non_empty(class, &field)?;
                require_attribute_safe(class, &field)?;
            }
        }
        Ok(())
    }

    /// Formatter built from the resolved configuration.
    #[must_use]
    pub fn formatter(&self) -> Formatter {
        self.formatter_resolved.formatter()
    }
}

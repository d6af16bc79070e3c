//! `coffeeco format` command implementation.

use std::path::PathBuf;

use clap::Args;
use coffeeco_config::{CliSettings, Config};
use coffeeco_richtext::{Formatted, FormatterMode, ThemePreset};

use crate::error::CliError;
use crate::input::{check_length, read_input};
use crate::output::Output;

/// Arguments for the format command.
#[derive(Args)]
pub(crate) struct FormatArgs {
    /// Text to format (default: read stdin).
    text: Option<String>,

    /// Read the text from a file.
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover coffeeco.toml).
    #[arg(short, long, env = "COFFEECO_CONFIG")]
    config: Option<PathBuf>,

    /// Reject input that looks like raw HTML instead of escaping it.
    #[arg(long)]
    strict: bool,

    /// Theme preset: rich-text or coloured (overrides config).
    #[arg(long)]
    theme: Option<ThemePreset>,

    /// Print a JSON object with the markup and outcome.
    #[arg(long)]
    json: bool,
}

impl FormatArgs {
    /// Execute the format command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, input cannot be read,
    /// input exceeds the configured length limit, or stdout cannot be written.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            mode: self.strict.then_some(FormatterMode::Strict),
            theme: self.theme,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let input = read_input(self.text, self.file.as_deref())?;
        check_length(&input, config.formatter_resolved.max_input_len)?;

        let formatted = config.formatter().format(&input);
        if formatted.is_rejected() {
            output.warning("Input looks like raw HTML; rendered as literal text");
        }

        output.result(&render(&formatted, self.json)?)?;
        Ok(())
    }
}

/// Markup, or the whole result as JSON.
fn render(formatted: &Formatted, json: bool) -> Result<String, CliError> {
    if json {
        Ok(serde_json::to_string(formatted)?)
    } else {
        Ok(formatted.markup.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeeco_richtext::{Formatter, format};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_markup() {
        let formatted = Formatter::default().format("*hi*");
        assert_eq!(render(&formatted, false).unwrap(), format("*hi*"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("coffeeco.toml");
        std::fs::write(&config, "").unwrap();
        let args = FormatArgs {
            text: Some("*hi*".to_owned()),
            file: None,
            config: Some(config),
            strict: false,
            theme: None,
            json: false,
        };
        let output = crate::output::tests::unwritable(&dir);
        assert!(matches!(args.execute(&output), Err(CliError::Io(_))));
    }

    #[test]
    fn test_render_json() {
        let formatted = Formatter::default()
            .with_mode(FormatterMode::Strict)
            .format("<b>");
        let json: serde_json::Value =
            serde_json::from_str(&render(&formatted, true).unwrap()).unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(
            json["markup"],
            r#"<span class="font-mono text-sandy-500">Bypassed message: &lt;b&gt;</span>"#
        );
    }
}

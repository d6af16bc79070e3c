//! `CoffeeCo` CLI - rich text formatter preview tool.
//!
//! Provides commands for:
//! - `format`: Render post or comment text to markup
//! - `escape`: HTML-escape text
//! - `unescape`: Decode character references

mod commands;
mod error;
mod input;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{EscapeArgs, FormatArgs};
use output::Output;

/// `CoffeeCo` - rich text formatter.
#[derive(Parser)]
#[command(name = "coffeeco", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format text into markup.
    Format(FormatArgs),
    /// Escape HTML special characters.
    Escape(EscapeArgs),
    /// Decode character references.
    Unescape(EscapeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Format(args) => args.execute(&output),
        Commands::Escape(args) => args.escape(&output),
        Commands::Unescape(args) => args.unescape(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_verbose_enables_info() {
        assert_eq!(log_filter(true).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_default_filter_shows_warnings() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(log_filter(false).max_level_hint(), Some(LevelFilter::WARN));
        }
    }
}

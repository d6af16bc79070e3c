//! `coffeeco escape` and `coffeeco unescape` command implementations.

use std::path::PathBuf;

use clap::Args;
use coffeeco_richtext::{escape, unescape};

use crate::error::CliError;
use crate::input::read_input;
use crate::output::Output;

/// Arguments shared by the escape and unescape commands.
#[derive(Args)]
pub(crate) struct EscapeArgs {
    /// Text to process (default: read stdin).
    text: Option<String>,

    /// Read the text from a file.
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
}

impl EscapeArgs {
    /// Print the escaped text.
    pub(crate) fn escape(self, output: &Output) -> Result<(), CliError> {
        let input = read_input(self.text, self.file.as_deref())?;
        output.result(&escape(&input))?;
        Ok(())
    }

    /// Print the decoded text.
    pub(crate) fn unescape(self, output: &Output) -> Result<(), CliError> {
        let input = read_input(self.text, self.file.as_deref())?;
        output.result(&unescape(&input))?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::output::tests::unwritable;

    #[test]
    fn test_write_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = unwritable(&dir);
        let args = || EscapeArgs {
            text: Some("<b>".to_owned()),
            file: None,
        };
        assert!(matches!(args().escape(&output), Err(CliError::Io(_))));
        assert!(matches!(args().unescape(&output), Err(CliError::Io(_))));
    }
}

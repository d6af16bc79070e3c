//! Colored terminal output utilities.

use std::io;

use console::{Style, Term};

/// Terminal output formatter.
///
/// Rendered results go to stdout, diagnostics to stderr.
pub(crate) struct Output {
    out: Term,
    err: Term,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Replace the terminal results are written to.
    #[cfg(test)]
    pub(crate) fn with_stdout(mut self, out: Term) -> Self {
        self.out = out;
        self
    }

    /// Print a result line to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written (closed pipe, full disk).
    pub(crate) fn result(&self, msg: &str) -> io::Result<()> {
        self.out.write_line(msg)
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.err.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.err.write_line(&self.red.apply_to(msg).to_string());
    }
}

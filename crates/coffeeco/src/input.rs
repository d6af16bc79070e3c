//! Reading the text to process.

use std::io::{self, Read};
use std::path::Path;

use crate::error::CliError;

/// Text from the argument, a file, or stdin, in that order.
///
/// A single trailing newline (as left by `echo` or an editor) is dropped.
pub(crate) fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String, CliError> {
    let raw = match (text, file) {
        (Some(text), _) => return Ok(text),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(strip_trailing_newline(raw))
}

fn strip_trailing_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}

/// Reject input longer than `max` characters.
pub(crate) fn check_length(input: &str, max: Option<usize>) -> Result<(), CliError> {
    let Some(max) = max else {
        return Ok(());
    };
    let len = input.chars().count();
    if len > max {
        return Err(CliError::Validation(format!(
            "Input is {len} characters, limit is {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_wins() {
        let text = read_input(Some("hi\n".to_owned()), Some(Path::new("/nonexistent"))).unwrap();
        assert_eq!(text, "hi\n");
    }

    #[test]
    fn test_file_trailing_newline_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.txt");
        std::fs::write(&path, "*hello*\r\n").unwrap();
        assert_eq!(read_input(None, Some(&path)).unwrap(), "*hello*");
    }

    #[test]
    fn test_missing_file() {
        let err = read_input(None, Some(Path::new("/nonexistent/post.txt"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_only_one_newline_stripped() {
        assert_eq!(strip_trailing_newline("a\n\n".to_owned()), "a\n");
    }

    #[test]
    fn test_check_length_counts_chars() {
        assert!(check_length("☕☕☕", Some(3)).is_ok());
        assert!(check_length("anything", None).is_ok());

        let err = check_length("☕☕☕☕", Some(3)).unwrap_err();
        assert_eq!(err.to_string(), "Input is 4 characters, limit is 3");
    }
}

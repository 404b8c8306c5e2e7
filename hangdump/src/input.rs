//! Transcript acquisition
//!
//! This module reads a finished debugger transcript from a file or from
//! standard input. The whole input is collected before parsing starts.

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Path argument meaning "read standard input"
pub const STDIN_PATH: &str = "-";

/// Read every line of a transcript.
///
/// `None` or `-` reads standard input.
///
/// # Errors
/// Returns an error if the file cannot be opened or the input is not valid UTF-8
pub fn read_transcript(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) if path != Path::new(STDIN_PATH) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open transcript {}", path.display()))?;
            let lines = read_lines(BufReader::new(file))
                .with_context(|| format!("Failed to read transcript {}", path.display()))?;
            info!("Read {} lines from {}", lines.len(), path.display());
            Ok(lines)
        }
        _ => {
            let lines = read_lines(io::stdin().lock()).context("Failed to read transcript from stdin")?;
            info!("Read {} lines from stdin", lines.len());
            Ok(lines)
        }
    }
}

/// Collect all lines from `reader`, with line terminators (`\n` or `\r\n`) removed.
///
/// # Errors
/// Returns the first I/O error hit while reading
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    reader.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_lines_strips_crlf() {
        let lines = read_lines(Cursor::new("  0  Id: 1a2c.e1c\r\nChildEBP RetAddr\r\n\r\n")).unwrap();
        assert_eq!(lines, ["  0  Id: 1a2c.e1c", "ChildEBP RetAddr", ""]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_transcript(Some(Path::new("/nonexistent/transcript.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to open transcript"));
    }
}

//! One row of the managed thread table (`!threads` output).

use crate::domain::{ParseError, ThreadId};
use serde::Serialize;

/// Token positions tried, in order, for the thread id of a table row.
pub const SUMMARY_ID_TOKEN_POSITIONS: [usize; 2] = [2, 3];

const GC_MARKER: &str = "GC";
const FINALIZER_MARKER: &str = "Finalizer";
const EXCEPTION_MARKER: &str = "Exception";
const GC_ENABLED_MARKER: &str = "Enabled";

/// Managed thread as listed in the thread table.
///
/// The flags are independent substring checks over the whole row, so a row
/// may set several of them or none.
#[allow(clippy::struct_excessive_bools)] // One flag per table marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreadSummary {
    pub id: ThreadId,
    /// Preemptive GC is enabled, so the GC can suspend this thread.
    pub gc_enabled: bool,
    pub is_finalizer_thread: bool,
    pub is_gc_thread: bool,
    pub has_exception: bool,
}

impl ThreadSummary {
    /// Parse a table row. `line_number` is 1-based and only used for errors.
    ///
    /// # Errors
    /// Returns [`ParseError::MalformedThreadIdentifier`] when no id token is
    /// present at the expected columns or it is not an integer.
    pub fn parse(line: &str, line_number: usize) -> Result<Self, ParseError> {
        let id = parse_id_token(line, &SUMMARY_ID_TOKEN_POSITIONS, line_number)?;
        Ok(Self {
            id,
            gc_enabled: line.contains(GC_ENABLED_MARKER),
            is_finalizer_thread: line.contains(FINALIZER_MARKER),
            is_gc_thread: line.contains(GC_MARKER),
            has_exception: line.contains(EXCEPTION_MARKER),
        })
    }
}

/// Split `line` on single spaces and parse the first non-empty token found
/// at `positions`.
///
/// Runs of spaces produce empty tokens, which is how the debugger's right
/// aligned columns shift the id between positions.
pub(crate) fn parse_id_token(
    line: &str,
    positions: &[usize],
    line_number: usize,
) -> Result<ThreadId, ParseError> {
    let malformed =
        || ParseError::MalformedThreadIdentifier { line: line_number, text: line.to_string() };

    let tokens: Vec<&str> = line.split(' ').collect();
    let token = positions
        .iter()
        .filter_map(|&pos| tokens.get(pos).copied())
        .find(|token| !token.is_empty())
        .ok_or_else(malformed)?;

    token.parse::<i64>().map(ThreadId).map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_finalizer_row() {
        let row = "   2    2  f68 000f6478      b220 Enabled  00000000:00000000 000eda08     0 MTA (Finalizer)";
        let summary = ThreadSummary::parse(row, 10).unwrap();
        assert_eq!(summary.id, ThreadId(2));
        assert!(summary.is_finalizer_thread);
        assert!(summary.gc_enabled);
        assert!(!summary.is_gc_thread);
        assert!(!summary.has_exception);
    }

    #[test]
    fn test_parse_row_id_at_third_position() {
        let row = " 1 11  e1c 000f7d40      a020 Disabled 00000000:00000000 000eda08     1 MTA";
        let summary = ThreadSummary::parse(row, 3).unwrap();
        assert_eq!(summary.id, ThreadId(11));
        assert!(!summary.gc_enabled);
    }

    #[test]
    fn test_parse_row_id_column_shift() {
        // tokens: ["", "", "5", ...] -> position 2 holds the id
        let row = "  5 1b0c 00000000 Enabled";
        assert_eq!(ThreadSummary::parse(row, 1).unwrap().id, ThreadId(5));

        // tokens: ["", "", "", "7", ...] -> position 2 empty, position 3 holds the id
        let row = "   7 1b0c Enabled";
        assert_eq!(ThreadSummary::parse(row, 1).unwrap().id, ThreadId(7));
    }

    #[test]
    fn test_flags_are_independent() {
        let row = "  12   14  9c0 001cb5a8   1808220 Disabled 00000000:00000000 000eda08     1 MTA (GC) System.Exception";
        let summary = ThreadSummary::parse(row, 1).unwrap();
        assert!(summary.is_gc_thread);
        assert!(summary.has_exception);
        assert!(!summary.gc_enabled);
        assert!(!summary.is_finalizer_thread);
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let row = "  XXXX    1  e1c 000f7d40";
        let err = ThreadSummary::parse(row, 9).unwrap_err();
        assert!(matches!(err, ParseError::MalformedThreadIdentifier { line: 9, .. }));
    }

    #[test]
    fn test_missing_id_columns_is_rejected() {
        assert!(ThreadSummary::parse("short row", 4).is_err());
    }

    #[test]
    fn test_parse_id_token_priority() {
        assert_eq!(parse_id_token("x 4 5 6", &[1, 2, 3], 1).unwrap(), ThreadId(4));
        assert_eq!(parse_id_token("x  5 6", &[1, 2, 3], 1).unwrap(), ThreadId(5));
        assert_eq!(parse_id_token("x   6", &[1, 2, 3], 1).unwrap(), ThreadId(6));
    }
}

//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep debugger thread identifiers from being mixed
//! up with line numbers or counts, and make function signatures more expressive.

use serde::Serialize;
use std::fmt;

/// OS thread identifier as printed by the debugger
///
/// The same id may show up in both the native and the managed view of a
/// transcript; both describe the same logical thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ThreadId(pub i64);

impl ThreadId {
    /// Placeholder reported when a thread could not be located.
    pub const UNKNOWN: ThreadId = ThreadId(-1);

    /// Returns true unless this is the [`ThreadId::UNKNOWN`] placeholder
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::UNKNOWN
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ThreadId {
    fn from(id: i64) -> Self {
        ThreadId(id)
    }
}

/// Report section a finding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Garbage collector and finalizer state
    Gc,
    /// Managed locks, critical sections and wait handles
    Locks,
    /// Threads waiting on something outside the process
    External,
}

impl Section {
    /// All sections in report order
    pub const ALL: [Section; 3] = [Section::Gc, Section::Locks, Section::External];

    /// Human-readable section title
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Section::Gc => "GC Related information",
            Section::Locks => "Locks and Critical Sections",
            Section::External => "External Resources",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_display() {
        assert_eq!(ThreadId(1234).to_string(), "1234");
        assert_eq!(ThreadId::UNKNOWN.to_string(), "-1");
    }

    #[test]
    fn test_unknown_thread_id() {
        assert!(!ThreadId::UNKNOWN.is_known());
        assert!(ThreadId(0).is_known());
    }

    #[test]
    fn test_sections_in_report_order() {
        let titles: Vec<_> = Section::ALL.iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            ["GC Related information", "Locks and Critical Sections", "External Resources"]
        );
    }
}

//! Thread reconstruction from debugger transcripts
//!
//! - [`call_stack`]: a single thread's frames and the marker predicate
//! - [`thread_summary`]: one row of the managed thread table
//! - [`parser`]: the three-phase state machine producing a [`Transcript`]

pub mod call_stack;
pub mod parser;
pub mod thread_summary;

pub use call_stack::CallStack;
pub use parser::TranscriptParser;
pub use thread_summary::ThreadSummary;

use crate::domain::ParseError;
use serde::Serialize;

/// Threads reconstructed from one transcript.
///
/// The same thread id usually appears in both `native_stacks` and
/// `dotnet_stacks`; the two collections are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub native_stacks: Vec<CallStack>,
    pub dotnet_threads: Vec<ThreadSummary>,
    pub dotnet_stacks: Vec<CallStack>,
}

impl Transcript {
    /// Parse a complete transcript.
    ///
    /// # Errors
    /// See [`TranscriptParser::parse`].
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, ParseError> {
        TranscriptParser::new(lines).parse()
    }

    /// True when no thread of any kind was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.native_stacks.is_empty() && self.dotnet_threads.is_empty() && self.dotnet_stacks.is_empty()
    }

    /// Thread counts for the report header and the exported summary.
    #[must_use]
    pub fn stats(&self) -> TranscriptStats {
        let count = |pred: fn(&ThreadSummary) -> bool| {
            self.dotnet_threads.iter().filter(|t| pred(t)).count()
        };
        TranscriptStats {
            native_stacks: self.native_stacks.len(),
            managed_threads: self.dotnet_threads.len(),
            managed_stacks: self.dotnet_stacks.len(),
            gc_threads: count(|t| t.is_gc_thread),
            threads_with_exception: count(|t| t.has_exception),
        }
    }
}

/// Counts describing what a transcript contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranscriptStats {
    pub native_stacks: usize,
    pub managed_threads: usize,
    pub managed_stacks: usize,
    pub gc_threads: usize,
    pub threads_with_exception: usize,
}

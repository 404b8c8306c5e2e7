//! Reconstructed call stack of a single thread.

use crate::domain::ThreadId;
use serde::Serialize;

/// Call stack of one thread, as seen from either the native or the managed
/// view of the transcript.
///
/// Frames are the raw debugger lines in the order they were printed. They
/// are fixed once the stack is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallStack {
    id: ThreadId,
    frames: Vec<String>,
}

impl CallStack {
    #[must_use]
    pub fn new(id: ThreadId, frames: Vec<String>) -> Self {
        Self { id, frames }
    }

    #[must_use]
    pub fn id(&self) -> ThreadId {
        self.id
    }

    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Returns true if any frame contains `marker` (case-sensitive).
    #[must_use]
    pub fn matches(&self, marker: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains(marker))
    }
}

//! Three-phase transcript parser.
//!
//! The debugger transcript is laid out as three consecutive sections:
//!
//! ```text
//!   0  Id: 1a2c.1b3c Suspend: 1 Teb: 7ffdf000 Unfrozen   ┐
//! ChildEBP RetAddr                                       │ native stacks
//! 0012f0a4 7c90e9c0 ntdll!KiFastSystemCallRet            │
//!                                                        ┘
//! MANAGED THREADS                                        ┐
//!       ID OSID ThreadOBJ    State     GC       ...      │ managed thread table
//!    0    1  e1c 000f7d40      a020 Enabled ...          ┘
//! MANAGED CALLSTACKS                                     ┐
//! OS Thread Id: 0xe1c (0)                                │ managed stacks
//! ESP       EIP                                          │
//! 0012f3c8 7c90e4f4 [HelperMethodFrame_1OBJ: 0012f3c8]   ┘
//! ```
//!
//! [`TranscriptParser`] walks the lines once with a single cursor and never
//! goes back to an earlier section. Missing sections leave the matching
//! collection empty; a malformed thread identifier aborts the whole parse.

use super::call_stack::CallStack;
use super::thread_summary::{parse_id_token, ThreadSummary};
use super::Transcript;
use crate::domain::{ParseError, ThreadId};
use log::{debug, warn};

// =============================================================================
// MARKERS
// =============================================================================

/// Starts the managed thread table and ends the native section.
pub const MANAGED_THREADS_MARKER: &str = "MANAGED THREADS";

/// Starts the managed call stacks and ends the thread table.
pub const MANAGED_CALLSTACKS_MARKER: &str = "MANAGED CALLSTACKS";

/// Column header of a native stack; the line before it names the thread.
pub const NATIVE_STACK_MARKER: &str = "RetAddr";

/// Column header of the managed thread table.
pub const THREAD_TABLE_MARKER: &str = "ThreadOBJ";

/// Header of a managed stack, e.g. `OS Thread Id: 0xe1c (0)`.
pub const MANAGED_STACK_MARKER: &str = "OS Thread Id";

/// Frame recorded in place of a managed stack the debugger could not walk.
pub const NO_MANAGED_STACK_FRAME: &str = "No managed stack";

/// Token positions tried, in order, for the thread id on the line preceding
/// a native stack header.
pub const NATIVE_ID_TOKEN_POSITIONS: [usize; 3] = [1, 2, 3];

/// Stack walk diagnostics and the number of lines each one spans, including
/// the line carrying the marker. Checked in order.
pub const WALK_FAILURE_DIAGNOSTICS: [(&str, usize); 2] =
    [("Failed to start stack walk", 1), ("Unable to walk", 3)];

// =============================================================================
// PARSER
// =============================================================================

/// Section of the transcript the cursor is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NativeStacks,
    /// `in_rows` is set once the table header has been consumed.
    ManagedTable { in_rows: bool },
    ManagedStacks,
}

/// Managed stack still collecting frames.
struct OpenStack {
    id: ThreadId,
    frames: Vec<String>,
}

/// Single-pass state machine turning transcript lines into a [`Transcript`].
pub struct TranscriptParser<'a, S> {
    lines: &'a [S],
    cursor: usize,
    phase: Phase,
    open_managed: Option<OpenStack>,
    transcript: Transcript,
}

impl<'a, S: AsRef<str>> TranscriptParser<'a, S> {
    #[must_use]
    pub fn new(lines: &'a [S]) -> Self {
        Self {
            lines,
            cursor: 0,
            phase: Phase::NativeStacks,
            open_managed: None,
            transcript: Transcript::default(),
        }
    }

    /// Consume every line and return the reconstructed threads.
    ///
    /// # Errors
    /// Returns a [`ParseError`] for the first thread identifier that cannot
    /// be parsed. Nothing parsed up to that point is returned.
    pub fn parse(mut self) -> Result<Transcript, ParseError> {
        while self.cursor < self.lines.len() {
            match self.phase {
                Phase::NativeStacks => self.step_native()?,
                Phase::ManagedTable { in_rows } => self.step_table(in_rows)?,
                Phase::ManagedStacks => self.step_managed()?,
            }
        }
        self.close_managed_stack();

        debug!(
            "Parsed {} native stacks, {} managed threads, {} managed stacks",
            self.transcript.native_stacks.len(),
            self.transcript.dotnet_threads.len(),
            self.transcript.dotnet_stacks.len()
        );
        Ok(self.transcript)
    }

    fn line(&self, index: usize) -> &'a str {
        let lines: &'a [S] = self.lines;
        lines[index].as_ref()
    }

    fn enter(&mut self, phase: Phase) {
        debug!("line {}: entering {:?}", self.cursor + 1, phase);
        self.phase = phase;
    }

    // -------------------------------------------------------------------------
    // Phase 1: native stacks
    // -------------------------------------------------------------------------

    fn step_native(&mut self) -> Result<(), ParseError> {
        let line = self.line(self.cursor);

        if line.contains(MANAGED_THREADS_MARKER) {
            // The marker line is re-examined by the table phase
            self.enter(Phase::ManagedTable { in_rows: false });
            return Ok(());
        }

        if !line.contains(NATIVE_STACK_MARKER) {
            self.cursor += 1;
            return Ok(());
        }

        let header_line = self.cursor + 1;
        let id = match self.cursor.checked_sub(1) {
            Some(prev) => parse_id_token(self.line(prev), &NATIVE_ID_TOKEN_POSITIONS, prev + 1)?,
            None => return Err(ParseError::MissingThreadLine { line: header_line }),
        };

        let mut frames = Vec::new();
        while self.cursor < self.lines.len() {
            let frame = self.line(self.cursor);
            if frame.is_empty() || frame.contains(MANAGED_THREADS_MARKER) {
                break;
            }
            frames.push(frame.to_string());
            self.cursor += 1;
        }

        if self.cursor == self.lines.len() {
            warn!("Native stack for thread {id} (line {header_line}) runs to end of input");
        }
        debug!("Native stack for thread {id}: {} frames", frames.len());
        self.transcript.native_stacks.push(CallStack::new(id, frames));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Phase 2: managed thread table
    // -------------------------------------------------------------------------

    fn step_table(&mut self, in_rows: bool) -> Result<(), ParseError> {
        let line = self.line(self.cursor);

        if line.contains(MANAGED_CALLSTACKS_MARKER) {
            self.enter(Phase::ManagedStacks);
            return Ok(());
        }

        if in_rows {
            if !line.trim().is_empty() {
                let summary = ThreadSummary::parse(line, self.cursor + 1)?;
                self.transcript.dotnet_threads.push(summary);
            }
        } else if line.contains(THREAD_TABLE_MARKER) {
            self.phase = Phase::ManagedTable { in_rows: true };
        }

        self.cursor += 1;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Phase 3: managed call stacks
    // -------------------------------------------------------------------------

    fn step_managed(&mut self) -> Result<(), ParseError> {
        let line = self.line(self.cursor);

        if line.contains(MANAGED_STACK_MARKER) {
            self.close_managed_stack();
            let id = managed_stack_id(line, self.cursor + 1)?;
            self.open_managed = Some(OpenStack { id, frames: Vec::new() });
            self.cursor += 1;
            return Ok(());
        }

        let Some(open) = self.open_managed.as_mut() else {
            self.cursor += 1;
            return Ok(());
        };

        let (frame, consumed) = match walk_failure_span(line) {
            Some(span) => (NO_MANAGED_STACK_FRAME.to_string(), span),
            None => (line.to_string(), 1),
        };
        open.frames.push(frame);
        self.cursor += consumed;
        Ok(())
    }

    fn close_managed_stack(&mut self) {
        if let Some(open) = self.open_managed.take() {
            debug!("Managed stack for thread {}: {} frames", open.id, open.frames.len());
            self.transcript.dotnet_stacks.push(CallStack::new(open.id, open.frames));
        }
    }
}

/// Number of lines a stack walk diagnostic spans, if `line` starts one.
#[must_use]
pub fn walk_failure_span(line: &str) -> Option<usize> {
    WALK_FAILURE_DIAGNOSTICS
        .iter()
        .find(|(marker, _)| line.contains(marker))
        .map(|&(_, span)| span)
}

/// Thread id between the first `(` and the first `)` of a managed stack header.
fn managed_stack_id(line: &str, line_number: usize) -> Result<ThreadId, ParseError> {
    let malformed =
        || ParseError::MalformedThreadIdentifier { line: line_number, text: line.to_string() };

    let start = line.find('(').ok_or_else(malformed)?;
    let end = line.find(')').ok_or_else(malformed)?;
    line.get(start + 1..end)
        .and_then(|inner| inner.parse::<i64>().ok())
        .map(ThreadId)
        .ok_or_else(malformed)
}

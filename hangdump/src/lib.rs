//! # hangdump - Hang Signature Detection for Debugger Thread Dumps
//!
//! hangdump reads the text a native debugger prints while inspecting a hung
//! process (native stacks, the managed thread table and managed stacks),
//! rebuilds the threads and their call stacks, and checks them against a
//! fixed catalogue of known hang signatures.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌───────────────┐   ┌──────────────┐
//! │  Transcript  │──▶│ TranscriptParser │──▶│ RuleEvaluator │──▶│   Reporter   │
//! │   (lines)    │   │  (3 phases)      │   │  (catalogue)  │   │ text / JSON  │
//! └──────────────┘   └──────────────────┘   └───────────────┘   └──────────────┘
//!                      native stacks          findings
//!                      managed threads
//!                      managed stacks
//! ```
//!
//! ## Module Structure
//!
//! - [`transcript`]: [`CallStack`](transcript::CallStack),
//!   [`ThreadSummary`](transcript::ThreadSummary) and the three-phase parser
//! - [`analysis`]: the rule catalogue and its evaluator
//! - [`report`]: plain-text report with tips and reading lists
//! - [`export`]: JSON findings document
//! - [`input`]: reading a transcript from a file or stdin
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core types (`ThreadId`, `Section`) and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Analyze a saved transcript
//! hangdump hang.txt
//!
//! # Pipe debugger output straight in and export JSON
//! cdb -z app.dmp -cf hang-cmds.txt | hangdump --export findings.json
//! ```

pub mod analysis;
pub mod cli;
pub mod domain;
pub mod export;
pub mod input;
pub mod report;
pub mod transcript;

use analysis::{Finding, RuleEvaluator};
use domain::ParseError;
use transcript::Transcript;

/// Parsed transcript together with the findings produced from it.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub transcript: Transcript,
    pub findings: Vec<Finding>,
}

/// Run the full pipeline over a transcript.
///
/// # Errors
/// Returns a [`ParseError`] if the transcript cannot be parsed; no findings
/// are produced in that case.
pub fn analyze<S: AsRef<str>>(lines: &[S]) -> Result<Analysis, ParseError> {
    let transcript = Transcript::parse(lines)?;
    let findings = RuleEvaluator::new(&transcript).evaluate();
    Ok(Analysis { transcript, findings })
}

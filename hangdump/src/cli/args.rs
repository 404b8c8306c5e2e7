//! CLI argument definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Findings document as JSON
    Json,
}

#[derive(Parser)]
#[command(
    name = "hangdump",
    about = "Detect known hang signatures in debugger thread dumps",
    after_help = "\
EXAMPLES:
    hangdump dump.txt                        Analyze a saved transcript
    cdb -z app.dmp -cf cmds.txt | hangdump   Analyze a transcript from stdin
    hangdump dump.txt --export findings.json Also write findings as JSON"
)]
pub struct Args {
    /// Debugger transcript to analyze (stdin when omitted or `-`)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Export findings to file as JSON
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Omit the further reading lists from the text report
    #[arg(long)]
    pub no_references: bool,

    /// Include thread counts in the text report
    #[arg(long)]
    pub summary: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

//! # hangdump - Main Entry Point
//!
//! Reads a debugger transcript (file or stdin), runs the analysis and prints
//! the report as text or JSON. `--export` additionally writes the JSON
//! findings document to a file.

use anyhow::{Context, Result};
use clap::Parser;
use hangdump::cli::{Args, OutputFormat};
use hangdump::domain::ParseError;
use hangdump::export::FindingsExporter;
use hangdump::input::read_transcript;
use hangdump::report::{ReportOptions, Reporter};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_DATAERR: i32 = 65;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ParseError>().is_some() {
        EXIT_DATAERR
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let lines = read_transcript(args.input.as_deref())?;
    let analysis = hangdump::analyze(&lines)?;
    let stats = analysis.transcript.stats();
    info!("{} findings", analysis.findings.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => {
            let reporter = Reporter::new(ReportOptions {
                references: !args.no_references,
                summary: args.summary,
            });
            out.write_all(reporter.render(&stats, &analysis.findings).as_bytes())?;
        }
        OutputFormat::Json => {
            FindingsExporter::new(&stats, &analysis.findings).export(&mut out)?;
        }
    }

    if let Some(export_path) = &args.export {
        let file = File::create(export_path).context("Failed to create findings output file")?;
        FindingsExporter::new(&stats, &analysis.findings)
            .export(BufWriter::new(file))
            .context("Failed to export findings")?;

        if !args.quiet {
            eprintln!("saved: {}", export_path.display());
        }
    }

    Ok(())
}

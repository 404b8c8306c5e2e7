//! Plain-text hang report
//!
//! Renders findings grouped by section, in catalogue order:
//!
//! ```text
//! =====================================================
//! HANG ANALYSIS
//! =====================================================
//! -----------------------------------------------------
//! GC RELATED INFORMATION
//! -----------------------------------------------------
//! The following threads are waiting for the GC to finish:
//!     14 15
//! The GC was triggered by thread:
//!     16
//! ```
//!
//! Every section header is printed even when it has no findings, followed by
//! a short reading list unless references are turned off.

use crate::analysis::Finding;
use crate::domain::{Section, ThreadId};
use crate::transcript::TranscriptStats;
use std::fmt::{self, Write};

const BANNER: &str = "=====================================================";
const RULE: &str = "-----------------------------------------------------";

/// Article about a class of hang, shown after the matching section.
#[derive(Debug, Clone, Copy)]
pub struct Reference {
    pub title: &'static str,
    pub url: &'static str,
}

const GC_REFERENCES: &[Reference] = &[
    Reference {
        title: "GC-LoaderLock Deadlock",
        url: "https://tessferrandez.github.io/aspnet/debugging/hang/2007/03/12/net-hang-case-study-gc-loader-lock-deadlock.html",
    },
    Reference {
        title: "High CPU in GC",
        url: "https://tessferrandez.github.io/debugging/aspnet/hang/2006/06/22/aspnet-case-study-high-cpu-in-gc.html",
    },
    Reference {
        title: "High CPU in GC (Viewstate)",
        url: "https://tessferrandez.github.io/debugging/aspnet/hang/memory/2006/11/24/aspnet-case-study-death-by-viewstate.html",
    },
    Reference {
        title: "Blocked finalizer",
        url: "https://tessferrandez.github.io/debugging/dotnet/memory/hang/crash/2006/03/26/net-memory-leak-unblock-my-finalizer.html",
    },
];

const LOCK_REFERENCES: &[Reference] = &[
    Reference {
        title: "WaitOne and WebService calls",
        url: "https://tessferrandez.github.io/debugging/aspnet/hang/2006/02/23/aspnet-performance-case-study-web-service-calls-taking-forever.html",
    },
    Reference {
        title: "Locks and Critical sections",
        url: "https://tessferrandez.github.io/debugging/aspnet/hang/2006/01/09/a-hang-scenario-locks-and-critical-sections.html",
    },
];

const HANG_REFERENCES: &[Reference] = &[
    Reference {
        title: "Hang debugging walkthrough",
        url: "https://tessferrandez.github.io/debugging/dotnet/hang/2006/10/13/net-hang-debugging-walkthrough.html",
    },
    Reference {
        title: "Things to ignore when you're debugging a hang",
        url: "https://tessferrandez.github.io/debugging/aspnet/hang/2007/04/02/things-to-ignore-when-debugging-a-net-hang.html",
    },
];

/// Reading list printed after a section.
#[must_use]
pub fn section_references(section: Section) -> &'static [Reference] {
    match section {
        Section::Gc => GC_REFERENCES,
        Section::Locks => LOCK_REFERENCES,
        Section::External => &[],
    }
}

/// What to include besides the findings themselves.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub references: bool,
    pub summary: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { references: true, summary: false }
    }
}

/// Text renderer for findings.
#[derive(Debug, Default)]
pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    #[must_use]
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Render the full report into a string.
    #[must_use]
    pub fn render(&self, stats: &TranscriptStats, findings: &[Finding]) -> String {
        let mut out = String::new();
        // Formatting into a String only fails if a Display impl does
        let _ = self.write_report(&mut out, stats, findings);
        out
    }

    /// Write the full report to `out`.
    ///
    /// # Errors
    /// Propagates formatter errors from `out`.
    pub fn write_report(
        &self,
        out: &mut impl Write,
        stats: &TranscriptStats,
        findings: &[Finding],
    ) -> fmt::Result {
        writeln!(out, "{BANNER}")?;
        writeln!(out, "HANG ANALYSIS")?;
        writeln!(out, "{BANNER}")?;

        if self.options.summary {
            write_summary(out, stats)?;
        }

        for section in Section::ALL {
            writeln!(out, "{RULE}")?;
            writeln!(out, "{}", section.title().to_uppercase())?;
            writeln!(out, "{RULE}")?;

            for finding in findings.iter().filter(|f| f.section == section) {
                write_finding(out, finding)?;
            }

            if self.options.references {
                let references = section_references(section);
                if !references.is_empty() {
                    write_references(
                        out,
                        &format!("FURTHER READING: {}", section.title().to_uppercase()),
                        references,
                    )?;
                }
            }
        }

        if self.options.references {
            write_references(out, "FURTHER READING: DEBUGGING HANGS", HANG_REFERENCES)?;
        }
        Ok(())
    }
}

fn write_summary(out: &mut impl Write, stats: &TranscriptStats) -> fmt::Result {
    writeln!(out, "Native stacks:          {}", stats.native_stacks)?;
    writeln!(out, "Managed threads:        {}", stats.managed_threads)?;
    writeln!(out, "Managed stacks:         {}", stats.managed_stacks)?;
    writeln!(out, "GC threads:             {}", stats.gc_threads)?;
    writeln!(out, "Threads with exception: {}", stats.threads_with_exception)
}

fn write_finding(out: &mut impl Write, finding: &Finding) -> fmt::Result {
    writeln!(out, "{}:", finding.message)?;
    writeln!(out, "\t{}", join_ids(&finding.thread_ids))?;
    if let Some(related) = &finding.related {
        writeln!(out, "{}:", related.message)?;
        writeln!(out, "\t{}", join_ids(&related.thread_ids))?;
    }
    if let Some(tip) = finding.tip {
        writeln!(out, "TIP: {tip}")?;
    }
    writeln!(out)
}

fn write_references(out: &mut impl Write, heading: &str, references: &[Reference]) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{heading}")?;
    writeln!(out, "{}", "=".repeat(heading.len()))?;
    for reference in references {
        writeln!(out, "{:<48} {}", reference.title, reference.url)?;
    }
    writeln!(out)
}

/// Space separated thread ids, as printed in the report.
#[must_use]
pub fn join_ids(ids: &[ThreadId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

use crate::analysis::Finding;
use crate::domain::ExportError;
use crate::transcript::TranscriptStats;
use serde::Serialize;
use std::io::Write;

/// Version of the findings document layout
const FORMAT_VERSION: u32 = 1;

/// Top-level JSON document
#[derive(Debug, Serialize)]
struct FindingsDocument<'a> {
    version: u32,
    summary: &'a TranscriptStats,
    findings: &'a [Finding],
}

/// JSON exporter for analysis findings
pub struct FindingsExporter<'a> {
    stats: &'a TranscriptStats,
    findings: &'a [Finding],
}

impl<'a> FindingsExporter<'a> {
    /// Create an exporter over one analysis run
    #[must_use]
    pub fn new(stats: &'a TranscriptStats, findings: &'a [Finding]) -> Self {
        Self { stats, findings }
    }

    /// Write the findings document as pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if serialization or the underlying write fails
    pub fn export<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        let document =
            FindingsDocument { version: FORMAT_VERSION, summary: self.stats, findings: self.findings };
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RuleId;
    use crate::domain::{Section, ThreadId};

    #[test]
    fn test_export_document_shape() {
        let stats = TranscriptStats { native_stacks: 2, ..TranscriptStats::default() };
        let findings = vec![Finding {
            section: Section::Locks,
            rule: RuleId::CriticalSection,
            message: "The following threads are waiting for a critical section",
            thread_ids: vec![ThreadId(3), ThreadId(5)],
            tip: Some("Run !sieextPub.critlist to find out who the owner is"),
            related: None,
        }];

        let mut buffer = Vec::new();
        FindingsExporter::new(&stats, &findings).export(&mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(json["version"], 1);
        assert_eq!(json["summary"]["native_stacks"], 2);
        assert_eq!(json["findings"][0]["section"], "locks");
        assert_eq!(json["findings"][0]["rule"], "critical-section");
        assert_eq!(json["findings"][0]["thread_ids"], serde_json::json!([3, 5]));
        assert!(json["findings"][0].get("related").is_none());
    }

    #[test]
    fn test_export_empty_findings() {
        let stats = TranscriptStats::default();
        let mut buffer = Vec::new();
        FindingsExporter::new(&stats, &[]).export(&mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["findings"], serde_json::json!([]));
    }
}

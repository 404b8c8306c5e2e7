//! Findings export functionality
//!
//! This module provides functionality for exporting analysis results to
//! machine-readable formats. Currently supports a JSON findings document.

pub mod findings_json;

pub use findings_json::FindingsExporter;

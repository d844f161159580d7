//! Import pipeline orchestrating parsing and deduplication.
//!
//! One import run reads a whole report file, selects the parser for the
//! scan type, streams every mapped finding through a run-local dedup
//! table, and returns the surviving findings with a run summary. Runs
//! are one-shot: a malformed file fails the run, re-running the import
//! is the caller's recovery mechanism.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ParserError;
use crate::models::finding::Finding;
use crate::models::scan::ScanContext;
use crate::parsers::acunetix::AcunetixParser;
use crate::parsers::burp::BurpApiParser;
use crate::parsers::Parser;
use crate::services::deduplication::Deduper;

/// Supported scan types.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Acunetix,
    BurpRestApi,
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Acunetix => write!(f, "acunetix"),
            Self::BurpRestApi => write!(f, "burp_rest_api"),
        }
    }
}

/// Summary of one import run.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub source_tool: String,
    /// Report items successfully mapped, before dedup.
    pub total_parsed: usize,
    /// Items that merged into an earlier finding.
    pub duplicates_merged: usize,
    /// Surviving findings in first-occurrence order.
    pub findings: Vec<Finding>,
}

/// Run the import pipeline over an in-memory report.
pub fn ingest_bytes(
    data: &[u8],
    scan_type: &ScanType,
    scan: &ScanContext,
) -> Result<ImportResult, ParserError> {
    let parser: Box<dyn Parser> = match scan_type {
        ScanType::Acunetix => Box::new(AcunetixParser::new()),
        ScanType::BurpRestApi => Box::new(BurpApiParser::new()),
    };

    let parsed = parser.parse(data, scan)?;
    let total_parsed = parsed.len();

    // dedup table lives exactly as long as this run
    let mut deduper = Deduper::new();
    for candidate in parsed {
        deduper.ingest(candidate);
    }
    let duplicates_merged = deduper.merged();
    let findings = deduper.finalize();

    tracing::info!(
        source_tool = parser.source_tool(),
        scan_id = %scan.id,
        total_parsed,
        findings = findings.len(),
        duplicates_merged,
        "import run completed"
    );

    Ok(ImportResult {
        source_tool: parser.source_tool().to_string(),
        total_parsed,
        duplicates_merged,
        findings,
    })
}

/// Run the import pipeline over a report file.
pub fn ingest_file(
    path: &Path,
    scan_type: &ScanType,
    scan: &ScanContext,
) -> Result<ImportResult, ParserError> {
    let data = std::fs::read(path)?;
    ingest_bytes(&data, scan_type, scan)
}

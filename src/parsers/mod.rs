//! Scanner report parsers for normalizing findings from vendor formats.
//!
//! Each parser implements the `Parser` trait, producing normalized
//! `ParsedFinding` records from tool-specific formats (XML, JSON).
//! Deduplication of the resulting stream is the reducer's job, see
//! `services::deduplication`.

pub mod acunetix;
pub mod burp;

use crate::errors::ParserError;
use crate::models::finding::{Finding, Severity};
use crate::models::scan::ScanContext;

/// A normalized finding ready for deduplication.
#[derive(Debug, Clone)]
pub struct ParsedFinding {
    /// Deterministic digest over the parser's dedup field subset.
    pub fingerprint: String,
    pub finding: Finding,
    /// Rendered `Details` section of this record, appended to the
    /// surviving finding when a duplicate merges into it.
    pub details: Option<String>,
}

/// Trait for pluggable scanner report parsers.
pub trait Parser: Send + Sync {
    /// Parse a whole report into normalized findings, in report order.
    ///
    /// Malformed report structure fails the run; unknown enumerated
    /// values fall back to the vendor-specific documented default.
    fn parse(&self, data: &[u8], scan: &ScanContext) -> Result<Vec<ParsedFinding>, ParserError>;

    /// The scanner tool name this parser handles.
    fn source_tool(&self) -> &str;

    /// Map a tool-specific severity string to the normalized scale.
    fn map_severity(&self, tool_severity: &str) -> Severity;
}

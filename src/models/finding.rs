//! Core normalized finding model shared by all parsers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::endpoint::Endpoint;

/// Normalized severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Info => "Info",
        };
        write!(f, "{label}")
    }
}

/// One request/response evidence pair captured from live traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestResponse {
    pub request: String,
    pub response: String,
}

/// A single normalized vulnerability record attached to a scan run.
///
/// `static_finding` / `dynamic_finding` are mutually exclusive: dynamic
/// wins whenever request/response evidence exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub scan_id: Uuid,
    pub title: String,
    pub severity: Severity,
    pub description: String,
    pub false_positive: bool,
    pub static_finding: bool,
    pub dynamic_finding: bool,
    /// How many report items collapsed into this finding. Starts at 1.
    pub occurrences: u32,
    pub impact: Option<String>,
    pub mitigation: Option<String>,
    pub references: Option<String>,
    pub date: Option<NaiveDate>,
    pub cwe: Option<u32>,
    pub cvss_vector: Option<String>,
    pub unique_id_from_tool: Option<String>,
    pub vuln_id_from_tool: Option<String>,
    pub scanner_confidence: Option<u8>,
    pub endpoints: Vec<Endpoint>,
    pub req_resp: Vec<RequestResponse>,
}

impl Finding {
    /// A static finding with defaults matching a freshly mapped record.
    pub fn new(scan_id: Uuid, title: impl Into<String>, severity: Severity) -> Self {
        Self {
            scan_id,
            title: title.into(),
            severity,
            description: String::new(),
            false_positive: false,
            static_finding: true,
            dynamic_finding: false,
            occurrences: 1,
            impact: None,
            mitigation: None,
            references: None,
            date: None,
            cwe: None,
            cvss_vector: None,
            unique_id_from_tool: None,
            vuln_id_from_tool: None,
            scanner_confidence: None,
            endpoints: Vec::new(),
            req_resp: Vec::new(),
        }
    }

    /// Mark the finding as backed by live request/response evidence.
    pub fn set_dynamic(&mut self) {
        self.dynamic_finding = true;
        self.static_finding = false;
    }
}

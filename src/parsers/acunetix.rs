//! Acunetix XML report parser.
//!
//! Walks the `ScanGroup/Scan/ReportItems/ReportItem` tree, maps each
//! item to a normalized finding, and fingerprints it over
//! title|impact|mitigation for intra-import dedup. Request evidence
//! under TechnicalDetails flips the finding from static to dynamic.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::ParserError;
use crate::models::endpoint::{Endpoint, ParsedUrl};
use crate::models::finding::{Finding, RequestResponse, Severity};
use crate::models::scan::ScanContext;
use crate::parsers::{ParsedFinding, Parser};
use crate::services::{cvss, fingerprint, html};

/// Parser for Acunetix XML reports.
#[derive(Debug, Default)]
pub struct AcunetixParser;

impl AcunetixParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for AcunetixParser {
    fn parse(&self, data: &[u8], scan: &ScanContext) -> Result<Vec<ParsedFinding>, ParserError> {
        let report: ScanGroup = quick_xml::de::from_reader(data)?;
        let mut parsed = Vec::new();

        for scan_node in &report.scans {
            let start_url = scan_node.start_url.as_deref().unwrap_or_default();
            let report_date = parse_report_date(scan_node.start_time.as_deref())?;

            let items = scan_node
                .report_items
                .as_ref()
                .map(|r| r.items.as_slice())
                .unwrap_or_default();
            for item in items {
                parsed.push(self.convert_item(item, start_url, report_date, scan)?);
            }
        }

        Ok(parsed)
    }

    fn source_tool(&self) -> &str {
        "Acunetix Scanner"
    }

    fn map_severity(&self, tool_severity: &str) -> Severity {
        match tool_severity {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            "informational" => Severity::Info,
            // Acunetix convention: anything unrecognized is Critical
            _ => Severity::Critical,
        }
    }
}

// -- Acunetix XML schema (subset) --

#[derive(Debug, Deserialize)]
struct ScanGroup {
    #[serde(rename = "Scan", default)]
    scans: Vec<Scan>,
}

#[derive(Debug, Deserialize)]
struct Scan {
    #[serde(rename = "StartURL")]
    start_url: Option<String>,
    #[serde(rename = "StartTime")]
    start_time: Option<String>,
    #[serde(rename = "ReportItems")]
    report_items: Option<ReportItems>,
}

#[derive(Debug, Deserialize, Default)]
struct ReportItems {
    #[serde(rename = "ReportItem", default)]
    items: Vec<ReportItem>,
}

#[derive(Debug, Deserialize)]
struct ReportItem {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Severity")]
    severity: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "IsFalsePositive")]
    is_false_positive: Option<String>,
    #[serde(rename = "Impact")]
    impact: Option<String>,
    #[serde(rename = "Recommendation")]
    recommendation: Option<String>,
    #[serde(rename = "Details")]
    details: Option<String>,
    #[serde(rename = "TechnicalDetails")]
    technical_details: Option<TechnicalDetails>,
    #[serde(rename = "Affects")]
    affects: Option<String>,
    #[serde(rename = "CWEList")]
    cwe_list: Option<CweList>,
    #[serde(rename = "References")]
    references: Option<References>,
    #[serde(rename = "CVSS3")]
    cvss3: Option<Cvss3>,
}

/// Mixed content: free text plus captured Request elements.
#[derive(Debug, Deserialize)]
struct TechnicalDetails {
    #[serde(rename = "$text")]
    text: Option<String>,
    #[serde(rename = "Request", default)]
    requests: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CweList {
    #[serde(rename = "CWE", default)]
    cwes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct References {
    #[serde(rename = "Reference", default)]
    references: Vec<Reference>,
}

#[derive(Debug, Deserialize)]
struct Reference {
    #[serde(rename = "Database")]
    database: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Cvss3 {
    #[serde(rename = "Descriptor")]
    descriptor: Option<String>,
}

impl AcunetixParser {
    /// Map one ReportItem into a fingerprinted candidate finding.
    fn convert_item(
        &self,
        item: &ReportItem,
        start_url: &str,
        report_date: Option<NaiveDate>,
        scan: &ScanContext,
    ) -> Result<ParsedFinding, ParserError> {
        let title = item.name.clone().unwrap_or_default();
        let severity = self.map_severity(item.severity.as_deref().unwrap_or_default());

        let mut finding = Finding::new(scan.id, title, severity);
        finding.description = html::to_markdown(item.description.as_deref().unwrap_or_default());
        finding.false_positive = is_false_positive(item.is_false_positive.as_deref());
        finding.date = report_date;

        if let Some(impact) = non_empty(item.impact.as_deref()) {
            finding.impact = Some(impact.to_string());
        }
        if let Some(recommendation) = non_empty(item.recommendation.as_deref()) {
            finding.mitigation = Some(recommendation.to_string());
        }
        if let Some(cwe) = item.cwe_list.as_ref().and_then(|l| l.cwes.first()) {
            finding.cwe = get_cwe_number(cwe)?;
        }

        let references: Vec<String> = item
            .references
            .iter()
            .flat_map(|r| &r.references)
            .map(|reference| {
                let url = reference.url.as_deref().unwrap_or_default();
                let db = reference.database.as_deref().filter(|d| !d.is_empty()).unwrap_or(url);
                format!(" * [{db}]({url})")
            })
            .collect();
        if !references.is_empty() {
            finding.references = Some(references.join("\n"));
        }

        if let Some(descriptor) = item.cvss3.as_ref().and_then(|c| c.descriptor.as_deref()) {
            // only the first parsed vector is kept
            finding.cvss_vector = cvss::parse_vectors(descriptor).into_iter().next();
        }

        // more description lives in "Details"
        let details = non_empty(item.details.as_deref()).map(html::to_markdown);
        if let Some(details) = &details {
            finding
                .description
                .push_str(&format!("\n\n**Details:**\n{details}"));
        }

        if let Some(tech) = &item.technical_details {
            if let Some(text) = non_empty(tech.text.as_deref()) {
                finding
                    .description
                    .push_str(&format!("\n\n**TechnicalDetails:**\n\n{text}"));
            }
            if !tech.requests.is_empty() {
                // request evidence means the finding came from live traffic
                finding.set_dynamic();
                for request in &tech.requests {
                    finding.req_resp.push(RequestResponse {
                        request: request.clone(),
                        response: String::new(),
                    });
                }
            }
        }

        let url = ParsedUrl::parse(start_url)?;
        finding.endpoints.push(Endpoint {
            host: url.host,
            port: url.port,
            path: non_empty(item.affects.as_deref()).map(String::from),
            protocol: url.scheme,
        });

        let fp = fingerprint::digest(&[
            &finding.title,
            finding.impact.as_deref().unwrap_or_default(),
            finding.mitigation.as_deref().unwrap_or_default(),
        ]);

        Ok(ParsedFinding {
            fingerprint: fp,
            finding,
            details,
        })
    }
}

/// Parse the scan StartTime day-first. Empty or missing means no date;
/// an unparseable value fails the run.
fn parse_report_date(value: Option<&str>) -> Result<Option<NaiveDate>, ParserError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    const DAY_FIRST_FORMATS: &[&str] = &[
        "%d/%m/%Y, %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d.%m.%Y %H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
        "%d/%m/%Y",
    ];
    for format in DAY_FIRST_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(dt.date()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(Some(date));
        }
    }
    Err(ParserError::InvalidDate(raw.to_string()))
}

/// Numeric suffix of a compound CWE identifier ("CWE-79" -> 79).
fn get_cwe_number(cwe: &str) -> Result<Option<u32>, ParserError> {
    let trimmed = cwe.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .split_once('-')
        .and_then(|(_, suffix)| suffix.parse().ok())
        .map(Some)
        .ok_or_else(|| ParserError::InvalidCwe(trimmed.to_string()))
}

/// Acunetix emits IsFalsePositive as element text; any non-empty value
/// marks the finding.
fn is_false_positive(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//! Burp REST API scan parser (`/scan/[task_id]` JSON export).
//!
//! Iterates issue events, formats a fixed description template, and
//! decodes base64 evidence segments into request/response pairs. All
//! Burp findings are dynamic by definition. An unrecognized evidence
//! segment kind is a hard error, never silently dropped.

use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ParserError;
use crate::models::endpoint::Endpoint;
use crate::models::finding::{Finding, RequestResponse, Severity};
use crate::models::scan::ScanContext;
use crate::parsers::{ParsedFinding, Parser};
use crate::services::fingerprint;

/// Evidence kinds whose request/response payloads are kept.
const KEPT_EVIDENCE_KINDS: &[&str] = &["InformationListEvidence", "FirstOrderEvidence"];

/// Note emitted when a DataSegment is not valid UTF-8 and the
/// permissive latin-1 fallback is used instead.
const LATIN1_FALLBACK_NOTE: &str =
    "Decoding of the DataSegment failed. Thus, decoded with `latin1`. The result is the following one:\n";

/// Parser for Burp REST API scan data.
#[derive(Debug, Default)]
pub struct BurpApiParser;

impl BurpApiParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for BurpApiParser {
    fn parse(&self, data: &[u8], scan: &ScanContext) -> Result<Vec<ParsedFinding>, ParserError> {
        let document: BurpDocument = serde_json::from_slice(data)?;
        let mut parsed = Vec::new();

        for event in &document.issue_events {
            if event.event_type.as_deref() != Some("issue_found") {
                continue;
            }
            let Some(issue) = &event.issue else {
                continue;
            };
            parsed.push(self.convert_issue(issue, scan)?);
        }

        Ok(parsed)
    }

    fn source_tool(&self) -> &str {
        "Burp REST API"
    }

    /// Severity enum per the Burp OpenAPI definition: high, medium,
    /// low, info, undefined, false_positive.
    fn map_severity(&self, tool_severity: &str) -> Severity {
        match tool_severity.to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Info,
        }
    }
}

// -- Burp REST API schema (subset) --

#[derive(Debug, Deserialize)]
struct BurpDocument {
    #[serde(default)]
    issue_events: Vec<IssueEvent>,
}

#[derive(Debug, Deserialize)]
struct IssueEvent {
    #[serde(rename = "type")]
    event_type: Option<String>,
    issue: Option<Issue>,
}

#[derive(Debug, Deserialize)]
struct Issue {
    name: Option<String>,
    severity: Option<String>,
    confidence: Option<String>,
    description: Option<String>,
    /// Numeric in the wire format; kept as a raw value and rendered.
    serial_number: Option<Value>,
    type_index: Option<Value>,
    origin: Option<String>,
    path: Option<String>,
    #[serde(default)]
    evidence: Vec<Evidence>,
}

#[derive(Debug, Deserialize)]
struct Evidence {
    #[serde(rename = "type")]
    kind: Option<String>,
    request_response: Option<RequestResponsePayload>,
}

#[derive(Debug, Deserialize)]
struct RequestResponsePayload {
    request: Option<Vec<Segment>>,
    response: Option<Vec<Segment>>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(rename = "type")]
    kind: String,
    data: Option<String>,
    length: Option<u64>,
}

impl BurpApiParser {
    fn convert_issue(&self, issue: &Issue, scan: &ScanContext) -> Result<ParsedFinding, ParserError> {
        let title = issue.name.clone().unwrap_or_else(|| "Burp issue".to_string());
        let raw_severity = issue.severity.as_deref().unwrap_or("info");
        let severity = self.map_severity(raw_severity);

        let description = format!(
            "**{title}**\n\
             **Serial Number**: {serial_number}\n\
             **Type Index**: {type_index}\n\
             **Confidence**: {confidence}\n\
             **Description**: {description_text}\n",
            serial_number = display_value(issue.serial_number.as_ref()),
            type_index = display_value(issue.type_index.as_ref()),
            confidence = issue.confidence.as_deref().unwrap_or("<None>"),
            description_text = issue.description.as_deref().unwrap_or("<None>"),
        );

        let mut finding = Finding::new(scan.id, title, severity);
        finding.description = description;
        finding.set_dynamic(); // by definition
        // special case: Burp reports triaged false positives as a severity
        finding.false_positive = raw_severity == "false_positive";
        finding.mitigation = Some("No mitigation provided".to_string());
        finding.references = Some("No references provided".to_string());
        finding.impact = Some("No impact provided".to_string());
        finding.unique_id_from_tool = Some(plain_value(issue.serial_number.as_ref()));
        finding.vuln_id_from_tool = Some(plain_value(issue.type_index.as_ref()));
        finding.scanner_confidence = convert_confidence(issue.confidence.as_deref());

        if let (Some(origin), Some(path)) = (issue.origin.as_deref(), issue.path.as_deref()) {
            finding
                .endpoints
                .push(Endpoint::from_uri(&format!("{origin}{path}"))?);
        }

        for evidence in &issue.evidence {
            let kind = evidence.kind.as_deref().unwrap_or_default();
            if !KEPT_EVIDENCE_KINDS.contains(&kind) {
                continue;
            }
            let Some(payload) = &evidence.request_response else {
                continue;
            };
            finding.req_resp.push(RequestResponse {
                request: decode_segments(payload.request.as_deref())?,
                response: decode_segments(payload.response.as_deref())?,
            });
        }

        let fp = fingerprint::digest(&[&finding.title, &finding.description]);

        Ok(ParsedFinding {
            fingerprint: fp,
            finding,
            details: None,
        })
    }
}

/// Decode a sequence of Burp evidence segments into text.
///
/// DataSegment payloads are base64; non-UTF-8 bytes fall back to a
/// permissive latin-1 decode with an inline note. An unknown segment
/// kind fails the run.
fn decode_segments(segments: Option<&[Segment]>) -> Result<String, ParserError> {
    let mut output = String::new();
    for segment in segments.unwrap_or_default() {
        match segment.kind.as_str() {
            "DataSegment" => {
                let data = base64::engine::general_purpose::STANDARD
                    .decode(segment.data.as_deref().unwrap_or_default())?;
                match String::from_utf8(data) {
                    Ok(text) => output.push_str(&text),
                    Err(err) => {
                        output.push_str(LATIN1_FALLBACK_NOTE);
                        output.push_str(&latin1_decode(err.as_bytes()));
                    }
                }
            }
            "SnipSegment" => {
                output.push_str(&format!("\n<...> ({} bytes)", segment.length.unwrap_or(0)));
            }
            "HighlightSegment" => {
                output.push_str(
                    "\n\n------------------------------------------------------------------\n\n",
                );
            }
            other => return Err(ParserError::UnknownSegment(other.to_string())),
        }
    }
    Ok(output)
}

/// Latin-1 maps every byte to the code point of the same value.
fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Render an optional raw JSON value for the description template.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "<None>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render an optional raw JSON value as a bare identifier string.
fn plain_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Scanner confidence scale per the Burp OpenAPI definition.
fn convert_confidence(confidence: Option<&str>) -> Option<u8> {
    match confidence.unwrap_or("undefined").to_lowercase().as_str() {
        "certain" => Some(2),
        "firm" => Some(3),
        "tentative" => Some(6),
        _ => None,
    }
}

//! Intra-import deduplication of parsed findings.
//!
//! The `Deduper` keeps a fingerprint -> surviving-finding table for the
//! duration of one import run. First match wins: a later duplicate only
//! appends its Details section, endpoints, and evidence, and bumps the
//! occurrence count. The table is never persisted or shared across runs.

use std::collections::HashMap;

use crate::models::finding::Finding;
use crate::parsers::ParsedFinding;

/// Divider prepended when a duplicate's Details section is appended to
/// the surviving finding's description.
const MERGE_DIVIDER: &str = "\n-----\n\n**Details:**\n";

/// Outcome of ingesting one parsed finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// Unseen fingerprint, inserted as a new finding.
    New,
    /// Matched an existing fingerprint and merged into it.
    Merged,
}

/// Fingerprint-keyed dedup table scoped to one import run.
#[derive(Debug, Default)]
pub struct Deduper {
    index: HashMap<String, usize>,
    findings: Vec<Finding>,
    merged: usize,
}

impl Deduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parsed finding, merging it into an earlier one when its
    /// fingerprint was already seen.
    pub fn ingest(&mut self, parsed: ParsedFinding) -> DedupOutcome {
        match self.index.get(&parsed.fingerprint) {
            Some(&slot) => {
                tracing::debug!(title = %parsed.finding.title, "duplicate finding");
                merge(&mut self.findings[slot], parsed);
                self.merged += 1;
                DedupOutcome::Merged
            }
            None => {
                self.index.insert(parsed.fingerprint, self.findings.len());
                self.findings.push(parsed.finding);
                DedupOutcome::New
            }
        }
    }

    /// Number of duplicates merged so far.
    pub fn merged(&self) -> usize {
        self.merged
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Consume the table, returning surviving findings in order of each
    /// fingerprint's first occurrence.
    pub fn finalize(self) -> Vec<Finding> {
        self.findings
    }
}

/// Merge a duplicate into the surviving finding.
///
/// Appends the incoming Details section behind a visible divider,
/// extends endpoints and request/response evidence preserving order and
/// duplicates, and accumulates the occurrence count. Title, severity,
/// and mitigation of the first-seen record win; the rest of the
/// incoming record is discarded.
pub fn merge(existing: &mut Finding, incoming: ParsedFinding) {
    if let Some(details) = incoming.details {
        existing.description.push_str(MERGE_DIVIDER);
        existing.description.push_str(&details);
    }
    existing.endpoints.extend(incoming.finding.endpoints);
    existing.req_resp.extend(incoming.finding.req_resp);
    existing.occurrences += incoming.finding.occurrences;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::endpoint::Endpoint;
    use crate::models::finding::{RequestResponse, Severity};
    use crate::services::fingerprint;
    use uuid::Uuid;

    fn candidate(title: &str, mitigation: &str, details: Option<&str>) -> ParsedFinding {
        let mut finding = Finding::new(Uuid::nil(), title, Severity::High);
        finding.description = format!("base description of {title}");
        if let Some(d) = details {
            finding.description.push_str(&format!("\n\n**Details:**\n{d}"));
        }
        finding.impact = Some("High data exposure".to_string());
        finding.mitigation = Some(mitigation.to_string());
        finding.endpoints.push(Endpoint {
            host: "example.com".to_string(),
            port: Some(443),
            path: Some(format!("/{title}")),
            protocol: Some("https".to_string()),
        });
        let fp = fingerprint::digest(&[
            title,
            "High data exposure",
            mitigation,
        ]);
        ParsedFinding {
            fingerprint: fp,
            finding,
            details: details.map(String::from),
        }
    }

    #[test]
    fn distinct_fingerprints_stay_separate() {
        let mut deduper = Deduper::new();
        assert_eq!(deduper.ingest(candidate("SQLi", "fix a", None)), DedupOutcome::New);
        assert_eq!(deduper.ingest(candidate("XSS", "fix b", None)), DedupOutcome::New);
        let findings = deduper.finalize();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].occurrences, 1);
    }

    #[test]
    fn duplicate_merges_into_single_entry() {
        let mut deduper = Deduper::new();
        deduper.ingest(candidate("SQL Injection", "Use parameterized queries", Some("on /login")));
        let outcome = deduper.ingest(candidate(
            "SQL Injection",
            "Use parameterized queries",
            Some("on /search"),
        ));
        assert_eq!(outcome, DedupOutcome::Merged);
        assert_eq!(deduper.merged(), 1);

        let findings = deduper.finalize();
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.occurrences, 2);
        assert_eq!(f.endpoints.len(), 2);
        assert!(f.description.contains("on /login"));
        assert!(f.description.contains("-----"));
        assert!(f.description.contains("on /search"));
    }

    #[test]
    fn first_occurrence_order_preserved() {
        let mut deduper = Deduper::new();
        deduper.ingest(candidate("C", "m", None));
        deduper.ingest(candidate("A", "m", None));
        deduper.ingest(candidate("C", "m", None));
        deduper.ingest(candidate("B", "m", None));
        let titles: Vec<_> = deduper.finalize().into_iter().map(|f| f.title).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn empty_table_finalizes_empty() {
        let deduper = Deduper::new();
        assert!(deduper.is_empty());
        assert!(deduper.finalize().is_empty());
    }

    #[test]
    fn merge_extends_evidence_and_keeps_first_fields() {
        let mut existing = candidate("SQLi", "first mitigation", None).finding;
        existing.req_resp.push(RequestResponse {
            request: "GET /a".to_string(),
            response: "200".to_string(),
        });

        let mut incoming = candidate("SQLi", "other mitigation", None);
        incoming.finding.severity = Severity::Low;
        incoming.finding.req_resp.push(RequestResponse {
            request: "GET /b".to_string(),
            response: "500".to_string(),
        });

        merge(&mut existing, incoming);
        assert_eq!(existing.occurrences, 2);
        assert_eq!(existing.req_resp.len(), 2);
        assert_eq!(existing.endpoints.len(), 2);
        // later duplicates never override first-seen fields
        assert_eq!(existing.severity, Severity::High);
        assert_eq!(existing.mitigation.as_deref(), Some("first mitigation"));
    }

    #[test]
    fn merge_without_details_leaves_description_untouched() {
        let mut existing = candidate("SQLi", "m", None).finding;
        let before = existing.description.clone();
        merge(&mut existing, candidate("SQLi", "m", None));
        assert_eq!(existing.description, before);
        assert_eq!(existing.occurrences, 2);
    }
}

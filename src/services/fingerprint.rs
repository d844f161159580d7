//! Fingerprint computation for intra-import deduplication.
//!
//! A fingerprint is a deterministic SHA-256 digest over a fixed, ordered
//! subset of finding fields, joined with `|`. Two records with equal
//! fingerprints are duplicates of the same underlying vulnerability
//! within one import. The digest is a pure function of its inputs and
//! independent of record arrival order.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest over the ordered field subset.
pub fn digest(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fields.join("|").as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_fields_same_fingerprint() {
        let a = digest(&["SQL Injection", "High data exposure", "Use parameterized queries"]);
        let b = digest(&["SQL Injection", "High data exposure", "Use parameterized queries"]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_field_different_fingerprint() {
        let a = digest(&["SQL Injection", "impact", "mitigation"]);
        let b = digest(&["SQL Injection", "impact", "other mitigation"]);
        assert_ne!(a, b);
    }

    #[test]
    fn field_order_is_significant() {
        let a = digest(&["title", "impact"]);
        let b = digest(&["impact", "title"]);
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = digest(&["title", "", ""]);
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

//! CVSS v3 vector extraction and canonicalization.
//!
//! Scanner descriptors embed CVSS vectors in free text. `parse_vectors`
//! pulls out every valid v3.x vector and returns it in canonical form:
//! metrics in specification order, undefined (`X`) optional metrics
//! dropped. Callers keep only the first vector.

use std::collections::HashMap;

use regex::Regex;

/// Metric keys in CVSS v3 specification order.
const METRIC_ORDER: &[&str] = &[
    "AV", "AC", "PR", "UI", "S", "C", "I", "A", // base
    "E", "RL", "RC", // temporal
    "CR", "IR", "AR", "MAV", "MAC", "MPR", "MUI", "MS", "MC", "MI", "MA", // environmental
];

/// Number of leading entries in `METRIC_ORDER` that are mandatory.
const BASE_METRIC_COUNT: usize = 8;

/// Extract all valid CVSS v3.x vectors from free text, canonicalized.
pub fn parse_vectors(text: &str) -> Vec<String> {
    let candidate = Regex::new(r"CVSS:3\.[01](?:/[A-Za-z]{1,3}:[A-Za-z])+").unwrap();
    candidate
        .find_iter(text)
        .filter_map(|m| normalize(m.as_str()))
        .collect()
}

/// Validate and canonicalize one candidate vector string.
fn normalize(vector: &str) -> Option<String> {
    let mut parts = vector.split('/');
    let prefix = parts.next()?;

    let mut metrics: HashMap<String, String> = HashMap::new();
    for part in parts {
        let (key, value) = part.split_once(':')?;
        let key = key.to_ascii_uppercase();
        let value = value.to_ascii_uppercase();
        if !value_allowed(&key, &value) {
            return None;
        }
        // repeated metric keys make the vector ambiguous
        if metrics.insert(key, value).is_some() {
            return None;
        }
    }

    if METRIC_ORDER[..BASE_METRIC_COUNT]
        .iter()
        .any(|key| !metrics.contains_key(*key))
    {
        return None;
    }

    let mut out = prefix.to_string();
    for key in METRIC_ORDER {
        if let Some(value) = metrics.get(*key) {
            // undefined optional metrics are dropped from the canonical form
            if value == "X" {
                continue;
            }
            out.push('/');
            out.push_str(key);
            out.push(':');
            out.push_str(value);
        }
    }
    Some(out)
}

/// Allowed values per metric key, per the CVSS v3.1 specification.
fn value_allowed(key: &str, value: &str) -> bool {
    let allowed: &[&str] = match key {
        "AV" | "MAV" => &["N", "A", "L", "P", "X"],
        "AC" | "MAC" => &["L", "H", "X"],
        "PR" | "MPR" => &["N", "L", "H", "X"],
        "UI" | "MUI" => &["N", "R", "X"],
        "S" | "MS" => &["U", "C", "X"],
        "C" | "I" | "A" | "MC" | "MI" | "MA" => &["H", "L", "N", "X"],
        "E" => &["X", "H", "F", "P", "U"],
        "RL" => &["X", "U", "W", "T", "O"],
        "RC" => &["X", "C", "R", "U"],
        "CR" | "IR" | "AR" => &["X", "H", "M", "L"],
        _ => return false,
    };
    // base metrics are mandatory and may not be undefined
    if matches!(key, "AV" | "AC" | "PR" | "UI" | "S" | "C" | "I" | "A") && value == "X" {
        return false;
    }
    allowed.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_vector_from_descriptor_text() {
        let vectors =
            parse_vectors("Base score 9.8 CVSS:3.0/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H end");
        assert_eq!(
            vectors,
            vec!["CVSS:3.0/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"]
        );
    }

    #[test]
    fn reorders_metrics_into_canonical_order() {
        let vectors = parse_vectors("CVSS:3.1/AC:L/AV:N/UI:N/PR:N/S:U/I:H/C:H/A:H");
        assert_eq!(
            vectors,
            vec!["CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"]
        );
    }

    #[test]
    fn drops_undefined_temporal_metrics() {
        let vectors = parse_vectors("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H/E:X/RL:O");
        assert_eq!(
            vectors,
            vec!["CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H/RL:O"]
        );
    }

    #[test]
    fn incomplete_base_metrics_rejected() {
        assert!(parse_vectors("CVSS:3.1/AV:N/AC:L/PR:N").is_empty());
    }

    #[test]
    fn invalid_metric_value_rejected() {
        assert!(parse_vectors("CVSS:3.1/AV:Q/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H").is_empty());
    }

    #[test]
    fn multiple_vectors_all_returned() {
        let text = "CVSS:3.0/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H then \
                    CVSS:3.1/AV:L/AC:H/PR:L/UI:R/S:C/C:L/I:L/A:N";
        assert_eq!(parse_vectors(text).len(), 2);
    }

    #[test]
    fn no_vector_in_text() {
        assert!(parse_vectors("no vector here").is_empty());
    }
}

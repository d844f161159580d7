//! Scan run context supplied by the host application.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque test/run context every produced finding is attached to.
///
/// The host owns the real scan record; parsers only need a stable id
/// and the scan type label for attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanContext {
    pub id: Uuid,
    pub scan_type: String,
}

impl ScanContext {
    pub fn new(scan_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            scan_type: scan_type.into(),
        }
    }
}

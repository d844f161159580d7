//! Normalization and import services.

pub mod cvss;
pub mod deduplication;
pub mod fingerprint;
pub mod html;
pub mod ingestion;

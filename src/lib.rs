//! Scanner-report normalization layer.
//!
//! Converts vendor-specific security-scanner reports (Acunetix XML,
//! Burp REST API JSON) into a normalized finding/endpoint model, with
//! fingerprint-based deduplication of findings within a single import:
//! Report Reader -> Field Mapper -> Dedup Reducer -> Finding list.

pub mod errors;
pub mod models;
pub mod parsers;
pub mod services;

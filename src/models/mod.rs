//! Normalized data model shared by all report parsers.

pub mod endpoint;
pub mod finding;
pub mod scan;

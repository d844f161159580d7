//! Typed errors for report parsing and import runs.
//!
//! Malformed input structure fails the whole run; unknown enumerated
//! values (severity, confidence) are recovered via documented defaults
//! inside the parsers and never surface here.

/// Error raised while parsing a scanner report.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("failed to read report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML report: {0}")]
    MalformedXml(#[from] quick_xml::DeError),

    #[error("malformed JSON report: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("unparseable report date: {0}")]
    InvalidDate(String),

    #[error("malformed CWE identifier: {0}")]
    InvalidCwe(String),

    #[error("unknown segment type in Burp data {0}")]
    UnknownSegment(String),

    #[error("invalid endpoint url {value}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid base64 evidence: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_segment_display() {
        let err = ParserError::UnknownSegment("OddSegment".to_string());
        assert_eq!(err.to_string(), "unknown segment type in Burp data OddSegment");
    }

    #[test]
    fn invalid_date_display() {
        let err = ParserError::InvalidDate("not-a-date".to_string());
        assert_eq!(err.to_string(), "unparseable report date: not-a-date");
    }

    #[test]
    fn parser_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ParserError = json_err.into();
        assert!(matches!(err, ParserError::MalformedJson(_)));
    }

    #[test]
    fn parser_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ParserError = io_err.into();
        assert!(matches!(err, ParserError::Io(_)));
    }
}

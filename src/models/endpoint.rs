//! Network endpoint model and URL splitting.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ParserError;

/// Placeholder scheme used to parse scheme-relative inputs. A parsed
/// scheme equal to this means the input carried no scheme at all.
const FALLBACK_SCHEME: &str = "noscheme";

/// A network location where a finding was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub protocol: Option<String>,
}

impl Endpoint {
    /// Build an endpoint from a full URI string (e.g. Burp origin + path).
    pub fn from_uri(uri: &str) -> Result<Self, ParserError> {
        let parsed = ParsedUrl::parse(uri)?;
        let path = {
            let p = parsed.path.trim();
            if p.is_empty() || p == "/" {
                None
            } else {
                Some(p.to_string())
            }
        };
        Ok(Self {
            host: parsed.host,
            port: parsed.port,
            path,
            protocol: parsed.scheme,
        })
    }
}

/// Scheme/host/port split of a URL-like string.
///
/// Inputs missing the scheme delimiter are corrected by prefixing `//`
/// before parsing, so `example.com/path` yields host `example.com` and
/// no scheme rather than a parse failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUrl {
    pub scheme: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
}

impl ParsedUrl {
    pub fn parse(value: &str) -> Result<Self, ParserError> {
        let corrected = if value.contains(':') {
            value.to_string()
        } else {
            format!("//{value}")
        };

        let base = Url::parse(&format!("{FALLBACK_SCHEME}://placeholder"))
            .map_err(|source| ParserError::InvalidUrl {
                value: value.to_string(),
                source,
            })?;
        let url = Url::options()
            .base_url(Some(&base))
            .parse(&corrected)
            .map_err(|source| ParserError::InvalidUrl {
                value: value.to_string(),
                source,
            })?;

        let scheme = match url.scheme() {
            FALLBACK_SCHEME | "" => None,
            s => Some(s.to_string()),
        };

        Ok(Self {
            scheme,
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port_or_known_default(),
            path: url.path().to_string(),
        })
    }
}

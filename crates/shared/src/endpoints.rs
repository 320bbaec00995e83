use std::fmt;

use thiserror::Error;
use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000";

const ANALYZE_PATH: &str = "analyze";
const REVISE_PATH: &str = "revise";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid service url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("service url '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Analyze and revise addresses derived from one service base URL.
///
/// The relay and the desktop client both build one of these, so the upstream
/// address is configured in exactly one place per process. A base that still
/// ends in `/analyze` (the older single-endpoint form) is cut back to its
/// parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    base: Url,
    analyze: Url,
    revise: Url,
}

impl ServiceEndpoints {
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let raw = raw.trim();
        let raw = if raw.is_empty() {
            DEFAULT_UPSTREAM_URL
        } else {
            raw
        };

        let mut base = Url::parse(raw).map_err(|source| EndpointError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme(raw.to_string()));
        }
        base.set_query(None);
        base.set_fragment(None);

        let path = base.path().trim_end_matches('/').to_string();
        let path = path
            .strip_suffix(&format!("/{ANALYZE_PATH}"))
            .unwrap_or(&path);
        base.set_path(&format!("{path}/"));

        let join = |segment: &str| {
            base.join(segment)
                .map_err(|source| EndpointError::InvalidUrl {
                    url: raw.to_string(),
                    source,
                })
        };
        let analyze = join(ANALYZE_PATH)?;
        let revise = join(REVISE_PATH)?;

        Ok(Self {
            base,
            analyze,
            revise,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn analyze_url(&self) -> &Url {
        &self.analyze
    }

    pub fn revise_url(&self) -> &Url {
        &self.revise
    }
}

impl fmt::Display for ServiceEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
#[path = "tests/endpoints_tests.rs"]
mod tests;

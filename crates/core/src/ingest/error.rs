use std::fmt;

/// Failure talking to the market-data provider: the request itself, a
/// non-success status, or a body that is not JSON. The underlying cause is
/// carried, never swallowed.
#[derive(Debug)]
pub enum FetchError {
    Network(reqwest::Error),
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    Json(serde_json::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(err) => write!(f, "provider request failed: {err}"),
            FetchError::Http { status, body } => {
                write!(f, "provider HTTP {status}: {body}")
            }
            FetchError::Json(err) => write!(f, "provider response is not valid JSON: {err}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Network(err) => Some(err),
            FetchError::Http { .. } => None,
            FetchError::Json(err) => Some(err),
        }
    }
}

/// Structurally invalid provider payload: a missing section, a missing
/// per-day field, or a field that does not parse as its declared type.
/// Normalization is all-or-nothing; this error means no batch was produced.
#[derive(Debug, Clone)]
pub struct MalformedResponseError {
    pub detail: String,
}

impl MalformedResponseError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for MalformedResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed provider response: {}", self.detail)
    }
}

impl std::error::Error for MalformedResponseError {}

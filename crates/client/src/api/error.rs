use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("API error: {status}{}", suffix(" - ", .detail.as_deref()))]
    Api { status: u16, detail: Option<String> },

    /// Server rejected the credentials (401/403).
    #[error("Unauthorized{}", suffix(": ", .detail.as_deref()))]
    Unauthorized { detail: Option<String> },

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

fn suffix(separator: &str, detail: Option<&str>) -> String {
    detail.map(|d| format!("{separator}{d}")).unwrap_or_default()
}

impl ApiError {
    /// The server's `detail` message, when it sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } | Self::Unauthorized { detail } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server's own words, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_owned()
    }

    /// HTTP status of a server rejection.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

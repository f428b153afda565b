use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Structured error body returned by the Okta API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error_code: String,
    #[serde(default)]
    pub error_summary: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (error code {})", self.error_summary, self.error_code)
    }
}

/// What a [`Error::NotFound`] failed to locate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Application,
    Role,
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => f.write_str("application"),
            Self::Role => f.write_str("role"),
        }
    }
}

/// Every failure is terminal for the current credential-retrieval flow.
#[derive(Debug, Error)]
pub enum Error {
    /// The provider rejected the username/password exchange.
    #[error("Authentication rejected: {0}")]
    AuthenticationRejected(ApiError),

    /// The provider rejected an application or role lookup.
    #[error("Entitlement lookup rejected: {0}")]
    EntitlementRejected(ApiError),

    #[error("No {kind} found matching '{name}'")]
    NotFound { kind: NotFoundKind, name: String },

    /// A provider response was missing a required field or was not valid JSON.
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("Malformed SAML assertion: {0}")]
    MalformedAssertion(String),

    #[error("Selection {index} is out of range ({len} entries available)")]
    OutOfRange { index: usize, len: usize },

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed_response(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

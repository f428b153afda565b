pub mod okta;

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

pub use self::okta::OktaClient;

/// Authenticated identity-provider user.
///
/// Created by [`OktaClient::authenticate`] and only read afterwards; it is
/// never written to disk.
#[derive(Clone)]
pub struct Session {
    user_id: String,
    login: Option<String>,
    status: String,
    session_token: Option<String>,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        login: Option<String>,
        status: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            login,
            status: status.into(),
            session_token,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    /// Okta transaction status (`SUCCESS`, `MFA_REQUIRED`, ...)
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Single-use session token exchanged for the federation document.
    pub fn one_time_token(&self) -> Result<&str> {
        self.session_token.as_deref().ok_or_else(|| {
            Error::malformed_response(
                "POST /authn",
                format!(
                    "no sessionToken in response (transaction status {})",
                    self.status
                ),
            )
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("login", &self.login)
            .field("status", &self.status)
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// AWS application the user is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationTarget {
    pub label: String,
    pub link_url: String,
    pub app_instance_id: String,
    pub app_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_one_time_token() {
        let session = Session::new("00u1", None, "SUCCESS", Some("tok".to_string()));
        assert_eq!(session.user_id(), "00u1");
        assert_eq!(session.one_time_token().unwrap(), "tok");
    }

    #[test]
    fn test_session_without_token() {
        let session = Session::new("00u1", None, "MFA_REQUIRED", None);
        let err = session.one_time_token().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert!(err.to_string().contains("MFA_REQUIRED"));
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::new("00u1", None, "SUCCESS", Some("secret-token".to_string()));
        let debug = format!("{session:?}");
        assert!(debug.contains("00u1"));
        assert!(!debug.contains("secret-token"));
    }
}

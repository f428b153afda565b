use reqwest::Method;
use tracing::{info, warn};

use super::OktaClient;
use super::models::{AuthnRequest, AuthnResponse};
use crate::error::{Error, Result};
use crate::idp::Session;

const AUTHN_SUCCESS: &str = "SUCCESS";

impl OktaClient {
    /// Exchange username and password for a session (`POST /authn`).
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        info!("Authenticating {} with Okta", username);

        let url = format!("{}/authn", self.base_url);
        let request = self
            .api_request(Method::POST, &url)
            .json(&AuthnRequest { username, password });

        let response: AuthnResponse = self
            .send_api(request, "POST /authn", Error::AuthenticationRejected)
            .await?;

        if response.status != AUTHN_SUCCESS {
            warn!(
                "Okta authentication finished with status {}; MFA and other challenges are not handled",
                response.status
            );
        }

        let user = response.embedded.user;
        info!("Authenticated as Okta user {}", user.id);

        Ok(Session::new(
            user.id,
            user.profile.and_then(|p| p.login),
            response.status,
            response.session_token,
        ))
    }
}

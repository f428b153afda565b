use tracing::{debug, info};

use super::OktaClient;
use crate::error::Result;
use crate::idp::{AuthorizationTarget, Session};
use crate::saml::{FederationDocument, SamlResponse};

impl OktaClient {
    /// Follow an app link with a one-time token (`GET {linkUrl}?onetimetoken=...`).
    ///
    /// The request carries no API key; the token alone authorises it.
    pub async fn fetch_federation_document(
        &self,
        link_url: &str,
        one_time_token: &str,
    ) -> Result<FederationDocument> {
        info!("Fetching SAML assertion from {}", link_url);

        let response = self
            .http_client
            .get(link_url)
            .query(&[("onetimetoken", one_time_token)])
            .send()
            .await?
            .error_for_status()?;

        let html = response.text().await?;
        debug!("Federation document is {} bytes", html.len());

        Ok(FederationDocument::new(html))
    }

    /// Fetch the federation document for `target` and extract its assertion.
    pub async fn fetch_assertion(
        &self,
        session: &Session,
        target: &AuthorizationTarget,
    ) -> Result<SamlResponse> {
        let document = self
            .fetch_federation_document(&target.link_url, session.one_time_token()?)
            .await?;
        SamlResponse::from_document(&document)
    }
}

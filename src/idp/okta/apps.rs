use reqwest::Method;
use tracing::{debug, info};

use super::OktaClient;
use super::models::{AppDetails, AppLink, AssignedApp};
use crate::constants::{APPS_PAGE_LIMIT, AWS_APP_NAME};
use crate::error::{Error, NotFoundKind, Result};
use crate::idp::{AuthorizationTarget, Session};
use crate::roles::RoleEntry;

impl OktaClient {
    /// AWS applications linked to the user, in the order Okta returns them.
    pub async fn list_targets(&self, session: &Session) -> Result<Vec<AuthorizationTarget>> {
        let url = format!("{}/users/{}/appLinks", self.base_url, session.user_id());
        let links: Vec<AppLink> = self
            .send_api(
                self.api_request(Method::GET, &url),
                "GET /users/{userId}/appLinks",
                Error::EntitlementRejected,
            )
            .await?;

        let total = links.len();
        let targets: Vec<AuthorizationTarget> = links
            .into_iter()
            .filter(|link| link.app_name == AWS_APP_NAME)
            .map(AuthorizationTarget::from)
            .collect();

        debug!("{} of {} app links are AWS applications", targets.len(), total);
        Ok(targets)
    }

    /// Roles (`samlRoles`) assigned to the user on the application labelled `label`.
    pub async fn list_roles(&self, session: &Session, label: &str) -> Result<Vec<RoleEntry>> {
        let user_id = session.user_id();
        let url = format!("{}/apps", self.base_url);
        let request = self.api_request(Method::GET, &url).query(&[
            ("filter", format!("user.id eq \"{user_id}\"")),
            ("expand", format!("user/{user_id}")),
            ("limit", APPS_PAGE_LIMIT.to_string()),
        ]);

        let apps: Vec<AssignedApp> = self
            .send_api(request, "GET /apps", Error::EntitlementRejected)
            .await?;

        let app = apps
            .iter()
            .find(|app| app.label == label)
            .ok_or_else(|| Error::NotFound {
                kind: NotFoundKind::Application,
                name: label.to_string(),
            })?;

        let roles = app.saml_roles().ok_or_else(|| {
            Error::malformed_response(
                "GET /apps",
                format!(
                    "application '{}' ({}) has no _embedded.user.profile.samlRoles",
                    app.label, app.id
                ),
            )
        })?;

        debug!("Application {} offers {} roles", app.id, roles.len());
        Ok(roles.iter().map(RoleEntry::new).collect())
    }

    /// The AWS application labelled exactly `label`.
    pub async fn resolve_target(
        &self,
        session: &Session,
        label: &str,
    ) -> Result<AuthorizationTarget> {
        self.list_targets(session)
            .await?
            .into_iter()
            .find(|target| target.label == label)
            .ok_or_else(|| Error::NotFound {
                kind: NotFoundKind::Application,
                name: label.to_string(),
            })
    }

    /// `settings.app.identityProviderArn` of an application instance
    pub async fn provider_arn(&self, app_instance_id: &str) -> Result<String> {
        let url = format!("{}/apps/{}", self.base_url, app_instance_id);
        let details: AppDetails = self
            .send_api(
                self.api_request(Method::GET, &url),
                "GET /apps/{appId}",
                Error::EntitlementRejected,
            )
            .await?;

        let arn = details.settings.app.identity_provider_arn.ok_or_else(|| {
            Error::malformed_response(
                "GET /apps/{appId}",
                format!("application {app_instance_id} has no settings.app.identityProviderArn"),
            )
        })?;

        info!("Identity provider ARN for {}: {}", app_instance_id, arn);
        Ok(arn)
    }
}

//! Okta API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::idp::AuthorizationTarget;

#[derive(Serialize)]
pub(crate) struct AuthnRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthnResponse {
    pub status: String,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(rename = "_embedded")]
    pub embedded: AuthnEmbedded,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthnEmbedded {
    pub user: AuthnUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthnUser {
    pub id: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserProfile {
    #[serde(default)]
    pub login: Option<String>,
}

/// Entry of `GET /users/{id}/appLinks`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppLink {
    pub label: String,
    pub link_url: String,
    pub app_name: String,
    pub app_instance_id: String,
}

impl From<AppLink> for AuthorizationTarget {
    fn from(link: AppLink) -> Self {
        Self {
            label: link.label,
            link_url: link.link_url,
            app_instance_id: link.app_instance_id,
            app_name: link.app_name,
        }
    }
}

/// Entry of `GET /apps?filter=...&expand=user/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct AssignedApp {
    pub id: String,
    pub label: String,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<AssignedAppEmbedded>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignedAppEmbedded {
    #[serde(default)]
    pub user: Option<AppUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppUser {
    #[serde(default)]
    pub profile: Option<AppUserProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppUserProfile {
    #[serde(default)]
    pub saml_roles: Option<Vec<String>>,
}

impl AssignedApp {
    pub fn saml_roles(&self) -> Option<&[String]> {
        self.embedded
            .as_ref()?
            .user
            .as_ref()?
            .profile
            .as_ref()?
            .saml_roles
            .as_deref()
    }
}

/// `GET /apps/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct AppDetails {
    pub settings: AppSettings,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppSettings {
    pub app: AppSettingsApp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppSettingsApp {
    #[serde(default)]
    pub identity_provider_arn: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authn_response() {
        let body = json!({
            "expiresAt": "2026-10-17T17:29:06.000Z",
            "status": "SUCCESS",
            "sessionToken": "20111Nq1",
            "_embedded": {
                "user": {
                    "id": "00ub0oNGTSWTBKOLGLNR",
                    "profile": { "login": "jane@example.com", "firstName": "Jane" }
                }
            }
        });
        let response: AuthnResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.status, "SUCCESS");
        assert_eq!(response.session_token.as_deref(), Some("20111Nq1"));
        assert_eq!(response.embedded.user.id, "00ub0oNGTSWTBKOLGLNR");
        assert_eq!(
            response.embedded.user.profile.unwrap().login.as_deref(),
            Some("jane@example.com")
        );
    }

    #[test]
    fn test_authn_response_without_user_is_rejected() {
        let body = json!({ "status": "SUCCESS", "_embedded": {} });
        let result = serde_json::from_value::<AuthnResponse>(body);
        assert!(result.unwrap_err().to_string().contains("user"));
    }

    #[test]
    fn test_assigned_app_roles() {
        let body = json!({
            "id": "0oa1",
            "label": "AWS Prod",
            "name": "amazon_aws",
            "_embedded": { "user": { "profile": { "samlRoles": ["Admin", "ReadOnly"] } } }
        });
        let app: AssignedApp = serde_json::from_value(body).unwrap();
        assert_eq!(app.saml_roles().unwrap(), ["Admin", "ReadOnly"]);
    }

    #[test]
    fn test_assigned_app_without_profile() {
        let body = json!({ "id": "0oa2", "label": "Slack", "name": "slack" });
        let app: AssignedApp = serde_json::from_value(body).unwrap();
        assert!(app.saml_roles().is_none());
    }

    #[test]
    fn test_app_details_provider_arn() {
        let body = json!({
            "id": "0oa1",
            "settings": {
                "app": {
                    "identityProviderArn": "arn:aws:iam::111:saml-provider/Okta",
                    "sessionDuration": 3600
                }
            }
        });
        let details: AppDetails = serde_json::from_value(body).unwrap();
        assert_eq!(
            details.settings.app.identity_provider_arn.as_deref(),
            Some("arn:aws:iam::111:saml-provider/Okta")
        );
    }
}

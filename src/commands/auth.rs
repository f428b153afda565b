use std::fmt;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use super::{choose, connect, login};
use crate::{
    error::Error,
    idp::{AuthorizationTarget, OktaClient, Session},
    roles::{self, RoleArnPair, RoleEntry},
    saml::SamlResponse,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct AuthCommand {
    #[arg(short = 'a', long, help = "Label of the AWS application in Okta")]
    pub app: Option<String>,

    #[arg(
        long,
        conflicts_with = "app",
        help = "Zero-based index of the AWS application, as listed by `apps`"
    )]
    pub app_index: Option<usize>,

    #[arg(short = 'r', long, help = "Role name to resolve in the SAML assertion")]
    pub role: Option<String>,

    #[arg(
        long,
        conflicts_with = "role",
        help = "Zero-based index of the role, as listed by `roles`"
    )]
    pub role_index: Option<usize>,

    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Role to look up in the assertion
#[derive(Debug, Clone, PartialEq, Eq)]
enum RoleChoice {
    /// Role ARN taken from a `provider,role` entry, matched exactly
    Arn(String),
    /// Name matched as a substring of the role ARN
    Name(String),
}

impl RoleChoice {
    fn from_entry(entry: &RoleEntry) -> Self {
        match entry.role_arn() {
            Some(arn) => Self::Arn(arn),
            None => Self::Name(entry.role_name().to_string()),
        }
    }

    fn resolve(&self, saml_response: &SamlResponse) -> crate::error::Result<RoleArnPair> {
        match self {
            Self::Arn(arn) => saml_response.find_role_arn(arn),
            Self::Name(name) => saml_response.find_role(name),
        }
    }
}

impl fmt::Display for RoleChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arn(value) | Self::Name(value) => f.write_str(value),
        }
    }
}

/// What the credential exchange needs, plus the app's configured provider ARN
#[derive(Debug, Serialize)]
pub struct AuthOutput {
    pub application: String,
    pub role_name: String,
    pub principal_arn: String,
    pub role_arn: String,
    pub identity_provider_arn: String,
    pub saml_assertion: String,
}

impl AuthOutput {
    fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize output")
            }
            OutputFormat::Text => Ok(format!(
                "Application:           {}\nRole:                  {}\nPrincipal ARN:         {}\nRole ARN:              {}\nIdentity provider ARN: {}\nSAML assertion:        {}",
                self.application,
                self.role_name,
                self.principal_arn,
                self.role_arn,
                self.identity_provider_arn,
                self.saml_assertion
            )),
        }
    }
}

impl AuthCommand {
    pub async fn execute(self, profile: &str) -> Result<()> {
        info!("Starting authentication for profile: {}", profile);

        let (config, client) = connect(profile).await?;
        let session = login(&client, &config).await?;

        let target = self
            .select_target(&client, &session, config.app.as_deref())
            .await?;
        info!("Using application: {}", target.label);

        let role = self
            .select_role(&client, &session, &target, config.role.as_deref())
            .await?;
        info!("Using role: {}", role);

        let identity_provider_arn = client
            .provider_arn(&target.app_instance_id)
            .await
            .context("Failed to look up the application's identity provider ARN")?;

        let saml_response = client
            .fetch_assertion(&session, &target)
            .await
            .context("Failed to retrieve SAML assertion")?;

        let pair: RoleArnPair = match role.resolve(&saml_response) {
            Ok(pair) => pair,
            Err(e @ Error::NotFound { .. }) => {
                let available = saml_response
                    .roles()
                    .unwrap_or_default()
                    .iter()
                    .map(|r| r.role_arn.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(e).with_context(|| {
                    format!("Roles present in the SAML assertion: {available}")
                });
            }
            Err(e) => return Err(e).context("Failed to read roles from SAML assertion"),
        };

        if pair.principal_arn != identity_provider_arn {
            warn!(
                "Principal ARN in assertion ({}) differs from the application's identity provider ARN ({})",
                pair.principal_arn, identity_provider_arn
            );
        }

        let output = AuthOutput {
            application: target.label,
            role_name: pair.role_name().to_string(),
            principal_arn: pair.principal_arn,
            role_arn: pair.role_arn,
            identity_provider_arn,
            saml_assertion: saml_response.as_base64().to_string(),
        };

        println!("{}", output.render(self.output)?);
        Ok(())
    }

    async fn select_target(
        &self,
        client: &OktaClient,
        session: &Session,
        configured_app: Option<&str>,
    ) -> Result<AuthorizationTarget> {
        // An explicit index overrides the profile's default app
        let label = match self.app_index {
            Some(_) => self.app.as_deref(),
            None => self.app.as_deref().or(configured_app),
        };
        if let Some(label) = label {
            return Ok(client.resolve_target(session, label).await?);
        }

        let targets = client
            .list_targets(session)
            .await
            .context("Failed to list AWS applications")?;

        let index = match self.app_index {
            Some(index) => index,
            None => {
                let labels: Vec<String> = targets.iter().map(|t| t.label.clone()).collect();
                choose("Pick an app", &labels)?
            }
        };

        Ok(roles::select(&targets, index)?.clone())
    }

    async fn select_role(
        &self,
        client: &OktaClient,
        session: &Session,
        target: &AuthorizationTarget,
        configured_role: Option<&str>,
    ) -> Result<RoleChoice> {
        let role = match self.role_index {
            Some(_) => self.role.as_deref(),
            None => self.role.as_deref().or(configured_role),
        };
        if let Some(role) = role {
            return Ok(RoleChoice::Name(role.to_string()));
        }

        let entries = client
            .list_roles(session, &target.label)
            .await
            .with_context(|| format!("Failed to list roles for '{}'", target.label))?;

        let index = match self.role_index {
            Some(index) => index,
            None => {
                let displays: Vec<String> = entries.iter().map(|e| e.display.clone()).collect();
                choose("Pick a role", &displays)?
            }
        };

        Ok(RoleChoice::from_entry(roles::select(&entries, index)?))
    }
}

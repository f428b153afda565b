pub mod apps;
pub mod auth;
pub mod completions;
pub mod configure;
pub mod roles;

pub use apps::AppsCommand;
pub use auth::{AuthCommand, OutputFormat};
pub use completions::CompletionsCommand;
pub use configure::ConfigureCommand;
pub use roles::RolesCommand;

use anyhow::{Context, Result, bail};
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::config::{self, Config};
use crate::idp::{OktaClient, Session};
use crate::roles::select;

/// Load the profile and build an Okta client from it.
pub(crate) async fn connect(profile: &str) -> Result<(Config, OktaClient)> {
    let config = config::load(profile).await.with_context(|| {
        format!("Failed to load configuration for profile '{profile}'. Please run 'okta-saml-broker configure' first.")
    })?;

    let client = OktaClient::new(
        &config.okta_base_url,
        &config.okta_api_key,
        config.request_timeout(),
    )
    .context("Failed to create Okta client")?;

    Ok((config, client))
}

/// Authenticate with the configured username, prompting for anything missing.
pub(crate) async fn login(client: &OktaClient, config: &Config) -> Result<Session> {
    let theme = ColorfulTheme::default();

    let username = if config.username.is_empty() {
        Input::<String>::with_theme(&theme)
            .with_prompt("Okta username")
            .interact_text()
            .context("Failed to read username")?
    } else {
        config.username.clone()
    };

    let password = match config::password_from_env() {
        Some(password) => password,
        None => Password::with_theme(&theme)
            .with_prompt(format!("Okta password for {username}"))
            .interact()
            .context("Failed to read password")?,
    };

    client
        .authenticate(&username, &password)
        .await
        .context("Okta authentication failed")
}

/// Ask the user to pick one of `items`; returns a validated index.
pub(crate) fn choose(prompt: &str, items: &[String]) -> Result<usize> {
    if items.is_empty() {
        bail!("Nothing to choose from for: {prompt}");
    }

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .with_context(|| format!("Failed to read selection for: {prompt}"))?;

    select(items, index)?;
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_from_nothing_fails() {
        let error = choose("Pick a role", &[]).unwrap_err();
        assert!(error.to_string().contains("Pick a role"));
    }

    #[test]
    fn test_role_selection_and_roles_command_coexist() {
        let items = vec!["AWS Prod".to_string(), "AWS Dev".to_string()];
        assert_eq!(select(&items, 1).unwrap(), "AWS Dev");
        assert!(select(&items, 2).is_err());

        let command = RolesCommand { app: None };
        assert!(command.app.is_none());
    }
}

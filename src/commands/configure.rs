use anyhow::Result;
use clap::Args;

use crate::config::{self, Config};

#[derive(Debug, Clone, Args)]
pub struct ConfigureCommand {
    #[arg(long, help = "Print the current profile instead of editing it")]
    pub show: bool,
}

impl ConfigureCommand {
    pub async fn execute(self, profile: &str) -> Result<()> {
        if self.show {
            let config = config::load(profile).await?;
            println!("{}", describe(profile, &config));
            return Ok(());
        }
        config::configure_interactive(profile).await
    }
}

fn describe(profile: &str, config: &Config) -> String {
    format!(
        "[{profile}]\nokta_base_url = {}\nokta_api_key = {}\nusername = {}\napp = {}\nrole = {}\nrequest_timeout_seconds = {}",
        config.okta_base_url,
        mask(&config.okta_api_key),
        config.username,
        config.app.as_deref().unwrap_or(""),
        config.role.as_deref().unwrap_or(""),
        config.request_timeout_seconds
    )
}

/// Keep the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

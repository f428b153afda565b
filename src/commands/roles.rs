use anyhow::{Context, Result, bail};
use clap::Args;

use super::{connect, login};

#[derive(Debug, Clone, Args)]
pub struct RolesCommand {
    #[arg(short = 'a', long, help = "Label of the AWS application in Okta")]
    pub app: Option<String>,
}

impl RolesCommand {
    pub async fn execute(self, profile: &str) -> Result<()> {
        let (config, client) = connect(profile).await?;

        let Some(app) = self.app.or(config.app.clone()) else {
            bail!("No application given. Pass --app or set `app` in profile '{profile}'");
        };

        let session = login(&client, &config).await?;
        let entries = client
            .list_roles(&session, &app)
            .await
            .with_context(|| format!("Failed to list roles for '{app}'"))?;

        if entries.is_empty() {
            println!("No roles are assigned on '{app}'.");
        }
        for (index, entry) in entries.iter().enumerate() {
            println!("[{index}] {entry}");
        }

        Ok(())
    }
}

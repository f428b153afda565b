use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::{connect, login};

#[derive(Debug, Clone, Args)]
pub struct AppsCommand {}

impl AppsCommand {
    pub async fn execute(self, profile: &str) -> Result<()> {
        let (config, client) = connect(profile).await?;
        let session = login(&client, &config).await?;

        let targets = client
            .list_targets(&session)
            .await
            .context("Failed to list AWS applications")?;
        info!("{} AWS applications assigned", targets.len());

        if targets.is_empty() {
            println!("No AWS applications are assigned to this user.");
        }
        for (index, target) in targets.iter().enumerate() {
            println!("[{index}] {}", target.label);
        }

        Ok(())
    }
}

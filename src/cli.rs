use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{AppsCommand, AuthCommand, CompletionsCommand, ConfigureCommand, RolesCommand};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "okta-saml-broker",
    version,
    about = "Resolve AWS role ARNs and SAML assertions through the Okta API",
    long_about = None
)]
pub struct Cli {
    #[arg(
        short = 'p',
        long,
        global = true,
        default_value = "default",
        help = "Configuration profile name"
    )]
    pub profile: String,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Authenticate and resolve the role ARN pair and SAML assertion")]
    Auth(AuthCommand),
    #[command(about = "List the AWS applications assigned to the user")]
    Apps(AppsCommand),
    #[command(about = "List the roles the user holds on an AWS application")]
    Roles(RolesCommand),
    #[command(about = "Configure Okta connection settings")]
    Configure(ConfigureCommand),
    #[command(about = "Generate shell completion scripts")]
    Completions(CompletionsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let profile = self.profile;
        let command = self
            .command
            .unwrap_or_else(|| Commands::Auth(AuthCommand::default()));

        match command {
            Commands::Auth(cmd) => cmd.execute(&profile).await,
            Commands::Apps(cmd) => cmd.execute(&profile).await,
            Commands::Roles(cmd) => cmd.execute(&profile).await,
            Commands::Configure(cmd) => cmd.execute(&profile).await,
            Commands::Completions(cmd) => {
                cmd.execute();
                Ok(())
            }
        }
    }
}

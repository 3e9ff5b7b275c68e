use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Manage app settings for Azure Static Web Apps
    Secret {
        #[command(subcommand)]
        action: SecretCommand,
    },
    /// Create a resource in Azure
    #[command(alias = "c")]
    Create {
        #[command(subcommand)]
        resource: CreateCommand,
    },
}

#[derive(Subcommand)]
pub enum SecretCommand {
    /// Set one or more settings, merging with what is already deployed
    Set {
        /// Settings to apply
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
        /// Name of the static site
        #[arg(long, short = 'n')]
        name: String,
        /// Azure resource group
        #[arg(long, short = 'r')]
        resource_group: String,
    },
}

#[derive(Subcommand)]
pub enum CreateCommand {
    /// Create a Static Web App and deploy an application from GitHub to it
    Static {
        /// Name of the static site
        #[arg(long, short = 'n')]
        name: String,
        /// Azure resource group
        #[arg(long, short = 'r')]
        resource_group: String,
        /// Source GitHub repository URL
        #[arg(long, short = 's')]
        source: String,
        /// Branch name
        #[arg(long, short = 'b', default_value = "main")]
        branch: String,
    },
}

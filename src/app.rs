use std::process::Command as ProcessCommand;

use colored::Colorize;

use crate::auth::ClientSecretCredential;
use crate::command::{Command, CreateCommand, SecretCommand};
use crate::config::{Config, ResourceIdentifier};
use crate::error::Error;
use crate::settings::{self, ManagementClient, SettingsMap};

/// Print a dimmed status message (for progress steps)
fn status(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a success message with checkmark
fn success(msg: &str) {
    println!("\n{} {}", "✓".green(), msg.green());
}

#[derive(Default)]
pub struct App;

impl App {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, cmd: Command) -> Result<(), Error> {
        match cmd {
            Command::Secret { action } => match action {
                SecretCommand::Set {
                    pairs,
                    name,
                    resource_group,
                } => self.set_secrets(&pairs, &name, &resource_group),
            },
            Command::Create { resource } => match resource {
                CreateCommand::Static {
                    name,
                    resource_group,
                    source,
                    branch,
                } => self.create_static_site(&name, &resource_group, &source, &branch),
            },
        }
    }

    // Merge the new settings with what is already deployed, then upload the
    // full set. The arguments are validated before anything touches the
    // network.
    fn set_secrets(&self, pairs: &[String], name: &str, resource_group: &str) -> Result<(), Error> {
        let updates = parse_pairs(pairs)?;
        let config = Config::from_env()?;
        let site =
            ResourceIdentifier::new(config.subscription_id.clone(), resource_group, name)?;
        let credential = ClientSecretCredential::new(&config);
        let client = ManagementClient::new();

        status(&format!("Updating app settings for '{}'...", site.site_name));
        settings::sync_settings(&credential, &client, &site, updates)?;

        success("Secrets set successfully");
        Ok(())
    }

    fn create_static_site(
        &self,
        name: &str,
        resource_group: &str,
        source: &str,
        branch: &str,
    ) -> Result<(), Error> {
        println!(
            "\n{}",
            format!("Creating Azure Static Web App '{}'", name).bold()
        );

        status(&format!("Deploying from {} ({})...", source, branch));
        let az = ProcessCommand::new("az")
            .args([
                "staticwebapp",
                "create",
                "--name",
                name,
                "--source",
                source,
                "--resource-group",
                resource_group,
                "--branch",
                branch,
                "--login-with-github",
            ])
            .status()?;
        if !az.success() {
            return Err(Error::Provision(
                "az staticwebapp create failed".to_string(),
            ));
        }

        success("Azure Static Web App created successfully");
        Ok(())
    }
}

/// Split KEY=VALUE arguments on the first '='. A pair with no '=' or an
/// empty key is rejected here, before any network call is attempted.
fn parse_pairs(pairs: &[String]) -> Result<SettingsMap, Error> {
    let mut secrets = SettingsMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| Error::Input(format!("invalid key-value pair: {}", pair)))?;
        secrets.insert(key.to_string(), value.to_string());
    }
    Ok(secrets)
}

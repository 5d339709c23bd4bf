use crate::config;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Csvql config controls.
#[derive(Clone, Debug, Args)]
#[command(name = "config")]
pub struct Config {
    #[command(subcommand)]
    action: ConfigSubcommands,
}

#[derive(Clone, Debug, Subcommand)]
enum ConfigSubcommands {
    /// Show the resolved configuration.
    Show,
}

impl Config {
    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        match self.action {
            ConfigSubcommands::Show => {
                let cfg = config::load(config)?;
                let rendered =
                    toml::to_string_pretty(&cfg).context("error serializing configuration")?;
                println!("{rendered}");
                Ok(())
            }
        }
    }
}

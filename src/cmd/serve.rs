use crate::config::{self, Configuration, rt::RtcServe};
use crate::serve::ServeSystem;
use anyhow::Result;
use clap::Args;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Load the CSV tables and serve the query dashboard.
#[derive(Clone, Debug, Args)]
#[command(name = "serve")]
#[command(next_help_heading = "Serve")]
pub struct Serve {
    /// The directory holding the CSV tables
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// The address to serve on
    #[arg(long)]
    pub address: Option<IpAddr>,

    /// The port to serve on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Open a browser tab once the tables are loaded
    #[arg(long)]
    pub open: bool,
}

impl Serve {
    /// Apply CLI overrides to the configuration.
    fn apply_to(self, mut config: Configuration) -> Configuration {
        let Self {
            data,
            address,
            port,
            open,
        } = self;

        config.core.data = data.or(config.core.data);
        config.serve.address = address.or(config.serve.address);
        config.serve.port = port.or(config.serve.port);
        config.serve.open = open || config.serve.open;
        config
    }

    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        let cfg = self.apply_to(config::load(config)?);
        let rtc = Arc::new(RtcServe::new(&cfg));

        let (shutdown_tx, _) = broadcast::channel(1);
        let ctrl_c_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("received ctrl-c");
                let _ = ctrl_c_tx.send(());
            }
        });

        let system = ServeSystem::new(rtc, shutdown_tx)?;
        system.run().await
    }
}

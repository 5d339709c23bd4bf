#![deny(clippy::unwrap_used)]

mod client;
mod cmd;
mod common;
mod config;
mod database;
mod page;
mod serve;
mod sql;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use common::STARTING;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Csvql::parse();

    tracing_subscriber::registry()
        // Filter spans based on the RUST_LOG env var.
        .with(eval_logging(&cli))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        // Install this registry as the global tracing registry.
        .try_init()
        .context("error initializing logging")?;

    tracing::info!(
        "{} Starting {} {}",
        STARTING,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    cli.run().await
}

fn eval_logging(cli: &Csvql) -> tracing_subscriber::EnvFilter {
    let directives = match (cli.verbose, cli.quiet) {
        // quiet overrides verbose
        (_, true) => "error,csvql=warn",
        // increase verbosity
        (0, false) => "error,csvql=info",
        (1, false) => "error,csvql=debug",
        (_, false) => "error,csvql=trace",
    };
    tracing_subscriber::EnvFilter::new(directives)
}

/// Query CSV files with SQL from a browser dashboard.
#[derive(Parser)]
#[command(about, author, version)]
struct Csvql {
    #[command(subcommand)]
    action: CsvqlSubcommands,
    /// Path to the csvql config file [default: csvql.toml]
    #[arg(long, env = "CSVQL_CONFIG", global(true))]
    pub config: Option<PathBuf>,
    /// Enable verbose logging.
    #[arg(short, long, global(true), action=ArgAction::Count)]
    pub verbose: u8,
    /// Be more quiet, conflicts with --verbose
    #[arg(short, long, global(true), conflicts_with("verbose"))]
    pub quiet: bool,
}

impl Csvql {
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn run(self) -> Result<()> {
        match self.action {
            CsvqlSubcommands::Serve(inner) => inner.run(self.config).await,
            CsvqlSubcommands::Query(inner) => inner.run(self.config).await,
            CsvqlSubcommands::Fetch(inner) => inner.run(self.config).await,
            CsvqlSubcommands::Config(inner) => inner.run(self.config).await,
        }
    }
}

#[derive(Subcommand)]
enum CsvqlSubcommands {
    /// Load the CSV tables and serve the query dashboard.
    Serve(cmd::serve::Serve),
    /// Run a query against the local tables and print the result.
    Query(cmd::query::Query),
    /// Send a query to a running server and render the dashboard page.
    Fetch(cmd::fetch::Fetch),
    /// Csvql config controls.
    Config(cmd::config::Config),
}

use crate::client::Client;
use crate::common::ERROR;
use crate::config::{self, rt::RtcServe};
use crate::page::{Page, PageError, RESULT};
use crate::sql::Reply;
use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

/// Send a query to a running server and render the dashboard page.
#[derive(Clone, Debug, Args)]
#[command(name = "fetch")]
#[command(next_help_heading = "Fetch")]
pub struct Fetch {
    /// The SQL query to send
    pub query: String,

    /// The base URL of the server [default: derived from the serve config]
    #[arg(long)]
    pub base: Option<String>,
}

impl Fetch {
    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        let cfg = config::load(config)?;
        let base = self
            .base
            .unwrap_or_else(|| RtcServe::new(&cfg).http_addr());

        let client = Client::new(base)?;
        let reply = client.send(&self.query).await?;

        // Print the page even when the reply carried no result: the
        // messages table holds the engine diagnostics the user needs.
        let (page, applied) = render(&reply);
        println!("{}", page.to_html());
        if let Err(err) = applied {
            bail!("{} {err}", ERROR);
        }
        if let Ok(result) = page.element(RESULT) {
            tracing::debug!("rendered {} row(s)", result.row_count());
        }
        Ok(())
    }
}

/// Apply a reply to a fresh dashboard page. The page comes back alongside
/// the outcome, so a partial render survives an error reply.
fn render(reply: &Reply) -> (Page, Result<(), PageError>) {
    let mut page = Page::default();
    let applied = page.apply(reply);
    (page, applied)
}

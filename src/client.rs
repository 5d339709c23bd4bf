//! HTTP client for a running csvql server.
//!
//! Every call issues a fresh request and returns the decoded reply to the
//! caller, so concurrent queries cannot stomp each other's responses.

use crate::sql::Reply;
use anyhow::{Context, Result, ensure};
use url::Url;

/// A client for the query endpoint of a csvql server.
pub struct Client {
    client: reqwest::Client,
    base: String,
}

impl Client {
    /// Construct a new instance against the given base URL.
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .http1_only()
            .build()
            .context("error building query client")?;
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Ok(Self { client, base })
    }

    /// The request URL for a query: the base with the query appended as the
    /// path. `url` takes care of encoding characters a raw path cannot
    /// carry, so `send("foo")` targets exactly `<base>/foo`.
    pub fn request_url(&self, query: &str) -> Result<Url> {
        Url::parse(&format!("{}/{}", self.base, query))
            .with_context(|| format!("error building request URL for query {query:?}"))
    }

    /// Send a query and await its reply.
    pub async fn send(&self, query: &str) -> Result<Reply> {
        tracing::debug!(query, "sending query");
        let url = self.request_url(query)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("error requesting {url}"))?;
        ensure!(
            response.status().is_success(),
            "server answered {} for {url}",
            response.status()
        );
        response
            .json::<Reply>()
            .await
            .context("error decoding reply body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_BASE: &str = "http://localhost:8080";

    #[test]
    fn plain_query_url_is_exact() {
        let client = Client::new(DEFAULT_BASE).expect("client");
        let url = client.request_url("foo").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/foo");
    }

    #[test]
    fn trailing_slash_base_does_not_double() {
        let client = Client::new("http://localhost:8080/").expect("client");
        let url = client.request_url("foo").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/foo");
    }

    #[test]
    fn spaces_are_encoded_for_the_wire() {
        let client = Client::new(DEFAULT_BASE).expect("client");
        let url = client.request_url("select * from pets").expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/select%20*%20from%20pets"
        );
    }
}

use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use resolver_dashboard::view::Snapshot;

#[derive(Clone)]
pub(crate) struct StatusClient {
    client: reqwest::Client,
    url: String,
}

impl StatusClient {
    pub(crate) fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build status client")?;
        Ok(Self { client, url })
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Status request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Status feed {} failed ({})",
                self.url,
                response.status()
            ));
        }

        response.json().await.context("Invalid status payload")
    }
}

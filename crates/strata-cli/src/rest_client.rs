//! Minimal HTTP client for the broker API.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    /// `broker` is a bare `host:port`, as passed on the command line.
    pub fn new(broker: &str) -> Self {
        Self {
            base_url: format!("http://{broker}"),
            client: Client::new(),
        }
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("failed to send GET request")?;

        Self::into_json(response).await
    }

    pub async fn post<T: Serialize, R: DeserializeOwned>(&self, path: &str, body: &T) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .context("failed to send POST request")?;

        Self::into_json(response).await
    }

    async fn into_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {}: {}", status.as_u16(), error_text);
        }
        response
            .json()
            .await
            .context("failed to parse JSON response")
    }
}

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Endpoint, QueriesResponse, SessionsResponse};
use crate::config::Target;
use crate::error::FetchError;

/// Thin HTTP client for the coordinators' JSON debug pages.
///
/// One instance is built at startup and shared by every scrape. Idle
/// connections are never pooled, so each poll opens and closes its own
/// connection. There are no retries: a failed request simply means no
/// metrics from that endpoint for this scrape.
#[derive(Debug, Clone)]
pub struct ImpalaClient {
    http: reqwest::Client,
}

impl ImpalaClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { http })
    }

    pub async fn sessions(&self, target: &Target) -> Result<SessionsResponse, FetchError> {
        self.fetch(target, Endpoint::Sessions).await
    }

    pub async fn queries(&self, target: &Target) -> Result<QueriesResponse, FetchError> {
        self.fetch(target, Endpoint::Queries).await
    }

    /// `GET http://<target>/<endpoint>?json`, decoded into `T`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        target: &Target,
        endpoint: Endpoint,
    ) -> Result<T, FetchError> {
        let url = format!("http://{target}/{}?json", endpoint.path());

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;
        debug!(%url, bytes = body.len(), "fetched");

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

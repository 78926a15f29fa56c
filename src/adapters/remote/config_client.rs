use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::ConfigSourcePort;
use crate::domain::{
    config::ObserverConfig,
    errors::{DomainError, DomainResult},
};

/// Fetches the feed locations from the sensor host's `/config` endpoint.
pub struct HttpConfigSource {
    client: reqwest::Client,
    url: String,
}

impl HttpConfigSource {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl ConfigSourcePort for HttpConfigSource {
    async fn fetch(&self) -> DomainResult<ObserverConfig> {
        let res = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(DomainError::OperationFailed(format!("Failed to fetch config: {}", status)));
        }

        let body = res.text().await.map_err(|e| DomainError::Transport(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

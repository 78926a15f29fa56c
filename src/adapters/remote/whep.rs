use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::application::ports::SignalingPort;
use crate::domain::errors::{DomainError, DomainResult};

/// WHEP offer/answer against the media server: the offer goes out as the
/// request body, the answer comes back as the response body.
pub struct WhepSignaling {
    client: reqwest::Client,
    endpoint: String,
}

impl WhepSignaling {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, endpoint: endpoint.into() }
    }
}

#[async_trait]
impl SignalingPort for WhepSignaling {
    async fn exchange(&self, offer_sdp: &str) -> DomainResult<String> {
        let res = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/sdp")
            .body(offer_sdp.to_owned())
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(DomainError::Negotiation(format!("WHEP request failed: {}", status.as_u16())));
        }
        res.text().await.map_err(|e| DomainError::Transport(e.to_string()))
    }
}

//! Profile enrichment: fetches a raw public profile (e.g. LinkedIn) from an
//! external enrichment API so the client can map it into an import request.
//! The payload is passed through untouched.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait ProfileEnricher: Send + Sync {
    async fn fetch_profile(&self, profile_url: &str) -> Result<Value, AppError>;
}

/// Enrichment endpoint and key, both from configuration.
#[derive(Debug, Clone)]
pub struct EnrichmentEndpoint {
    pub url: String,
    pub api_key: String,
}

#[derive(Clone)]
pub struct HttpProfileEnricher {
    client: Client,
    endpoint: Option<EnrichmentEndpoint>,
}

impl HttpProfileEnricher {
    /// `endpoint = None` disables enrichment; calls then fail with `NotImplemented`.
    pub fn new(client: Client, endpoint: Option<EnrichmentEndpoint>) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl ProfileEnricher for HttpProfileEnricher {
    async fn fetch_profile(&self, profile_url: &str) -> Result<Value, AppError> {
        let endpoint = self.endpoint.as_ref().ok_or(AppError::NotImplemented)?;

        if !profile_url.starts_with("https://") {
            return Err(AppError::Validation(
                "profile_url must be an https URL".to_string(),
            ));
        }

        let response = self
            .client
            .get(&endpoint.url)
            .query(&[("apikey", endpoint.api_key.as_str()), ("linkedinUrl", profile_url)])
            .send()
            .await
            .map_err(|e| AppError::Enrichment(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Enrichment(format!(
                "Enrichment API returned {status}"
            )));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Enrichment(format!("Malformed payload: {e}")))?;

        info!("Fetched enrichment profile for {profile_url}");
        Ok(payload)
    }
}

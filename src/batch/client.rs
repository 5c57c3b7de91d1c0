// src/batch/client.rs
use anyhow::{anyhow, bail, Context, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::api::responses::{
    ErrorResponse, FeaturesResponse, HealthResponse, PredictRequest, PredictResponse,
};

/// Thin HTTP client for a running prediction API.
#[derive(Clone)]
pub struct RiskApiClient {
    client: Client,
    base_url: Url,
}

impl RiskApiClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(api_url).with_context(|| format!("Invalid API URL '{}'", api_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("API URL must use http or https, got '{}'", base_url.scheme());
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path '{}'", path))
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(self.endpoint("/health")?)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .with_context(|| format!("Cannot connect to API at {}", self.base_url))?;
        if response.status() != StatusCode::OK {
            bail!("API returned status {}", response.status());
        }
        response
            .json::<HealthResponse>()
            .await
            .context("Malformed health response")
    }

    pub async fn features(&self) -> Result<FeaturesResponse> {
        let response = self.client.get(self.endpoint("/features")?).send().await?;
        if response.status() != StatusCode::OK {
            bail!("Could not fetch feature names (status {})", response.status());
        }
        response
            .json::<FeaturesResponse>()
            .await
            .context("Malformed features response")
    }

    /// Non-2xx responses become errors carrying the server's `detail` text.
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse> {
        let response = self
            .client
            .post(self.endpoint("/predict")?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<PredictResponse>()
                .await
                .context("Malformed prediction response");
        }

        let detail = match response.json::<ErrorResponse>().await {
            Ok(body) => body.detail,
            Err(_) => "Unknown error".to_string(),
        };
        debug!("Prediction rejected with {}: {}", status, detail);
        Err(anyhow!(detail))
    }
}

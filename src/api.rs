use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::plan::{PlanRequest, PlanResponse};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Everything that can go wrong talking to the diet backend. Each variant
/// is shown to the user as-is; recovery is a manual resubmit.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("kunde inte nå backend: {0}")]
    Network(#[source] reqwest::Error),
    #[error("backend svarade med status {0}")]
    BadStatus(StatusCode),
    #[error("backend skickade ett ogiltigt svar: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

#[derive(Clone)]
pub struct PlanClient {
    client: Client,
    base_url: String,
}

impl PlanClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One request, one response. No retries and no caching; the caller
    /// decides whether to resubmit.
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<PlanResponse, ApiError> {
        let url = format!("{}/generate_plan", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus(status));
        }

        let body = response.text().await.map_err(ApiError::Network)?;
        decode_plan(&body)
    }
}

/// Typed decode is the validation at the trust boundary: a body that does
/// not match the plan shape is rejected instead of read field-by-field.
fn decode_plan(body: &str) -> Result<PlanResponse, ApiError> {
    serde_json::from_str(body).map_err(ApiError::MalformedPayload)
}

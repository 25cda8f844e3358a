//! Transports that deliver prediction requests to the classifier.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::inference::types::{InferenceError, PredictionRequest, PredictionResponse};

/// Classifier endpoint used when the config does not override it.
pub const DEFAULT_ENDPOINT: &str = "https://lab02-ml-flask.onrender.com/predict";

/// Abstraction over how a prediction request reaches the classifier.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn send(&self, request: &PredictionRequest)
    -> Result<PredictionResponse, InferenceError>;
}

/// JSON-over-HTTP transport: one POST per request, no retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Builds a transport for `endpoint`.
    ///
    /// # Arguments
    /// * `endpoint` - Absolute `http`/`https` URL of the predict route
    /// * `connect_timeout` - Upper bound on establishing the connection
    pub fn new(endpoint: &str, connect_timeout: Duration) -> Result<Self, InferenceError> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Parses and checks an endpoint URL.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, InferenceError> {
    let url = Url::parse(endpoint).map_err(|e| InferenceError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(InferenceError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn send(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, InferenceError> {
        log::debug!(
            "POST {} (feature_type={})",
            self.endpoint,
            request.feature_type
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| InferenceError::InvalidResponse(e.to_string()))
    }
}

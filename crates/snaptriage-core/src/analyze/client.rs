use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument, warn};

use crate::consts::{ANALYSIS_FALLBACK_MESSAGE, DEFAULT_API_URL};
use crate::error::{Result, TriageError};
use crate::payload::ImagePayload;
use crate::reduce::{reduce_image_async, ReduceParams};

use super::health::{ping, ping_reported, HealthStatus};
use super::types::AnalysisResponse;

/// Remote classification of a single image.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Classify `original`, uploading `reduced` instead when it is supplied.
    async fn analyze(
        &self,
        original: &ImagePayload,
        reduced: Option<&ImagePayload>,
    ) -> Result<AnalysisResponse>;
}

/// Client for the `POST {api_url}/analyze` endpoint.
pub struct HttpAnalyzer {
    client: reqwest::Client,
    api_url: String,
    reduce: ReduceParams,
}

impl HttpAnalyzer {
    pub fn new(api_url: impl Into<String>, reduce: ReduceParams) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TriageError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, api_url, reduce))
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>, reduce: ReduceParams) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            reduce,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    /// `GET {api_url}/health` with the same HTTP client.
    pub async fn health(&self) -> HealthStatus {
        ping(&self.client, &self.api_url).await
    }

    /// [`Self::health`], passing every state it goes through to `report`.
    pub async fn health_reported(&self, report: impl FnMut(&HealthStatus)) -> HealthStatus {
        ping_reported(&self.client, &self.api_url, report).await
    }
}

impl Default for HttpAnalyzer {
    fn default() -> Self {
        Self::with_client(reqwest::Client::new(), DEFAULT_API_URL, ReduceParams::default())
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    #[instrument(skip_all, fields(name = original.name()))]
    async fn analyze(
        &self,
        original: &ImagePayload,
        reduced: Option<&ImagePayload>,
    ) -> Result<AnalysisResponse> {
        let upload = match reduced {
            Some(reduced) => reduced.clone(),
            None => reduce_image_async(original.clone(), self.reduce.clone()).await?,
        };
        debug!(bytes = upload.len(), media_type = upload.media_type(), "Uploading");

        let part = Part::bytes(upload.bytes().to_vec())
            .file_name(upload.name().to_string())
            .mime_str(upload.media_type())
            .map_err(|e| TriageError::AnalysisFailed(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("analyze"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TriageError::AnalysisFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TriageError::AnalysisFailed(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Analyze request rejected");
            let message = if body.trim().is_empty() {
                ANALYSIS_FALLBACK_MESSAGE.to_string()
            } else {
                body
            };
            return Err(TriageError::AnalysisFailed(message));
        }

        let parsed = serde_json::from_str(&body)
            .map_err(|e| TriageError::AnalysisFailed(format!("Invalid analyze response: {e}")))?;
        Ok(AnalysisResponse::new(parsed))
    }
}

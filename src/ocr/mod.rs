use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::config::OcrConfig;

/// External OCR text extractor.
///
/// Total contract: any failure yields an empty string, never an error, so
/// downstream scoring always has a defined input.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &Path) -> String;
}

/// Extractor used when OCR is unconfigured.
pub struct NoopExtractor;

#[async_trait]
impl TextExtractor for NoopExtractor {
    async fn extract_text(&self, _image: &Path) -> String {
        String::new()
    }
}

/// Azure AI Vision Read client: submit the image, then poll the returned
/// operation until it settles.
pub struct AzureReadClient {
    endpoint: String,
    api_key: String,
    client: Client,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl AzureReadClient {
    pub fn new(config: &OcrConfig, endpoint: String, api_key: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
            poll_attempts: config.poll_attempts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    async fn read(&self, image: &Path) -> Result<String, OcrError> {
        let bytes = tokio::fs::read(image).await.map_err(OcrError::Io)?;

        let resp = self
            .client
            .post(format!("{}/vision/v3.2/read/analyze", self.endpoint))
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(OcrError::Http)?;

        let operation = resp
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .ok_or(OcrError::MissingOperationLocation)?
            .to_string();

        for _ in 0..self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let status: Value = self
                .client
                .get(&operation)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .send()
                .await
                .map_err(OcrError::Http)?
                .json()
                .await
                .map_err(OcrError::Http)?;

            match status["status"].as_str() {
                Some("succeeded") => return Ok(collect_text(&status)),
                Some("failed") => return Err(OcrError::ReadFailed),
                _ => {}
            }
        }

        Err(OcrError::Timeout)
    }
}

#[async_trait]
impl TextExtractor for AzureReadClient {
    async fn extract_text(&self, image: &Path) -> String {
        match self.read(image).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("OCR extraction failed, continuing without image text: {e}");
                String::new()
            }
        }
    }
}

/// Join recognized lines with spaces and pages with newlines.
fn collect_text(result: &Value) -> String {
    let Some(pages) = result["analyzeResult"]["readResults"].as_array() else {
        return String::new();
    };
    pages
        .iter()
        .map(|page| {
            page["lines"]
                .as_array()
                .map(|lines| {
                    lines
                        .iter()
                        .filter_map(|line| line["text"].as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// OCR collaborator failure, absorbed before it reaches the engine.
#[derive(Debug)]
pub enum OcrError {
    Io(std::io::Error),
    Http(reqwest::Error),
    MissingOperationLocation,
    ReadFailed,
    Timeout,
}

impl std::fmt::Display for OcrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrError::Io(e) => write!(f, "IO error: {e}"),
            OcrError::Http(e) => write!(f, "HTTP error: {e}"),
            OcrError::MissingOperationLocation => write!(f, "missing operation-location header"),
            OcrError::ReadFailed => write!(f, "read operation reported failure"),
            OcrError::Timeout => write!(f, "read operation did not settle in time"),
        }
    }
}

impl std::error::Error for OcrError {}

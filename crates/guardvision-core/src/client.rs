//! HTTP client for the GuardVision API.
//!
//! Used by the terminal front end and the batch controller. Failures are
//! unwrapped from the server's `{"error": ...}` envelope so callers see the
//! vendor's message verbatim.

use crate::error::ClientError;
use crate::types::{
    AnalysisMode, AnalysisProvider, DetectionResult, OcrProvider, StatusReport, TerminologyEntry,
};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use crate::vendor::strip_data_uri_prefix;

/// 1×1 transparent PNG used by [`ApiClient::test_connection`].
const PROBE_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[derive(Serialize)]
struct OcrPayload<'a> {
    image: &'a str,
    provider: OcrProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Deserialize)]
struct OcrReply {
    text: String,
}

#[derive(Serialize)]
struct AnalyzePayload<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    provider: AnalysisProvider,
    terminology: &'a [TerminologyEntry],
    mode: AnalysisMode,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Client for `/api/ocr`, `/api/analyze` and `/api/test`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Extract text from a base64 image.
    ///
    /// `language` is a hint for vendors that take one (Baidu's `language_type`).
    pub async fn perform_ocr(
        &self,
        image: &str,
        provider: OcrProvider,
        language: Option<&str>,
    ) -> Result<String, ClientError> {
        let payload = OcrPayload {
            image,
            provider,
            language,
        };
        let reply: OcrReply = self.post("/api/ocr", &payload, "OCR request failed").await?;
        Ok(reply.text)
    }

    /// Analyse OCR text together with the image it came from.
    pub async fn analyze_image(
        &self,
        text: &str,
        image: &str,
        provider: AnalysisProvider,
        terminology: &[TerminologyEntry],
    ) -> Result<DetectionResult, ClientError> {
        self.analyze(text, Some(image), provider, terminology, AnalysisMode::Image)
            .await
    }

    /// Analyse typed-in copy.
    pub async fn analyze_text(
        &self,
        text: &str,
        provider: AnalysisProvider,
        terminology: &[TerminologyEntry],
    ) -> Result<DetectionResult, ClientError> {
        self.analyze(text, None, provider, terminology, AnalysisMode::Text)
            .await
    }

    async fn analyze(
        &self,
        text: &str,
        image: Option<&str>,
        provider: AnalysisProvider,
        terminology: &[TerminologyEntry],
        mode: AnalysisMode,
    ) -> Result<DetectionResult, ClientError> {
        let payload = AnalyzePayload {
            text,
            image,
            provider,
            terminology,
            mode,
        };
        self.post("/api/analyze", &payload, "Analysis request failed")
            .await
    }

    /// Whether an OCR provider answers a 1×1 image without failing.
    pub async fn test_connection(&self, provider: OcrProvider) -> bool {
        match self.perform_ocr(PROBE_PNG, provider, None).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(provider = %provider, error = %e, "Connection test failed");
                false
            }
        }
    }

    /// Fetch `GET /api/test`.
    pub async fn service_status(&self) -> Result<StatusReport, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/test", self.base_url))
            .send()
            .await?;
        Self::decode(resp, "Status request failed").await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::decode(resp, fallback).await
    }

    async fn decode<T: DeserializeOwned>(
        resp: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ClientError> {
        if !resp.status().is_success() {
            let message = resp
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| fallback.to_string());
            return Err(ClientError::Api(message));
        }
        Ok(resp.json::<T>().await?)
    }
}

/// Read a file and return its contents as plain base64 (no data-URI prefix).
pub async fn file_to_base64(path: &Path) -> Result<String, ClientError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ClientError::File {
            path: path.display().to_string(),
            source,
        })?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

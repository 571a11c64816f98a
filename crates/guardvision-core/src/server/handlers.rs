use super::{ApiError, AppState};
use crate::analysis::AnalysisRequest;
use crate::ocr::OcrRequest;
use crate::types::{AnalysisMode, AnalysisProvider, DetectionResult, OcrProvider, TerminologyEntry};
use crate::vendor::{strip_data_uri_prefix, ImageInput};
use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(super) struct OcrBody {
    image: String,
    provider: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct OcrReply {
    text: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeBody {
    text: String,
    #[serde(default)]
    image: Option<String>,
    provider: String,
    #[serde(default)]
    terminology: Vec<TerminologyEntry>,
    #[serde(default)]
    mode: AnalysisMode,
}

/// `POST /api/ocr`
pub(super) async fn ocr(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<OcrReply>, ApiError> {
    // Parsed by hand so a bad body gets the `{error}` envelope, not axum's rejection
    let body: OcrBody = serde_json::from_slice(&body)?;
    let provider: OcrProvider = body.provider.parse()?;
    tracing::info!(provider = %provider, "OCR request");

    let request = OcrRequest {
        image: ImageInput::from_base64(strip_data_uri_prefix(&body.image)),
        language: body.language,
    };
    let engine = state.vendors.ocr_engine(provider);
    let text = engine.recognize(&request).await.map_err(|e| {
        tracing::warn!(provider = %provider, error = %e, "OCR failed");
        e
    })?;

    Ok(Json(OcrReply { text }))
}

/// `POST /api/analyze`
pub(super) async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DetectionResult>, ApiError> {
    let body: AnalyzeBody = serde_json::from_slice(&body)?;
    let provider: AnalysisProvider = body.provider.parse()?;
    tracing::info!(
        provider = %provider,
        mode = %body.mode,
        terms = body.terminology.len(),
        "Analysis request"
    );

    let request = AnalysisRequest {
        text: body.text,
        image: body
            .image
            .as_deref()
            .filter(|img| !img.is_empty())
            .map(|img| ImageInput::from_base64(strip_data_uri_prefix(img))),
        terminology: body.terminology,
        mode: body.mode,
    };
    let analyzer = state.vendors.analyzer(provider);
    let result = analyzer.analyze(&request).await.map_err(|e| {
        tracing::warn!(provider = %provider, error = %e, "Analysis failed");
        e
    })?;

    for anomaly in result.anomalies() {
        tracing::warn!(provider = %provider, "Vendor result out of contract: {anomaly}");
    }
    tracing::debug!(
        provider = %provider,
        issues = result.errors.len(),
        score = result.score,
        "Analysis complete"
    );

    Ok(Json(result))
}

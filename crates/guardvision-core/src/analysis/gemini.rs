//! Gemini analysis with a JSON response schema.

use super::{parse_strict, AnalysisRequest, Analyzer, PromptBuilder};
use crate::config::GeminiConfig;
use crate::error::{Stage, VendorResult};
use crate::types::DetectionResult;
use crate::vendor::gemini::{generate_url, Content, GenerateRequest, GenerateResponse, Part};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;
use serde_json::json;

const VENDOR: &str = "Gemini";

pub struct GeminiAnalyzer {
    api_key: String,
    url: String,
    prompt: PromptBuilder,
    client: reqwest::Client,
}

impl GeminiAnalyzer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        config: &GeminiConfig,
        prompt: PromptBuilder,
    ) -> Self {
        Self {
            api_key,
            url: generate_url(&config.endpoint, &config.analysis_model),
            prompt,
            client,
        }
    }
}

/// `generationConfig` forcing a JSON reply in the `DetectionResult` shape.
fn generation_config() -> serde_json::Value {
    json!({
        "temperature": 0.7,
        "maxOutputTokens": 8192,
        "responseMimeType": "application/json",
        "responseSchema": {
            "type": "object",
            "properties": {
                "originalText": {"type": "string"},
                "isProfessional": {"type": "boolean"},
                "score": {"type": "number"},
                "errors": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "text": {"type": "string"},
                            "type": {"type": "string", "enum": ["spelling", "grammar", "terminology", "style"]},
                            "suggestion": {"type": "string"},
                            "alternatives": {"type": "array", "items": {"type": "string"}},
                            "explanation": {"type": "string"},
                            "location": {"type": "array", "items": {"type": "number"}}
                        },
                        "required": ["text", "type", "suggestion", "alternatives", "explanation", "location"]
                    }
                }
            },
            "required": ["originalText", "isProfessional", "score", "errors"]
        }
    })
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn analyze(&self, request: &AnalysisRequest) -> VendorResult<DetectionResult> {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = request.attached_image() {
            parts.push(Part::image(image));
        }
        parts.push(Part::Text(self.prompt.render(request)));

        let body = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: Some(generation_config()),
        };

        let resp: GenerateResponse = send_json(
            self.client
                .post(&self.url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body),
            VENDOR,
            Stage::Analyze,
        )
        .await?;

        let text = require_text(resp.into_first_text(), Stage::Analyze)?;
        parse_strict(VENDOR, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{image_request, result_json, text_request};
    use crate::vendor::mock::MockVendor;

    fn analyzer(mock: &MockVendor) -> GeminiAnalyzer {
        let config = GeminiConfig {
            endpoint: mock.base_url.clone(),
            ..GeminiConfig::default()
        };
        GeminiAnalyzer::new(reqwest::Client::new(), "g".into(), &config, PromptBuilder::default())
    }

    fn wrap(text: String) -> serde_json::Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    #[tokio::test]
    async fn test_analyze_image_mode() {
        let mock = MockVendor::json(wrap(result_json().to_string())).await;
        let result = analyzer(&mock).analyze(&image_request("waterproof camra")).await.unwrap();
        assert_eq!(result.errors.len(), 3);
        assert!(!result.is_professional);

        let sent = &mock.requests()[0];
        assert_eq!(sent.path, "/models/gemini-1.5-pro:generateContent");
        let body = sent.json();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].get("inline_data").is_some());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["originalText", "isProfessional", "score", "errors"])
        );
    }

    #[tokio::test]
    async fn test_analyze_text_mode_sends_no_image() {
        let mock = MockVendor::json(wrap(result_json().to_string())).await;
        analyzer(&mock).analyze(&text_request("copy")).await.unwrap();
        let body = mock.requests()[0].json();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0]["text"].as_str().unwrap().contains("Marketing copy to analyse"));
    }

    #[tokio::test]
    async fn test_analyze_missing_text_is_empty_response() {
        let mock = MockVendor::json(json!({"candidates": [{"content": {"parts": []}}]})).await;
        let err = analyzer(&mock).analyze(&text_request("copy")).await.unwrap_err();
        assert_eq!(err.to_string(), "Analysis returned empty response");
    }

    #[tokio::test]
    async fn test_analyze_http_failure() {
        let mock = MockVendor::respond(429, "{}").await;
        let err = analyzer(&mock).analyze(&text_request("copy")).await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini analyze failed: Too Many Requests");
        assert_eq!(err.status_code(), Some(429));
    }
}

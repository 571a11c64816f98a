//! Gemini OCR via `generateContent` with an inline image part.

use super::{OcrEngine, OcrRequest, OCR_INSTRUCTION};
use crate::config::GeminiConfig;
use crate::error::{Stage, VendorResult};
use crate::vendor::gemini::{generate_url, Content, GenerateRequest, GenerateResponse, Part};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;

const VENDOR: &str = "Gemini";

pub struct GeminiOcr {
    api_key: String,
    url: String,
    client: reqwest::Client,
}

impl GeminiOcr {
    pub fn new(client: reqwest::Client, api_key: String, config: &GeminiConfig) -> Self {
        Self {
            api_key,
            url: generate_url(&config.endpoint, &config.ocr_model),
            client,
        }
    }
}

#[async_trait]
impl OcrEngine for GeminiOcr {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn recognize(&self, request: &OcrRequest) -> VendorResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::image(&request.image),
                    Part::Text(OCR_INSTRUCTION.to_string()),
                ],
            }],
            generation_config: None,
        };

        let resp: GenerateResponse = send_json(
            self.client
                .post(&self.url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body),
            VENDOR,
            Stage::Ocr,
        )
        .await?;

        require_text(resp.into_first_text(), Stage::Ocr)
    }
}

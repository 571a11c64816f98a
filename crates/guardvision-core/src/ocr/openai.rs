//! OpenAI Vision OCR using the Chat Completions API.

use super::{OcrEngine, OcrRequest, OCR_INSTRUCTION};
use crate::config::OpenAiConfig;
use crate::error::{Stage, VendorResult};
use crate::vendor::chat::{ChatContent, ChatMessage, ChatRequest, ChatResponse};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;

const VENDOR: &str = "OpenAI";

pub struct OpenAiOcr {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl OpenAiOcr {
    pub fn new(client: reqwest::Client, api_key: String, config: &OpenAiConfig) -> Self {
        Self {
            api_key,
            model: config.vision_model.clone(),
            endpoint: config.endpoint.clone(),
            client,
        }
    }
}

#[async_trait]
impl OcrEngine for OpenAiOcr {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn recognize(&self, request: &OcrRequest) -> VendorResult<String> {
        let body = ChatRequest::new(
            &self.model,
            vec![ChatMessage::user(ChatContent::with_optional_image(
                OCR_INSTRUCTION,
                Some(&request.image),
                None,
            ))],
        )
        .max_tokens(4096);

        let resp: ChatResponse = send_json(
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body),
            VENDOR,
            Stage::Ocr,
        )
        .await?;

        require_text(resp.into_first_content(), Stage::Ocr)
    }
}

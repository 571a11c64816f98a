//! OpenAI analysis in JSON-object mode.

use super::{parse_strict, AnalysisRequest, Analyzer, PromptBuilder, SYSTEM_ROLE};
use crate::config::OpenAiConfig;
use crate::error::{Stage, VendorResult};
use crate::types::{AnalysisMode, DetectionResult};
use crate::vendor::chat::{ChatContent, ChatMessage, ChatRequest, ChatResponse};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;

const VENDOR: &str = "OpenAI";

pub struct OpenAiAnalyzer {
    api_key: String,
    endpoint: String,
    vision_model: String,
    text_model: String,
    prompt: PromptBuilder,
    client: reqwest::Client,
}

impl OpenAiAnalyzer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        config: &OpenAiConfig,
        prompt: PromptBuilder,
    ) -> Self {
        Self {
            api_key,
            endpoint: config.endpoint.clone(),
            vision_model: config.vision_model.clone(),
            text_model: config.text_model.clone(),
            prompt,
            client,
        }
    }
}

#[async_trait]
impl Analyzer for OpenAiAnalyzer {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn analyze(&self, request: &AnalysisRequest) -> VendorResult<DetectionResult> {
        let model = match request.mode {
            AnalysisMode::Image => &self.vision_model,
            AnalysisMode::Text => &self.text_model,
        };
        let prompt = self.prompt.render(request);
        let body = ChatRequest::new(
            model,
            vec![
                ChatMessage::system(SYSTEM_ROLE),
                ChatMessage::user(ChatContent::with_optional_image(
                    &prompt,
                    request.attached_image(),
                    Some("high"),
                )),
            ],
        )
        .json_object()
        .max_tokens(4096);

        let resp: ChatResponse = send_json(
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body),
            VENDOR,
            Stage::Analyze,
        )
        .await?;

        let text = require_text(resp.into_first_content(), Stage::Analyze)?;
        parse_strict(VENDOR, &text)
    }
}

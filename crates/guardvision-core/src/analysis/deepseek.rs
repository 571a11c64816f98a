//! DeepSeek analysis (text-only model, JSON-object mode).

use super::{parse_strict, AnalysisRequest, Analyzer, PromptBuilder, SYSTEM_ROLE};
use crate::config::DeepSeekConfig;
use crate::error::{Stage, VendorResult};
use crate::types::DetectionResult;
use crate::vendor::chat::{ChatContent, ChatMessage, ChatRequest, ChatResponse};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;

const VENDOR: &str = "DeepSeek";

pub struct DeepSeekAnalyzer {
    api_key: String,
    endpoint: String,
    model: String,
    prompt: PromptBuilder,
    client: reqwest::Client,
}

impl DeepSeekAnalyzer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        config: &DeepSeekConfig,
        prompt: PromptBuilder,
    ) -> Self {
        Self {
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            prompt,
            client,
        }
    }
}

#[async_trait]
impl Analyzer for DeepSeekAnalyzer {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn analyze(&self, request: &AnalysisRequest) -> VendorResult<DetectionResult> {
        if request.attached_image().is_some() {
            tracing::debug!(vendor = VENDOR, "Model is text-only; image not sent");
        }

        let body = ChatRequest::new(
            &self.model,
            vec![
                ChatMessage::system(SYSTEM_ROLE),
                ChatMessage::user(ChatContent::Text(self.prompt.render(request))),
            ],
        )
        .json_object();

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

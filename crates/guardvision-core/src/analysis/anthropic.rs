//! Claude analysis via the Anthropic Messages API.
//!
//! Claude has no JSON mode, so the reply is free text and the result object
//! is extracted from it.

use super::{parse_embedded, AnalysisRequest, Analyzer, PromptBuilder};
use crate::config::AnthropicConfig;
use crate::error::{Stage, VendorResult};
use crate::types::DetectionResult;
use crate::vendor::{require_text, send_json, ImageInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const VENDOR: &str = "Claude";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicAnalyzer {
    api_key: String,
    endpoint: String,
    model: String,
    prompt: PromptBuilder,
    client: reqwest::Client,
}

impl AnthropicAnalyzer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        config: &AnthropicConfig,
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

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<Block<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Block<'a> {
    Image { source: ImageSource<'a> },
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

impl<'a> Block<'a> {
    fn image(image: &'a ImageInput) -> Self {
        Block::Image {
            source: ImageSource {
                kind: "base64",
                media_type: &image.media_type,
                data: &image.data,
            },
        }
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    text: Option<String>,
}

#[async_trait]
impl Analyzer for AnthropicAnalyzer {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn analyze(&self, request: &AnalysisRequest) -> VendorResult<DetectionResult> {
        let mut content = Vec::with_capacity(2);
        if let Some(image) = request.attached_image() {
            content.push(Block::image(image));
        }
        content.push(Block::Text {
            text: self.prompt.render(request),
        });

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: 4096,
            messages: vec![Message {
                role: "user",
                content,
            }],
        };

        let resp: MessagesResponse = send_json(
            self.client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body),
            VENDOR,
            Stage::Analyze,
        )
        .await?;

        let text = require_text(
            resp.content.into_iter().next().and_then(|b| b.text),
            Stage::Analyze,
        )?;
        parse_embedded(VENDOR, &text)
    }
}

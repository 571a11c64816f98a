//! Qwen analysis via DashScope multimodal generation.

use super::{parse_embedded, AnalysisRequest, Analyzer, PromptBuilder, SYSTEM_ROLE};
use crate::config::QwenConfig;
use crate::error::{Stage, VendorResult};
use crate::types::{AnalysisMode, DetectionResult};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const VENDOR: &str = "Qwen";

pub struct QwenAnalyzer {
    api_key: String,
    endpoint: String,
    vision_model: String,
    text_model: String,
    prompt: PromptBuilder,
    client: reqwest::Client,
}

impl QwenAnalyzer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        config: &QwenConfig,
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

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: Input,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Input {
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentItem {
    Image { image: String },
    Text { text: String },
}

#[derive(Serialize)]
struct Parameters {
    result_format: &'static str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    output: Option<Output>,
}

#[derive(Deserialize)]
struct Output {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<ResponseContent>,
}

/// Multimodal models answer with `[{"text": ...}]`, text models with a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResponseContent {
    Text(String),
    Items(Vec<ResponseItem>),
}

#[derive(Deserialize)]
struct ResponseItem {
    text: Option<String>,
}

impl GenerationResponse {
    fn into_first_text(self) -> Option<String> {
        let content = self.output?.choices.into_iter().next()?.message.content?;
        match content {
            ResponseContent::Text(text) => Some(text),
            ResponseContent::Items(items) => items.into_iter().find_map(|item| item.text),
        }
    }
}

#[async_trait]
impl Analyzer for QwenAnalyzer {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn analyze(&self, request: &AnalysisRequest) -> VendorResult<DetectionResult> {
        let prompt = self.prompt.render(request);
        let content = match request.attached_image() {
            Some(image) => MessageContent::Items(vec![
                ContentItem::Image {
                    image: image.data_url(),
                },
                ContentItem::Text { text: prompt },
            ]),
            None => MessageContent::Text(prompt),
        };
        let model = match request.mode {
            AnalysisMode::Image => &self.vision_model,
            AnalysisMode::Text => &self.text_model,
        };

        let body = GenerationRequest {
            model,
            input: Input {
                messages: vec![
                    Message {
                        role: "system",
                        content: MessageContent::Text(SYSTEM_ROLE.to_string()),
                    },
                    Message {
                        role: "user",
                        content,
                    },
                ],
            },
            parameters: Parameters {
                result_format: "message",
            },
        };

        let resp: GenerationResponse = send_json(
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body),
            VENDOR,
            Stage::Analyze,
        )
        .await?;

        let text = require_text(resp.into_first_text(), Stage::Analyze)?;
        parse_embedded(VENDOR, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{image_request, result_json, text_request};
    use crate::vendor::mock::MockVendor;
    use serde_json::json;

    async fn setup(content: serde_json::Value) -> (MockVendor, QwenAnalyzer) {
        let mock = MockVendor::json(json!({
            "output": {"choices": [{"message": {"role": "assistant", "content": content}}]}
        }))
        .await;
        let config = QwenConfig {
            endpoint: mock.base_url.clone(),
            ..QwenConfig::default()
        };
        let analyzer =
            QwenAnalyzer::new(reqwest::Client::new(), "dash".into(), &config, PromptBuilder::default());
        (mock, analyzer)
    }

    #[tokio::test]
    async fn test_image_mode_item_array() {
        let reply = format!("Analysis complete. {} Thanks.", result_json());
        let (mock, analyzer) = setup(json!([{"text": reply}])).await;
        let result = analyzer.analyze(&image_request("x")).await.unwrap();
        assert_eq!(result.errors.len(), 3);

        let body = mock.requests()[0].json();
        assert_eq!(body["model"], "qwen-vl-max");
        assert_eq!(body["parameters"]["result_format"], "message");
        assert_eq!(body["input"]["messages"][0]["role"], "system");
        let content = &body["input"]["messages"][1]["content"];
        assert_eq!(content[0]["type"], "image");
        assert!(content[0]["image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
        assert!(content[0].get("text").is_none());
        assert_eq!(content[1]["type"], "text");
        assert!(content[1]["text"].is_string());
    }

    #[tokio::test]
    async fn test_text_mode_plain_string_content() {
        let (mock, analyzer) = setup(json!(result_json().to_string())).await;
        let result = analyzer.analyze(&text_request("copy")).await.unwrap();
        assert_eq!(result.errors.len(), 3);

        let body = mock.requests()[0].json();
        assert_eq!(body["model"], "qwen-max");
        assert!(body["input"]["messages"][1]["content"].is_string());
    }

    #[tokio::test]
    async fn test_reply_without_json() {
        let (_mock, analyzer) = setup(json!([{"text": "No issues to report."}])).await;
        let err = analyzer.analyze(&text_request("copy")).await.unwrap_err();
        assert_eq!(err.to_string(), "No valid JSON found in response");
    }

    #[tokio::test]
    async fn test_missing_output() {
        let mock = MockVendor::json(json!({"code": "InvalidParameter"})).await;
        let config = QwenConfig {
            endpoint: mock.base_url.clone(),
            ..QwenConfig::default()
        };
        let analyzer =
            QwenAnalyzer::new(reqwest::Client::new(), "k".into(), &config, PromptBuilder::default());
        let err = analyzer.analyze(&text_request("copy")).await.unwrap_err();
        assert_eq!(err.to_string(), "Analysis returned empty response");
    }
}

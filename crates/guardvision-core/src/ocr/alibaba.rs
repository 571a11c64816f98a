//! Alibaba Cloud OCR (APPCODE authentication).

use super::{OcrEngine, OcrRequest};
use crate::config::AlibabaConfig;
use crate::error::{Stage, VendorResult};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const VENDOR: &str = "Alibaba";

pub struct AlibabaOcr {
    app_code: String,
    endpoint: String,
    client: reqwest::Client,
}

impl AlibabaOcr {
    pub fn new(client: reqwest::Client, app_code: String, config: &AlibabaConfig) -> Self {
        Self {
            app_code,
            endpoint: config.endpoint.clone(),
            client,
        }
    }
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    image: &'a str,
    configure: Configure,
}

#[derive(Serialize)]
struct Configure {
    min_size: u32,
    output_prob: bool,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(rename = "prism_wordsInfo")]
    prism_words_info: Option<Vec<WordInfo>>,
}

#[derive(Deserialize)]
struct WordInfo {
    word: String,
}

#[async_trait]
impl OcrEngine for AlibabaOcr {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn recognize(&self, request: &OcrRequest) -> VendorResult<String> {
        let body = RecognizeRequest {
            image: &request.image.data,
            configure: Configure {
                min_size: 16,
                output_prob: false,
            },
        };

        let resp: RecognizeResponse = send_json(
            self.client
                .post(&self.endpoint)
                .header("Authorization", format!("APPCODE {}", self.app_code))
                .json(&body),
            VENDOR,
            Stage::Ocr,
        )
        .await?;

        let joined = resp.prism_words_info.map(|words| {
            words
                .into_iter()
                .map(|w| w.word)
                .collect::<Vec<_>>()
                .join("\n")
        });
        require_text(joined, Stage::Ocr)
    }
}

//! Baidu AI Cloud general OCR.
//!
//! Two calls per image: exchange the key pair for an OAuth access token, then
//! post the image as a form field to the general-text endpoint. Tokens are
//! not cached between requests.

use super::{OcrEngine, OcrRequest};
use crate::config::BaiduConfig;
use crate::error::{Stage, VendorError, VendorResult};
use crate::vendor::{require_text, send_json};
use async_trait::async_trait;
use serde::Deserialize;

const VENDOR: &str = "Baidu";

pub struct BaiduOcr {
    api_key: String,
    secret_key: String,
    token_endpoint: String,
    ocr_endpoint: String,
    client: reqwest::Client,
}

impl BaiduOcr {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        secret_key: String,
        config: &BaiduConfig,
    ) -> Self {
        Self {
            api_key,
            secret_key,
            token_endpoint: config.token_endpoint.clone(),
            ocr_endpoint: config.ocr_endpoint.clone(),
            client,
        }
    }

    /// Exchange the API key pair for an access token.
    pub async fn access_token(&self) -> VendorResult<String> {
        let resp: TokenResponse = send_json(
            self.client.post(&self.token_endpoint).query(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.secret_key.as_str()),
            ]),
            VENDOR,
            Stage::Ocr,
        )
        .await?;

        match resp.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(VendorError::Auth {
                vendor: VENDOR,
                message: resp
                    .error_description
                    .unwrap_or_else(|| "no access_token in response".to_string()),
            }),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct OcrResponse {
    words_result: Option<Vec<WordsResult>>,
    error_msg: Option<String>,
}

#[derive(Deserialize)]
struct WordsResult {
    words: String,
}

#[async_trait]
impl OcrEngine for BaiduOcr {
    fn name(&self) -> &str {
        VENDOR
    }

    async fn recognize(&self, request: &OcrRequest) -> VendorResult<String> {
        let token = self.access_token().await?;

        let mut form = vec![("image", request.image.data.as_str())];
        if let Some(language) = request.language.as_deref() {
            form.push(("language_type", language));
        }

        let resp: OcrResponse = send_json(
            self.client
                .post(&self.ocr_endpoint)
                .query(&[("access_token", token.as_str())])
                .form(&form),
            VENDOR,
            Stage::Ocr,
        )
        .await?;

        // Baidu reports API-level failures with HTTP 200 and an error_msg
        if let Some(msg) = &resp.error_msg {
            tracing::warn!(vendor = VENDOR, error = %msg, "OCR call rejected");
        }

        let joined = resp.words_result.map(|words| {
            words
                .into_iter()
                .map(|w| w.words)
                .collect::<Vec<_>>()
                .join("\n")
        });
        require_text(joined, Stage::Ocr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::mock::MockVendor;
    use crate::vendor::ImageInput;
    use serde_json::json;

    fn engine(mock: &MockVendor) -> BaiduOcr {
        let config = BaiduConfig {
            token_endpoint: mock.url("/oauth/2.0/token"),
            ocr_endpoint: mock.url("/rest/2.0/ocr/v1/general_basic"),
            ..BaiduConfig::default()
        };
        BaiduOcr::new(reqwest::Client::new(), "ak".into(), "sk".into(), &config)
    }

    #[tokio::test]
    async fn test_two_call_flow_joins_lines() {
        let mock = MockVendor::with_routes(vec![
            ("/oauth/2.0/token", 200, json!({"access_token": "tok-1", "expires_in": 2592000}).to_string()),
            (
                "/rest/2.0/ocr/v1/general_basic",
                200,
                json!({"words_result_num": 2, "words_result": [{"words": "4K"}, {"words": "IK10"}]})
                    .to_string(),
            ),
        ])
        .await;

        let mut request = OcrRequest::new(ImageInput::from_base64("iVBORw0KGgo+/AAAA=="));
        request.language = Some("CHN_ENG".into());
        let text = engine(&mock).recognize(&request).await.unwrap();
        assert_eq!(text, "4K\nIK10");

        let sent = mock.requests();
        assert_eq!(sent.len(), 2);
        let token_query = sent[0].query.clone().unwrap();
        assert!(token_query.contains("grant_type=client_credentials"));
        assert!(token_query.contains("client_id=ak"));
        assert!(token_query.contains("client_secret=sk"));
        assert_eq!(sent[1].query.as_deref(), Some("access_token=tok-1"));
        assert_eq!(
            sent[1].header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        // Form encoding escapes '+', '/' and '='
        let form = sent[1].text();
        assert!(form.starts_with("image=iVBORw0KGgo%2B%2FAAAA%3D%3D"));
        assert!(form.contains("language_type=CHN_ENG"));
    }

    #[tokio::test]
    async fn test_missing_token_is_auth_error() {
        let mock = MockVendor::json(json!({
            "error": "invalid_client",
            "error_description": "unknown client id"
        }))
        .await;
        let err = engine(&mock)
            .recognize(&OcrRequest::new(ImageInput::from_base64("AAAA")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Baidu authentication failed: unknown client id");
        // The OCR endpoint is never called without a token
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_api_error_body_is_empty_response() {
        let mock = MockVendor::with_routes(vec![
            ("/oauth/2.0/token", 200, json!({"access_token": "tok"}).to_string()),
            (
                "/rest/2.0/ocr/v1/general_basic",
                200,
                json!({"error_code": 216201, "error_msg": "image format error"}).to_string(),
            ),
        ])
        .await;
        let err = engine(&mock)
            .recognize(&OcrRequest::new(ImageInput::from_base64("AAAA")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "OCR returned empty response");
    }

    #[tokio::test]
    async fn test_ocr_http_failure() {
        let mock = MockVendor::with_routes(vec![
            ("/oauth/2.0/token", 200, json!({"access_token": "tok"}).to_string()),
            ("/rest/2.0/ocr/v1/general_basic", 502, String::new()),
        ])
        .await;
        let err = engine(&mock)
            .recognize(&OcrRequest::new(ImageInput::from_base64("AAAA")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Baidu OCR failed: Bad Gateway");
    }
}

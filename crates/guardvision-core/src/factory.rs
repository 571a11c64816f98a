//! Maps provider identifiers to vendor adapters.
//!
//! Credentials are looked up from configuration each time an adapter is
//! built and handed to its constructor; nothing is cached between requests.

use crate::analysis::{
    Analyzer, AnthropicAnalyzer, DeepSeekAnalyzer, DoubaoAnalyzer, GeminiAnalyzer, OpenAiAnalyzer,
    PromptBuilder, QwenAnalyzer,
};
use crate::config::Config;
use crate::ocr::{AlibabaOcr, BaiduOcr, DoubaoOcr, GeminiOcr, OcrEngine, OpenAiOcr};
use crate::types::{AnalysisProvider, OcrProvider};
use crate::vendor::credential;
use std::sync::Arc;
use std::time::Duration;

/// Source of vendor adapters for the request routers.
pub trait VendorFactory: Send + Sync {
    fn ocr_engine(&self, provider: OcrProvider) -> Box<dyn OcrEngine>;

    fn analyzer(&self, provider: AnalysisProvider) -> Box<dyn Analyzer>;
}

/// Builds real adapters from the loaded configuration.
pub struct ConfiguredVendors {
    config: Arc<Config>,
    client: reqwest::Client,
    prompt: PromptBuilder,
}

impl ConfiguredVendors {
    pub fn new(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        let client = http_client(&config)?;
        let prompt = PromptBuilder::new(&config.analysis.explanation_language);
        Ok(Self {
            config,
            client,
            prompt,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared outbound client (carries the configured timeout).
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Outbound client with the configured per-request timeout.
pub fn http_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(config.http.timeout_ms))
        .build()
}

impl VendorFactory for ConfiguredVendors {
    fn ocr_engine(&self, provider: OcrProvider) -> Box<dyn OcrEngine> {
        let vendors = &self.config.vendors;
        let client = self.client.clone();
        match provider {
            OcrProvider::Gemini => Box::new(GeminiOcr::new(
                client,
                credential(&vendors.gemini.api_key),
                &vendors.gemini,
            )),
            OcrProvider::Doubao => Box::new(DoubaoOcr::new(
                client,
                credential(&vendors.doubao.api_key),
                &vendors.doubao,
            )),
            OcrProvider::Baidu => Box::new(BaiduOcr::new(
                client,
                credential(&vendors.baidu.api_key),
                credential(&vendors.baidu.secret_key),
                &vendors.baidu,
            )),
            OcrProvider::Alibaba => Box::new(AlibabaOcr::new(
                client,
                credential(&vendors.alibaba.api_key),
                &vendors.alibaba,
            )),
            OcrProvider::OpenAi => Box::new(OpenAiOcr::new(
                client,
                credential(&vendors.openai.api_key),
                &vendors.openai,
            )),
        }
    }

    fn analyzer(&self, provider: AnalysisProvider) -> Box<dyn Analyzer> {
        let vendors = &self.config.vendors;
        let client = self.client.clone();
        let prompt = self.prompt.clone();
        match provider {
            AnalysisProvider::Gemini => Box::new(GeminiAnalyzer::new(
                client,
                credential(&vendors.gemini.api_key),
                &vendors.gemini,
                prompt,
            )),
            AnalysisProvider::Doubao => Box::new(DoubaoAnalyzer::new(
                client,
                credential(&vendors.doubao.api_key),
                &vendors.doubao,
                prompt,
            )),
            AnalysisProvider::OpenAi => Box::new(OpenAiAnalyzer::new(
                client,
                credential(&vendors.openai.api_key),
                &vendors.openai,
                prompt,
            )),
            AnalysisProvider::Anthropic => Box::new(AnthropicAnalyzer::new(
                client,
                credential(&vendors.anthropic.api_key),
                &vendors.anthropic,
                prompt,
            )),
            AnalysisProvider::Qwen => Box::new(QwenAnalyzer::new(
                client,
                credential(&vendors.qwen.api_key),
                &vendors.qwen,
                prompt,
            )),
            AnalysisProvider::DeepSeek => Box::new(DeepSeekAnalyzer::new(
                client,
                credential(&vendors.deepseek.api_key),
                &vendors.deepseek,
                prompt,
            )),
        }
    }
}

//! OCR vendor adapters.
//!
//! Each adapter turns one base64 image into plain text with a single vendor
//! call (Baidu needs a token exchange first). Adapters never retry.

pub(crate) mod alibaba;
pub(crate) mod baidu;
pub(crate) mod doubao;
pub(crate) mod gemini;
pub(crate) mod openai;

pub use alibaba::AlibabaOcr;
pub use baidu::BaiduOcr;
pub use doubao::DoubaoOcr;
pub use gemini::GeminiOcr;
pub use openai::OpenAiOcr;

use crate::error::VendorResult;
use crate::vendor::ImageInput;
use async_trait::async_trait;

/// Instruction sent to the LLM-backed OCR vendors.
pub(crate) const OCR_INSTRUCTION: &str = "Extract all text in this image exactly as it appears. \
     Output only the text itself, without explanations, commentary or formatting.";

/// One image to recognise.
#[derive(Debug, Clone)]
pub struct OcrRequest {
    pub image: ImageInput,
    /// Optional language hint; only vendors with a language parameter use it
    pub language: Option<String>,
}

impl OcrRequest {
    pub fn new(image: ImageInput) -> Self {
        Self {
            image,
            language: None,
        }
    }
}

/// Trait that all OCR vendors implement.
///
/// Uses `async_trait` because the router holds adapters as `Box<dyn OcrEngine>`.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Vendor name for logging and error messages (e.g., "Gemini").
    fn name(&self) -> &str;

    /// Extract the text from the request image.
    async fn recognize(&self, request: &OcrRequest) -> VendorResult<String>;
}

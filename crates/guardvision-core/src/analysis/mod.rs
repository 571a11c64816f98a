//! Analysis (LLM) vendor adapters.
//!
//! Every adapter renders the same instruction (terminology list inline, input
//! text verbatim), attaches the image in its vendor's multimodal encoding
//! when running in image mode, and turns the reply into a
//! [`DetectionResult`]. Gemini, Doubao, OpenAI and DeepSeek are asked for
//! strict JSON; Claude and Qwen answer in free text and go through
//! [`extract::extract_json_object`].

pub(crate) mod anthropic;
pub(crate) mod deepseek;
pub(crate) mod doubao;
pub mod extract;
pub(crate) mod gemini;
pub(crate) mod openai;
pub mod prompt;
pub(crate) mod qwen;

pub use anthropic::AnthropicAnalyzer;
pub use deepseek::DeepSeekAnalyzer;
pub use doubao::DoubaoAnalyzer;
pub use gemini::GeminiAnalyzer;
pub use openai::OpenAiAnalyzer;
pub use prompt::PromptBuilder;
pub use qwen::QwenAnalyzer;

use crate::error::{VendorError, VendorResult};
use crate::types::{AnalysisMode, DetectionResult, TerminologyEntry};
use crate::vendor::ImageInput;
use async_trait::async_trait;

/// System message for vendors that take one.
pub(crate) const SYSTEM_ROLE: &str =
    "You are a professional copy reviewer for the security-equipment industry, \
     expert at diagnosing mistakes in poster and marketing copy.";

/// One text (optionally with its source image) to analyse.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub text: String,
    pub image: Option<ImageInput>,
    pub terminology: Vec<TerminologyEntry>,
    pub mode: AnalysisMode,
}

impl AnalysisRequest {
    /// The image to attach: present only in image mode with an image supplied.
    pub fn attached_image(&self) -> Option<&ImageInput> {
        match self.mode {
            AnalysisMode::Image => self.image.as_ref(),
            AnalysisMode::Text => None,
        }
    }
}

/// Trait that all analysis vendors implement.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Vendor name for logging and error messages (e.g., "Claude").
    fn name(&self) -> &str;

    /// Diagnose the request text.
    async fn analyze(&self, request: &AnalysisRequest) -> VendorResult<DetectionResult>;
}

/// Parse a reply produced in strict-JSON mode.
pub(crate) fn parse_strict(vendor: &'static str, text: &str) -> VendorResult<DetectionResult> {
    serde_json::from_str(text).map_err(|e| VendorError::Decode {
        vendor,
        message: e.to_string(),
    })
}

const RESULT_KEYS: [&str; 4] = ["originalText", "errors", "isProfessional", "score"];

/// Parse a free-text reply by locating its JSON object.
///
/// Balanced blocks are tried in order. The first object carrying a result
/// key wins; otherwise the first block that parses at all. Prose such as
/// `{brand}` is skipped.
pub(crate) fn parse_embedded(vendor: &'static str, text: &str) -> VendorResult<DetectionResult> {
    let mut fallback = None;
    let mut first_error = None;

    for block in extract::json_object_candidates(text) {
        match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(block) {
            Ok(object) if RESULT_KEYS.iter().any(|k| object.contains_key(*k)) => {
                return parse_strict(vendor, block);
            }
            Ok(_) => {
                fallback.get_or_insert(block);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match (fallback, first_error) {
        (Some(block), _) => parse_strict(vendor, block),
        (None, Some(e)) => Err(VendorError::Decode {
            vendor,
            message: e.to_string(),
        }),
        (None, None) => Err(VendorError::NoJson),
    }
}

//! Sub-configuration structs with production defaults.

use serde::{Deserialize, Serialize};

/// HTTP API listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API listens on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Terminal front end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of a running GuardVision API
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

/// Outbound request settings shared by every vendor adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: 60_000 }
    }
}

/// Prompt settings for analysis vendors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Language the vendor should write explanations in
    pub explanation_language: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            explanation_language: "Chinese".to_string(),
        }
    }
}

/// Company terminology list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminologyConfig {
    /// JSON file holding an array of terminology entries.
    /// The built-in list is used when unset or missing.
    pub path: Option<String>,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            path: Some("~/.guardvision/terminology.json".to_string()),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Vendor configurations. Every `api_key` / `secret_key` supports `${ENV_VAR}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VendorsConfig {
    pub gemini: GeminiConfig,
    pub doubao: DoubaoConfig,
    pub baidu: BaiduConfig,
    pub alibaba: AlibabaConfig,
    pub openai: OpenAiConfig,
    pub anthropic: AnthropicConfig,
    pub qwen: QwenConfig,
    pub deepseek: DeepSeekConfig,
}

/// Google Gemini configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,

    /// API base; the model path is appended per call
    pub endpoint: String,

    pub ocr_model: String,

    pub analysis_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: "${GEMINI_API_KEY}".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            ocr_model: "gemini-1.5-flash".to_string(),
            analysis_model: "gemini-1.5-pro".to_string(),
        }
    }
}

/// ByteDance Doubao (Volcengine Ark) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubaoConfig {
    pub api_key: String,
    pub endpoint: String,
    pub vision_model: String,
    pub text_model: String,
}

impl Default for DoubaoConfig {
    fn default() -> Self {
        Self {
            api_key: "${DOUBAO_API_KEY}".to_string(),
            endpoint: "https://ark.cn-beijing.volces.com/api/v3/chat/completions".to_string(),
            vision_model: "doubao-vision-pro-32k".to_string(),
            text_model: "doubao-pro-32k".to_string(),
        }
    }
}

/// Baidu AI Cloud OCR configuration (key pair exchanged for an access token).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaiduConfig {
    pub api_key: String,
    pub secret_key: String,
    pub token_endpoint: String,
    pub ocr_endpoint: String,
}

impl Default for BaiduConfig {
    fn default() -> Self {
        Self {
            api_key: "${BAIDU_API_KEY}".to_string(),
            secret_key: "${BAIDU_SECRET_KEY}".to_string(),
            token_endpoint: "https://aip.baidubce.com/oauth/2.0/token".to_string(),
            ocr_endpoint: "https://aip.baidubce.com/rest/2.0/ocr/v1/general_basic".to_string(),
        }
    }
}

/// Alibaba Cloud OCR configuration (APPCODE authentication).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlibabaConfig {
    /// APPCODE sent in the Authorization header
    pub api_key: String,

    /// Reserved for signature-based auth; not sent with APPCODE auth
    pub secret_key: String,

    pub endpoint: String,
}

impl Default for AlibabaConfig {
    fn default() -> Self {
        Self {
            api_key: "${ALIBABA_API_KEY}".to_string(),
            secret_key: "${ALIBABA_SECRET_KEY}".to_string(),
            endpoint: "https://ocr-api.cn-shanghai.aliyuncs.com/".to_string(),
        }
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub endpoint: String,

    /// Used for OCR and image-mode analysis
    pub vision_model: String,

    /// Used for text-mode analysis and the connectivity probe
    pub text_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            vision_model: "gpt-4o".to_string(),
            text_model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Anthropic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: "${ANTHROPIC_API_KEY}".to_string(),
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
        }
    }
}

/// Alibaba Qwen (DashScope) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QwenConfig {
    pub api_key: String,
    pub endpoint: String,
    pub vision_model: String,
    pub text_model: String,
}

impl Default for QwenConfig {
    fn default() -> Self {
        Self {
            api_key: "${QWEN_API_KEY}".to_string(),
            endpoint: "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation"
                .to_string(),
            vision_model: "qwen-vl-max".to_string(),
            text_model: "qwen-max".to_string(),
        }
    }
}

/// DeepSeek configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: "${DEEPSEEK_API_KEY}".to_string(),
            endpoint: "https://api.deepseek.com/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
        }
    }
}

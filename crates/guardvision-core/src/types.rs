//! Core data types shared by the server, the client and the controller.
//!
//! Field names follow the camelCase wire format used by the browser front end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A company-defined preferred-term record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyEntry {
    /// The term as it may appear in copy (e.g., "waterproof")
    pub term: String,

    /// Grouping such as "protection", "video", "network"
    pub category: String,

    /// What the term means in the industry
    pub definition: String,

    /// Wording the company wants used instead, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_alternative: Option<String>,
}

impl TerminologyEntry {
    pub fn new(term: &str, category: &str, definition: &str) -> Self {
        Self {
            term: term.to_string(),
            category: category.to_string(),
            definition: definition.to_string(),
            preferred_alternative: None,
        }
    }

    pub fn with_preferred(mut self, alternative: &str) -> Self {
        self.preferred_alternative = Some(alternative.to_string());
        self
    }
}

/// The four issue kinds an analysis vendor is asked to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Spelling,
    Grammar,
    Terminology,
    Style,
}

impl IssueKind {
    /// Parse the wire value; `None` for anything outside the four kinds.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "spelling" => Some(IssueKind::Spelling),
            "grammar" => Some(IssueKind::Grammar),
            "terminology" => Some(IssueKind::Terminology),
            "style" => Some(IssueKind::Style),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::Spelling => "spelling",
            IssueKind::Grammar => "grammar",
            IssueKind::Terminology => "terminology",
            IssueKind::Style => "style",
        }
    }
}

/// One flagged issue in the analysed copy.
///
/// `kind` stays a free string: vendors are asked for one of the four
/// [`IssueKind`] values but the result is forwarded as received.
/// Every field defaults when absent; gaps surface through
/// [`DetectionResult::anomalies`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionError {
    /// The offending text span
    pub text: String,

    /// "spelling", "grammar", "terminology" or "style"
    #[serde(rename = "type")]
    pub kind: String,

    /// Suggested replacement
    pub suggestion: String,

    /// Other acceptable replacements
    pub alternatives: Vec<String>,

    /// Why the span was flagged
    pub explanation: String,

    /// Bounding box; semantics are vendor-defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<f64>>,
}

impl DetectionError {
    pub fn issue_kind(&self) -> Option<IssueKind> {
        IssueKind::parse(&self.kind)
    }
}

/// Structured diagnostic output for one text or image.
///
/// Missing fields take their defaults so a partial vendor reply is still
/// forwarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionResult {
    pub original_text: String,
    pub errors: Vec<DetectionError>,
    pub is_professional: bool,
    /// 0-100 by contract, not enforced
    pub score: f64,
}

impl DetectionResult {
    /// Describe every way this result departs from the documented shape.
    ///
    /// Nothing is rejected; callers log these so vendor drift is visible.
    pub fn anomalies(&self) -> Vec<String> {
        let mut found = Vec::new();
        if self.original_text.is_empty() {
            found.push("originalText is empty".to_string());
        }
        if !(0.0..=100.0).contains(&self.score) {
            found.push(format!("score {} outside 0-100", self.score));
        }
        for (i, err) in self.errors.iter().enumerate() {
            if err.text.is_empty() {
                found.push(format!("errors[{i}].text is empty"));
            }
            if err.issue_kind().is_none() {
                found.push(format!("errors[{i}].type '{}' is not a known kind", err.kind));
            }
            if let Some(loc) = &err.location {
                if loc.len() != 4 {
                    found.push(format!(
                        "errors[{i}].location has {} values, expected 4",
                        loc.len()
                    ));
                }
            }
        }
        found
    }
}

/// Whether the analysed text came from an image (with the image attached)
/// or was typed in directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Image,
    #[default]
    Text,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Image => write!(f, "image"),
            AnalysisMode::Text => write!(f, "text"),
        }
    }
}

/// OCR vendors selectable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OcrProvider {
    Gemini,
    Doubao,
    Baidu,
    Alibaba,
    #[serde(rename = "OPENAI")]
    OpenAi,
}

impl OcrProvider {
    pub const ALL: [OcrProvider; 5] = [
        OcrProvider::Gemini,
        OcrProvider::Doubao,
        OcrProvider::Baidu,
        OcrProvider::Alibaba,
        OcrProvider::OpenAi,
    ];

    pub fn id(self) -> &'static str {
        match self {
            OcrProvider::Gemini => "GEMINI",
            OcrProvider::Doubao => "DOUBAO",
            OcrProvider::Baidu => "BAIDU",
            OcrProvider::Alibaba => "ALIBABA",
            OcrProvider::OpenAi => "OPENAI",
        }
    }
}

impl fmt::Display for OcrProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OcrProvider {
    type Err = crate::error::VendorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OcrProvider::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| crate::error::VendorError::UnsupportedProvider {
                kind: "OCR",
                id: s.to_string(),
            })
    }
}

/// Analysis (LLM) vendors selectable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisProvider {
    Gemini,
    Doubao,
    #[serde(rename = "OPENAI")]
    OpenAi,
    Anthropic,
    Qwen,
    #[serde(rename = "DEEPSEEK")]
    DeepSeek,
}

impl AnalysisProvider {
    pub const ALL: [AnalysisProvider; 6] = [
        AnalysisProvider::Gemini,
        AnalysisProvider::Doubao,
        AnalysisProvider::OpenAi,
        AnalysisProvider::Anthropic,
        AnalysisProvider::Qwen,
        AnalysisProvider::DeepSeek,
    ];

    pub fn id(self) -> &'static str {
        match self {
            AnalysisProvider::Gemini => "GEMINI",
            AnalysisProvider::Doubao => "DOUBAO",
            AnalysisProvider::OpenAi => "OPENAI",
            AnalysisProvider::Anthropic => "ANTHROPIC",
            AnalysisProvider::Qwen => "QWEN",
            AnalysisProvider::DeepSeek => "DEEPSEEK",
        }
    }
}

impl fmt::Display for AnalysisProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AnalysisProvider {
    type Err = crate::error::VendorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisProvider::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| crate::error::VendorError::UnsupportedProvider {
                kind: "LLM",
                id: s.to_string(),
            })
    }
}

/// Health of one vendor as reported by `GET /api/test`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceStatus {
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Configured but not probed.
    pub fn configured() -> Self {
        Self {
            configured: true,
            ..Self::default()
        }
    }

    pub fn probed(working: bool) -> Self {
        Self {
            configured: true,
            working: Some(working),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            configured: true,
            working: Some(false),
            error: Some(error),
        }
    }
}

/// Per-vendor status, one field per service in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Services {
    pub gemini: ServiceStatus,
    pub doubao: ServiceStatus,
    pub openai: ServiceStatus,
    pub anthropic: ServiceStatus,
    pub qwen: ServiceStatus,
    pub deepseek: ServiceStatus,
    pub baidu: ServiceStatus,
    pub alibaba: ServiceStatus,
}

impl Services {
    pub fn entries(&self) -> [(&'static str, &ServiceStatus); 8] {
        [
            ("gemini", &self.gemini),
            ("doubao", &self.doubao),
            ("openai", &self.openai),
            ("anthropic", &self.anthropic),
            ("qwen", &self.qwen),
            ("deepseek", &self.deepseek),
            ("baidu", &self.baidu),
            ("alibaba", &self.alibaba),
        ]
    }
}

/// Body of `GET /api/test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// RFC 3339 UTC timestamp of the probe run
    pub timestamp: String,
    pub services: Services,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminology_entry_wire_format() {
        let entry = TerminologyEntry::new("waterproof", "protection", "Resists water ingress")
            .with_preferred("weatherproof");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["preferredAlternative"], "weatherproof");

        let bare = TerminologyEntry::new("PoE", "network", "Power over Ethernet");
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("preferredAlternative").is_none());
    }

    #[test]
    fn test_detection_result_parses_vendor_shape() {
        let raw = r#"{
            "originalText": "IP67 waterproof camera",
            "isProfessional": false,
            "score": 72,
            "errors": [{
                "text": "waterproof",
                "type": "terminology",
                "suggestion": "weatherproof",
                "alternatives": ["IP67-rated"],
                "explanation": "Use the catalogue term",
                "location": [0, 0, 10, 10]
            }]
        }"#;
        let result: DetectionResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].issue_kind(), Some(IssueKind::Terminology));
        assert_eq!(result.score, 72.0);
        assert!(result.anomalies().is_empty());

        let back = serde_json::to_value(&result).unwrap();
        assert_eq!(back["errors"][0]["type"], "terminology");
        assert_eq!(back["isProfessional"], false);
    }

    #[test]
    fn test_anomalies_flag_but_keep_out_of_range_values() {
        let result = DetectionResult {
            original_text: "x".into(),
            errors: vec![DetectionError {
                text: "x".into(),
                kind: "tone".into(),
                suggestion: String::new(),
                alternatives: vec![],
                explanation: String::new(),
                location: Some(vec![1.0, 2.0]),
            }],
            is_professional: true,
            score: 140.0,
        };
        let anomalies = result.anomalies();
        assert_eq!(anomalies.len(), 3);
        assert!(anomalies[0].contains("score 140"));
        assert!(anomalies[1].contains("'tone'"));
        assert!(anomalies[2].contains("2 values"));
    }

    #[test]
    fn test_partial_vendor_reply_is_kept() {
        let raw = r#"{
            "errors": [{"type": "spelling", "suggestion": "camera"}],
            "isProfessional": true,
            "score": 90
        }"#;
        let result: DetectionResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.original_text, "");
        assert_eq!(result.score, 90.0);
        assert_eq!(result.errors[0].suggestion, "camera");
        assert_eq!(result.errors[0].text, "");

        let anomalies = result.anomalies();
        assert_eq!(
            anomalies,
            vec![
                "originalText is empty".to_string(),
                "errors[0].text is empty".to_string()
            ]
        );

        let bare: DetectionResult = serde_json::from_str("{}").unwrap();
        assert!(bare.errors.is_empty());
        assert!(!bare.is_professional);
    }

    #[test]
    fn test_provider_ids_round_trip() {
        for p in OcrProvider::ALL {
            assert_eq!(p.id().parse::<OcrProvider>().unwrap(), p);
        }
        for p in AnalysisProvider::ALL {
            assert_eq!(p.id().parse::<AnalysisProvider>().unwrap(), p);
        }
        assert_eq!(
            serde_json::to_string(&AnalysisProvider::DeepSeek).unwrap(),
            "\"DEEPSEEK\""
        );
    }

    #[test]
    fn test_unknown_provider_ids() {
        let err = "TESSERACT".parse::<OcrProvider>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported OCR provider: TESSERACT");
        // Identifiers are case-sensitive
        let err = "gemini".parse::<AnalysisProvider>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported LLM provider: gemini");
    }

    #[test]
    fn test_mode_wire_values() {
        assert_eq!(serde_json::to_string(&AnalysisMode::Image).unwrap(), "\"image\"");
        let mode: AnalysisMode = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(mode, AnalysisMode::Text);
    }

    #[test]
    fn test_service_status_omits_unprobed_fields() {
        let json = serde_json::to_value(ServiceStatus::unconfigured()).unwrap();
        assert_eq!(json, serde_json::json!({"configured": false}));

        let json = serde_json::to_value(ServiceStatus::failed("timeout".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"configured": true, "working": false, "error": "timeout"})
        );
    }
}

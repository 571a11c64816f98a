//! Instruction rendering shared by every analysis vendor.

use super::AnalysisRequest;
use crate::types::AnalysisMode;

/// The JSON shape every vendor is told to return.
pub(crate) const RESULT_SHAPE: &str = r#"{
  "originalText": "the analysed text",
  "isProfessional": true,
  "score": 85,
  "errors": [
    {
      "text": "offending text",
      "type": "spelling | grammar | terminology | style",
      "suggestion": "suggested replacement",
      "alternatives": ["other acceptable replacement"],
      "explanation": "why this was flagged",
      "location": [0, 0, 0, 0]
    }
  ]
}"#;

/// Renders the analysis instruction for a request.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    explanation_language: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("Chinese")
    }
}

impl PromptBuilder {
    pub fn new(explanation_language: &str) -> Self {
        Self {
            explanation_language: explanation_language.to_string(),
        }
    }

    /// Build the full instruction: terminology list inline as JSON, the input
    /// text verbatim, and the required output shape.
    pub fn render(&self, request: &AnalysisRequest) -> String {
        let terminology =
            serde_json::to_string(&request.terminology).unwrap_or_else(|_| "[]".to_string());
        let subject = match request.mode {
            AnalysisMode::Image => "Text extracted from the poster image",
            AnalysisMode::Text => "Marketing copy",
        };

        format!(
            "Role: senior localisation reviewer for a security-equipment export company, \
             proof-reading flagship product posters for the global market.\n\
             \n\
             Tasks:\n\
             1. Terminology check (mandatory). Compare every technical term in the text \
             against the company terminology list below.\n\
             \x20  - If the text uses a listed \"term\" that has a \"preferredAlternative\", \
             report it as a \"terminology\" issue and suggest the preferred alternative.\n\
             \x20  - If the text uses non-standard wording for a concept the list defines, \
             correct it according to the definition.\n\
             \x20  Company terminology list: {terminology}\n\
             2. Spelling and grammar: report mistakes an international buyer would notice.\n\
             3. Technical parameters: check that notation such as 4K, 30fps, IP67 and IK10 \
             follows industry convention.\n\
             4. Tone: judge whether the copy reads as premium, secure and reliable; set \
             \"isProfessional\" and a 0-100 \"score\" accordingly.\n\
             \n\
             Write every explanation in {language}.\n\
             \n\
             Respond with a single JSON object of exactly this shape:\n\
             {shape}\n\
             \n\
             {subject} to analyse:\n\
             \"\"\"\n\
             {text}\n\
             \"\"\"\n",
            terminology = terminology,
            language = self.explanation_language,
            shape = RESULT_SHAPE,
            subject = subject,
            text = request.text,
        )
    }
}

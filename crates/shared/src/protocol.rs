use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisResult, Reference};

pub const NO_ANSWER_PLACEHOLDER: &str = "No response received from the AI system.";
pub const NO_ANALYSIS_PLACEHOLDER: &str = "No analysis returned.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub references: Option<Vec<Reference>>,
}

impl AskResponse {
    pub fn into_result(self) -> AnalysisResult {
        AnalysisResult {
            answer_text: non_empty(self.answer)
                .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string()),
            references: self.references.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub references: Option<Vec<Reference>>,
}

impl UploadResponse {
    /// `original_file_name` stands in when the service omits `filename`.
    pub fn into_result(self, original_file_name: &str) -> AnalysisResult {
        let filename =
            non_empty(self.filename).unwrap_or_else(|| original_file_name.to_string());
        let analysis =
            non_empty(self.analysis).unwrap_or_else(|| NO_ANALYSIS_PLACEHOLDER.to_string());
        AnalysisResult {
            answer_text: format!("File: {filename}\n\nAnalysis:\n{analysis}"),
            references: self.references.unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::evaluator::AnalysisOptions;
use crate::report::Report;

/// Request body for `POST /analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub assignment_text: String,
    #[serde(default)]
    pub rubric_text: String,
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

/// Response for a completed analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: Report,
    /// True when the model's reply could not be parsed and `analysis` is the
    /// placeholder report.
    pub degraded: bool,
}

/// Query string for `GET /result`.
#[derive(Debug, Default, Deserialize)]
pub struct ResultQuery {
    pub analysis: Option<String>,
    pub assignment_name: Option<String>,
    pub rubric_name: Option<String>,
}

/// Request body for `POST /download-pdf`: a Report plus the display names
/// the result page carried.
#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    #[serde(flatten)]
    pub report: Report,
    #[serde(default)]
    pub assignment: Option<String>,
    #[serde(default)]
    pub rubric: Option<String>,
}

/// Service facts.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub ai_provider: String,
    pub model: String,
    pub free_models_available: usize,
    pub api_key_configured: bool,
    pub strict_evaluation_mode: bool,
    pub pdf_generation: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ai_provider: String,
    pub free_models_available: usize,
    pub upload_folder_exists: bool,
    pub pdf_generation: bool,
}

/// Response for `GET /test-ai`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelfTestResponse {
    pub success: bool,
    pub strict_mode: bool,
    pub degraded: bool,
    pub test_result: Report,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// src/evaluator/mod.rs — Evaluation pipeline: prompt, client, parser

pub mod client;
pub mod fallback;
pub mod parser;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::infra::config::ProviderConfig;
use crate::infra::errors::RubrixError;
use crate::provider::openai_compat::OpenAICompatProvider;
use crate::provider::ModelProvider;
pub use client::{strip_code_fence, EvaluationClient, EvaluationSettings};
pub use fallback::FALLBACK_VERDICT;
pub use parser::{parse_verdict, Verdict};
pub use prompt::build_evaluation_prompt;

/// Caller-facing switches. Accepted and echoed but they do not change the
/// prompt or the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub detailed_analysis: bool,
    pub rewrite_suggestions: bool,
    pub grade_prediction: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            detailed_analysis: true,
            rewrite_suggestions: true,
            grade_prediction: true,
        }
    }
}

/// Short sample used by the self-test route and `rubrix check`.
pub const SAMPLE_ASSIGNMENT: &str = "Sample assignment: Write a critical analysis of renewable \
energy adoption in developing countries. Discuss economic, social, and environmental factors, and \
propose policy recommendations.";

pub const SAMPLE_RUBRIC: &str = "Rubric: Critical Analysis (40% weight): Depth of analysis, use of \
evidence, consideration of multiple perspectives. Policy Recommendations (30% weight): Feasibility, \
innovation, evidence-based. Structure and Clarity (20% weight): Organization, writing quality. \
Research and Citations (10% weight): Use of sources, proper citation.";

/// Validates inputs and runs one evaluation end to end.
pub struct Evaluator {
    client: EvaluationClient,
}

impl Evaluator {
    pub fn new(client: EvaluationClient) -> Self {
        Self { client }
    }

    /// Build the default OpenAI-compatible client from config.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, RubrixError> {
        let provider: Arc<dyn ModelProvider> = Arc::new(OpenAICompatProvider::from_config(config)?);
        let mut client = EvaluationClient::new(provider, EvaluationSettings::from_config(config));
        if !config.has_api_key() {
            client = client.without_credentials();
        }
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &EvaluationClient {
        &self.client
    }

    /// Evaluate one submission. Empty input is rejected before any network
    /// call; provider and parse failures are absorbed into the verdict.
    pub async fn analyze(
        &self,
        assignment_text: &str,
        rubric_text: &str,
        options: &AnalysisOptions,
    ) -> Result<Verdict, RubrixError> {
        if assignment_text.trim().is_empty() || rubric_text.trim().is_empty() {
            return Err(RubrixError::Validation(
                "Both assignment and rubric text are required".into(),
            ));
        }

        tracing::debug!(
            assignment_chars = assignment_text.chars().count(),
            rubric_chars = rubric_text.chars().count(),
            ?options,
            "Starting evaluation"
        );

        let raw = self.client.evaluate(assignment_text, rubric_text).await;
        let verdict = parse_verdict(&raw);
        if verdict.is_degraded() {
            tracing::warn!("Evaluation returned an unparseable verdict");
        }
        Ok(verdict)
    }
}

// src/evaluator/client.rs — Single-attempt evaluation call with fallback

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::infra::config::ProviderConfig;
use crate::infra::errors::RubrixError;
use crate::provider::{ChatRequest, Message, ModelProvider};

use super::fallback::FALLBACK_VERDICT;
use super::prompt::{build_evaluation_prompt, SYSTEM_PROMPT};

/// Trim the reply and drop a surrounding markdown fence, if any.
///
/// Accepts ```` ```json ... ``` ```` and ```` ``` ... ``` ````. Applying it
/// twice gives the same result as applying it once.
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();
    loop {
        let inner = s
            .strip_prefix("```json")
            .or_else(|| s.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .map(str::trim);
        match inner {
            Some(next) if next.len() < s.len() => s = next,
            _ => return s,
        }
    }
}

/// Request parameters for an evaluation call.
#[derive(Debug, Clone)]
pub struct EvaluationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl EvaluationSettings {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        }
    }
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

/// Sends one evaluation request and always comes back with verdict text.
pub struct EvaluationClient {
    provider: Arc<dyn ModelProvider>,
    settings: EvaluationSettings,
    has_key: bool,
}

impl EvaluationClient {
    pub fn new(provider: Arc<dyn ModelProvider>, settings: EvaluationSettings) -> Self {
        Self {
            provider,
            settings,
            has_key: true,
        }
    }

    /// Mark the client as having no credentials; every call then returns
    /// the fallback without touching the network.
    pub fn without_credentials(mut self) -> Self {
        self.has_key = false;
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.has_key
    }

    /// Returns the model's verdict text with any code fence removed, or
    /// `FALLBACK_VERDICT` on any failure. Exactly one attempt.
    pub async fn evaluate(&self, assignment_text: &str, rubric_text: &str) -> String {
        if !self.has_key {
            tracing::warn!(
                provider = self.provider.id(),
                "No API key configured, using simulated analysis"
            );
            return FALLBACK_VERDICT.to_string();
        }

        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(build_evaluation_prompt(
                assignment_text,
                rubric_text,
            ))],
            max_tokens: Some(self.settings.max_tokens),
            temperature: Some(self.settings.temperature),
            system: Some(SYSTEM_PROMPT.to_string()),
        };

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.settings.timeout, self.provider.chat(request)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(resp)) => {
                let verdict = strip_code_fence(&resp.content);
                if verdict.is_empty() {
                    tracing::warn!(
                        provider = self.provider.id(),
                        model = %self.settings.model,
                        elapsed_ms,
                        "Empty completion, using simulated analysis"
                    );
                    return FALLBACK_VERDICT.to_string();
                }
                tracing::info!(
                    provider = self.provider.id(),
                    model = %self.settings.model,
                    elapsed_ms,
                    bytes = verdict.len(),
                    tokens = resp.usage.total(),
                    "Evaluation completed"
                );
                verdict.to_string()
            }
            Ok(Err(e)) => self.fall_back(&e, elapsed_ms),
            Err(_) => {
                let e = RubrixError::Timeout {
                    provider: self.provider.id().to_string(),
                    seconds: self.settings.timeout.as_secs(),
                };
                self.fall_back(&e, elapsed_ms)
            }
        }
    }

    fn fall_back(&self, error: &RubrixError, elapsed_ms: u64) -> String {
        tracing::warn!(
            provider = self.provider.id(),
            model = %self.settings.model,
            elapsed_ms,
            retriable = error.is_retriable(),
            error = %error,
            "Evaluation request failed, using simulated analysis"
        );
        FALLBACK_VERDICT.to_string()
    }
}

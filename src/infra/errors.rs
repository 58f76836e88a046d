// src/infra/errors.rs — Error types for Rubrix

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RubrixError {
    // Provider errors (absorbed by the evaluation client)
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Provider '{provider}' timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    // User errors
    #[error("{0}")]
    Validation(String),

    #[error("Upload rejected: {0}")]
    Upload(String),

    // Rendering (fatal to a single request)
    #[error("Report rendering failed: {0}")]
    Render(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RubrixError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            RubrixError::Provider {
                retriable: true,
                ..
            } | RubrixError::Timeout { .. }
        )
    }

    /// Errors caused by the caller's input rather than by the service.
    pub fn is_user_error(&self) -> bool {
        matches!(self, RubrixError::Validation(_) | RubrixError::Upload(_))
    }
}

impl From<minijinja::Error> for RubrixError {
    fn from(e: minijinja::Error) -> Self {
        RubrixError::Render(e.to_string())
    }
}

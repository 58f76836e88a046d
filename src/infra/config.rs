// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::paths;

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Human-readable provider name, reported by the status endpoints.
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    /// Model used for evaluations.
    pub model: String,
    /// Models this deployment is allowed to use; `model` should be one of them.
    pub models: Vec<String>,
    /// Sent as `HTTP-Referer` (OpenRouter app attribution).
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let models = vec![
            "meta-llama/llama-3.2-3b-instruct:free".to_string(),
            "google/gemma-2-2b-it:free".to_string(),
            "microsoft/phi-3-mini-4k-instruct:free".to_string(),
            "qwen/qwen2.5-7b-instruct:free".to_string(),
        ];
        Self {
            name: "OpenRouter".into(),
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: String::new(),
            model: models[0].clone(),
            models,
            referer: "http://localhost:5000".into(),
            title: "RUBRIX Assignment Evaluator".into(),
            timeout_seconds: 45,
            temperature: 0.2,
            max_tokens: 2000,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Scratch directory for staged uploads. Files never outlive a request.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            allowed_extensions: [
                "txt", "pdf", "docx", "md", "py", "java", "cpp", "html", "css", "js", "json",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides (currently only the API key).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.provider.api_key = key;
            }
        }
        self
    }
}

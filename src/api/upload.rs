// src/api/upload.rs — Scoped staging for uploaded files

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::infra::config::ServerConfig;
use crate::infra::errors::RubrixError;
use crate::util::sanitize_filename;

/// Writes uploads into the configured directory. Each staged file is removed
/// when its `StagedUpload` is dropped, whatever happened in between.
#[derive(Debug, Clone)]
pub struct UploadStager {
    dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadStager {
    pub fn new(dir: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.allowed_extensions.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn is_allowed(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.allowed_extensions.iter().any(|a| *a == e))
    }

    pub fn stage(&self, filename: &str, bytes: &[u8]) -> Result<StagedUpload, RubrixError> {
        if filename.trim().is_empty() {
            return Err(RubrixError::Upload("No files selected".into()));
        }
        if !self.is_allowed(filename) {
            return Err(RubrixError::Upload(format!(
                "File type not allowed: {filename} (allowed: {})",
                self.allowed_extensions.join(", ")
            )));
        }

        std::fs::create_dir_all(&self.dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("rubrix-")
            .suffix(&format!("_{}", sanitize_filename(filename)))
            .tempfile_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(
            file = filename,
            bytes = bytes.len(),
            path = %file.path().display(),
            "Staged upload"
        );

        Ok(StagedUpload {
            file,
            original_name: filename.to_string(),
        })
    }
}

/// An uploaded file on disk for the lifetime of one request.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    original_name: String,
}

impl StagedUpload {
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Contents as text; invalid UTF-8 is replaced rather than rejected.
    pub fn read_text(&self) -> Result<String, RubrixError> {
        let bytes = std::fs::read(self.file.path())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

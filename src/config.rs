// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::errors::{AssessError, Result};
use crate::models::{Marks, SelectedFile};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Where the evaluation service lives.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_base: String,
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base = lookup("AUTOEVAL_API_BASE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(AssessError::Config(format!(
                "AUTOEVAL_API_BASE must be an http(s) URL, got '{}'",
                api_base
            )));
        }

        let host = lookup("AUTOEVAL_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("AUTOEVAL_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AssessError::Config(format!("AUTOEVAL_PORT is not a valid port: '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let max_upload_mb = match lookup("AUTOEVAL_MAX_UPLOAD_MB") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                AssessError::Config(format!(
                    "AUTOEVAL_MAX_UPLOAD_MB is not a whole number: '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        let max_upload_bytes = max_upload_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            AssessError::Config(format!(
                "AUTOEVAL_MAX_UPLOAD_MB is too large: {}",
                max_upload_mb
            ))
        })?;

        Ok(AppConfig {
            service: ServiceConfig { api_base },
            host,
            port,
            max_upload_bytes,
        })
    }
}

/// One form fill read from a TOML file, used by `autoeval submit`.
///
/// ```toml
/// question = "What is 6 x 7?"
/// solution = "42"
/// marks = 10
/// image = "answer.png"
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct SubmissionFile {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub solution: String,

    #[serde(default = "default_marks")]
    pub marks: f64,

    /// Path of the answer image, relative to the submission file
    #[serde(default)]
    pub image: Option<PathBuf>,
}

fn default_marks() -> f64 {
    10.0
}

impl SubmissionFile {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut submission = Self::parse(&contents)?;
        if let Some(image) = submission.image.take() {
            submission.image = Some(match path.parent() {
                Some(dir) if image.is_relative() => dir.join(image),
                _ => image,
            });
        }
        Ok(submission)
    }

    pub fn marks(&self) -> Marks {
        Marks::from_number(self.marks)
    }

    /// Reads the referenced image. `None` when the file names no image.
    pub fn read_image(&self) -> Result<Option<SelectedFile>> {
        let Some(path) = &self.image else {
            return Ok(None);
        };
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());
        Ok(Some(SelectedFile::new(name, content_type, bytes)))
    }
}

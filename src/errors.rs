// src/errors.rs
use thiserror::Error;

/// Shown when a submission is attempted without a file, solution or question.
pub const VALIDATION_MESSAGE: &str = "Please fill in all fields and select an image";
/// Used when the service rejects a submission without saying why.
pub const SERVICE_FALLBACK_MESSAGE: &str = "Error evaluating the answer";
/// Used when a transport failure carries no message of its own.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum AssessError {
    #[error("Please fill in all fields and select an image")]
    Validation,

    #[error("Evaluation service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML submission: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown form field '{0}'")]
    UnknownField(String),
}

impl AssessError {
    /// Builds a `Transport` error from any failure, falling back to the generic message
    /// when the failure renders as an empty string.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            AssessError::Transport(TRANSPORT_FALLBACK_MESSAGE.to_string())
        } else {
            AssessError::Transport(message)
        }
    }

    /// The text the form displays for this error.
    pub fn user_message(&self) -> String {
        match self {
            AssessError::Validation => VALIDATION_MESSAGE.to_string(),
            AssessError::Service { message, .. } => message.clone(),
            AssessError::Transport(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AssessError {
    fn from(err: reqwest::Error) -> Self {
        AssessError::transport(err)
    }
}

pub type Result<T> = std::result::Result<T, AssessError>;

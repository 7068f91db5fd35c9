//! Error types for StepForge

use thiserror::Error;

/// Result type alias using StepForge Error
pub type Result<T> = std::result::Result<T, Error>;

/// StepForge error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Malformed input at `{field}`: {reason}")]
    MalformedInput { field: String, reason: String },

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid step pattern `{name}`: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("Step binding collision for '{text}' under {bindings}")]
    BindingCollision { text: String, bindings: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Shorthand for a malformed-input error at a document path
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

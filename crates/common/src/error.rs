//! Error types shared across Tonecheck crates.

use std::path::PathBuf;

/// Top-level error type for Tonecheck operations.
#[derive(Debug, thiserror::Error)]
pub enum ToneError {
    #[error("Missing column '{column}' (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Malformed table: {message}")]
    MalformedTable { message: String },

    #[error("Scoring error in {source_name}: {message}")]
    Scoring {
        source_name: String,
        message: String,
    },

    #[error("Model error: {message}")]
    Model { message: String },

    /// Credential mismatch. Deliberately carries no detail.
    #[error("Invalid credentials")]
    AccessDenied,

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Mail error: {message}")]
    Mail { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ToneError.
pub type ToneResult<T> = Result<T, ToneError>;

impl ToneError {
    pub fn missing_column(column: impl Into<String>, available: &[String]) -> Self {
        Self::MissingColumn {
            column: column.into(),
            available: available.to_vec(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedTable {
            message: msg.into(),
        }
    }

    pub fn scoring(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Scoring {
            source_name: source_name.into(),
            message: msg.into(),
        }
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn mail(msg: impl Into<String>) -> Self {
        Self::Mail {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}

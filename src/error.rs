use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for pepbump operations
#[derive(Error, Debug)]
pub enum PepbumpError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Missing or empty section '{section}' in store file {}", path.display())]
    MissingSection { section: String, path: PathBuf },

    #[error("Missing field '{field}' in version section of store file {}", path.display())]
    MissingField { field: String, path: PathBuf },

    #[error("Cannot read template file {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write destination file {}: {source}", path.display())]
    DestinationWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write history file {}: {source}", path.display())]
    History {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Store file error in {}: {message}", path.display())]
    Store { path: PathBuf, message: String },

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pepbump
pub type Result<T> = std::result::Result<T, PepbumpError>;

impl PepbumpError {
    /// Create an invalid version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        PepbumpError::InvalidVersion(msg.into())
    }

    /// Create a publish error with context
    pub fn publish(msg: impl Into<String>) -> Self {
        PepbumpError::Publish(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PepbumpError::Config(msg.into())
    }

    pub fn missing_section(section: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        PepbumpError::MissingSection {
            section: section.into(),
            path: path.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        PepbumpError::MissingField {
            field: field.into(),
            path: path.into(),
        }
    }

    pub fn history(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PepbumpError::History {
            path: path.into(),
            source,
        }
    }

    pub fn store(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        PepbumpError::Store {
            path: path.into(),
            message: msg.into(),
        }
    }
}

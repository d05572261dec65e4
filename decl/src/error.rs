//! Error types for loading and building declarations.

use argspec_core::DeclarationError;
use thiserror::Error;

/// Errors that can occur while loading a declaration file or turning it into
/// a parser.
#[derive(Debug, Error)]
pub enum DeclError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The parser rejected a declaration.
    #[error("declaration error #{}: {}", .0.code(), .0)]
    Declaration(#[from] DeclarationError),

    /// The file is well-formed but describes something impossible.
    #[error("invalid declaration: {0}")]
    Invalid(String),
}

impl DeclError {
    /// Numeric code for declaration failures, `None` for everything else.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Declaration(err) => Some(err.code()),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`DeclError`].
pub type Result<T> = std::result::Result<T, DeclError>;

//! Error types for loading and validating type model documents.
//!
//! Field extraction and rendering are infallible: unresolvable types and
//! malformed exclusion entries degrade the output instead of failing.

use std::path::PathBuf;
use thiserror::Error;

/// A type reference that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type reference \"{text}\" at offset {position}: {message}")]
pub struct TypeRefError {
    pub text: String,
    pub position: usize,
    pub message: String,
}

/// Errors while loading a model document or settings file.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model document: {source}")]
    MalformedModel {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {source}")]
    InvalidSettings {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

/// Errors while validating a model document before use.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("model document failed validation with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid value.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Load(e) => e.exit_code(),
            ValidateError::Invalid { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("model.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidSchema {
            message: "bad".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::Invalid {
            errors: vec![SchemaError {
                path: "/types/0/name".into(),
                message: "missing".into(),
            }],
        };
        assert_eq!(err.exit_code(), 1);

        let err = ValidateError::from(LoadError::FileNotFound {
            path: PathBuf::from("model.json"),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn type_ref_error_display() {
        let err = TypeRefError {
            text: "List<".into(),
            position: 5,
            message: "expected a type name".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid type reference \"List<\" at offset 5: expected a type name"
        );
    }
}

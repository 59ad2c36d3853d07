//! Error types for marshaling, unmarshaling and document validation.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::TimeFormat;

/// Errors raised while converting between models and documents.
///
/// Every failure aborts the whole traversal; no partial document or model
/// is returned.
#[derive(Debug, Error)]
pub enum Error {
    // Field configuration
    #[error("bad field configuration \"{tag}\"")]
    BadFieldConfiguration { tag: String },

    #[error("id should be either a string or an integer")]
    BadPrimaryId,

    // Shape errors
    #[error("a relationship list cannot contain a null entry")]
    UnexpectedNil,

    #[error("unexpected type: {detail}")]
    UnexpectedType { detail: String },

    // Attribute coercion errors
    #[error("invalid type for attribute `{attribute}`: expected {expected}, got {actual}")]
    InvalidType {
        attribute: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("attribute `{attribute}` received a number but is not a known number type")]
    UnknownFieldNumberType { attribute: String },

    #[error("invalid time for attribute `{attribute}`: {}", format.expectation())]
    InvalidTime {
        attribute: String,
        format: TimeFormat,
    },

    #[error("the `{name}` member of the links object is neither a string nor a link object")]
    InvalidLink { name: String },

    // Document errors
    #[error("resource object is missing its type")]
    MissingType,

    #[error("document has no primary data")]
    MissingData,

    #[error("cannot decode a `{found}` resource into a `{expected}` model")]
    TypeMismatch { expected: String, found: String },

    #[error("invalid JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document schema: {message}")]
    InvalidSchema { message: String },

    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn unexpected_type(detail: impl Into<String>) -> Self {
        Error::UnexpectedType {
            detail: detail.into(),
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::FileNotFound { .. } | Error::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

/// Errors during structural document validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Decode(#[from] Error),

    #[error("document is invalid with {} issue(s)", issues.len())]
    Invalid { issues: Vec<Issue> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Decode(e) => e.exit_code(),
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single structural problem with path context.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Issue {
    /// JSON Pointer (RFC 6901) to the offending member.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Why a [`Nullable`](crate::Nullable) holds no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("value is null")]
    Null,

    #[error("value is not specified")]
    Unspecified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_exit_codes() {
        let err = Error::FileNotFound {
            path: PathBuf::from("doc.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = Error::BadFieldConfiguration {
            tag: "primary".into(),
        };
        assert_eq!(err.exit_code(), 2);

        assert_eq!(Error::MissingType.exit_code(), 2);
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::Invalid {
            issues: vec![Issue {
                path: "/data/type".into(),
                message: "missing type".into(),
            }],
        };
        assert_eq!(err.exit_code(), 1);

        let err = ValidateError::Decode(Error::FileNotFound {
            path: PathBuf::from("missing.json"),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn invalid_time_names_encoding() {
        let err = Error::InvalidTime {
            attribute: "created_at".into(),
            format: TimeFormat::Iso8601,
        };
        assert!(err.to_string().contains("ISO 8601"));

        let err = Error::InvalidTime {
            attribute: "created_at".into(),
            format: TimeFormat::Epoch,
        };
        assert!(err.to_string().contains("unix timestamps"));
    }

    #[test]
    fn issue_display() {
        let issue = Issue {
            path: "/data/relationships/posts".into(),
            message: "relationship must be an object".into(),
        };
        assert_eq!(
            issue.to_string(),
            "/data/relationships/posts: relationship must be an object"
        );
    }

    #[test]
    fn access_error_messages() {
        assert_eq!(AccessError::Null.to_string(), "value is null");
        assert_eq!(AccessError::Unspecified.to_string(), "value is not specified");
    }
}

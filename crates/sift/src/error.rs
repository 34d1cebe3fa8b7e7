//! Error types for the sift crate.

use thiserror::Error;

use crate::mode::{DataType, Mode};

/// Errors that can occur when building or executing a filter set.
#[derive(Debug, Error)]
pub enum SiftError {
    /// A predicate or sort key names a field the registry does not know.
    ///
    /// Only raised under [`UnknownFieldPolicy::Reject`](crate::UnknownFieldPolicy::Reject);
    /// the default policy skips such predicates.
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// A record or literal value cannot be coerced to the declared data type.
    #[error("type mismatch on field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: DataType,
        found: String,
    },

    /// The comparison mode is not valid for the declared data type.
    #[error("mode '{mode}' is not supported for {data_type} field '{field}'")]
    UnsupportedMode {
        field: String,
        mode: Mode,
        data_type: DataType,
    },

    /// A range predicate is missing a bound or its bounds are inverted.
    #[error("malformed range on field '{field}': {reason}")]
    MalformedRange { field: String, reason: String },

    /// A `matches` predicate carries an invalid regular expression.
    #[error("invalid pattern on field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// The requested page window is unusable.
    #[error("invalid page request: {reason}")]
    InvalidPage { reason: &'static str },

    /// The wire-format request could not be decoded.
    #[error("invalid filter request: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SiftError {
    pub(crate) fn mismatch(field: &str, expected: DataType, found: impl Into<String>) -> Self {
        SiftError::TypeMismatch {
            field: field.to_string(),
            expected,
            found: found.into(),
        }
    }

    pub(crate) fn malformed_range(field: &str, reason: impl Into<String>) -> Self {
        SiftError::MalformedRange {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;

//! Error types.
//!
//! Every failure is pushed to the caller untouched: nothing in the core retries,
//! and each variant carries the statement text, parameter name, or column name
//! needed to diagnose it.

use thiserror::Error;

/// Result type alias used throughout rowmap.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error taxonomy shared by the codec, mapper, statements and drivers.
#[derive(Debug, Error)]
pub enum Error {
    /// The SQL text references `@name` but nothing was bound under that name.
    #[error("parameter `@{name}` is referenced but never bound in `{sql}`")]
    UnboundParameter {
        /// The parameter name, without the `@` prefix.
        name: String,
        /// The statement text.
        sql: String,
    },

    /// A single-row fetch found no rows.
    #[error("query returned no rows: `{sql}`")]
    EmptyResult {
        /// The statement text (empty when mapping a bare cursor).
        sql: String,
    },

    /// A stored value cannot decode into the declared field type.
    #[error("column `{column}` holds {found}, which cannot decode into {expected}")]
    TypeMismatch {
        /// Column the value came from.
        column: String,
        /// Name of the declared Rust type.
        expected: &'static str,
        /// Storage class (and, for parse failures, the offending text).
        found: String,
    },

    /// The connection rejected the statement (schema, constraint or I/O).
    #[error("store rejected `{sql}`: {message}")]
    Persistence {
        /// The statement text.
        sql: String,
        /// Driver-supplied description.
        message: String,
        /// Underlying driver error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A shape was persisted by identity but declares no identity field.
    #[error("shape `{shape}` has no identity field")]
    MissingIdentity {
        /// Rust type name of the shape.
        shape: &'static str,
    },

    /// Invalid driver configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a driver error raised while running `sql`.
    pub fn persistence<E>(sql: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Persistence {
            sql: sql.to_string(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Attach a column name to a codec failure.
    pub fn type_mismatch(column: &str, err: DecodeError) -> Self {
        Error::TypeMismatch {
            column: column.to_string(),
            expected: err.expected,
            found: err.found,
        }
    }

    /// True for [`Error::EmptyResult`].
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Error::EmptyResult { .. })
    }

    /// True for [`Error::UnboundParameter`].
    pub fn is_unbound_parameter(&self) -> bool {
        matches!(self, Error::UnboundParameter { .. })
    }

    /// True for [`Error::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    /// True for [`Error::Persistence`].
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }
}

/// A codec failure before the column it came from is known.
///
/// The row mapper turns this into [`Error::TypeMismatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct DecodeError {
    /// Name of the declared Rust type.
    pub expected: &'static str,
    /// What the store actually held.
    pub found: String,
}

impl DecodeError {
    /// Create a decode error.
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

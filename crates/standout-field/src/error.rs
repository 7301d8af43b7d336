//! Error types for the field crate.

use thiserror::Error;

use crate::identifier::ColumnIdentifier;

/// Errors that can occur when building fields or evaluating orderings and finders.
///
/// A null foreign key is never an error: finders report it as an empty result.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A required part of a field or foreign key was never supplied to its builder.
    #[error("cannot build field: missing {component}")]
    MissingComponent { component: &'static str },

    /// An identifier part that must name something was empty.
    #[error("identifier {part} name must not be empty")]
    EmptyIdentifier { part: &'static str },

    /// An ordering without a null policy met a null value.
    #[error("null value in column '{column}' cannot be ordered without a null policy")]
    UnexpectedNull { column: ColumnIdentifier },

    /// A single-result lookup was requested over a relationship that is not unique.
    #[error("column '{column}' is not unique; use the full finder instead")]
    NotUnique { column: ColumnIdentifier },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for field operations.
pub type Result<T> = std::result::Result<T, FieldError>;

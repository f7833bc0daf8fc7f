use thiserror::Error;

/// Errors raised while building a query from caller-supplied names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Identifier must not be empty")]
    EmptyIdentifier,

    /// NUL cannot be quoted in either MySQL or PostgreSQL identifiers.
    #[error("Identifier contains a NUL character: {0:?}")]
    NulInIdentifier(String),

    #[error("Column list must not be empty; omit it to select every column")]
    EmptyProjection,
}

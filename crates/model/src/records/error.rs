use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A row does not have one value per column.
    #[error("Row {row} has {actual} values but the table has {expected} columns")]
    ArityMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

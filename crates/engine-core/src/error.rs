use connectors::sql::base::error::{ConnectorError, DbError};
use model::records::error::RecordError;
use planner::error::QueryError;
use thiserror::Error;

/// Every way a single table fetch can fail. No partial result accompanies
/// any of them.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The database could not be reached or refused the credentials.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectorError),

    /// A statement was rejected, or the session broke mid-fetch.
    #[error("Query error: {0}")]
    Query(#[from] DbError),

    /// The request was refused before any connection was opened.
    #[error("Invalid fetch request: {0}")]
    InvalidRequest(String),

    /// The server returned rows whose width disagrees with its own column list.
    #[error("Malformed result set: {0}")]
    Malformed(#[from] RecordError),
}

impl From<QueryError> for FetchError {
    fn from(err: QueryError) -> Self {
        FetchError::InvalidRequest(err.to_string())
    }
}

impl FetchError {
    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Connection(_))
    }
}

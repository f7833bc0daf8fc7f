use thiserror::Error;

/// All errors coming from the database/query layer once a connection exists.
#[derive(Debug, Error)]
pub enum DbError {
    /// MySQL driver error (rejected SQL, unknown table or column, lost connection).
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// `COUNT(*)` returned no row or a value that is not a row count.
    #[error("Invalid row count: {0}")]
    InvalidCount(String),

    /// A PostgreSQL cell whose type has no lossless [`Value`] form.
    ///
    /// [`Value`]: model::core::value::Value
    #[error("Cannot decode column `{column}` of type `{pg_type}`: {source}")]
    Decode {
        column: String,
        pg_type: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// The adapter was used after `close`.
    #[error("Connection already closed")]
    Closed,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors happening during adapter or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// MySQL host unreachable or credentials rejected.
    #[error("MySQL connection failed: {0}")]
    MySql(#[from] mysql_async::Error),

    /// PostgreSQL host unreachable or credentials rejected.
    #[error("PostgreSQL connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Invalid connection settings: {0}")]
    InvalidSettings(String),
}

use connectors::sql::base::error::{ConnectorError, DbError};
use engine_core::error::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing connection setting: pass --{flag} or set {var}")]
    MissingSetting {
        flag: &'static str,
        var: &'static str,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("Connection failed: {0}")]
    Connection(#[from] ConnectorError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

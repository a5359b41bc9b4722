//! Error types for repldiff operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepldiffError>;

#[derive(Error, Debug)]
pub enum RepldiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Connection to {side} failed: {message}")]
    Connection { side: String, message: String },

    #[error("No column metadata found for table {schema}.{table}")]
    MetadataNotFound { schema: String, table: String },

    #[error("Read from {side} failed: {message}")]
    SourceRead { side: String, message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl RepldiffError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn connection(side: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connection {
            side: side.into(),
            message: msg.into(),
        }
    }

    pub fn metadata_not_found(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self::MetadataNotFound {
            schema: schema.into(),
            table: table.into(),
        }
    }

    pub fn source_read(side: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::SourceRead {
            side: side.into(),
            message: msg.into(),
        }
    }
}

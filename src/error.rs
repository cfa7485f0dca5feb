//! Error handling for classification pipeline invocations.
//!
//! Only table-level failures are errors. Cell-level parse failures degrade
//! to absent/unknown values inside the pipeline and never surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SemaforoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Source not found at path: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Source table '{table}' could not be read: {reason}")]
    SourceUnreadable { table: String, reason: String },

    #[error("Source table '{table}' has no header row")]
    EmptySource { table: String },

    #[error("Required column '{column}' missing from table '{table}'")]
    MissingColumn { table: String, column: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid timer transition: {reason}")]
    InvalidTimerTransition { reason: String },

    #[error("Pipeline run {generation} was superseded by a newer run")]
    RunSuperseded { generation: u64 },

    #[error("Export to {path} failed: {reason}")]
    Export { path: PathBuf, reason: String },
}

impl SemaforoError {
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SemaforoError>;

use std::path::PathBuf;

use drawing::{ColorParseError, ExportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid color: {0}")]
    Color(#[from] ColorParseError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

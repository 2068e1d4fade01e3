use std::path::PathBuf;

use thiserror::Error;

use shared_models::error::AppError;

use crate::table::TableKind;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed table file {}: {}", .path.display(), .source)]
    Malformed {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("Uploaded {table} data is not valid CSV: {source}")]
    InvalidUpload {
        table: TableKind,
        source: csv::Error,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidUpload { .. } => AppError::BadRequest(err.to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

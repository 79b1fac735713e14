//! Error types raised while converting a methylation table into count
//! matrices.
//!
//! Every error is raised at the point of detection and propagated unchanged;
//! no stage attempts to recover a partial result.

use polars::error::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Malformed coordinate at row {row}: {reason}")]
    MalformedCoordinate { row: usize, reason: String },

    #[error(
        "Dimension mismatch: {beta} beta columns but {coverage} coverage columns"
    )]
    DimensionMismatch { beta: usize, coverage: usize },

    #[error(
        "Sample count mismatch: metadata has {metadata} samples, matrix has \
         {columns} columns"
    )]
    SampleCountMismatch { metadata: usize, columns: usize },

    #[error("Missing value at ({row}, {col}) could not be resolved")]
    MissingValueResolution { row: usize, col: usize },

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what:     String,
        expected: usize,
        actual:   usize,
    },

    #[error("Invalid measurement at ({row}, {col}): {reason}")]
    InvalidMeasurement {
        row:    usize,
        col:    usize,
        reason: String,
    },

    #[error("Invalid sample metadata: {0}")]
    InvalidMetadata(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Sparse matrix error: {0}")]
    Sparse(String),

    #[error("Dense matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("External collaborator failed: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

impl From<nalgebra_sparse::SparseFormatError> for ConversionError {
    fn from(err: nalgebra_sparse::SparseFormatError) -> Self {
        ConversionError::Sparse(format!("Sparse format error: {:?}", err))
    }
}

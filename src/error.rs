//! Polar diagram errors

use thiserror::Error;

/// Result type for polar diagram construction, reading and writing
pub type Result<T> = std::result::Result<T, PolarDiagramError>;

/// Errors that prevent a polar diagram from being built, read or written.
///
/// Sparse or gappy boat speed data is never reported here, the missing value
/// filler resolves it on its own.
#[derive(Debug, Error)]
pub enum PolarDiagramError {
    #[error("boat speed table has shape ({rows}, {columns}) but the axes describe {wind_angles} wind angles and {wind_speeds} wind speeds")]
    DimensionMismatch {
        rows: usize,
        columns: usize,
        wind_angles: usize,
        wind_speeds: usize,
    },

    #[error("{axis} axis is empty")]
    EmptyAxis { axis: &'static str },

    #[error("{axis} axis contains the duplicate value {value}")]
    DuplicateAxisValue { axis: &'static str, value: f64 },

    #[error("{axis} axis contains the non-finite value {value}")]
    NonFiniteAxisValue { axis: &'static str, value: f64 },

    #[error("boat speed at row {row}, column {column} is not finite")]
    NonFiniteBoatSpeed { row: usize, column: usize },

    #[error("invalid weighted points: {0}")]
    InvalidWeights(String),

    #[error("query has {wind_speeds} wind speeds and {wind_angles} wind angles")]
    QueryLengthMismatch {
        wind_speeds: usize,
        wind_angles: usize,
    },

    #[error("neighbourhood {parameter} must be positive, got {value}")]
    NonPositiveParameter { parameter: &'static str, value: f64 },

    #[error("unknown polar diagram format `{0}`")]
    UnknownFormat(String),

    #[error("no polar diagram type named `{0}` exists")]
    UnknownDiagramType(String),

    #[error("failed to parse polar diagram data: {0}")]
    ParseFailure(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

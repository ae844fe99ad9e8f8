//! Chart error taxonomy.

use crate::types::SeriesId;
use streamline_render::{ColorParseError, ResourceError};

/// Errors surfaced by the chart crates.
///
/// None of these are transient. `Configuration` happens at construction,
/// `UnsupportedMutation` and `Assertion` halt the frame loop rather than
/// draw a corrupted chart.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A GPU resource (buffer, pipeline) could not be created.
    #[error("GPU resource unavailable: {0}")]
    Configuration(#[from] ResourceError),

    /// The series shrank between syncs; buffered geometry no longer matches
    /// the data and cannot be repaired incrementally.
    #[error(
        "series data shrank from {buffered} buffered points to {data_len}; \
         removing points from a streaming series is not supported"
    )]
    UnsupportedMutation { buffered: usize, data_len: usize },

    /// Internal bookkeeping mismatch.
    #[error("internal assertion failed: {0}")]
    Assertion(String),

    /// A point was appended with an x smaller than its predecessor's.
    #[error("point {index} has x = {x}, which is before the previous x = {previous}")]
    NonMonotonic { index: usize, previous: f64, x: f64 },

    /// A point was appended with a NaN or infinite x.
    #[error("point {index} has non-finite x = {x}")]
    NonFiniteX { index: usize, x: f64 },

    #[error("no series with id {0:?}")]
    UnknownSeries(SeriesId),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error("invalid chart options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

pub type ChartResult<T> = Result<T, ChartError>;

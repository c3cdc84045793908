//! Error types for linemod.

use thiserror::Error;

/// Result alias for linemod operations.
pub type LinemodResult<T> = std::result::Result<T, LinemodError>;

/// Errors that can occur while learning or matching templates.
#[derive(Debug, Error, PartialEq)]
pub enum LinemodError {
    /// An image was constructed with a zero-sized dimension.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer is too short for the requested dimensions.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Two images that must agree in size do not.
    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {got_width}x{got_height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        got_width: usize,
        got_height: usize,
    },
    /// The learning mask contains no foreground pixels.
    #[error("mask contains no foreground region")]
    NoForegroundRegion,
    /// A view index exceeds the number of stored views.
    #[error("view index {index} out of range for feature set with {len} views")]
    ViewIndexOutOfRange { index: usize, len: usize },
    /// Parallel detection arrays disagree in length.
    #[error("parallel detection arrays have mismatched lengths ({left} vs {right})")]
    MismatchedLengths { left: usize, right: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Encoding or decoding a template blob failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

//! Error types for phasecorr.

use thiserror::Error;

/// Result alias for phasecorr operations.
pub type PhaseCorrResult<T> = std::result::Result<T, PhaseCorrError>;

/// Errors that can occur when padding, transforming or correlating grids.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhaseCorrError {
    /// A grid shape is malformed or incompatible with the requested operation.
    #[error("shape error: {reason}")]
    Shape { reason: String },
    /// The grid rank is not accepted by the operation.
    #[error("unsupported rank {rank}: {context} supports rank {supported}")]
    UnsupportedRank {
        rank: usize,
        supported: &'static str,
        context: &'static str,
    },
    /// A transform mode selector could not be resolved.
    #[error("invalid transform mode: {mode}")]
    InvalidMode { mode: String },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the image width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Conversion to or from the `image` crate failed.
    #[error("image i/o: {reason}")]
    ImageIo { reason: String },
}

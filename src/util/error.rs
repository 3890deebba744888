//! Error types for imgsim.

use crate::channel::Channel;
use crate::image::Size;
use thiserror::Error;

/// Result alias for imgsim operations.
pub type SimResult<T> = std::result::Result<T, SimError>;

/// Coarse classification of a [`SimError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied argument is out of its valid range.
    InvalidArgument,
    /// The two images do not share the same dimensions.
    SizeMismatch,
    /// The similarity score fell below the requested threshold.
    SimilarityBelowThreshold,
    /// An image could not be constructed or decoded.
    Image,
}

/// Errors that can occur when comparing images.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimError {
    /// The threshold is NaN or outside `[-1.0, 1.0]`.
    #[error("invalid threshold: {threshold} (expected a value in [-1.0, 1.0])")]
    InvalidThreshold { threshold: f64 },
    /// The actual and expected images differ in width or height.
    #[error(
        "the actual image {actual} is not the same size as the expected image {expected}"
    )]
    SizeMismatch { actual: Size, expected: Size },
    /// The computed similarity is lower than the threshold.
    #[error(
        "the images are not visually similar: expected >= {threshold}, actual {score} \
         (worst channel: {channel})"
    )]
    BelowThreshold {
        score: f64,
        threshold: f64,
        channel: Channel,
    },
    /// Image dimensions must be non-zero and addressable.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer does not hold exactly `width * height` pixels.
    #[error("pixel buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch { expected: usize, got: usize },
    /// Failed to load or decode an image.
    #[cfg(feature = "image-io")]
    #[error("image I/O error: {reason}")]
    ImageIo { reason: String },
}

impl SimError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::InvalidThreshold { .. } => ErrorKind::InvalidArgument,
            SimError::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            SimError::BelowThreshold { .. } => ErrorKind::SimilarityBelowThreshold,
            SimError::InvalidDimensions { .. } | SimError::BufferLengthMismatch { .. } => {
                ErrorKind::Image
            }
            #[cfg(feature = "image-io")]
            SimError::ImageIo { .. } => ErrorKind::Image,
        }
    }
}

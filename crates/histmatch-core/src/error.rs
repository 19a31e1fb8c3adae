//! Error types for histmatch-core operations.
//!
//! Covers the failure modes of building plane buffers and frames:
//! buffers too short for their geometry, strides narrower than a row,
//! and frames whose planes disagree with their format.
//!
//! # Usage
//!
//! ```rust
//! use histmatch_core::{Error, Result};
//!
//! fn check_stride(stride: usize, width: u32) -> Result<()> {
//!     if stride < width as usize {
//!         return Err(Error::InvalidStride {
//!             stride,
//!             min_stride: width as usize,
//!             width,
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or accessing planes and frames.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid plane or frame dimensions.
    ///
    /// Returned when dimensions would overflow buffer size calculations,
    /// or when a buffer does not hold enough samples for them.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Stride is smaller than the row width.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride
        stride: usize,
        /// Minimum required stride
        min_stride: usize,
        /// Plane width
        width: u32,
    },

    /// Two planes that must be the same size are not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First plane width
        a_width: u32,
        /// First plane height
        a_height: u32,
        /// Second plane width
        b_width: u32,
        /// Second plane height
        b_height: u32,
    },

    /// Plane index does not exist in the frame format.
    #[error("plane {index} out of range for a {planes}-plane format")]
    PlaneOutOfRange {
        /// Requested plane index
        index: usize,
        /// Number of planes in the format
        planes: usize,
    },

    /// Frame format cannot be represented by 8-bit planes.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// Format name or description
        format: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 100), (200, 50));
        let msg = err.to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("200x50"));
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(4, 4, "buffer holds 3 samples");
        assert!(err.to_string().contains("4x4"));
        assert!(err.to_string().contains("3 samples"));
    }
}

//! Curve error types.

use thiserror::Error;

/// Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur while estimating, applying or loading curves.
#[derive(Debug, Error)]
pub enum CurveError {
    /// Source and reference (or source and destination) planes differ in size.
    #[error("plane size mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    SizeMismatch {
        /// First plane width
        a_width: u32,
        /// First plane height
        a_height: u32,
        /// Second plane width
        b_width: u32,
        /// Second plane height
        b_height: u32,
    },

    /// Parse error when loading curve files.
    #[error("parse error: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CurveError {
    pub(crate) fn size_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::SizeMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }
}

//! Error types for matching operations.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for frame and clip processing.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Filter construction failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Curve drawing failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Histogram or lookup failure.
    #[error(transparent)]
    Curve(#[from] histmatch_curve::CurveError),

    /// Plane or frame access failure.
    #[error(transparent)]
    Core(#[from] histmatch_core::Error),

    /// A frame does not match the info the filter was built for.
    #[error("{clip} frame {frame} does not match the clip format: {reason}")]
    FrameMismatch {
        /// Which input clip
        clip: &'static str,
        /// Frame number
        frame: usize,
        /// What differs
        reason: String,
    },

    /// An input clip holds no frames.
    #[error("{0} clip is empty")]
    EmptyClip(&'static str),
}

/// Result type for matching operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Invalid filter parameters or input clips.
///
/// Raised by [`crate::MatchHistogram::new`] before any frame is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `smoothing_window < 0`.
    #[error("smoothing_window must not be negative.")]
    NegativeSmoothingWindow,

    /// Input clips differ in format.
    #[error("the clips must have the same format.")]
    FormatMismatch,

    /// Source and reference differ in size.
    #[error("the first two clips must have the same dimensions.")]
    DimensionMismatch,

    /// Variable format or zero dimensions.
    #[error("the clips must have constant format and dimensions.")]
    VariableFormat,

    /// More than 8 bits per sample, or RGB.
    #[error("the clips must have 8 bits per sample and must not be RGB.")]
    UnsupportedFormat,

    /// Plane index outside `0..num_planes`.
    #[error("plane index out of range")]
    PlaneOutOfRange,

    /// Plane listed more than once.
    #[error("plane specified twice")]
    DuplicatePlane,

    /// `show` needs room for the 256×256 overlay.
    #[error("clips must be at least 256x256 pixels when show is True.")]
    TooSmallForShow,

    /// `debug` draws a single diagram.
    #[error("only one plane can be processed at a time when debug is True.")]
    TooManyDebugPlanes,

    /// Parameter file with an unknown extension.
    #[error("unsupported parameter file: {0}")]
    UnknownConfigFormat(PathBuf),

    /// Parameter file could not be read or parsed.
    #[error("failed to load parameters from {path}: {reason}")]
    Load {
        /// File path
        path: PathBuf,
        /// Underlying error
        reason: String,
    },
}

/// Result type for parameter validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Canvas problems while drawing a curve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Canvas cannot hold 256×256 samples.
    #[error("canvas {width}x{height} is smaller than 256x256")]
    CanvasTooSmall {
        /// Canvas width
        width: u32,
        /// Canvas height
        height: u32,
    },
}

/// Result type for curve rendering.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_messages() {
        assert_eq!(
            ConfigError::NegativeSmoothingWindow.to_string(),
            "smoothing_window must not be negative."
        );
        assert_eq!(ConfigError::DuplicatePlane.to_string(), "plane specified twice");
    }

    #[test]
    fn test_ops_wraps_config_transparently() {
        let err: OpsError = ConfigError::PlaneOutOfRange.into();
        assert_eq!(err.to_string(), "plane index out of range");
    }
}

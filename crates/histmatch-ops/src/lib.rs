//! # histmatch-ops
//!
//! Histogram matching of planar 8-bit frames and clips.
//!
//! # Modules
//!
//! - [`matcher`] - parameter validation and per-frame processing
//! - [`render`] - curve overlay and diagram drawing
//! - [`parallel`] - frame-parallel clip processing
//!
//! # Example
//!
//! ```rust,ignore
//! use histmatch_ops::{parallel, MatchHistogram, MatchParams};
//!
//! let params = MatchParams { planes: vec![0, 1, 2], ..Default::default() };
//! let filter = MatchHistogram::new(&params, &source.info(), &reference.info(), Some(&target.info()))?;
//! let out = parallel::process_clip(&filter, &source, &reference, Some(&target))?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod matcher;
pub mod parallel;
pub mod render;

pub use error::{ConfigError, ConfigResult, OpsError, OpsResult, RenderError, RenderResult};
pub use matcher::{MatchHistogram, MatchParams};
pub use parallel::process_clip;

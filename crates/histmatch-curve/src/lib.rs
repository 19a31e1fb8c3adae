//! # histmatch-curve
//!
//! Histogram-matching curves for 8-bit planes.
//!
//! - [`JointHistogram`] - per-source-level sums and counts of a reference plane
//! - [`estimate`] / [`compute_curve`] - raw mapping, gap fill, reflective
//!   extrapolation and box smoothing
//! - [`Curve`] - 256-entry lookup table, applied in or out of place
//! - [`cube`] - `.cube` export and import
//!
//! # Example
//!
//! ```rust,ignore
//! use histmatch_curve::compute_curve;
//!
//! let curve = compute_curve(&source.view(), &reference.view(), false, 8)?;
//! curve.apply(&target.view(), &mut output.view_mut())?;
//! ```

#![warn(missing_docs)]

mod curve;
mod error;
mod estimate;
mod histogram;

pub mod cube;

pub use curve::{rounded_div, Curve};
pub use error::{CurveError, CurveResult};
pub use estimate::{compute_curve, estimate, EstimateOptions, DEFAULT_SMOOTHING_RADIUS};
pub use histogram::JointHistogram;

/// Number of levels of an 8-bit sample.
pub const LEVELS: usize = 256;

//! # histmatch-core
//!
//! Core types for histogram matching of planar video frames.
//!
//! - [`Plane`], [`PlaneView`], [`PlaneViewMut`] - 8-bit sample grids with a row stride
//! - [`Frame`] - A planar picture in a [`FrameFormat`]
//! - [`Clip`], [`VideoInfo`] - Frame sequences and their shared description
//!
//! ## Crate Structure
//!
//! ```text
//! histmatch-core (this crate)
//!    ^
//!    |
//!    +-- histmatch-curve (histogram, curve estimation, lookup)
//!    +-- histmatch-ops (rendering, frame processing)
//!    +-- histmatch-io (PNG / Y4M)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod frame;
pub mod plane;

pub use error::{Error, Result};
pub use format::{ColorFamily, FrameFormat};
pub use frame::{Clip, Frame, VideoInfo};
pub use plane::{Plane, PlaneView, PlaneViewMut};

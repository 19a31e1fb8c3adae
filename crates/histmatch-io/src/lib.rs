//! # histmatch-io
//!
//! Clip reading and writing for histogram matching.
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | PNG    | ✓    | ✓     | 8-bit gray / RGB, single frame |
//! | Y4M    | ✓    | ✓     | 8-bit mono, 4:2:0, 4:2:2, 4:4:4 |
//!
//! # Example
//!
//! ```rust,ignore
//! use histmatch_io::{read, write};
//!
//! let clip = read("input.y4m")?;
//! write("output.y4m", &clip)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;

pub mod png;
pub mod y4m;

pub use detect::Format;
pub use error::{IoError, IoResult};

use histmatch_core::Clip;
use std::path::Path;

/// Reads a clip, detecting the format from content and extension.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Clip> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Png => png::read(path),
        Format::Y4m => y4m::read(path),
        Format::Unknown => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Writes a clip in the format named by the path's extension.
pub fn write<P: AsRef<Path>>(path: P, clip: &Clip) -> IoResult<()> {
    let path = path.as_ref();
    match Format::from_extension(path) {
        Format::Png => png::write(path, clip),
        Format::Y4m => y4m::write(path, clip),
        Format::Unknown => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

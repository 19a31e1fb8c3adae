//! CLI command implementations

pub mod apply;
pub mod curve;
pub mod matching;

use anyhow::{Context, Result};
use histmatch_core::Clip;
use std::path::Path;

/// Load clip from path
pub fn load_clip(path: &Path) -> Result<Clip> {
    histmatch_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save clip to path
pub fn save_clip(path: &Path, clip: &Clip) -> Result<()> {
    histmatch_io::write(path, clip).with_context(|| format!("Failed to save: {}", path.display()))
}

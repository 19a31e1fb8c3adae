//! Curve application command

use crate::ApplyArgs;
use anyhow::{bail, Context, Result};
use histmatch_core::{Clip, Frame};
use histmatch_curve::{cube, Curve};
use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    let curve = cube::read_curve(&args.curve)
        .with_context(|| format!("Failed to load curve: {}", args.curve.display()))?;
    let clip = super::load_clip(&args.input)?;

    if verbose > 0 {
        println!("Applying {} to {}", args.curve.display(), args.input.display());
    }

    let output = apply_to_clip(clip, &curve, &args.planes)?;
    super::save_clip(&args.output, &output)?;

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}

fn apply_to_clip(clip: Clip, curve: &Curve, planes: &[usize]) -> Result<Clip> {
    let fps = clip.fps();
    let mut frames = clip.into_frames();

    if let Some(first) = frames.first() {
        if let Some(&bad) = planes.iter().find(|&&p| p >= first.num_planes()) {
            bail!("plane {} out of range for {}", bad, first.format());
        }
    }

    frames
        .par_iter_mut()
        .try_for_each(|frame: &mut Frame| -> Result<()> {
            for &p in planes {
                curve.apply_in_place(&mut frame.plane_mut(p)?);
            }
            Ok(())
        })?;
    debug!(frames = frames.len(), ?planes, "curve applied");

    let out = Clip::new(frames);
    Ok(match fps {
        Some(fps) => out.with_fps(fps),
        None => out,
    })
}

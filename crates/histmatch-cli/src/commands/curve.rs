//! Curve inspection and export command

use crate::CurveArgs;
use anyhow::{bail, Context, Result};
use histmatch_curve::cube;
use histmatch_ops::{MatchHistogram, MatchParams};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: CurveArgs, verbose: u8) -> Result<()> {
    let source = super::load_clip(&args.source)?;
    let reference = super::load_clip(&args.reference)?;

    let params = MatchParams {
        raw: args.raw,
        smoothing_window: args.smoothing_window,
        planes: vec![args.plane],
        ..MatchParams::default()
    };
    let filter = MatchHistogram::new(&params, &source.info(), &reference.info(), None)
        .context("MatchHistogram")?;

    let (Some(src), Some(reference)) = (source.frames().first(), reference.frames().first()) else {
        bail!("Input clips must hold at least one frame");
    };
    // plane was range-checked above
    let curve = filter.curve(src, reference, args.plane as usize)?;

    if let Some(path) = &args.cube {
        cube::write_curve(path, &curve)
            .with_context(|| format!("Failed to write curve: {}", path.display()))?;
        if verbose > 0 {
            println!("Wrote {}", path.display());
        }
    }

    if args.json {
        let doc = serde_json::json!({
            "plane": args.plane,
            "raw": args.raw,
            "smoothing_window": args.smoothing_window,
            "curve": &curve.as_table()[..],
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else if args.cube.is_none() {
        for (level, value) in curve.iter() {
            println!("{:3} -> {:3}", level, value);
        }
    }
    Ok(())
}

//! Histogram matching command

use crate::MatchArgs;
use anyhow::{Context, Result};
use histmatch_ops::{process_clip, MatchHistogram, MatchParams};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: MatchArgs, verbose: u8) -> Result<()> {
    let params = build_params(&args)?;
    debug!(?params, "match parameters");

    let source = super::load_clip(&args.source)?;
    let reference = super::load_clip(&args.reference)?;
    let target = args.target.as_deref().map(super::load_clip).transpose()?;

    let filter = MatchHistogram::new(
        &params,
        &source.info(),
        &reference.info(),
        target.as_ref().map(|t| t.info()).as_ref(),
    )
    .context("MatchHistogram")?;

    if verbose > 0 {
        println!(
            "Matching {} to {} ({} frames)",
            args.source.display(),
            args.reference.display(),
            filter.output_info().num_frames
        );
    }

    let output = process_clip(&filter, &source, &reference, target.as_ref())?;
    super::save_clip(&args.output, &output)?;
    info!(frames = output.len(), output = %args.output.display(), "match finished");

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}

fn build_params(args: &MatchArgs) -> Result<MatchParams> {
    let mut params = match &args.config {
        Some(path) => MatchParams::from_path(path)?,
        None => MatchParams::default(),
    };
    params.raw |= args.raw;
    params.show |= args.show;
    params.debug |= args.debug;
    if let Some(window) = args.smoothing_window {
        params.smoothing_window = window;
    }
    if let Some(planes) = &args.planes {
        params.planes = planes.clone();
    }
    Ok(params)
}

//! Clip-level processing using Rayon.
//!
//! Output frames are independent of each other, so a clip is processed
//! frame-parallel on the global Rayon pool. Inputs shorter than the output
//! repeat their last frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use histmatch_ops::{parallel, MatchHistogram, MatchParams};
//!
//! let filter = MatchHistogram::new(&MatchParams::default(), &src.info(), &reference.info(), None)?;
//! let matched = parallel::process_clip(&filter, &src, &reference, None)?;
//! ```

use crate::{MatchHistogram, OpsError, OpsResult};
use histmatch_core::{Clip, Frame};
use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

fn clamped<'a>(clip: &'a Clip, n: usize, name: &'static str) -> OpsResult<&'a Frame> {
    clip.frame_clamped(n).ok_or(OpsError::EmptyClip(name))
}

/// Runs `filter` over whole clips.
///
/// The output has as many frames as `target` (or `source` when there is no
/// target). Debug filters ignore `target` and follow `source`. Frame `n`
/// reads frame `min(n, len - 1)` of every input. The first failing frame
/// aborts the clip.
pub fn process_clip(
    filter: &MatchHistogram,
    source: &Clip,
    reference: &Clip,
    target: Option<&Clip>,
) -> OpsResult<Clip> {
    let target = target.filter(|_| !filter.is_debug());
    let driver = target.unwrap_or(source);
    let len = driver.len();
    if len == 0 {
        return Err(OpsError::EmptyClip(if target.is_some() { "target" } else { "source" }));
    }
    debug!(frames = len, debug = filter.is_debug(), "processing clip");

    let frames = (0..len)
        .into_par_iter()
        .map(|n| {
            let src = clamped(source, n, "source")?;
            let reference = clamped(reference, n, "reference")?;
            let target = target.map(|t| clamped(t, n, "target")).transpose()?;
            let out = filter.process_frame(n, src, reference, target)?;
            trace!(frame = n, "frame done");
            Ok(out)
        })
        .collect::<OpsResult<Vec<_>>>()?;

    let clip = Clip::new(frames);
    Ok(match driver.fps() {
        Some(fps) => clip.with_fps(fps),
        None => clip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchParams;
    use histmatch_core::FrameFormat;

    fn gray(value: u8) -> Frame {
        Frame::new_filled(FrameFormat::GRAY8, 4, 4, &[value]).unwrap()
    }

    #[test]
    fn test_output_length_follows_target() {
        let source = Clip::new(vec![gray(10)]);
        let reference = Clip::new(vec![gray(20), gray(30)]);
        let target = Clip::new(vec![gray(10); 5]).with_fps((24, 1));
        let filter = MatchHistogram::new(
            &MatchParams::default(),
            &source.info(),
            &reference.info(),
            Some(&target.info()),
        )
        .unwrap();

        let out = process_clip(&filter, &source, &reference, Some(&target)).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out.fps(), Some((24, 1)));
        // single-level source broadcasts the reference mean
        assert_eq!(out.frames()[0].plane(0).unwrap().get(0, 0), 20);
        // reference repeats its last frame
        assert_eq!(out.frames()[4].plane(0).unwrap().get(0, 0), 30);
    }

    #[test]
    fn test_debug_length_follows_source() {
        let source = Clip::new(vec![gray(10), gray(20)]).with_fps((30, 1));
        let target = Clip::new(vec![gray(10); 5]).with_fps((24, 1));
        let params = MatchParams {
            debug: true,
            ..MatchParams::default()
        };
        let filter =
            MatchHistogram::new(&params, &source.info(), &source.info(), Some(&target.info())).unwrap();
        assert_eq!(filter.output_info().num_frames, 2);

        let out = process_clip(&filter, &source, &source, Some(&target)).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.fps(), Some((30, 1)));
        assert_eq!(out.frames()[1].width(), 256);
    }

    #[test]
    fn test_empty_clip_is_an_error() {
        let source = Clip::new(vec![gray(1)]);
        let filter =
            MatchHistogram::new(&MatchParams::default(), &source.info(), &source.info(), None).unwrap();
        let empty = Clip::new(Vec::new());
        let err = process_clip(&filter, &source, &empty, None).unwrap_err();
        assert!(matches!(err, OpsError::EmptyClip("reference")));
    }
}

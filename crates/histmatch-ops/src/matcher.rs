//! Histogram matching filter.
//!
//! [`MatchHistogram`] is built once from [`MatchParams`] and the infos of
//! the input clips. Construction performs every check up front; afterwards
//! the filter is immutable and frames can be processed from any thread.
//!
//! # Modes
//!
//! - **normal**: each selected plane of the target is remapped through the
//!   curve estimated from the same plane of source and reference.
//! - **show**: as normal, plus a 256×256 overlay of the curves in the
//!   top-left corner of plane 0.
//! - **debug**: the output is a 256×256 diagram of the single selected
//!   plane's curve, one per source frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use histmatch_ops::{MatchHistogram, MatchParams};
//!
//! let filter = MatchHistogram::new(&MatchParams::default(), &src.info(), &reference.info(), None)?;
//! let out = filter.process_frame(&src_frame, &ref_frame, None)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::render::{render_diagram, render_overlay, CANVAS_SIZE};
use crate::{ConfigError, ConfigResult, OpsError, OpsResult};
use histmatch_core::{ColorFamily, Frame, FrameFormat, VideoInfo};
use histmatch_curve::{compute_curve, Curve, DEFAULT_SMOOTHING_RADIUS};

/// Overlay colors for planes 0, 1 and 2.
const SHOW_COLORS: [u8; 3] = [235, 160, 96];

/// Background of the overlay corner, luma then chroma.
const SHOW_BACKGROUND: [u8; 2] = [16, 128];

/// Background of a debug frame, luma then chroma.
const DEBUG_BACKGROUND: [u8; 2] = [0, 128];

const MAX_PLANES: usize = 3;

/// User-facing filter options.
///
/// Every field has a default, so partial JSON or YAML files are accepted:
///
/// ```yaml
/// smoothing_window: 4
/// planes: [0, 1, 2]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// Skip gap filling, extrapolation and smoothing.
    pub raw: bool,
    /// Draw the curves over the output.
    pub show: bool,
    /// Output a diagram of the curve instead of the matched frame.
    pub debug: bool,
    /// Smoothing radius, must not be negative.
    pub smoothing_window: i64,
    /// Plane indices to process. An empty list selects plane 0.
    pub planes: Vec<i64>,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            raw: false,
            show: false,
            debug: false,
            smoothing_window: DEFAULT_SMOOTHING_RADIUS as i64,
            planes: vec![0],
        }
    }
}

impl MatchParams {
    /// Loads parameters from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let load_err = |reason: String| ConfigError::Load {
            path: path.to_path_buf(),
            reason,
        };

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;

        match ext.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| load_err(e.to_string())),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| load_err(e.to_string()))
            }
            _ => Err(ConfigError::UnknownConfigFormat(path.to_path_buf())),
        }
    }
}

/// A validated histogram matching filter.
#[derive(Debug, Clone)]
pub struct MatchHistogram {
    raw: bool,
    show: bool,
    debug: bool,
    smoothing_radius: usize,
    process: [bool; MAX_PLANES],
    format: FrameFormat,
    source_info: VideoInfo,
    target_info: VideoInfo,
    output_info: VideoInfo,
}

impl MatchHistogram {
    /// Validates parameters against the input clips.
    ///
    /// `target` defaults to `source`. Checks run in a fixed order and the
    /// first failure is returned.
    pub fn new(
        params: &MatchParams,
        source: &VideoInfo,
        reference: &VideoInfo,
        target: Option<&VideoInfo>,
    ) -> ConfigResult<Self> {
        let target = target.unwrap_or(source);
        let show = params.show && !params.debug;

        if params.smoothing_window < 0 {
            return Err(ConfigError::NegativeSmoothingWindow);
        }
        if source.format != reference.format || source.format != target.format {
            return Err(ConfigError::FormatMismatch);
        }
        if (source.width, source.height) != (reference.width, reference.height) {
            return Err(ConfigError::DimensionMismatch);
        }
        let format = match source.format {
            Some(format) if source.is_constant() && target.width > 0 && target.height > 0 => format,
            _ => return Err(ConfigError::VariableFormat),
        };
        if format.family == ColorFamily::Rgb || format.bits_per_sample > 8 {
            return Err(ConfigError::UnsupportedFormat);
        }

        let process = select_planes(&params.planes, format.num_planes())?;

        if show
            && (source.width < CANVAS_SIZE
                || source.height < CANVAS_SIZE
                || target.width < CANVAS_SIZE
                || target.height < CANVAS_SIZE)
        {
            return Err(ConfigError::TooSmallForShow);
        }

        let output_info = if params.debug {
            if process.iter().filter(|&&p| p).count() > 1 {
                return Err(ConfigError::TooManyDebugPlanes);
            }
            VideoInfo {
                width: CANVAS_SIZE,
                height: CANVAS_SIZE,
                ..*source
            }
        } else {
            *target
        };

        debug!(
            format = %format,
            width = source.width,
            height = source.height,
            raw = params.raw,
            show,
            debug = params.debug,
            smoothing_window = params.smoothing_window,
            "MatchHistogram configured"
        );

        Ok(Self {
            raw: params.raw,
            show,
            debug: params.debug,
            smoothing_radius: params.smoothing_window as usize,
            process,
            format,
            source_info: *source,
            target_info: *target,
            output_info,
        })
    }

    /// Info of the clip this filter produces.
    #[inline]
    pub fn output_info(&self) -> &VideoInfo {
        &self.output_info
    }

    /// Whether plane `index` is selected.
    #[inline]
    pub fn processes(&self, index: usize) -> bool {
        self.process.get(index).copied().unwrap_or(false)
    }

    /// Whether the output is a curve diagram.
    #[inline]
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Estimates the curve of plane `index` of a source/reference pair.
    pub fn curve(&self, source: &Frame, reference: &Frame, index: usize) -> OpsResult<Curve> {
        let curve = compute_curve(
            &source.plane(index)?,
            &reference.plane(index)?,
            self.raw,
            self.smoothing_radius,
        )?;
        Ok(curve)
    }

    /// Produces one output frame.
    ///
    /// `frame` is only used in error messages. `target` defaults to
    /// `source`.
    pub fn process_frame(
        &self,
        frame: usize,
        source: &Frame,
        reference: &Frame,
        target: Option<&Frame>,
    ) -> OpsResult<Frame> {
        check_frame(&self.source_info, source, "source", frame)?;
        check_frame(&self.source_info, reference, "reference", frame)?;

        if self.debug {
            return self.debug_frame(source, reference);
        }

        let target = target.unwrap_or(source);
        check_frame(&self.target_info, target, "target", frame)?;

        let mut out = target.clone();
        for plane in 0..self.format.num_planes() {
            let curve = if self.process[plane] {
                let curve = self.curve(source, reference, plane)?;
                curve.apply_in_place(&mut out.plane_mut(plane)?);
                trace!(frame, plane, "plane remapped");
                Some(curve)
            } else {
                None
            };

            if self.show {
                let (w, h) = self.format.plane_dimensions(plane, CANVAS_SIZE, CANVAS_SIZE);
                out.plane_mut(plane)?
                    .fill_region(w, h, SHOW_BACKGROUND[(plane > 0) as usize]);
                if let Some(curve) = curve {
                    render_overlay(&curve, &mut out.plane_mut(0)?, SHOW_COLORS[plane])?;
                }
            }
        }
        Ok(out)
    }

    fn debug_frame(&self, source: &Frame, reference: &Frame) -> OpsResult<Frame> {
        let fill: Vec<u8> = (0..self.format.num_planes())
            .map(|p| DEBUG_BACKGROUND[(p > 0) as usize])
            .collect();
        let mut out = Frame::new_filled(self.format, CANVAS_SIZE, CANVAS_SIZE, &fill)?;

        for plane in (0..self.format.num_planes()).filter(|&p| self.process[p]) {
            let curve = self.curve(source, reference, plane)?;
            render_diagram(&curve, &mut out.plane_mut(0)?)?;
        }
        Ok(out)
    }
}

fn select_planes(planes: &[i64], num_planes: usize) -> ConfigResult<[bool; MAX_PLANES]> {
    let mut process = [false; MAX_PLANES];
    if planes.is_empty() {
        process[0] = true;
        return Ok(process);
    }
    for &p in planes {
        if p < 0 || p >= num_planes as i64 {
            return Err(ConfigError::PlaneOutOfRange);
        }
        let slot = &mut process[p as usize];
        if *slot {
            return Err(ConfigError::DuplicatePlane);
        }
        *slot = true;
    }
    Ok(process)
}

fn check_frame(info: &VideoInfo, frame: &Frame, clip: &'static str, n: usize) -> OpsResult<()> {
    if info.matches(frame) {
        return Ok(());
    }
    Err(OpsError::FrameMismatch {
        clip,
        frame: n,
        reason: format!(
            "expected {} {}x{}, got {} {}x{}",
            info.format.map(|f| f.name()).unwrap_or_else(|| "variable".into()),
            info.width,
            info.height,
            frame.format().name(),
            frame.width(),
            frame.height()
        ),
    })
}

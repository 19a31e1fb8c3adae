//! Curve estimation from a joint histogram.
//!
//! The estimator is a sequence of pure stages, each taking a 256-level
//! table and returning a new one:
//!
//! ```text
//! JointHistogram -> raw -> gap-filled -> extrapolated -> smoothed -> Curve
//! ```
//!
//! - **raw**: `rounded_div(sum, count)` per observed level, 0 elsewhere.
//!   In raw mode this is the final curve.
//! - **single level**: a source with one observed level broadcasts it.
//! - **gap fill**: linear interpolation between the nearest defined
//!   neighbours, ascending, each filled level anchoring the next.
//! - **extrapolation**: undefined tails are mirrored around the first/last
//!   defined level until levels 0 and 255 are defined.
//! - **smoothing**: box average over `[i - r, i + r)`.

use crate::{rounded_div, Curve, CurveResult, JointHistogram, LEVELS};
use histmatch_core::PlaneView;

const LAST: usize = LEVELS - 1;

/// Default smoothing radius.
pub const DEFAULT_SMOOTHING_RADIUS: usize = 8;

/// Estimation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateOptions {
    /// Keep the raw histogram mapping, with unobserved levels at 0.
    pub raw: bool,
    /// Half-width of the smoothing window, 0 disables smoothing.
    pub smoothing_radius: usize,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            raw: false,
            smoothing_radius: DEFAULT_SMOOTHING_RADIUS,
        }
    }
}

/// Curve values with a per-level "defined" mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Levels {
    value: [u8; LEVELS],
    defined: [bool; LEVELS],
}

impl Levels {
    #[inline]
    fn set(&mut self, level: usize, value: i64) {
        self.value[level] = value.clamp(0, 255) as u8;
        self.defined[level] = true;
    }

    #[inline]
    fn get(&self, level: usize) -> i64 {
        self.value[level] as i64
    }

    fn first_defined(&self) -> Option<usize> {
        self.defined.iter().position(|&d| d)
    }

    fn last_defined(&self) -> Option<usize> {
        self.defined.iter().rposition(|&d| d)
    }

    fn defined_count(&self) -> usize {
        self.defined.iter().filter(|&&d| d).count()
    }

    /// Defined levels form one unbroken run.
    fn is_contiguous(&self) -> bool {
        match (self.first_defined(), self.last_defined()) {
            (Some(first), Some(last)) => self.defined[first..=last].iter().all(|&d| d),
            _ => true,
        }
    }
}

fn raw_levels(hist: &JointHistogram) -> Levels {
    let mut levels = Levels {
        value: [0; LEVELS],
        defined: [false; LEVELS],
    };
    for (level, (&sum, &count)) in hist.sums().iter().zip(hist.counts()).enumerate() {
        if count > 0 {
            levels.set(level, rounded_div(sum as i64, count as i64));
        }
    }
    levels
}

/// The only observed level, when exactly one exists.
fn single_level(levels: &Levels) -> Option<usize> {
    let mut defined = levels.defined.iter().enumerate().filter(|&(_, &d)| d);
    match (defined.next(), defined.next()) {
        (Some((level, _)), None) => Some(level),
        _ => None,
    }
}

fn fill_gaps(mut levels: Levels) -> Levels {
    for s in 0..LEVELS {
        if levels.defined[s] {
            continue;
        }
        let prev = (0..s).rev().find(|&p| levels.defined[p]);
        let next = (s + 1..LEVELS).find(|&n| levels.defined[n]);
        if let (Some(p), Some(n)) = (prev, next) {
            let (vp, vn) = (levels.get(p), levels.get(n));
            let step = rounded_div((s - p) as i64 * (vn - vp), (n - p) as i64);
            levels.set(s, vp + step);
        }
    }
    levels
}

fn extrapolate(mut levels: Levels) -> Levels {
    debug_assert!(levels.is_contiguous(), "gap fill left holes in the interior");

    while !levels.defined[0] || !levels.defined[LAST] {
        let before = levels.defined_count();

        if !levels.defined[0] {
            if let Some(first) = levels.first_defined() {
                let anchor = levels.get(first);
                for i in 0..first {
                    let mirror = 2 * first - i;
                    if mirror <= LAST && levels.defined[mirror] {
                        levels.set(i, 2 * anchor - levels.get(mirror));
                    }
                }
            }
        }

        if !levels.defined[LAST] {
            if let Some(last) = levels.last_defined() {
                let anchor = levels.get(last);
                for i in (last + 1..LEVELS).rev() {
                    let Some(mirror) = (2 * last).checked_sub(i) else {
                        continue;
                    };
                    if levels.defined[mirror] {
                        levels.set(i, 2 * anchor - levels.get(mirror));
                    }
                }
            }
        }

        // A contiguous run of two or more levels always extends each pass.
        let progressed = levels.defined_count() > before;
        debug_assert!(progressed, "reflective extrapolation stalled");
        if !progressed {
            break;
        }
    }
    levels
}

fn smooth(values: [u8; LEVELS], radius: usize) -> [u8; LEVELS] {
    if radius == 0 {
        return values;
    }
    let mut out = [0u8; LEVELS];
    for (i, entry) in out.iter_mut().enumerate() {
        let lo = i.saturating_sub(radius);
        let hi = i.saturating_add(radius).min(LEVELS);
        let window = &values[lo..hi];
        let sum: i64 = window.iter().map(|&v| v as i64).sum();
        *entry = rounded_div(sum, window.len() as i64) as u8;
    }
    out
}

/// Derives the final curve from a joint histogram.
///
/// A histogram with no observed level yields the all-zero curve in both
/// modes.
///
/// # Example
///
/// ```rust
/// use histmatch_core::Plane;
/// use histmatch_curve::{estimate, EstimateOptions, JointHistogram};
///
/// let src = Plane::filled(2, 2, 100);
/// let hist = JointHistogram::accumulate(&src.view(), &src.view()).unwrap();
///
/// let curve = estimate(&hist, &EstimateOptions { raw: false, smoothing_radius: 0 });
/// assert!(curve.iter().all(|(_, v)| v == 100));
/// ```
pub fn estimate(hist: &JointHistogram, options: &EstimateOptions) -> Curve {
    let raw = raw_levels(hist);
    if options.raw {
        return Curve::from_table(raw.value);
    }

    let observed = raw.defined_count();
    if observed == 0 {
        return Curve::constant(0);
    }
    if let Some(level) = single_level(&raw) {
        return Curve::constant(raw.value[level]);
    }

    let filled = fill_gaps(raw);
    let extended = extrapolate(filled);
    Curve::from_table(smooth(extended.value, options.smoothing_radius))
}

/// Computes the curve that maps `source` towards `reference`.
///
/// Shorthand for [`JointHistogram::accumulate`] followed by [`estimate`].
pub fn compute_curve(
    source: &PlaneView<'_>,
    reference: &PlaneView<'_>,
    raw: bool,
    smoothing_radius: usize,
) -> CurveResult<Curve> {
    let hist = JointHistogram::accumulate(source, reference)?;
    Ok(estimate(
        &hist,
        &EstimateOptions {
            raw,
            smoothing_radius,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use histmatch_core::Plane;

    fn scenario_hist() -> JointHistogram {
        let src = Plane::from_data(2, 2, vec![10, 10, 20, 20]).unwrap();
        let reference = Plane::from_data(2, 2, vec![50, 60, 150, 160]).unwrap();
        JointHistogram::accumulate(&src.view(), &reference.view()).unwrap()
    }

    fn options(raw: bool, smoothing_radius: usize) -> EstimateOptions {
        EstimateOptions {
            raw,
            smoothing_radius,
        }
    }

    #[test]
    fn test_raw_identity_on_observed_levels() {
        let data: Vec<u8> = (0..64u32).map(|i| (i * 3 % 200) as u8).collect();
        let plane = Plane::from_data(8, 8, data.clone()).unwrap();
        let curve = compute_curve(&plane.view(), &plane.view(), true, 8).unwrap();

        for &v in &data {
            assert_eq!(curve[v], v);
        }
    }

    #[test]
    fn test_raw_leaves_gaps_at_zero() {
        let curve = estimate(&scenario_hist(), &options(true, 8));
        assert_eq!(curve[10], 55);
        assert_eq!(curve[20], 155);
        for level in (0..=255u8).filter(|&l| l != 10 && l != 20) {
            assert_eq!(curve[level], 0, "level {}", level);
        }
    }

    #[test]
    fn test_uniform_source_broadcasts() {
        let src = Plane::filled(2, 2, 100);
        let curve = compute_curve(&src.view(), &src.view(), false, 0).unwrap();
        assert_eq!(curve, Curve::constant(100));

        // smoothing does not apply to the broadcast curve
        let reference = Plane::from_data(2, 2, vec![0, 0, 0, 3]).unwrap();
        let curve = compute_curve(&src.view(), &reference.view(), false, 8).unwrap();
        assert_eq!(curve, Curve::constant(1));
    }

    #[test]
    fn test_scenario_interpolation_and_extrapolation() {
        let curve = estimate(&scenario_hist(), &options(false, 0));

        assert_eq!(curve[10], 55);
        assert_eq!(curve[20], 155);
        // linear interior
        for s in 10..=20u8 {
            assert_eq!(curve[s] as i32, 55 + (s as i32 - 10) * 10);
        }
        // bottom tail mirrored around level 10: 2*55 - curve[20 - i]
        assert_eq!(curve[9], 45);
        assert_eq!(curve[5], 5);
        assert_eq!(curve[0], 0);
        // top tail mirrored around level 20 and clamped
        assert_eq!(curve[21], 165);
        assert_eq!(curve[30], 255);
        assert_eq!(curve[255], 255);
    }

    #[test]
    fn test_gap_fill_anchors_on_filled_levels() {
        let mut hist = JointHistogram::new();
        let src = Plane::from_data(2, 1, vec![0, 3]).unwrap();
        let reference = Plane::from_data(2, 1, vec![0, 1]).unwrap();
        hist.add(&src.view(), &reference.view()).unwrap();

        let filled = fill_gaps(raw_levels(&hist));
        // level 1: 0 + rd(1*1, 3) = 0; level 2: 0 + rd(1*1, 2) = 1
        assert_eq!(filled.value[1], 0);
        assert_eq!(filled.value[2], 1);
        assert!(filled.is_contiguous());
    }

    #[test]
    fn test_gap_fill_leaves_tails_for_extrapolation() {
        let filled = fill_gaps(raw_levels(&scenario_hist()));
        assert!(filled.is_contiguous());
        assert_eq!(filled.first_defined(), Some(10));
        assert_eq!(filled.last_defined(), Some(20));
        assert!(!filled.defined[0]);
        assert!(!filled.defined[255]);
    }

    #[test]
    fn test_extrapolation_defines_every_level() {
        let extended = extrapolate(fill_gaps(raw_levels(&scenario_hist())));
        assert!(extended.defined.iter().all(|&d| d));
    }

    #[test]
    fn test_non_raw_fully_defined_for_adjacent_levels() {
        // two neighbouring levels in the middle: the longest possible tails
        let src = Plane::from_data(2, 1, vec![127, 128]).unwrap();
        let reference = Plane::from_data(2, 1, vec![100, 101]).unwrap();
        let hist = JointHistogram::accumulate(&src.view(), &reference.view()).unwrap();

        let extended = extrapolate(fill_gaps(raw_levels(&hist)));
        assert!(extended.defined.iter().all(|&d| d));
        let curve = Curve::from_table(extended.value);
        assert_eq!(curve[0], 0);
        assert_eq!(curve[255], 228);
    }

    #[test]
    fn test_smoothing_zero_is_noop() {
        let extended = extrapolate(fill_gaps(raw_levels(&scenario_hist())));
        let curve = estimate(&scenario_hist(), &options(false, 0));
        assert_eq!(curve.as_table(), &extended.value);
    }

    #[test]
    fn test_smoothing_window_is_asymmetric() {
        let mut values = [0u8; LEVELS];
        values[10] = 200;
        let smoothed = smooth(values, 1);
        // window [i - 1, i + 1) sees level 10 only from i = 10 and i = 11
        assert_eq!(smoothed[9], 0);
        assert_eq!(smoothed[10], 100);
        assert_eq!(smoothed[11], 100);
        assert_eq!(smoothed[12], 0);
        // level 0 averages only itself at radius 1
        assert_eq!(smooth([50; LEVELS], 1)[0], 50);
    }

    #[test]
    fn test_smoothing_clips_window_at_edges() {
        let values = Curve::identity();
        let smoothed = smooth(*values.as_table(), 4);
        // level 0: mean of 0..=3
        assert_eq!(smoothed[0], 2);
        // level 255: mean of 251..=255
        assert_eq!(smoothed[255], 253);
        // interior: mean of i-4 ..= i+3, rounded half up
        assert_eq!(smoothed[100], 100);
    }

    #[test]
    fn test_empty_histogram() {
        let hist = JointHistogram::new();
        assert_eq!(estimate(&hist, &options(false, 8)), Curve::constant(0));
        assert_eq!(estimate(&hist, &options(true, 8)), Curve::constant(0));
    }

    #[test]
    fn test_identity_planes_non_raw() {
        let data: Vec<u8> = (0..=255u8).collect();
        let plane = Plane::from_data(16, 16, data).unwrap();
        let curve = compute_curve(&plane.view(), &plane.view(), false, 0).unwrap();
        assert!(curve.is_identity());
    }
}

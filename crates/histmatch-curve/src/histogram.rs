//! Joint histogram of two pixel-aligned planes.
//!
//! For every position the *source* sample selects a bin, and the bin
//! accumulates the *reference* sample found at the same position:
//!
//! ```text
//! sum[src(x,y)]   += ref(x,y)
//! count[src(x,y)] += 1
//! ```
//!
//! `sum[s] / count[s]` is then the mean reference level seen wherever the
//! source had level `s`.

use crate::{CurveError, CurveResult, LEVELS};
use histmatch_core::PlaneView;

/// Per-source-level sums and counts of reference samples.
///
/// Invariant: `sum(s) == 0` whenever `count(s) == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointHistogram {
    sum: [u64; LEVELS],
    count: [u64; LEVELS],
}

impl Default for JointHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl JointHistogram {
    /// Empty histogram.
    pub const fn new() -> Self {
        Self {
            sum: [0; LEVELS],
            count: [0; LEVELS],
        }
    }

    /// Builds the histogram of `source` against `reference`.
    ///
    /// Both planes must have the same width and height; their strides may
    /// differ. Row padding is never read.
    ///
    /// # Example
    ///
    /// ```rust
    /// use histmatch_core::Plane;
    /// use histmatch_curve::JointHistogram;
    ///
    /// let src = Plane::from_data(2, 2, vec![10, 10, 20, 20]).unwrap();
    /// let reference = Plane::from_data(2, 2, vec![50, 60, 150, 160]).unwrap();
    ///
    /// let hist = JointHistogram::accumulate(&src.view(), &reference.view()).unwrap();
    /// assert_eq!(hist.count(10), 2);
    /// assert_eq!(hist.sum(20), 310);
    /// ```
    pub fn accumulate(source: &PlaneView<'_>, reference: &PlaneView<'_>) -> CurveResult<Self> {
        let mut hist = Self::new();
        hist.add(source, reference)?;
        Ok(hist)
    }

    /// Adds another pair of aligned planes to this histogram.
    pub fn add(&mut self, source: &PlaneView<'_>, reference: &PlaneView<'_>) -> CurveResult<()> {
        if source.dimensions() != reference.dimensions() {
            return Err(CurveError::size_mismatch(source.dimensions(), reference.dimensions()));
        }
        for (src_row, ref_row) in source.rows().zip(reference.rows()) {
            for (&s, &r) in src_row.iter().zip(ref_row) {
                self.sum[s as usize] += r as u64;
                self.count[s as usize] += 1;
            }
        }
        Ok(())
    }

    /// Sum of reference samples observed at source level `level`.
    #[inline]
    pub fn sum(&self, level: u8) -> u64 {
        self.sum[level as usize]
    }

    /// Number of positions where the source had level `level`.
    #[inline]
    pub fn count(&self, level: u8) -> u64 {
        self.count[level as usize]
    }

    /// All sums, indexed by source level.
    #[inline]
    pub fn sums(&self) -> &[u64; LEVELS] {
        &self.sum
    }

    /// All counts, indexed by source level.
    #[inline]
    pub fn counts(&self) -> &[u64; LEVELS] {
        &self.count
    }

    /// Number of distinct source levels seen.
    pub fn observed_levels(&self) -> usize {
        self.count.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of accumulated positions.
    pub fn total(&self) -> u64 {
        self.count.iter().sum()
    }
}

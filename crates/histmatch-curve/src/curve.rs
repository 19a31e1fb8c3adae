//! 256-entry remapping curve and its lookup application.
//!
//! A [`Curve`] maps every 8-bit input level to an output level. Applying
//! it is a plain table lookup per sample:
//!
//! ```rust
//! use histmatch_core::Plane;
//! use histmatch_curve::Curve;
//!
//! let curve = Curve::from_fn(|v| 255 - v);
//! let mut plane = Plane::from_data(2, 1, vec![0, 200]).unwrap();
//! curve.apply_in_place(&mut plane.view_mut());
//! assert_eq!(plane.to_packed(), vec![255, 55]);
//! ```

use std::fmt;
use std::ops::Index;

use crate::{CurveError, CurveResult, LEVELS};
use histmatch_core::{PlaneView, PlaneViewMut};

/// Integer division rounding to nearest, ties away from zero.
///
/// Correct for either sign of `x` and `y`:
///
/// ```rust
/// use histmatch_curve::rounded_div;
///
/// assert_eq!(rounded_div(5, 2), 3);
/// assert_eq!(rounded_div(-5, 2), -3);
/// assert_eq!(rounded_div(4, 2), 2);
/// ```
///
/// # Panics
///
/// Panics if `y == 0`.
#[inline]
pub fn rounded_div(x: i64, y: i64) -> i64 {
    if (x < 0) ^ (y < 0) {
        (x - (y >> 1)) / y
    } else {
        (x + (y >> 1)) / y
    }
}

/// Total mapping from input level to output level.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Curve([u8; LEVELS]);

impl Curve {
    /// The identity curve, `curve[i] == i`.
    pub const fn identity() -> Self {
        let mut table = [0u8; LEVELS];
        let mut i = 0;
        while i < LEVELS {
            table[i] = i as u8;
            i += 1;
        }
        Self(table)
    }

    /// A curve mapping every level to `value`.
    pub const fn constant(value: u8) -> Self {
        Self([value; LEVELS])
    }

    /// Wraps an existing table.
    pub const fn from_table(table: [u8; LEVELS]) -> Self {
        Self(table)
    }

    /// Builds a curve by evaluating `f` at every level.
    pub fn from_fn(mut f: impl FnMut(u8) -> u8) -> Self {
        let mut table = [0u8; LEVELS];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = f(i as u8);
        }
        Self(table)
    }

    /// The underlying table.
    #[inline]
    pub fn as_table(&self) -> &[u8; LEVELS] {
        &self.0
    }

    /// Output level for `value`.
    #[inline]
    pub fn map(&self, value: u8) -> u8 {
        self.0[value as usize]
    }

    /// Whether this is the identity curve.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Iterates over `(input, output)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.0.iter().enumerate().map(|(i, &v)| (i as u8, v))
    }

    /// Writes `curve[src]` into `dst` for every sample.
    ///
    /// Source and destination must have the same width and height; strides
    /// are independent.
    pub fn apply(&self, src: &PlaneView<'_>, dst: &mut PlaneViewMut<'_>) -> CurveResult<()> {
        if src.dimensions() != dst.dimensions() {
            return Err(CurveError::size_mismatch(src.dimensions(), dst.dimensions()));
        }
        for (src_row, dst_row) in src.rows().zip(dst.rows_mut()) {
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d = self.0[s as usize];
            }
        }
        Ok(())
    }

    /// Replaces every sample `v` of `plane` with `curve[v]`.
    pub fn apply_in_place(&self, plane: &mut PlaneViewMut<'_>) {
        for row in plane.rows_mut() {
            for v in row.iter_mut() {
                *v = self.0[*v as usize];
            }
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<u8> for Curve {
    type Output = u8;

    #[inline]
    fn index(&self, level: u8) -> &u8 {
        &self.0[level as usize]
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<[u8; LEVELS]> for Curve {
    fn from(table: [u8; LEVELS]) -> Self {
        Self(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histmatch_core::Plane;

    #[test]
    fn test_rounded_div_ties_away_from_zero() {
        assert_eq!(rounded_div(5, 2), 3);
        assert_eq!(rounded_div(-5, 2), -3);
        assert_eq!(rounded_div(4, 2), 2);
        assert_eq!(rounded_div(7, 3), 2);
        assert_eq!(rounded_div(-7, 3), -2);
        assert_eq!(rounded_div(0, 9), 0);
        assert_eq!(rounded_div(110, 2), 55);
    }

    #[test]
    fn test_identity_leaves_plane_unchanged() {
        let data: Vec<u8> = (0..=255u8).cycle().take(37 * 11).collect();
        let mut plane = Plane::from_data(37, 11, data.clone()).unwrap();
        Curve::identity().apply_in_place(&mut plane.view_mut());
        assert_eq!(plane.to_packed(), data);
        assert!(Curve::identity().is_identity());
    }

    #[test]
    fn test_apply_out_of_place() {
        let curve = Curve::from_fn(|v| v / 2);
        let src = Plane::from_data(3, 1, vec![10, 100, 255]).unwrap();
        let mut dst = Plane::new(3, 1);
        curve.apply(&src.view(), &mut dst.view_mut()).unwrap();
        assert_eq!(dst.to_packed(), vec![5, 50, 127]);
    }

    #[test]
    fn test_apply_keeps_destination_padding() {
        let curve = Curve::constant(7);
        let src = Plane::from_data(2, 2, vec![1, 2, 3, 4]).unwrap();
        let mut buf = [0xAAu8; 6];
        let mut dst = PlaneViewMut::new(&mut buf, 2, 2, 3).unwrap();
        curve.apply(&src.view(), &mut dst).unwrap();
        assert_eq!(buf, [7, 7, 0xAA, 7, 7, 0xAA]);
    }

    #[test]
    fn test_apply_size_mismatch() {
        let src = Plane::new(3, 3);
        let mut dst = Plane::new(3, 2);
        assert!(Curve::identity().apply(&src.view(), &mut dst.view_mut()).is_err());
    }

    #[test]
    fn test_index_and_map() {
        let curve = Curve::from_fn(|v| v.saturating_add(10));
        assert_eq!(curve[5], 15);
        assert_eq!(curve.map(250), 255);
        assert_eq!(curve.iter().nth(3), Some((3, 13)));
    }
}

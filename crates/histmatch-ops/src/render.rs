//! Drawing curves onto an 8-bit plane.
//!
//! The canvas origin is the top-left sample. Column `x` is the source
//! level, row `255 - curve[x]` the mapped level, so level 255 sits on the
//! top row.

use crate::{RenderError, RenderResult};
use histmatch_core::PlaneViewMut;
use histmatch_curve::{Curve, LEVELS};

/// Side of the square canvas a curve needs.
pub const CANVAS_SIZE: u32 = LEVELS as u32;

fn check_canvas(canvas: &PlaneViewMut<'_>) -> RenderResult<()> {
    if canvas.width() < CANVAS_SIZE || canvas.height() < CANVAS_SIZE {
        return Err(RenderError::CanvasTooSmall {
            width: canvas.width(),
            height: canvas.height(),
        });
    }
    Ok(())
}

/// Sets the sample `(i, 255 - curve[i])` to `color` for every level.
///
/// Nothing else on the canvas is touched.
pub fn render_overlay(curve: &Curve, canvas: &mut PlaneViewMut<'_>, color: u8) -> RenderResult<()> {
    check_canvas(canvas)?;
    for (x, v) in curve.iter() {
        canvas.set(x as u32, 255 - v as u32, color);
    }
    Ok(())
}

/// Draws the curve as filled columns with a white cap.
///
/// Column `i` is filled with `curve[i]` from the bottom row up to row
/// `255 - curve[i]`. Columns with a non-zero value then get a 255 sample at
/// their top.
pub fn render_diagram(curve: &Curve, canvas: &mut PlaneViewMut<'_>) -> RenderResult<()> {
    check_canvas(canvas)?;
    for (x, v) in curve.iter() {
        for level in 0..=v as u32 {
            canvas.set(x as u32, 255 - level, v);
        }
    }
    for (x, v) in curve.iter().filter(|&(_, v)| v > 0) {
        canvas.set(x as u32, 255 - v as u32, 255);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use histmatch_core::Plane;

    #[test]
    fn test_overlay_identity_is_antidiagonal() {
        let mut canvas = Plane::filled(300, 260, 16);
        render_overlay(&Curve::identity(), &mut canvas.view_mut(), 235).unwrap();

        for x in 0..256u32 {
            assert_eq!(canvas.get(x, 255 - x), 235);
        }
        assert_eq!(canvas.get(0, 0), 16);
        assert_eq!(canvas.get(270, 10), 16);
        let touched = canvas.data().iter().filter(|&&v| v == 235).count();
        assert_eq!(touched, 256);
    }

    #[test]
    fn test_diagram_of_constant_curve() {
        let mut canvas = Plane::new(256, 256);
        render_diagram(&Curve::constant(100), &mut canvas.view_mut()).unwrap();

        for x in [0u32, 128, 255] {
            assert_eq!(canvas.get(x, 255), 100);
            assert_eq!(canvas.get(x, 156), 100);
            assert_eq!(canvas.get(x, 155), 255);
            assert_eq!(canvas.get(x, 154), 0);
        }
    }

    #[test]
    fn test_diagram_zero_column_has_no_cap() {
        let mut canvas = Plane::filled(256, 256, 7);
        let curve = Curve::from_fn(|v| if v == 3 { 0 } else { 1 });
        render_diagram(&curve, &mut canvas.view_mut()).unwrap();

        assert_eq!(canvas.get(3, 255), 0);
        assert_eq!(canvas.get(3, 254), 7);
        assert_eq!(canvas.get(4, 255), 1);
        assert_eq!(canvas.get(4, 254), 255);
    }

    #[test]
    fn test_small_canvas_rejected() {
        let mut canvas = Plane::new(255, 256);
        let err = render_overlay(&Curve::identity(), &mut canvas.view_mut(), 1).unwrap_err();
        assert_eq!(err, RenderError::CanvasTooSmall { width: 255, height: 256 });
        assert!(render_diagram(&Curve::identity(), &mut canvas.view_mut()).is_err());
    }
}

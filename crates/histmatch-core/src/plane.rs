//! Single-plane 8-bit sample buffers.
//!
//! This module provides the buffer types every histmatch operation works on:
//! - [`Plane`] - Owned plane with its own stride
//! - [`PlaneView`] - Immutable borrowed view over any byte buffer
//! - [`PlaneViewMut`] - Mutable borrowed view over any byte buffer
//!
//! # Memory Layout
//!
//! Samples are stored row-major, one byte per sample. Rows start `stride`
//! bytes apart; bytes between `width` and `stride` are padding and are
//! never read or written by the plane accessors:
//!
//! ```text
//! [s s s s s . .]  <- row 0 (width 5, stride 7)
//! [s s s s s . .]  <- row 1
//! [s s s s s]      <- last row may stop at width
//! ```
//!
//! # Usage
//!
//! ```rust
//! use histmatch_core::{Plane, PlaneView};
//!
//! let mut plane = Plane::filled(4, 2, 16);
//! plane.set(1, 1, 200);
//! assert_eq!(plane.get(1, 1), 200);
//!
//! // Borrow a foreign buffer with padding
//! let raw = [1u8, 2, 0, 0, 3, 4];
//! let view = PlaneView::new(&raw, 2, 2, 4).unwrap();
//! assert_eq!(view.row(1), &[3, 4]);
//! ```

use crate::{Error, Result};

/// Minimum number of bytes a buffer needs for the given geometry.
#[inline]
fn required_len(width: u32, height: u32, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    stride
        .checked_mul(height as usize - 1)
        .and_then(|v| v.checked_add(width as usize))
}

fn validate(len: usize, width: u32, height: u32, stride: usize) -> Result<()> {
    if stride < width as usize {
        return Err(Error::InvalidStride {
            stride,
            min_stride: width as usize,
            width,
        });
    }
    let needed = required_len(width, height, stride)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "plane size overflows"))?;
    if len < needed {
        return Err(Error::invalid_dimensions(
            width,
            height,
            format!("buffer holds {} bytes, stride {} needs {}", len, stride, needed),
        ));
    }
    Ok(())
}

/// Owned single-plane buffer of 8-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
}

impl Plane {
    /// Creates a zero-filled plane with a packed stride.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Creates a plane with every sample set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
            stride: width as usize,
        }
    }

    /// Creates a plane from packed data (`stride == width`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data` is shorter than
    /// `width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_stride(width, height, width as usize, data)
    }

    /// Creates a plane from data laid out with an explicit stride.
    pub fn from_data_with_stride(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Result<Self> {
        validate(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Plane width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Plane height in rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in bytes between row starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw buffer including row padding.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sample at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.view().get(x, y)
    }

    /// Sets the sample at (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.view_mut().set(x, y, value);
    }

    /// Fills every sample (padding excluded).
    pub fn fill(&mut self, value: u8) {
        self.view_mut().fill(value);
    }

    /// Row `y` without padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    /// Borrows the whole plane immutably.
    #[inline]
    pub fn view(&self) -> PlaneView<'_> {
        PlaneView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Borrows the whole plane mutably.
    #[inline]
    pub fn view_mut(&mut self) -> PlaneViewMut<'_> {
        PlaneViewMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Copies samples into a packed vector (`width * height` bytes).
    pub fn to_packed(&self) -> Vec<u8> {
        if self.stride == self.width as usize {
            let len = self.width as usize * self.height as usize;
            return self.data[..len].to_vec();
        }
        self.view().rows().flatten().copied().collect()
    }
}

/// Immutable view over an 8-bit plane stored in a borrowed buffer.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> PlaneView<'a> {
    /// Wraps a buffer as a plane.
    ///
    /// # Errors
    ///
    /// Fails if `stride < width` or the buffer is too short for
    /// `height` rows.
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self> {
        validate(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns `true` if the view has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Sample at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height, "sample out of bounds");
        self.data[y as usize * self.stride + x as usize]
    }

    /// Row `y` without padding.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    /// Iterates over rows, padding excluded.
    pub fn rows(self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let width = self.width as usize;
        self.data
            .chunks(self.stride.max(1))
            .take(self.height as usize)
            .map(move |row| &row[..width])
    }
}

/// Mutable view over an 8-bit plane stored in a borrowed buffer.
#[derive(Debug)]
pub struct PlaneViewMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> PlaneViewMut<'a> {
    /// Wraps a mutable buffer as a plane.
    pub fn new(data: &'a mut [u8], width: u32, height: u32, stride: usize) -> Result<Self> {
        validate(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sample at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height, "sample out of bounds");
        self.data[y as usize * self.stride + x as usize]
    }

    /// Sets the sample at (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        debug_assert!(x < self.width && y < self.height, "sample out of bounds");
        self.data[y as usize * self.stride + x as usize] = value;
    }

    /// Reborrows as an immutable view.
    #[inline]
    pub fn as_view(&self) -> PlaneView<'_> {
        PlaneView {
            data: &*self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Reborrows mutably for a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> PlaneViewMut<'_> {
        PlaneViewMut {
            data: &mut *self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Mutable row `y` without padding.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.width as usize]
    }

    /// Iterates over mutable rows, padding excluded.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        let width = self.width as usize;
        self.data
            .chunks_mut(self.stride.max(1))
            .take(self.height as usize)
            .map(move |row| &mut row[..width])
    }

    /// Fills every sample (padding excluded).
    pub fn fill(&mut self, value: u8) {
        for row in self.rows_mut() {
            row.fill(value);
        }
    }

    /// Fills the top-left `width`×`height` region, clipped to the plane.
    pub fn fill_region(&mut self, width: u32, height: u32, value: u8) {
        let w = width.min(self.width) as usize;
        for row in self.rows_mut().take(height as usize) {
            row[..w].fill(value);
        }
    }

    /// Copies samples from a view of the same size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] when sizes differ.
    pub fn copy_from(&mut self, src: &PlaneView<'_>) -> Result<()> {
        if src.dimensions() != self.dimensions() {
            return Err(Error::dimension_mismatch(src.dimensions(), self.dimensions()));
        }
        for (dst_row, src_row) in self.rows_mut().zip(src.rows()) {
            dst_row.copy_from_slice(src_row);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_rejects_short_buffer() {
        let data = [0u8; 7];
        assert!(PlaneView::new(&data, 4, 2, 4).is_err());
        assert!(PlaneView::new(&data, 3, 2, 4).is_ok());
    }

    #[test]
    fn test_view_rejects_narrow_stride() {
        let data = [0u8; 16];
        let err = PlaneView::new(&data, 4, 2, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { .. }));
    }

    #[test]
    fn test_rows_skip_padding() {
        let data = [1u8, 2, 9, 9, 3, 4, 9, 9, 5, 6];
        let view = PlaneView::new(&data, 2, 3, 4).unwrap();
        let rows: Vec<&[u8]> = view.rows().collect();
        assert_eq!(rows, vec![&[1u8, 2][..], &[3, 4][..], &[5, 6][..]]);
    }

    #[test]
    fn test_fill_leaves_padding() {
        let mut data = [7u8; 8];
        let mut view = PlaneViewMut::new(&mut data, 3, 2, 4).unwrap();
        view.fill(0);
        assert_eq!(data, [0, 0, 0, 7, 0, 0, 0, 7]);
    }

    #[test]
    fn test_fill_region_clips() {
        let mut plane = Plane::filled(4, 4, 1);
        plane.view_mut().fill_region(8, 2, 5);
        assert_eq!(plane.row(0), &[5, 5, 5, 5]);
        assert_eq!(plane.row(1), &[5, 5, 5, 5]);
        assert_eq!(plane.row(2), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_copy_from_and_packed() {
        let src = Plane::from_data_with_stride(2, 2, 3, vec![1, 2, 0, 3, 4, 0]).unwrap();
        let mut dst = Plane::new(2, 2);
        dst.view_mut().copy_from(&src.view()).unwrap();
        assert_eq!(dst.to_packed(), vec![1, 2, 3, 4]);
        assert_eq!(src.to_packed(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_copy_from_size_mismatch() {
        let src = Plane::new(2, 2);
        let mut dst = Plane::new(3, 2);
        assert!(dst.view_mut().copy_from(&src.view()).is_err());
    }
}

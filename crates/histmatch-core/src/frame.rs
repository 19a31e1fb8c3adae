//! Planar frames and clips.
//!
//! - [`Frame`] - One picture: a [`FrameFormat`] plus its owned [`Plane`]s
//! - [`VideoInfo`] - Format and dimensions shared by every frame of a clip
//! - [`Clip`] - An ordered sequence of frames with one [`VideoInfo`]
//!
//! Plane dimensions follow the format's subsampling: for 4:2:0 a
//! 640×480 frame holds a 640×480 luma plane and two 320×240 chroma planes.
//!
//! ```rust
//! use histmatch_core::{Frame, FrameFormat};
//!
//! let frame = Frame::new_filled(FrameFormat::YUV420P8, 640, 480, &[16, 128, 128]).unwrap();
//! assert_eq!(frame.plane(2).unwrap().dimensions(), (320, 240));
//! ```

use crate::{Error, FrameFormat, Plane, PlaneView, PlaneViewMut, Result};

/// One planar picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    format: FrameFormat,
    width: u32,
    height: u32,
    planes: Vec<Plane>,
}

impl Frame {
    /// Allocates a frame with each plane filled by the matching entry of
    /// `values` (missing entries fill with 0).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for formats wider than 8 bits.
    pub fn new_filled(format: FrameFormat, width: u32, height: u32, values: &[u8]) -> Result<Self> {
        if !format.is_8bit() {
            return Err(Error::unsupported_format(format.name()));
        }
        let planes = (0..format.num_planes())
            .map(|p| {
                let (w, h) = format.plane_dimensions(p, width, height);
                Plane::filled(w, h, values.get(p).copied().unwrap_or(0))
            })
            .collect();
        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    /// Builds a frame from existing planes.
    ///
    /// # Errors
    ///
    /// Fails if the plane count or any plane size disagrees with `format`
    /// at `width`×`height`.
    pub fn from_planes(format: FrameFormat, width: u32, height: u32, planes: Vec<Plane>) -> Result<Self> {
        if !format.is_8bit() {
            return Err(Error::unsupported_format(format.name()));
        }
        if planes.len() != format.num_planes() {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("{} needs {} planes, got {}", format, format.num_planes(), planes.len()),
            ));
        }
        for (p, plane) in planes.iter().enumerate() {
            let expected = format.plane_dimensions(p, width, height);
            if plane.dimensions() != expected {
                return Err(Error::dimension_mismatch(plane.dimensions(), expected));
            }
        }
        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    /// Frame format.
    #[inline]
    pub fn format(&self) -> FrameFormat {
        self.format
    }

    /// Width of plane 0.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of plane 0.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)` of plane 0.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of planes.
    #[inline]
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Owned plane `index`.
    pub fn plane_ref(&self, index: usize) -> Result<&Plane> {
        let planes = self.planes.len();
        self.planes
            .get(index)
            .ok_or(Error::PlaneOutOfRange { index, planes })
    }

    /// Immutable view of plane `index`.
    pub fn plane(&self, index: usize) -> Result<PlaneView<'_>> {
        self.plane_ref(index).map(Plane::view)
    }

    /// Mutable view of plane `index`.
    pub fn plane_mut(&mut self, index: usize) -> Result<PlaneViewMut<'_>> {
        let planes = self.planes.len();
        self.planes
            .get_mut(index)
            .map(Plane::view_mut)
            .ok_or(Error::PlaneOutOfRange { index, planes })
    }

    /// All planes in order.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Consumes the frame and returns its planes.
    pub fn into_planes(self) -> Vec<Plane> {
        self.planes
    }

    /// The [`VideoInfo`] describing a clip made of this frame.
    pub fn info(&self) -> VideoInfo {
        VideoInfo {
            format: Some(self.format),
            width: self.width,
            height: self.height,
            num_frames: 1,
        }
    }
}

/// Clip-wide format and dimensions.
///
/// `format == None` or a zero dimension marks a clip whose frames may vary,
/// which histogram matching rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    /// Frame format, `None` when frames vary.
    pub format: Option<FrameFormat>,
    /// Width of plane 0, 0 when frames vary.
    pub width: u32,
    /// Height of plane 0, 0 when frames vary.
    pub height: u32,
    /// Number of frames.
    pub num_frames: usize,
}

impl VideoInfo {
    /// Info for a constant-format clip.
    pub fn new(format: FrameFormat, width: u32, height: u32, num_frames: usize) -> Self {
        Self {
            format: Some(format),
            width,
            height,
            num_frames,
        }
    }

    /// Whether format and dimensions are fixed.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.format.is_some() && self.width > 0 && self.height > 0
    }

    /// Whether `frame` has this info's format and dimensions.
    pub fn matches(&self, frame: &Frame) -> bool {
        self.format == Some(frame.format()) && (self.width, self.height) == frame.dimensions()
    }
}

/// Ordered frames sharing one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    frames: Vec<Frame>,
    fps: Option<(u32, u32)>,
}

impl Clip {
    /// Builds a clip from frames.
    ///
    /// Frames are not required to agree; [`Clip::info`] reports a variable
    /// format when they do not.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames, fps: None }
    }

    /// Attaches a frame rate as `(numerator, denominator)`.
    pub fn with_fps(mut self, fps: (u32, u32)) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Frame rate, if known.
    #[inline]
    pub fn fps(&self) -> Option<(u32, u32)> {
        self.fps
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the clip holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame `n`, or the last frame when `n` is past the end.
    pub fn frame_clamped(&self, n: usize) -> Option<&Frame> {
        self.frames.get(n.min(self.frames.len().saturating_sub(1)))
    }

    /// All frames.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Consumes the clip and returns its frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Clip-wide info.
    pub fn info(&self) -> VideoInfo {
        let Some(first) = self.frames.first() else {
            return VideoInfo {
                format: None,
                width: 0,
                height: 0,
                num_frames: 0,
            };
        };
        let mut info = first.info();
        info.num_frames = self.frames.len();
        if self.frames.iter().any(|f| f.format() != first.format()) {
            info.format = None;
        }
        if self.frames.iter().any(|f| f.dimensions() != first.dimensions()) {
            info.width = 0;
            info.height = 0;
        }
        info
    }
}

impl From<Frame> for Clip {
    fn from(frame: Frame) -> Self {
        Self::new(vec![frame])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_filled_subsampling() {
        let frame = Frame::new_filled(FrameFormat::YUV420P8, 8, 6, &[16, 128, 64]).unwrap();
        assert_eq!(frame.num_planes(), 3);
        assert_eq!(frame.plane(0).unwrap().dimensions(), (8, 6));
        assert_eq!(frame.plane(1).unwrap().dimensions(), (4, 3));
        assert_eq!(frame.plane(2).unwrap().get(0, 0), 64);
    }

    #[test]
    fn test_high_bit_depth_rejected() {
        assert!(Frame::new_filled(FrameFormat::YUV420P10, 8, 8, &[]).is_err());
    }

    #[test]
    fn test_from_planes_checks_sizes() {
        let planes = vec![Plane::new(4, 4), Plane::new(2, 2), Plane::new(2, 3)];
        assert!(Frame::from_planes(FrameFormat::YUV420P8, 4, 4, planes).is_err());

        let planes = vec![Plane::new(4, 4), Plane::new(2, 2), Plane::new(2, 2)];
        assert!(Frame::from_planes(FrameFormat::YUV420P8, 4, 4, planes).is_ok());
    }

    #[test]
    fn test_plane_out_of_range() {
        let frame = Frame::new_filled(FrameFormat::GRAY8, 4, 4, &[0]).unwrap();
        assert!(matches!(
            frame.plane(1),
            Err(Error::PlaneOutOfRange { index: 1, planes: 1 })
        ));
    }

    #[test]
    fn test_clip_info_variable() {
        let a = Frame::new_filled(FrameFormat::GRAY8, 4, 4, &[0]).unwrap();
        let b = Frame::new_filled(FrameFormat::GRAY8, 8, 4, &[0]).unwrap();
        let clip = Clip::new(vec![a.clone(), b]);
        let info = clip.info();
        assert_eq!(info.num_frames, 2);
        assert!(!info.is_constant());

        let clip = Clip::new(vec![a.clone(), a]);
        assert!(clip.info().is_constant());
    }

    #[test]
    fn test_frame_clamped_repeats_last() {
        let a = Frame::new_filled(FrameFormat::GRAY8, 2, 2, &[1]).unwrap();
        let b = Frame::new_filled(FrameFormat::GRAY8, 2, 2, &[2]).unwrap();
        let clip = Clip::new(vec![a, b]);
        assert_eq!(clip.frame_clamped(5).unwrap().plane(0).unwrap().get(0, 0), 2);
        assert!(Clip::new(Vec::new()).frame_clamped(0).is_none());
    }
}

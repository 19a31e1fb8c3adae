//! Planar frame formats.
//!
//! A [`FrameFormat`] describes how a frame is split into planes: its
//! [`ColorFamily`], the sample bit depth, and the chroma subsampling of
//! planes 1 and 2 (stored as log2 factors, so 4:2:0 is `(1, 1)`).
//!
//! # Usage
//!
//! ```rust
//! use histmatch_core::format::{ColorFamily, FrameFormat};
//!
//! let fmt = FrameFormat::YUV420P8;
//! assert_eq!(fmt.num_planes(), 3);
//! assert_eq!(fmt.plane_dimensions(1, 1920, 1080), (960, 540));
//! assert_eq!(fmt.family, ColorFamily::Yuv);
//! ```

use std::fmt;

/// Color family of a planar format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    /// Single luma plane.
    Gray,
    /// Luma plus two chroma planes.
    Yuv,
    /// Planar red, green, blue.
    Rgb,
}

impl ColorFamily {
    /// Number of planes carried by this family.
    #[inline]
    pub const fn num_planes(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Yuv | Self::Rgb => 3,
        }
    }
}

/// Planar frame format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    /// Color family.
    pub family: ColorFamily,
    /// Bits per sample.
    pub bits_per_sample: u8,
    /// log2 horizontal subsampling of planes 1 and 2.
    pub sub_sampling_w: u8,
    /// log2 vertical subsampling of planes 1 and 2.
    pub sub_sampling_h: u8,
}

impl FrameFormat {
    /// 8-bit grayscale.
    pub const GRAY8: Self = Self::new(ColorFamily::Gray, 8, 0, 0);
    /// 8-bit YUV 4:2:0.
    pub const YUV420P8: Self = Self::new(ColorFamily::Yuv, 8, 1, 1);
    /// 8-bit YUV 4:2:2.
    pub const YUV422P8: Self = Self::new(ColorFamily::Yuv, 8, 1, 0);
    /// 8-bit YUV 4:4:4.
    pub const YUV444P8: Self = Self::new(ColorFamily::Yuv, 8, 0, 0);
    /// 8-bit planar RGB.
    pub const RGBP8: Self = Self::new(ColorFamily::Rgb, 8, 0, 0);
    /// 10-bit YUV 4:2:0.
    pub const YUV420P10: Self = Self::new(ColorFamily::Yuv, 10, 1, 1);

    /// Creates a format description.
    pub const fn new(family: ColorFamily, bits_per_sample: u8, sub_sampling_w: u8, sub_sampling_h: u8) -> Self {
        Self {
            family,
            bits_per_sample,
            sub_sampling_w,
            sub_sampling_h,
        }
    }

    /// Number of planes.
    #[inline]
    pub const fn num_planes(&self) -> usize {
        self.family.num_planes()
    }

    /// Whether samples fit in one byte.
    #[inline]
    pub const fn is_8bit(&self) -> bool {
        self.bits_per_sample <= 8
    }

    /// Dimensions of `plane` for a frame of `width`×`height`.
    ///
    /// Plane 0 is never subsampled.
    #[inline]
    pub const fn plane_dimensions(&self, plane: usize, width: u32, height: u32) -> (u32, u32) {
        if plane == 0 {
            (width, height)
        } else {
            (width >> self.sub_sampling_w, height >> self.sub_sampling_h)
        }
    }

    /// Short name in the usual `yuv420p8` style.
    pub fn name(&self) -> String {
        match self.family {
            ColorFamily::Gray => format!("gray{}", self.bits_per_sample),
            ColorFamily::Rgb => format!("rgbp{}", self.bits_per_sample),
            ColorFamily::Yuv => {
                let layout = match (self.sub_sampling_w, self.sub_sampling_h) {
                    (0, 0) => "444".to_string(),
                    (1, 0) => "422".to_string(),
                    (1, 1) => "420".to_string(),
                    (2, 0) => "411".to_string(),
                    (w, h) => format!("ss{}x{}", w, h),
                };
                format!("yuv{}p{}", layout, self.bits_per_sample)
            }
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_counts() {
        assert_eq!(FrameFormat::GRAY8.num_planes(), 1);
        assert_eq!(FrameFormat::YUV420P8.num_planes(), 3);
        assert_eq!(FrameFormat::RGBP8.num_planes(), 3);
    }

    #[test]
    fn test_plane_dimensions() {
        let fmt = FrameFormat::YUV422P8;
        assert_eq!(fmt.plane_dimensions(0, 640, 480), (640, 480));
        assert_eq!(fmt.plane_dimensions(1, 640, 480), (320, 480));
        assert_eq!(fmt.plane_dimensions(2, 640, 480), (320, 480));
    }

    #[test]
    fn test_names() {
        assert_eq!(FrameFormat::YUV420P8.to_string(), "yuv420p8");
        assert_eq!(FrameFormat::YUV420P10.to_string(), "yuv420p10");
        assert_eq!(FrameFormat::GRAY8.to_string(), "gray8");
        assert!(!FrameFormat::YUV420P10.is_8bit());
    }
}

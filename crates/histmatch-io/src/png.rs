//! PNG support for single-frame clips.
//!
//! 8-bit grayscale images load as `GRAY8` frames and 8-bit RGB images as
//! planar `RGBP8` frames. Writing accepts gray, YUV (luma only) and
//! planar RGB frames.
//!
//! # Example
//!
//! ```rust,ignore
//! use histmatch_io::png;
//!
//! let clip = png::read("input.png")?;
//! png::write("output.png", &clip)?;
//! ```

use crate::{IoError, IoResult};
use histmatch_core::{Clip, ColorFamily, Frame, FrameFormat, Plane};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, warn};

/// Reads a PNG file as a one-frame clip.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Clip> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let (width, height) = (info.width, info.height);
    let pixels = &buf[..info.buffer_size()];
    let stride = info.line_size;

    let frame = match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            let plane = Plane::from_data_with_stride(width, height, stride, pixels.to_vec())?;
            Frame::from_planes(FrameFormat::GRAY8, width, height, vec![plane])?
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            let planes = deinterleave_rgb(pixels, width, height, stride);
            Frame::from_planes(FrameFormat::RGBP8, width, height, planes)?
        }
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    debug!(path = %path.display(), width, height, format = %frame.format(), "PNG loaded");
    Ok(Clip::from(frame))
}

/// Writes the first frame of a clip to a PNG file.
///
/// YUV frames write their luma plane as grayscale.
pub fn write<P: AsRef<Path>>(path: P, clip: &Clip) -> IoResult<()> {
    let path = path.as_ref();
    let frame = clip
        .frames()
        .first()
        .ok_or_else(|| IoError::EncodeError("clip has no frames".into()))?;
    if clip.len() > 1 {
        warn!(
            path = %path.display(),
            frames = clip.len(),
            "PNG holds a single frame, writing only the first"
        );
    }

    let format = frame.format();
    if !format.is_8bit() {
        return Err(IoError::UnsupportedBitDepth(format.name()));
    }
    let (color_type, data) = match format.family {
        ColorFamily::Gray | ColorFamily::Yuv => (png::ColorType::Grayscale, frame.plane_ref(0)?.to_packed()),
        ColorFamily::Rgb => (png::ColorType::Rgb, interleave_rgb(frame)?),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, frame.width(), frame.height());
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}

fn deinterleave_rgb(pixels: &[u8], width: u32, height: u32, stride: usize) -> Vec<Plane> {
    let mut planes = vec![Plane::new(width, height); 3];
    for (y, line) in pixels.chunks(stride).take(height as usize).enumerate() {
        for (x, rgb) in line.chunks_exact(3).take(width as usize).enumerate() {
            for (plane, &v) in planes.iter_mut().zip(rgb) {
                plane.set(x as u32, y as u32, v);
            }
        }
    }
    planes
}

fn interleave_rgb(frame: &Frame) -> IoResult<Vec<u8>> {
    let r = frame.plane(0)?;
    let g = frame.plane(1)?;
    let b = frame.plane(2)?;
    let mut out = Vec::with_capacity(frame.width() as usize * frame.height() as usize * 3);
    for ((rr, gr), br) in r.rows().zip(g.rows()).zip(b.rows()) {
        for ((&rv, &gv), &bv) in rr.iter().zip(gr).zip(br) {
            out.extend_from_slice(&[rv, gv, bv]);
        }
    }
    Ok(out)
}

//! YUV4MPEG2 stream support.
//!
//! A stream is a single header line followed by frames, each introduced by
//! a `FRAME` line and holding the raw planes back to back:
//!
//! ```text
//! YUV4MPEG2 W720 H480 F30000:1001 Ip A1:1 C420jpeg
//! FRAME
//! <Y plane><U plane><V plane>
//! FRAME
//! ...
//! ```
//!
//! Only 8-bit colorspaces are read. Chroma dimensions follow the core
//! subsampling rules, so subsampled streams need even dimensions.

use crate::{IoError, IoResult};
use histmatch_core::{Clip, ColorFamily, Frame, FrameFormat, Plane};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, trace};

const MAGIC: &str = "YUV4MPEG2";
const FRAME_TAG: &[u8] = b"FRAME";

/// Frame rate used when a clip carries none.
pub const DEFAULT_FPS: (u32, u32) = (25, 1);

/// Stream header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Frame rate, if given.
    pub fps: Option<(u32, u32)>,
    /// Pixel format from the `C` tag.
    pub format: FrameFormat,
}

impl Header {
    /// Parses a header line without its trailing newline.
    pub fn parse(line: &str) -> IoResult<Self> {
        let mut tokens = line.split_ascii_whitespace();
        if tokens.next() != Some(MAGIC) {
            return Err(IoError::InvalidFile("missing YUV4MPEG2 signature".into()));
        }

        let mut width = None;
        let mut height = None;
        let mut fps = None;
        let mut format = FrameFormat::YUV420P8;

        for token in tokens {
            let Some((tag, value)) = token.split_at_checked(1) else {
                continue;
            };
            match tag {
                "W" => width = Some(parse_u32(value, "width")?),
                "H" => height = Some(parse_u32(value, "height")?),
                "F" => fps = Some(parse_ratio(value)?),
                "C" => format = parse_colorspace(value)?,
                // interlacing, aspect ratio and extensions do not affect samples
                "I" | "A" | "X" => {}
                _ => trace!(token, "ignoring unknown Y4M header tag"),
            }
        }

        let width = width.ok_or_else(|| IoError::InvalidFile("missing W tag".into()))?;
        let height = height.ok_or_else(|| IoError::InvalidFile("missing H tag".into()))?;
        if width == 0 || height == 0 {
            return Err(IoError::InvalidFile(format!("invalid size {}x{}", width, height)));
        }
        if width % (1 << format.sub_sampling_w) != 0 || height % (1 << format.sub_sampling_h) != 0 {
            return Err(IoError::InvalidFile(format!(
                "{}x{} is not divisible by the {} subsampling",
                width, height, format
            )));
        }

        Ok(Self {
            width,
            height,
            fps,
            format,
        })
    }

    /// Size of one frame's payload in bytes.
    pub fn frame_bytes(&self) -> IoResult<usize> {
        (0..self.format.num_planes())
            .try_fold(0usize, |total, p| {
                let (w, h) = self.format.plane_dimensions(p, self.width, self.height);
                (w as usize)
                    .checked_mul(h as usize)
                    .and_then(|n| total.checked_add(n))
            })
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or_else(|| {
                IoError::InvalidFile(format!("frame size {}x{} is too large", self.width, self.height))
            })
    }
}

fn parse_u32(value: &str, what: &str) -> IoResult<u32> {
    value
        .parse()
        .map_err(|_| IoError::InvalidFile(format!("invalid {}: {}", what, value)))
}

fn parse_ratio(value: &str) -> IoResult<(u32, u32)> {
    let (num, den) = value
        .split_once(':')
        .ok_or_else(|| IoError::InvalidFile(format!("invalid frame rate: {}", value)))?;
    Ok((parse_u32(num, "frame rate")?, parse_u32(den, "frame rate")?))
}

fn parse_colorspace(value: &str) -> IoResult<FrameFormat> {
    match value {
        "420jpeg" | "420paldv" | "420mpeg2" | "420" => Ok(FrameFormat::YUV420P8),
        "422" => Ok(FrameFormat::YUV422P8),
        "444" => Ok(FrameFormat::YUV444P8),
        "mono" => Ok(FrameFormat::GRAY8),
        v if v.contains('p') || v.starts_with("mono1") => {
            Err(IoError::UnsupportedBitDepth(format!("Y4M colorspace {}", v)))
        }
        v => Err(IoError::UnsupportedFormat(format!("Y4M colorspace {}", v))),
    }
}

fn colorspace_tag(format: FrameFormat) -> IoResult<&'static str> {
    if !format.is_8bit() {
        return Err(IoError::UnsupportedBitDepth(format.name()));
    }
    match (format.family, format.sub_sampling_w, format.sub_sampling_h) {
        (ColorFamily::Gray, _, _) => Ok("mono"),
        (ColorFamily::Yuv, 1, 1) => Ok("420jpeg"),
        (ColorFamily::Yuv, 1, 0) => Ok("422"),
        (ColorFamily::Yuv, 0, 0) => Ok("444"),
        _ => Err(IoError::UnsupportedFormat(format!("{} in Y4M", format))),
    }
}

/// Reads a Y4M file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Clip> {
    let path = path.as_ref();
    let clip = parse(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), frames = clip.len(), "Y4M loaded");
    Ok(clip)
}

/// Parses a Y4M stream.
pub fn parse<R: BufRead>(mut reader: R) -> IoResult<Clip> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    let header_line = std::str::from_utf8(&line)
        .map_err(|_| IoError::InvalidFile("header is not ASCII".into()))?;
    let header = Header::parse(header_line.trim_end())?;
    let frame_bytes = header.frame_bytes()?;

    let mut frames = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if !line.starts_with(FRAME_TAG) {
            return Err(IoError::DecodeError(format!(
                "expected FRAME marker before frame {}",
                frames.len()
            )));
        }

        // grows with the bytes actually present, not the declared size
        let mut data = Vec::new();
        let read = reader.by_ref().take(frame_bytes as u64).read_to_end(&mut data)?;
        if read != frame_bytes {
            return Err(IoError::DecodeError(format!(
                "frame {} is truncated: {} of {} bytes",
                frames.len(),
                read,
                frame_bytes
            )));
        }
        frames.push(split_planes(&header, data)?);
    }

    if frames.is_empty() {
        return Err(IoError::InvalidFile("stream has no frames".into()));
    }

    let clip = Clip::new(frames);
    Ok(match header.fps {
        Some(fps) => clip.with_fps(fps),
        None => clip,
    })
}

fn split_planes(header: &Header, mut data: Vec<u8>) -> IoResult<Frame> {
    let mut planes = Vec::with_capacity(header.format.num_planes());
    for p in (0..header.format.num_planes()).rev() {
        let (w, h) = header.format.plane_dimensions(p, header.width, header.height);
        let start = data.len() - w as usize * h as usize;
        let plane_data = data.split_off(start);
        planes.push(Plane::from_data(w, h, plane_data)?);
    }
    planes.reverse();
    Ok(Frame::from_planes(header.format, header.width, header.height, planes)?)
}

/// Writes a clip to a Y4M file.
pub fn write<P: AsRef<Path>>(path: P, clip: &Clip) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, clip)?;
    writer.flush()?;
    Ok(())
}

/// Writes a clip as a Y4M stream.
///
/// All frames must share the first frame's format and size.
pub fn write_to<W: Write>(writer: &mut W, clip: &Clip) -> IoResult<()> {
    let info = clip.info();
    let format = match info.format {
        Some(format) if info.is_constant() => format,
        _ if clip.is_empty() => return Err(IoError::EncodeError("clip has no frames".into())),
        _ => return Err(IoError::EncodeError("clip frames differ in format or size".into())),
    };
    let tag = colorspace_tag(format)?;
    let (num, den) = clip.fps().unwrap_or(DEFAULT_FPS);

    writeln!(
        writer,
        "{} W{} H{} F{}:{} Ip A1:1 C{}",
        MAGIC, info.width, info.height, num, den, tag
    )?;
    for frame in clip.frames() {
        writer.write_all(FRAME_TAG)?;
        writer.write_all(b"\n")?;
        for plane in frame.planes() {
            for row in plane.view().rows() {
                writer.write_all(row)?;
            }
        }
    }
    Ok(())
}

//! `.cube` export and import of curves.
//!
//! A curve is stored as a 256-entry 1D LUT with normalised values and
//! three identical columns, which most grading tools can load directly:
//!
//! ```text
//! # Generated by histmatch
//! LUT_1D_SIZE 256
//!
//! 0.000000 0.000000 0.000000
//! 0.003922 0.003922 0.003922
//! ...
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use histmatch_curve::cube;
//!
//! cube::write_curve("match.cube", &curve)?;
//! let back = cube::read_curve("match.cube")?;
//! ```

use crate::{Curve, CurveError, CurveResult, LEVELS};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a curve from a .cube file.
pub fn read_curve<P: AsRef<Path>>(path: P) -> CurveResult<Curve> {
    let file = File::open(path.as_ref())?;
    parse_curve(BufReader::new(file))
}

/// Parses a 256-entry 1D LUT into a curve.
///
/// Only the first column is used. Values are scaled by 255, rounded and
/// clamped to `[0, 255]`.
pub fn parse_curve<R: BufRead>(reader: R) -> CurveResult<Curve> {
    let mut size: Option<usize> = None;
    let mut domain = (0.0_f32, 1.0_f32);
    let mut values: Vec<f32> = Vec::with_capacity(LEVELS);

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with("TITLE") {
            continue;
        }

        if line.starts_with("LUT_1D_SIZE") {
            size = Some(parse_size(line)?);
        } else if line.starts_with("LUT_3D_SIZE") {
            return Err(CurveError::ParseError("expected 1D LUT, found 3D".into()));
        } else if line.starts_with("DOMAIN_MIN") {
            domain.0 = parse_domain(line)?;
        } else if line.starts_with("DOMAIN_MAX") {
            domain.1 = parse_domain(line)?;
        } else {
            values.push(parse_first_column(line)?);
        }
    }

    let size = size.ok_or_else(|| CurveError::ParseError("missing LUT_1D_SIZE".into()))?;
    if size != LEVELS {
        return Err(CurveError::ParseError(format!(
            "curve LUT must have {} entries, header says {}",
            LEVELS, size
        )));
    }
    if values.len() != size {
        return Err(CurveError::ParseError(format!(
            "expected {} entries, found {}",
            size,
            values.len()
        )));
    }
    if domain != (0.0, 1.0) {
        return Err(CurveError::ParseError(format!(
            "unsupported domain {}..{}",
            domain.0, domain.1
        )));
    }

    let mut table = [0u8; LEVELS];
    for (entry, v) in table.iter_mut().zip(&values) {
        *entry = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    Ok(Curve::from_table(table))
}

/// Writes a curve to a .cube file.
pub fn write_curve<P: AsRef<Path>>(path: P, curve: &Curve) -> CurveResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_curve_to(&mut writer, curve)?;
    writer.flush()?;
    Ok(())
}

/// Writes a curve in .cube syntax to any writer.
pub fn write_curve_to<W: Write>(writer: &mut W, curve: &Curve) -> CurveResult<()> {
    writeln!(writer, "# Generated by histmatch")?;
    writeln!(writer, "LUT_1D_SIZE {}", LEVELS)?;
    writeln!(writer)?;

    for (_, v) in curve.iter() {
        let v = v as f32 / 255.0;
        writeln!(writer, "{:.6} {:.6} {:.6}", v, v, v)?;
    }
    Ok(())
}

fn parse_size(line: &str) -> CurveResult<usize> {
    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| CurveError::ParseError("invalid size line".into()))?
        .parse()
        .map_err(|_| CurveError::ParseError("invalid size value".into()))
}

fn parse_domain(line: &str) -> CurveResult<f32> {
    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| CurveError::ParseError("invalid domain line".into()))?
        .parse()
        .map_err(|_| CurveError::ParseError("invalid domain value".into()))
}

fn parse_first_column(line: &str) -> CurveResult<f32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(CurveError::ParseError(format!("invalid RGB line: {}", line)));
    }
    parts[0]
        .parse()
        .map_err(|_| CurveError::ParseError(format!("invalid value: {}", parts[0])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn to_string(curve: &Curve) -> String {
        let mut buf = Vec::new();
        write_curve_to(&mut buf, curve).expect("write failed");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn test_write_header_and_entries() {
        let text = to_string(&Curve::identity());
        assert!(text.contains("LUT_1D_SIZE 256"));
        assert!(text.contains("\n0.000000 0.000000 0.000000\n"));
        assert!(text.trim_end().ends_with("1.000000 1.000000 1.000000"));
    }

    #[test]
    fn test_parse_written_curve() {
        let curve = Curve::from_fn(|v| 255 - v / 3);
        let back = parse_curve(Cursor::new(to_string(&curve))).expect("parse failed");
        assert_eq!(back, curve);
    }

    #[test]
    fn test_reject_3d() {
        let err = parse_curve(Cursor::new("LUT_3D_SIZE 2\n")).unwrap_err();
        assert!(matches!(err, CurveError::ParseError(_)));
    }

    #[test]
    fn test_reject_wrong_size() {
        let cube = "LUT_1D_SIZE 3\n0.0 0.0 0.0\n0.5 0.5 0.5\n1.0 1.0 1.0\n";
        assert!(parse_curve(Cursor::new(cube)).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("curve.cube");
        let curve = Curve::from_fn(|v| v.saturating_mul(2));

        write_curve(&path, &curve).expect("write failed");
        let loaded = read_curve(&path).expect("read failed");
        assert_eq!(loaded, curve);
    }
}

//! ASCII XYZ point files.
//!
//! Format: one point per line, `x y z` separated by whitespace or commas.
//! Blank lines and lines starting with `#` are skipped. Columns after the
//! third (intensity, classification, ...) are ignored. NaN and infinite
//! coordinates, including overflowing literals like `1e400`, are rejected.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::Point3D;

use super::PointIoError;

/// Read an XYZ file.
pub fn read_xyz(path: &Path) -> Result<Vec<Point3D>, PointIoError> {
    let file = File::open(path)?;
    let points = parse_xyz(BufReader::new(file))?;
    log::info!("Read {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Parse XYZ text from a reader.
pub fn parse_xyz<R: BufRead>(reader: R) -> Result<Vec<Point3D>, PointIoError> {
    let mut points = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut coords = [0.0_f64; 3];
        let mut fields = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty());

        for (axis, slot) in ["x", "y", "z"].iter().zip(coords.iter_mut()) {
            let field = fields.next().ok_or_else(|| PointIoError::Parse {
                line: i + 1,
                message: format!("missing {} coordinate", axis),
            })?;
            *slot = field.parse().map_err(|_| PointIoError::Parse {
                line: i + 1,
                message: format!("invalid {} coordinate '{}'", axis, field),
            })?;
            if !slot.is_finite() {
                return Err(PointIoError::Parse {
                    line: i + 1,
                    message: format!("non-finite {} coordinate '{}'", axis, field),
                });
            }
        }

        points.push(Point3D::from(coords));
    }

    Ok(points)
}

/// Write points to an XYZ file.
pub fn write_xyz(path: &Path, points: &[Point3D]) -> Result<(), PointIoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_xyz_to(&mut writer, points)?;
    writer.flush()?;
    log::info!("Wrote {} points to {}", points.len(), path.display());
    Ok(())
}

/// Write points to any writer in XYZ format.
pub fn write_xyz_to<W: Write>(writer: &mut W, points: &[Point3D]) -> Result<(), PointIoError> {
    for p in points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    Ok(())
}

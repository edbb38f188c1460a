//! Dataset loader for labeled pixel rows.
//!
//! Supported format:
//! - UTF-8, comma-separated, no header
//! - Each row is `label,p0,p1,...,p(F-1)`
//! - `label` is an integer class index below `n_classes`
//! - Pixels are integer intensities in 0..=255 and are scaled to [0, 1]
//!   by dividing by 255.0 here, so samples leave this module normalized.
//!
//! Any malformed row is fatal; the whole load fails with the line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::data::sample::Sample;
use crate::error::{Error, Result};
use crate::network::dims::NetworkDims;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads up to `limit` samples (all of them when `limit` is `None`) from `path`.
pub fn load_csv(path: impl AsRef<Path>, dims: NetworkDims, limit: Option<usize>) -> Result<Vec<Sample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let samples = read_samples(BufReader::new(file), dims, limit)
        .map_err(|e| match e {
            Error::Io { source, .. } => Error::io(path, source),
            other => other,
        })?;
    debug!(path = %path.display(), samples = samples.len(), "loaded dataset");
    Ok(samples)
}

/// Parses samples from any buffered reader. Blank lines are skipped.
pub fn read_samples<R: BufRead>(reader: R, dims: NetworkDims, limit: Option<usize>) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        if limit.is_some_and(|max| samples.len() >= max) {
            break;
        }
        let line = line.map_err(|e| Error::io("<dataset>", e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        samples.push(parse_row(line, idx + 1, dims)?);
    }

    Ok(samples)
}

/// Parses a single `label,pixels...` row.
pub fn parse_row(line: &str, line_no: usize, dims: NetworkDims) -> Result<Sample> {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();
    if cells.len() != dims.inputs + 1 {
        return Err(Error::Dataset {
            line: line_no,
            reason: format!("expected {} columns (label + {} pixels), got {}",
                dims.inputs + 1, dims.inputs, cells.len()),
        });
    }

    let label: usize = cells[0].parse().map_err(|_| Error::Dataset {
        line: line_no,
        reason: format!("label '{}' is not a non-negative integer", cells[0]),
    })?;
    let features = cells[1..].iter()
        .map(|c| parse_pixel(c, line_no))
        .collect::<Result<Vec<f64>>>()?;

    Sample::try_new(label, features, dims).map_err(|e| match e {
        Error::InvalidSample(reason) => Error::Dataset { line: line_no, reason },
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn parse_pixel(cell: &str, line_no: usize) -> Result<f64> {
    let value: u8 = cell.parse().map_err(|_| Error::Dataset {
        line: line_no,
        reason: format!("'{}' is not a pixel intensity in 0..=255", cell),
    })?;
    Ok(value as f64 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const DIMS: NetworkDims = NetworkDims::new(3, 2, 10);

    #[test]
    fn rows_are_normalized() {
        let data = "7,0,255,51\n\n2,255,0,0\n";
        let samples = read_samples(Cursor::new(data), DIMS, None).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label(), 7);
        assert_eq!(samples[0].features(), &[0.0, 1.0, 0.2]);
        assert_eq!(samples[1].label(), 2);
    }

    #[test]
    fn limit_stops_early() {
        let data = "1,0,0,0\n2,0,0,0\n3,0,0,0\n";
        let samples = read_samples(Cursor::new(data), DIMS, Some(2)).unwrap();
        assert_eq!(samples.iter().map(Sample::label).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn wrong_column_count_is_fatal() {
        let err = read_samples(Cursor::new("1,0,0,0\n1,0,0\n"), DIMS, None).unwrap_err();
        assert!(matches!(err, Error::Dataset { line: 2, .. }), "{err}");
    }

    #[test]
    fn non_numeric_pixel_is_fatal() {
        let err = read_samples(Cursor::new("1,0,x,0\n"), DIMS, None).unwrap_err();
        assert!(matches!(err, Error::Dataset { line: 1, .. }));
    }

    #[test]
    fn out_of_range_pixel_is_fatal() {
        assert!(read_samples(Cursor::new("1,0,256,0\n"), DIMS, None).is_err());
    }

    #[test]
    fn label_beyond_class_count_is_fatal() {
        let err = read_samples(Cursor::new("1,0,0,0\n10,0,0,0\n"), DIMS, None).unwrap_err();
        assert!(
            matches!(err, Error::Dataset { line: 2, ref reason } if reason.contains("class count")),
            "{err}"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_csv("/definitely/not/here.csv", DIMS, None).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "5,255,255,255").unwrap();
        let samples = load_csv(file.path(), DIMS, None).unwrap();
        assert_eq!(samples, vec![Sample::new(5, vec![1.0, 1.0, 1.0])]);
    }
}

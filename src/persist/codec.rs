//! Line-oriented text encoding of a [`ParameterStore`].
//!
//! ```text
//! # saved weights
//! DIMENSIONS <F> <H> <C>
//! Wxh <H> <F>
//! <H rows of F values>
//! bh <H>
//! <1 row of H values>
//! Why <C> <H>
//! <C rows of H values>
//! by <C>
//! <1 row of C values>
//! ```
//!
//! Values are written with exactly 8 fractional digits and a `.` separator.
//! Loading is strict: every row must hold exactly the declared number of
//! values, and the live store is only replaced once the whole file parsed.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::dims::NetworkDims;
use crate::network::params::ParameterStore;

const COMMENT: char = '#';

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Writes `params` to `path`.
///
/// The data goes to a sibling temporary file first and is renamed over
/// `path` only after a successful flush, so `path` never holds a partial file.
pub fn save(params: &ParameterStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let tmp = temp_path(path);

    let written = File::create(&tmp).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_params(params, &mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(&tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        Error::io(path, e)
    })?;

    debug!(path = %path.display(), dims = %params.dims(), "saved weights");
    Ok(())
}

/// Encodes `params` into `w`.
pub fn write_params<W: Write>(params: &ParameterStore, w: &mut W) -> io::Result<()> {
    let dims = params.dims();
    writeln!(w, "{COMMENT} saved weights")?;
    writeln!(w, "DIMENSIONS {} {} {}", dims.inputs, dims.hidden, dims.outputs)?;

    writeln!(w, "Wxh {} {}", dims.hidden, dims.inputs)?;
    write_matrix(w, params.wxh())?;
    writeln!(w, "bh {}", dims.hidden)?;
    write_row(w, params.bh())?;

    writeln!(w, "Why {} {}", dims.outputs, dims.hidden)?;
    write_matrix(w, params.why())?;
    writeln!(w, "by {}", dims.outputs)?;
    write_row(w, params.by())
}

fn write_matrix<W: Write>(w: &mut W, m: &Matrix) -> io::Result<()> {
    for row in &m.data {
        write_row(w, row)?;
    }
    Ok(())
}

fn write_row<W: Write>(w: &mut W, values: &[f64]) -> io::Result<()> {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            w.write_all(b" ")?;
        }
        write!(w, "{v:.8}")?;
    }
    writeln!(w)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Reads a weight file written for a network of shape `dims`.
pub fn load(path: impl AsRef<Path>, dims: NetworkDims) -> Result<ParameterStore> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let params = read_params(BufReader::new(file), dims).map_err(|e| match e {
        Error::Io { source, .. } => Error::io(path, source),
        other => other,
    })?;
    debug!(path = %path.display(), dims = %dims, "loaded weights");
    Ok(params)
}

/// Decodes a parameter store of shape `dims` from `reader`.
pub fn read_params<R: BufRead>(reader: R, dims: NetworkDims) -> Result<ParameterStore> {
    let mut lines = ContentLines::new(reader);

    let mut wxh: Option<Matrix> = None;
    let mut bh: Option<Vec<f64>> = None;
    let mut why: Option<Matrix> = None;
    let mut by: Option<Vec<f64>> = None;

    while let Some((line_no, line)) = lines.next_line()? {
        let mut tokens = line.split_whitespace();
        let head = tokens.next().unwrap_or_default();
        let declared: Vec<&str> = tokens.collect();

        match head {
            "DIMENSIONS" | "dims" => check_dimensions_line(&declared, line_no, dims)?,
            "Wxh" => {
                ensure_first(&wxh, "Wxh", line_no)?;
                check_declared(&declared, &[dims.hidden, dims.inputs], line_no, dims, |d, n| {
                    NetworkDims { hidden: n[0], inputs: n[1], ..d }
                })?;
                wxh = Some(lines.read_matrix("Wxh", dims.hidden, dims.inputs)?);
            }
            "bh" => {
                ensure_first(&bh, "bh", line_no)?;
                check_declared(&declared, &[dims.hidden], line_no, dims, |d, n| {
                    NetworkDims { hidden: n[0], ..d }
                })?;
                bh = Some(lines.read_row("bh", dims.hidden)?);
            }
            "Why" => {
                ensure_first(&why, "Why", line_no)?;
                check_declared(&declared, &[dims.outputs, dims.hidden], line_no, dims, |d, n| {
                    NetworkDims { outputs: n[0], hidden: n[1], ..d }
                })?;
                why = Some(lines.read_matrix("Why", dims.outputs, dims.hidden)?);
            }
            "by" => {
                ensure_first(&by, "by", line_no)?;
                check_declared(&declared, &[dims.outputs], line_no, dims, |d, n| {
                    NetworkDims { outputs: n[0], ..d }
                })?;
                by = Some(lines.read_row("by", dims.outputs)?);
            }
            other => {
                return Err(Error::Malformed {
                    line: line_no,
                    reason: format!("unexpected '{other}' outside any section"),
                })
            }
        }
    }

    Ok(ParameterStore::from_parts(
        dims,
        wxh.ok_or(Error::MissingSection("Wxh"))?,
        bh.ok_or(Error::MissingSection("bh"))?,
        why.ok_or(Error::MissingSection("Why"))?,
        by.ok_or(Error::MissingSection("by"))?,
    ))
}

/// Line source that skips blank and comment lines and tracks 1-based line
/// numbers.
struct ContentLines<R> {
    inner: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ContentLines<R> {
    fn new(reader: R) -> Self {
        ContentLines { inner: reader.lines(), line_no: 0 }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        for line in self.inner.by_ref() {
            self.line_no += 1;
            let line = line.map_err(|e| Error::io("<weights>", e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
                continue;
            }
            return Ok(Some((self.line_no, trimmed.to_string())));
        }
        Ok(None)
    }

    fn read_matrix(&mut self, section: &'static str, rows: usize, cols: usize) -> Result<Matrix> {
        let mut data = Vec::with_capacity(rows);
        for found in 0..rows {
            let (line_no, line) = self.next_line()?.ok_or(Error::UnexpectedEof {
                section,
                expected_rows: rows,
                found_rows: found,
            })?;
            data.push(parse_row(&line, line_no, section, cols)?);
        }
        Ok(Matrix { rows, cols, data })
    }

    fn read_row(&mut self, section: &'static str, len: usize) -> Result<Vec<f64>> {
        let mut m = self.read_matrix(section, 1, len)?;
        Ok(m.data.remove(0))
    }
}

/// Parses one row, which must hold exactly `expected` finite values.
fn parse_row(line: &str, line_no: usize, section: &'static str, expected: usize) -> Result<Vec<f64>> {
    let values = line.split_whitespace()
        .map(|token| {
            token.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::InvalidNumber {
                    line: line_no,
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != expected {
        return Err(Error::RowLength {
            line: line_no,
            section,
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

fn ensure_first<T>(slot: &Option<T>, section: &str, line_no: usize) -> Result<()> {
    if slot.is_some() {
        return Err(Error::Malformed {
            line: line_no,
            reason: format!("duplicate '{section}' section"),
        });
    }
    Ok(())
}

fn parse_sizes(tokens: &[&str], line_no: usize) -> Result<Vec<usize>> {
    tokens.iter()
        .map(|t| {
            t.parse::<usize>().map_err(|_| Error::Malformed {
                line: line_no,
                reason: format!("'{t}' is not a dimension"),
            })
        })
        .collect()
}

/// A section header may omit its sizes; when present they must match.
fn check_declared(
    tokens: &[&str],
    expected: &[usize],
    line_no: usize,
    dims: NetworkDims,
    as_dims: impl Fn(NetworkDims, &[usize]) -> NetworkDims,
) -> Result<()> {
    if tokens.is_empty() {
        return Ok(());
    }
    if tokens.len() != expected.len() {
        return Err(Error::Malformed {
            line: line_no,
            reason: format!("section header declares {} sizes, expected {}", tokens.len(), expected.len()),
        });
    }
    let sizes = parse_sizes(tokens, line_no)?;
    if sizes != expected {
        return Err(Error::DimensionMismatch {
            expected: dims,
            found: as_dims(dims, &sizes),
        });
    }
    Ok(())
}

fn check_dimensions_line(tokens: &[&str], line_no: usize, dims: NetworkDims) -> Result<()> {
    if tokens.is_empty() {
        return Ok(());
    }
    let sizes = parse_sizes(tokens, line_no)?;
    let &[inputs, hidden, outputs] = sizes.as_slice() else {
        return Err(Error::Malformed {
            line: line_no,
            reason: format!("DIMENSIONS needs 3 sizes, got {}", sizes.len()),
        });
    };
    let found = NetworkDims::new(inputs, hidden, outputs);
    if found != dims {
        return Err(Error::DimensionMismatch { expected: dims, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;

    const DIMS: NetworkDims = NetworkDims::new(3, 2, 2);

    fn sample_store() -> ParameterStore {
        ParameterStore::from_parts(
            DIMS,
            Matrix::from_data(vec![vec![0.5, -0.25, 1.0], vec![0.0, 0.125, -1.0]]),
            vec![0.1, -0.2],
            Matrix::from_data(vec![vec![0.3, 0.4], vec![-0.5, 0.6]]),
            vec![0.7, -0.8],
        )
    }

    fn encode(params: &ParameterStore) -> String {
        let mut buf = Vec::new();
        write_params(params, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn layout_is_exact() {
        let expected = "\
# saved weights
DIMENSIONS 3 2 2
Wxh 2 3
0.50000000 -0.25000000 1.00000000
0.00000000 0.12500000 -1.00000000
bh 2
0.10000000 -0.20000000
Why 2 2
0.30000000 0.40000000
-0.50000000 0.60000000
by 2
0.70000000 -0.80000000
";
        assert_eq!(encode(&sample_store()), expected);
    }

    #[test]
    fn decode_reverses_encode() {
        let store = ParameterStore::seeded(DIMS, 17);
        let loaded = read_params(Cursor::new(encode(&store)), DIMS).unwrap();
        for (a, b) in store.values().zip(loaded.values()) {
            assert_abs_diff_eq!(a, b, epsilon = 5e-9);
        }
    }

    #[test]
    fn comments_blank_lines_and_bare_headers_are_accepted() {
        let text = "\
# header
dims

Wxh
0.5 -0.25 1
# inline comment
0 0.125 -1
bh
0.1 -0.2
Why
0.3 0.4
-0.5 0.6
by
0.7 -0.8
";
        let loaded = read_params(Cursor::new(text), DIMS).unwrap();
        assert_eq!(loaded, sample_store());
    }

    #[test]
    fn short_row_is_rejected() {
        let text = encode(&sample_store()).replace("0.00000000 0.12500000 -1.00000000", "0.0 0.125");
        let err = read_params(Cursor::new(text), DIMS).unwrap_err();
        assert!(
            matches!(err, Error::RowLength { line: 5, section: "Wxh", expected: 3, found: 2 }),
            "{err}"
        );
    }

    #[test]
    fn long_row_is_rejected() {
        let text = encode(&sample_store()).replace("0.70000000 -0.80000000", "0.7 -0.8 0.9");
        assert!(matches!(
            read_params(Cursor::new(text), DIMS),
            Err(Error::RowLength { section: "by", found: 3, .. })
        ));
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        let text = encode(&sample_store()).replace("0.30000000", "abc");
        let err = read_params(Cursor::new(text), DIMS).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { line: 9, ref token } if token == "abc"));
    }

    #[test]
    fn non_finite_token_is_rejected() {
        let one = NetworkDims::new(1, 1, 1);
        for bad in ["nan", "NaN", "inf", "-Infinity"] {
            let text = format!("Wxh 1 1\n{bad}\nbh 1\n0.0\nWhy 1 1\n0.0\nby 1\n0.0\n");
            let err = read_params(Cursor::new(text), one).unwrap_err();
            assert!(
                matches!(err, Error::InvalidNumber { line: 2, ref token } if token == bad),
                "{err}"
            );
        }

        let text = "Wxh 1 1\n0.5\nbh 1\n0.0\nWhy 1 1\n0.0\nby 1\ninfinity\n";
        let err = read_params(Cursor::new(text), one).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { line: 8, .. }), "{err}");
    }

    #[test]
    fn truncated_file_is_rejected() {
        let text = "Wxh 2 3\n0 0 0\n";
        assert!(matches!(
            read_params(Cursor::new(text), DIMS),
            Err(Error::UnexpectedEof { section: "Wxh", expected_rows: 2, found_rows: 1 })
        ));
    }

    #[test]
    fn missing_section_is_rejected() {
        let text: String = encode(&sample_store())
            .lines()
            .take(7)
            .map(|l| format!("{l}\n"))
            .collect();
        assert!(matches!(read_params(Cursor::new(text), DIMS), Err(Error::MissingSection("Why"))));
    }

    #[test]
    fn declared_dimensions_must_match() {
        let other = ParameterStore::seeded(NetworkDims::new(4, 2, 2), 1);
        let err = read_params(Cursor::new(encode(&other)), DIMS).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { expected: DIMS, found } if found == NetworkDims::new(4, 2, 2)
        ));
    }

    #[test]
    fn section_header_sizes_must_match() {
        let text = encode(&sample_store()).replace("Why 2 2", "Why 3 2");
        assert!(matches!(read_params(Cursor::new(text), DIMS), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn duplicate_section_is_rejected() {
        let text = format!("{}bh 2\n0 0\n", encode(&sample_store()));
        assert!(matches!(read_params(Cursor::new(text), DIMS), Err(Error::Malformed { line: 13, .. })));
    }

    #[test]
    fn stray_line_is_rejected() {
        let text = format!("hello\n{}", encode(&sample_store()));
        assert!(matches!(read_params(Cursor::new(text), DIMS), Err(Error::Malformed { line: 1, .. })));
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(temp_path(Path::new("/a/b/w.txt")), PathBuf::from("/a/b/w.txt.tmp"));
    }
}

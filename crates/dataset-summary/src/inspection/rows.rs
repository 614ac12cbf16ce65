//! Row estimation by raw line counting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Estimated number of data rows in a file.
///
/// Derived from the line count minus one header line. Quoted fields with
/// embedded newlines are counted as several lines, so the estimate can
/// exceed the true row count for such files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowEstimate {
    Known(usize),
    /// The file could not be read.
    Unknown,
}

impl RowEstimate {
    pub fn known(&self) -> Option<usize> {
        match self {
            Self::Known(rows) => Some(*rows),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for RowEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(rows) => write!(f, "{rows}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Estimate data rows as `lines - 1`, clamped at zero.
///
/// Never fails: any open or read error yields [`RowEstimate::Unknown`].
pub fn estimate_rows(path: &Path) -> RowEstimate {
    match count_lines(path) {
        Ok(lines) => RowEstimate::Known(lines.saturating_sub(1)),
        Err(e) => {
            debug!("Could not count lines in {}: {}", path.display(), e);
            RowEstimate::Unknown
        }
    }
}

/// Count the lines of a file.
pub fn count_lines(path: &Path) -> io::Result<usize> {
    let file = File::open(path)?;
    count_lines_from(BufReader::new(file))
}

/// Count lines with universal-newline rules: `\n`, `\r\n` and a lone `\r`
/// each end a line, and a trailing unterminated line counts.
///
/// Works on raw bytes, so invalid UTF-8 behaves as if decoded with
/// replacement characters: it is counted and never rejected.
pub fn count_lines_from<R: BufRead>(mut reader: R) -> io::Result<usize> {
    let mut lines = 0;
    let mut after_cr = false;
    let mut partial = false;

    loop {
        let chunk = match reader.fill_buf() {
            Ok([]) => break,
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        for &byte in chunk {
            match byte {
                b'\r' => {
                    lines += 1;
                    after_cr = true;
                    partial = false;
                }
                b'\n' => {
                    if !after_cr {
                        lines += 1;
                    }
                    after_cr = false;
                    partial = false;
                }
                _ => {
                    after_cr = false;
                    partial = true;
                }
            }
        }

        let consumed = chunk.len();
        reader.consume(consumed);
    }

    if partial {
        lines += 1;
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn count(bytes: &[u8]) -> usize {
        count_lines_from(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_count_lines_terminators() {
        assert_eq!(count(b""), 0);
        assert_eq!(count(b"header"), 1);
        assert_eq!(count(b"header\n"), 1);
        assert_eq!(count(b"header\n1\n2"), 3);
        assert_eq!(count(b"header\r\n1\r\n2\r\n"), 3);
        assert_eq!(count(b"header\r1\r2"), 3);
        assert_eq!(count(b"\n\n"), 2);
    }

    #[test]
    fn test_crlf_split_across_reads() {
        // A one-byte buffer forces every \r\n pair across a chunk boundary.
        let reader = BufReader::with_capacity(1, Cursor::new(b"a\r\nb\r\nc".to_vec()));
        assert_eq!(count_lines_from(reader).unwrap(), 3);
    }

    #[test]
    fn test_invalid_utf8_is_counted() {
        assert_eq!(count(b"col\n\xff\xfe\n\xc3\x28\n"), 3);
    }

    #[test]
    fn test_estimate_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        fs::write(&path, "a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(estimate_rows(&path), RowEstimate::Known(2));

        fs::write(&path, "a,b\n").unwrap();
        assert_eq!(estimate_rows(&path), RowEstimate::Known(0));

        fs::write(&path, "").unwrap();
        assert_eq!(estimate_rows(&path), RowEstimate::Known(0));
    }

    #[test]
    fn test_embedded_newlines_overcount() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");
        fs::write(&path, "id,note\n1,\"two\nlines\"\n").unwrap();
        assert_eq!(estimate_rows(&path), RowEstimate::Known(2));
    }

    #[test]
    fn test_estimate_unreadable_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(estimate_rows(&dir.path().join("missing.csv")), RowEstimate::Unknown);
        assert_eq!(estimate_rows(dir.path()), RowEstimate::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(RowEstimate::Known(1000).to_string(), "1000");
        assert_eq!(RowEstimate::Unknown.to_string(), "unknown");
        assert_eq!(RowEstimate::Known(7).known(), Some(7));
        assert_eq!(RowEstimate::Unknown.known(), None);
    }
}

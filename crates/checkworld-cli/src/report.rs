//! # Scan Reports
//!
//! Serializable scan results and the bad-chunk report file.
//!
//! The report file lists one bad chunk per two lines, CRLF terminated:
//!
//! ```text
//! world/2/1r/c.2.-1.dat
//! # validation error: expected 'root.Level.xPos' to be a TAG_Int, found TAG_Short
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// One chunk that failed its check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadChunk {
    /// Path relative to the world directory.
    pub path: String,
    /// `decode`, `validation`, or `io`.
    pub category: &'static str,
    pub message: String,
}

/// Totals for a whole scan, printed by `--format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub world: String,
    pub total: usize,
    pub corrupt: usize,
    /// Chunk files that decompressed to an empty stream.
    pub empty: usize,
    pub bad_chunks: Vec<BadChunk>,
}

impl ScanSummary {
    pub fn is_clean(&self) -> bool {
        self.corrupt == 0
    }
}

/// Writes the `--write-bad-chunks` report.
#[derive(Debug)]
pub struct BadChunkWriter<W: Write> {
    inner: W,
}

impl BadChunkWriter<BufWriter<File>> {
    /// Create (or truncate) the report file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("could not open bad chunks output file {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BadChunkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Append one entry. Line breaks inside `message` are removed so each
    /// entry stays exactly two lines.
    pub fn record(&mut self, path: &Path, message: &str) -> io::Result<()> {
        let message: String = message.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        write!(self.inner, "{}\r\n# {}\r\n", path.display(), message)
    }

    /// Flush and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_crlf_pairs() {
        let mut writer = BadChunkWriter::new(Vec::new());
        writer
            .record(Path::new("world/0/0/c.0.0.dat"), "decode error: unknown tag type: 12")
            .unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "world/0/0/c.0.0.dat\r\n# decode error: unknown tag type: 12\r\n"
        );
    }

    #[test]
    fn line_breaks_are_stripped_from_messages() {
        let mut writer = BadChunkWriter::new(Vec::new());
        writer
            .record(Path::new("c.1.1.dat"), "first\r\nsecond\nthird")
            .unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "c.1.1.dat\r\n# firstsecondthird\r\n");
    }

    #[test]
    fn summary_serializes_bad_chunks() {
        let summary = ScanSummary {
            world: "world".into(),
            total: 3,
            corrupt: 1,
            empty: 0,
            bad_chunks: vec![BadChunk {
                path: "0/0/c.0.0.dat".into(),
                category: "validation",
                message: "missing tag 'Level' in 'root'".into(),
            }],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["corrupt"], 1);
        assert_eq!(json["bad_chunks"][0]["category"], "validation");
        assert!(!summary.is_clean());
    }
}

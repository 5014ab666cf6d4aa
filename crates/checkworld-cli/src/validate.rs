//! # Validate Subcommand
//!
//! Scans `<world>/*/*/c.*.dat` in sorted order, checks each chunk, and
//! prints one progress line per file. A failing chunk is counted and
//! reported; the scan always continues to the next file.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use flate2::read::MultiGzDecoder;

use checkworld_nbt::ReaderLimits;
use checkworld_schema::{check_chunk_at, CheckError, ChunkCoords, ChunkReport, ChunkStatus};

use crate::report::{BadChunk, BadChunkWriter, ScanSummary};
use crate::EXIT_CORRUPT;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// World directory.
    #[arg(long, default_value = "world")]
    pub world: PathBuf,

    /// Write the path and reason of each bad chunk to this file.
    #[arg(long, value_name = "FILE")]
    pub write_bad_chunks: Option<PathBuf>,

    /// Output format for the scan result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Deepest compound/list nesting the decoder accepts.
    #[arg(long, default_value_t = ReaderLimits::default().max_depth)]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Progress lines and a one-line summary.
    Text,
    /// A single JSON summary, no progress lines.
    Json,
}

/// Execute the validate subcommand. Returns the process exit code.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = scan_world(args, &mut out)?;

    match args.format {
        OutputFormat::Text => {
            writeln!(out, "Scanned with {} corrupt chunk(s) detected.", summary.corrupt)?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .context("failed to serialize scan summary")?;
            writeln!(out, "{json}")?;
        }
    }

    Ok(if summary.is_clean() { 0 } else { EXIT_CORRUPT })
}

/// Check every chunk file under `args.world`, writing progress to `out`
/// in text mode.
///
/// # Errors
///
/// Fails only on setup problems: an unreadable world directory, no chunk
/// files at all, or a report file that cannot be created.
pub fn scan_world(args: &ValidateArgs, out: &mut impl Write) -> Result<ScanSummary> {
    let text = args.format == OutputFormat::Text;
    let files = find_chunk_files(&args.world)?;
    if files.is_empty() {
        bail!("failed to find chunk files under {}", args.world.display());
    }

    let mut bad_writer = args
        .write_bad_chunks
        .as_deref()
        .map(BadChunkWriter::create)
        .transpose()?;

    let limits = ReaderLimits {
        max_depth: args.max_depth,
    };
    let total = files.len();
    tracing::info!(total, world = %args.world.display(), "found chunk files");

    let mut bad_chunks = Vec::new();
    let mut empty = 0;
    for (i, path) in files.iter().enumerate() {
        let relative = path.strip_prefix(&args.world).unwrap_or(path);
        warn_if_misplaced(relative);
        if text {
            writeln!(
                out,
                "[{}/{} {}% {}] {}",
                i + 1,
                total,
                i * 100 / total,
                bad_chunks.len(),
                relative.display()
            )?;
        }

        match check_file(path, limits) {
            Ok(report) => {
                if report.status == ChunkStatus::Empty {
                    empty += 1;
                }
                tracing::debug!(
                    path = %relative.display(),
                    entities = report.entities,
                    tile_entities = report.tile_entities,
                    "chunk ok"
                );
            }
            Err(err) => {
                let message = err.to_string();
                tracing::debug!(path = %relative.display(), category = err.category(), "bad chunk");
                if text {
                    writeln!(out, "BAD CHUNK: {message}")?;
                }
                if let Some(writer) = bad_writer.as_mut() {
                    if let Err(e) = writer.record(path, &message) {
                        tracing::error!("failed to write bad chunk output file: {e}");
                    }
                }
                bad_chunks.push(BadChunk {
                    path: relative.display().to_string(),
                    category: err.category(),
                    message,
                });
            }
        }
    }

    if let Some(writer) = bad_writer {
        if let Err(e) = writer.finish() {
            tracing::error!("failed to flush bad chunk output file: {e}");
        }
    }

    Ok(ScanSummary {
        world: args.world.display().to_string(),
        total,
        corrupt: bad_chunks.len(),
        empty,
        bad_chunks,
    })
}

/// Gunzip and check one chunk file.
///
/// Coordinates are resolved from the file name before the file is opened.
/// The file handle lives inside the decoder handed to the pipeline, so it
/// is closed however the check ends. A zero-byte file is an empty chunk.
pub fn check_file(path: &Path, limits: ReaderLimits) -> Result<ChunkReport, CheckError> {
    let coords = ChunkCoords::from_path(path)?;
    let io_error = |source: io::Error| CheckError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    if file.metadata().map_err(io_error)?.len() == 0 {
        return check_chunk_at(coords, io::empty(), limits);
    }
    check_chunk_at(coords, MultiGzDecoder::new(BufReader::new(file)), limits)
}

/// Chunk files outside `<x mod 64>/<z mod 64>/` are still checked, but the
/// game would never load them from there.
fn warn_if_misplaced(relative: &Path) {
    let Ok(coords) = ChunkCoords::from_path(relative) else {
        return;
    };
    let expected = coords.relative_path();
    if relative != expected {
        tracing::warn!(
            path = %relative.display(),
            expected = %expected.display(),
            "chunk file is not in its canonical directory"
        );
    }
}

/// Chunk files two directory levels below `world`, sorted.
///
/// Hidden entries are skipped at every level.
pub fn find_chunk_files(world: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for outer in visible_entries(world)?.into_iter().filter(|p| p.is_dir()) {
        for inner in visible_entries(&outer)?.into_iter().filter(|p| p.is_dir()) {
            files.extend(
                visible_entries(&inner)?
                    .into_iter()
                    .filter(|p| p.is_file() && is_chunk_file_name(p)),
            );
        }
    }
    files.sort();
    Ok(files)
}

fn visible_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read directory {}", dir.display()))?;
        if !entry.file_name().to_string_lossy().starts_with('.') {
            paths.push(entry.path());
        }
    }
    Ok(paths)
}

/// `c.*.dat`. The coordinates themselves are checked later, per chunk.
fn is_chunk_file_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() >= "c..dat".len() && n.starts_with("c.") && n.ends_with(".dat"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_file_name_pattern() {
        assert!(is_chunk_file_name(Path::new("w/0/0/c.0.0.dat")));
        assert!(is_chunk_file_name(Path::new("c.junk.dat")));
        assert!(!is_chunk_file_name(Path::new("c.dat")));
        assert!(!is_chunk_file_name(Path::new("level.dat")));
        assert!(!is_chunk_file_name(Path::new("c.0.0.dat_old")));
    }

    #[test]
    fn invalid_name_is_reported_without_opening() {
        let err = check_file(Path::new("/nonexistent/0/0/c.A.0.dat"), ReaderLimits::default())
            .unwrap_err();
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn zero_byte_file_is_an_empty_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.0.0.dat");
        fs::write(&path, b"").unwrap();
        let report = check_file(&path, ReaderLimits::default()).unwrap();
        assert_eq!(report.status, ChunkStatus::Empty);
        assert_eq!(report.coords, ChunkCoords::new(0, 0));
    }

    #[test]
    fn missing_file_is_io_category() {
        let err = check_file(Path::new("/nonexistent/0/0/c.0.0.dat"), ReaderLimits::default())
            .unwrap_err();
        assert_eq!(err.category(), "io");
    }
}

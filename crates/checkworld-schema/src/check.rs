//! # Per-Chunk Check Pipeline
//!
//! One call checks one chunk file: resolve the expected coordinates from
//! the file name, decode the decompressed bytes, then validate the tree.
//! The first failure at any stage ends the check for that chunk only.
//!
//! The byte source is taken by value and dropped on every exit path, so a
//! caller that passes an open file (or a gzip decoder wrapping one) never
//! leaks it on error.

use std::io::Read;

use checkworld_nbt::{read_root_with_limits, ReaderLimits, Tag, TagList};
use serde::Serialize;

use crate::chunk::ChunkCoords;
use crate::error::CheckError;
use crate::validate::ChunkValidator;

/// Whether a chunk held anything to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    /// A root compound was decoded and passed validation.
    Valid,
    /// The stream held no root tag at all.
    Empty,
}

/// Result of a successful check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkReport {
    pub coords: ChunkCoords,
    pub status: ChunkStatus,
    pub entities: usize,
    pub tile_entities: usize,
}

/// Check one chunk with default reader limits.
///
/// `file_name` may be a bare name or a full path; only its
/// `c.<x>.<z>.dat` tail is used. `reader` must yield decompressed bytes.
///
/// # Errors
///
/// [`CheckError::Validation`] for a bad file name or schema violation,
/// [`CheckError::Decode`] for a malformed stream.
pub fn check_chunk<R: Read>(file_name: &str, reader: R) -> Result<ChunkReport, CheckError> {
    check_chunk_with_limits(file_name, reader, ReaderLimits::default())
}

/// Check one chunk with explicit reader limits.
pub fn check_chunk_with_limits<R: Read>(
    file_name: &str,
    reader: R,
    limits: ReaderLimits,
) -> Result<ChunkReport, CheckError> {
    let coords = ChunkCoords::from_file_name(file_name)?;
    check_chunk_at(coords, reader, limits)
}

/// Check one chunk whose coordinates are already resolved.
pub fn check_chunk_at<R: Read>(
    coords: ChunkCoords,
    reader: R,
    limits: ReaderLimits,
) -> Result<ChunkReport, CheckError> {
    let validator = ChunkValidator::new(coords);

    let Some(root) = read_root_with_limits(reader, limits)? else {
        tracing::debug!(%coords, "chunk has no root tag");
        return Ok(ChunkReport {
            coords,
            status: ChunkStatus::Empty,
            entities: 0,
            tile_entities: 0,
        });
    };

    validator.validate_root(&root)?;

    let level = root
        .tag
        .as_compound()
        .and_then(|c| c.get("Level"))
        .and_then(Tag::as_compound);
    let count = |name: &str| {
        level
            .and_then(|l| l.get(name))
            .and_then(Tag::as_list)
            .map_or(0, TagList::len)
    };

    Ok(ChunkReport {
        coords,
        status: ChunkStatus::Valid,
        entities: count("Entities"),
        tile_entities: count("TileEntities"),
    })
}

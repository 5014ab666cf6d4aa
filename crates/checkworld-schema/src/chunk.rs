//! # Chunk Identity
//!
//! Alpha/Beta worlds store each chunk in its own gzip file named
//! `c.<x>.<z>.dat`, where `x` and `z` are the chunk coordinates written in
//! signed base 36 (`0-9a-z`, optional leading `-`). The file sits two
//! directories deep, under the base-36 forms of `x mod 64` and `z mod 64`.
//!
//! The coordinates in the name are the ground truth that the decoded
//! `xPos`/`zPos` fields and every tile entity position are checked against.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ValidationError;

/// Width of a chunk in blocks along x and z.
pub const CHUNK_WIDTH: i64 = 16;

/// Chunk coordinates as encoded in a chunk file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChunkCoords {
    pub x: i64,
    pub z: i64,
}

impl ChunkCoords {
    pub fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Parse coordinates from a file name or path string.
    ///
    /// Only the tail matters: the string must end in `c.<x>.<z>.dat`, so
    /// `world/1a/2b/c.1a.-2b.dat` and `c.0.0.dat` are both accepted.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidFilename`] when the tail does not match,
    /// [`ValidationError::InvalidCoordinate`] when a coordinate overflows.
    pub fn from_file_name(name: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFilename(name.to_string());

        let stem = name.strip_suffix(".dat").ok_or_else(invalid)?;
        let (rest, z) = stem.rsplit_once('.').ok_or_else(invalid)?;
        let (rest, x) = rest.rsplit_once('.').ok_or_else(invalid)?;
        if !rest.ends_with('c') || !is_coordinate_token(x) || !is_coordinate_token(z) {
            return Err(invalid());
        }

        let parse = |token: &str| {
            i64::from_str_radix(token, 36)
                .map_err(|_| ValidationError::InvalidCoordinate(name.to_string()))
        };
        Ok(Self::new(parse(x)?, parse(z)?))
    }

    /// Parse coordinates from the file name component of `path`.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ValidationError::InvalidFilename(path.display().to_string()))?;
        Self::from_file_name(name)
    }

    /// Canonical file name, e.g. `c.2.-1.dat`.
    pub fn file_name(&self) -> String {
        format!("c.{}.{}.dat", to_base36(self.x), to_base36(self.z))
    }

    /// Location of the chunk file relative to the world directory.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(to_base36(self.x.rem_euclid(64)))
            .join(to_base36(self.z.rem_euclid(64)))
            .join(self.file_name())
    }

    /// Accepted block x positions for tile entities in this chunk.
    ///
    /// Inclusive at both ends, so the range is 17 blocks wide.
    pub fn block_x_range(&self) -> RangeInclusive<i64> {
        block_range(self.x)
    }

    /// Accepted block z positions for tile entities in this chunk.
    pub fn block_z_range(&self) -> RangeInclusive<i64> {
        block_range(self.z)
    }
}

impl fmt::Display for ChunkCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

fn block_range(chunk: i64) -> RangeInclusive<i64> {
    let min = chunk.saturating_mul(CHUNK_WIDTH);
    min..=min.saturating_add(CHUNK_WIDTH)
}

fn is_coordinate_token(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty()
        && digits
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

/// Render `value` in lowercase signed base 36.
pub fn to_base36(value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut magnitude = value.unsigned_abs();
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
        if magnitude == 0 {
            break;
        }
    }
    if value < 0 {
        out.push(b'-');
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

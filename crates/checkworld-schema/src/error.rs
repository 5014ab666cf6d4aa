//! # Error Types
//!
//! Two categories, mirroring the two stages of checking a chunk:
//!
//! - [`checkworld_nbt::DecodeError`]: the bytes are not a well-formed NBT
//!   stream. Validation never starts.
//! - [`ValidationError`]: the tree is well formed but breaks a schema rule.
//!
//! [`CheckError`] unifies both (plus file I/O for drivers) so a caller can
//! record one failure per chunk and move on.

use checkworld_nbt::{DecodeError, TagType};
use thiserror::Error;

/// A well-formed tree that violates the chunk schema.
///
/// Every variant that concerns a tag carries its rendered path, e.g.
/// `root.Level.TileEntities.[3].Text2`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The file name does not end in `c.<x>.<z>.dat`.
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// The file name matched but a coordinate is not a valid base-36 integer.
    #[error("invalid filename (invalid coordinate): {0}")]
    InvalidCoordinate(String),

    #[error("expected '{path}' to be a {expected}, found {found}")]
    WrongTagType {
        path: String,
        expected: TagType,
        found: TagType,
    },

    #[error("missing tag '{name}' in '{path}'")]
    MissingChild { path: String, name: String },

    #[error("expected '{path}' to be {expected} bytes long, found {actual}")]
    InvalidLength {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid block ID {id} at offset {offset} in '{path}'")]
    InvalidBlockId { path: String, offset: usize, id: i8 },

    #[error("invalid item/block chest ID {id} in '{path}'")]
    InvalidItemId { path: String, id: i16 },

    /// A scalar outside its permitted set or range.
    #[error("invalid value in '{path}': {reason}")]
    InvalidValue { path: String, reason: String },

    /// `xPos`/`zPos` disagree with the file name.
    #[error("'{path}' is {actual} in file but {expected} in filename")]
    CoordinateMismatch {
        path: String,
        expected: i64,
        actual: i32,
    },

    /// A tile entity positioned outside the chunk it was saved in.
    #[error("{axis} coordinate {value} is outside [{min}, {max}] in '{path}'")]
    OutsideChunk {
        path: String,
        axis: char,
        value: i32,
        min: i64,
        max: i64,
    },

    #[error("unknown entity type '{id}' in '{path}'")]
    UnknownEntityType { path: String, id: String },

    #[error("unknown tile entity type '{id}' in '{path}'")]
    UnknownTileEntityType { path: String, id: String },

    #[error("invalid mob name '{name}' in '{path}'")]
    InvalidMobName { path: String, name: String },
}

/// Outcome of checking one chunk file, as reported to a driver.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The chunk file could not be opened or read by the driver.
    #[error("io error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    /// Stable category name for reports: `decode`, `validation`, or `io`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Validation(_) => "validation",
            Self::Io { .. } => "io",
        }
    }
}

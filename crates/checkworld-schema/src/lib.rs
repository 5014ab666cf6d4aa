//! # checkworld-schema: Chunk Schema Validation
//!
//! Deep, strict validation of decoded Alpha/Beta chunk files. Given the
//! file name of a chunk and its decompressed bytes, [`check_chunk`]
//! resolves the expected coordinates, decodes the NBT tree, and walks it
//! against the chunk schema, stopping at the first violation.
//!
//! ## Modules
//!
//! - [`chunk`]: expected coordinates from `c.<x>.<z>.dat` file names.
//! - [`catalog`]: block, item, entity, and tile-entity id tables.
//! - [`validate`]: the rule tables and the tree walker.
//! - [`check`]: the per-file decode-then-validate pipeline.
//!
//! ## Crate Policy
//!
//! - Depends only on `checkworld-nbt` internally.
//! - The schema is a minimum: extra children are ignored, never rejected.
//! - Every validation error names the dotted path of the offending tag.

pub mod catalog;
pub mod check;
pub mod chunk;
pub mod error;
pub mod validate;

pub use catalog::{EntityKind, TileEntityKind};
pub use check::{check_chunk, check_chunk_at, check_chunk_with_limits, ChunkReport, ChunkStatus};
pub use chunk::{to_base36, ChunkCoords};
pub use error::{CheckError, ValidationError};
pub use validate::ChunkValidator;

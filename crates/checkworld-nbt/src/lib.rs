//! # checkworld-nbt: Named Binary Tag Decoding
//!
//! This crate is the leaf of the checkworld workspace. It defines the tag
//! model for the Named Binary Tag (NBT) format used by Alpha/Beta world
//! chunk files, a fail-fast reader over untrusted byte streams, and a
//! writer used to build fixtures.
//!
//! ## Wire Format
//!
//! Big-endian throughout. A named tag is a type-id byte, a `u16`-length
//! prefixed UTF-8 name, and a type-specific payload. Compounds are
//! terminated by a zero type-id byte. Lists are homogeneous: one element
//! type byte and an `i32` count, followed by bare payloads.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed type table.** [`TagType`] is a fieldless enum covering ids
//!    0–10. Any other id is [`DecodeError::UnknownTagType`].
//!
//! 2. **Strict top-down ownership.** Tags own their children. There are no
//!    parent links; diagnostic paths are built by the walker with
//!    [`TagPath`].
//!
//! 3. **No silent truncation.** Running out of bytes inside a structure is
//!    always [`DecodeError::UnexpectedEof`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `checkworld-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod path;
pub mod reader;
pub mod tag;
pub mod writer;

pub use error::DecodeError;
pub use path::{PathSegment, TagPath};
pub use reader::{read_root, read_root_with_limits, ReaderLimits, TagReader};
pub use tag::{Compound, NamedTag, Tag, TagList, TagType};
pub use writer::{write_root, TagWriter};

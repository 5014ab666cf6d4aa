//! # Decode Errors
//!
//! Every way a byte stream can fail to conform to the NBT grammar.
//! All variants are unit-scoped: the caller abandons the current input
//! and moves on to the next one.

use thiserror::Error;

use crate::tag::TagType;

/// Error raised while decoding an NBT byte stream.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A type id outside the fixed `0..=10` table.
    #[error("unknown tag type: {0}")]
    UnknownTagType(u8),

    /// A compound contained two children with the same name.
    #[error("duplicate named tag '{0}'")]
    DuplicateNamedTag(String),

    /// The stream's root-level structure is not a single compound.
    #[error("unexpected tag: {0}")]
    UnexpectedTag(String),

    /// The stream ended while a length field still demanded bytes.
    #[error("unexpected end of stream while reading {context}")]
    UnexpectedEof {
        /// What the reader was in the middle of.
        context: &'static str,
    },

    /// A byte array length or list count below zero.
    #[error("negative {context} length: {length}")]
    NegativeLength {
        /// Which length field was negative.
        context: &'static str,
        /// The decoded value.
        length: i32,
    },

    /// A name or string payload that is not valid UTF-8.
    #[error("invalid UTF-8 in {context}")]
    InvalidUtf8 {
        /// Name or string payload.
        context: &'static str,
    },

    /// Compound/list nesting beyond the configured limit.
    #[error("tag nesting exceeds maximum depth of {max_depth}")]
    NestingTooDeep {
        /// The configured limit.
        max_depth: usize,
    },

    /// A list declared an element type that cannot carry payloads.
    #[error("list of {element_type} cannot hold {count} elements")]
    InvalidListElementType {
        /// Declared element type.
        element_type: TagType,
        /// Declared element count.
        count: i32,
    },

    /// Underlying reader failure other than end of stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Map an I/O error from a required read, turning end-of-stream into
    /// [`DecodeError::UnexpectedEof`].
    pub(crate) fn from_read(err: std::io::Error, context: &'static str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof { context }
        } else {
            Self::Io(err)
        }
    }
}

//! # Binary Tag Reader
//!
//! Decodes an NBT byte stream into a [`Tag`] tree. The reader trusts
//! nothing about its input: every length is checked, every type id is
//! looked up in the fixed table, and running dry mid-structure is an
//! error rather than a short read.
//!
//! ## Root Handling
//!
//! A decoded unit holds exactly one root compound. [`TagReader::read_root`]
//! returns `Ok(None)` for a stream with no bytes at all, fails with
//! [`DecodeError::UnexpectedTag`] if the first root is not a compound, and
//! fails the same way if any byte follows the first root.
//!
//! ## Resource Limits
//!
//! Byte array payloads are read incrementally, so a hostile length field
//! cannot force a large allocation before the bytes actually arrive.
//! Nesting depth is bounded by [`ReaderLimits::max_depth`].

use std::io::{ErrorKind, Read};

use crate::error::DecodeError;
use crate::tag::{Compound, NamedTag, Tag, TagList, TagType};

/// Upper bound on list pre-allocation, independent of the declared count.
const MAX_LIST_PREALLOC: usize = 1024;

/// Bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderLimits {
    /// Maximum compound/list nesting. The root compound counts as one level.
    pub max_depth: usize,
}

impl Default for ReaderLimits {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

/// Decode the single root compound of `reader` with default limits.
///
/// # Errors
///
/// Any [`DecodeError`]; see the module docs for root-shape rules.
pub fn read_root<R: Read>(reader: R) -> Result<Option<NamedTag>, DecodeError> {
    read_root_with_limits(reader, ReaderLimits::default())
}

/// Decode the single root compound of `reader` with explicit limits.
pub fn read_root_with_limits<R: Read>(
    reader: R,
    limits: ReaderLimits,
) -> Result<Option<NamedTag>, DecodeError> {
    TagReader::with_limits(reader, limits).read_root()
}

/// Streaming NBT decoder over any [`Read`] source.
#[derive(Debug)]
pub struct TagReader<R> {
    inner: R,
    limits: ReaderLimits,
    depth: usize,
}

impl<R: Read> TagReader<R> {
    pub fn with_limits(inner: R, limits: ReaderLimits) -> Self {
        Self {
            inner,
            limits,
            depth: 0,
        }
    }

    /// Read the whole stream as one root compound.
    ///
    /// Returns `Ok(None)` when the stream is empty.
    pub fn read_root(&mut self) -> Result<Option<NamedTag>, DecodeError> {
        let Some(type_id) = self.read_type_id_or_eof()? else {
            tracing::debug!("empty stream, no root tag");
            return Ok(None);
        };

        let root = self.read_named_tag_after_id(type_id)?.ok_or_else(|| {
            DecodeError::UnexpectedTag(format!(
                "root tag expected to be a compound tag, found {}",
                TagType::End
            ))
        })?;

        let root_type = root.tag.tag_type();
        if root_type != TagType::Compound {
            return Err(DecodeError::UnexpectedTag(format!(
                "root tag expected to be a compound tag, found {root_type}"
            )));
        }

        if self.read_type_id_or_eof()?.is_some() {
            return Err(DecodeError::UnexpectedTag(
                "only one root tag expected".to_string(),
            ));
        }

        tracing::debug!(name = %root.name, "decoded root compound");
        Ok(Some(root))
    }

    /// Read one named tag. Returns `Ok(None)` at an `End` marker.
    pub fn read_named_tag(&mut self) -> Result<Option<NamedTag>, DecodeError> {
        let type_id = self.read_u8("tag type")?;
        self.read_named_tag_after_id(type_id)
    }

    fn read_named_tag_after_id(&mut self, type_id: u8) -> Result<Option<NamedTag>, DecodeError> {
        if type_id == TagType::End.id() {
            return Ok(None);
        }
        let name = self.read_string("tag name")?;
        let tag_type = TagType::from_id(type_id)?;
        let tag = self.read_payload(tag_type)?;
        tracing::trace!(name = %name, %tag_type, "decoded named tag");
        Ok(Some(NamedTag { name, tag }))
    }

    /// Read one bare payload of a known type, as found in list bodies.
    pub fn read_payload(&mut self, tag_type: TagType) -> Result<Tag, DecodeError> {
        Ok(match tag_type {
            TagType::End => Tag::End,
            TagType::Byte => Tag::Byte(i8::from_be_bytes(self.read_array("byte")?)),
            TagType::Short => Tag::Short(i16::from_be_bytes(self.read_array("short")?)),
            TagType::Int => Tag::Int(i32::from_be_bytes(self.read_array("int")?)),
            TagType::Long => Tag::Long(i64::from_be_bytes(self.read_array("long")?)),
            TagType::Float => Tag::Float(f32::from_be_bytes(self.read_array("float")?)),
            TagType::Double => Tag::Double(f64::from_be_bytes(self.read_array("double")?)),
            TagType::ByteArray => {
                let length = self.read_length("byte array")?;
                Tag::ByteArray(self.read_bytes(length, "byte array payload")?)
            }
            TagType::String => Tag::String(self.read_string("string payload")?),
            TagType::List => self.read_list()?,
            TagType::Compound => self.read_compound()?,
        })
    }

    fn read_list(&mut self) -> Result<Tag, DecodeError> {
        let element_type = TagType::from_id(self.read_u8("list element type")?)?;
        let raw_count = i32::from_be_bytes(self.read_array("list length")?);
        let count = usize::try_from(raw_count).map_err(|_| DecodeError::NegativeLength {
            context: "list",
            length: raw_count,
        })?;
        if element_type == TagType::End && count > 0 {
            return Err(DecodeError::InvalidListElementType {
                element_type,
                count: raw_count,
            });
        }

        self.nested(|r| {
            let mut items = Vec::with_capacity(count.min(MAX_LIST_PREALLOC));
            for _ in 0..count {
                items.push(r.read_payload(element_type)?);
            }
            Ok(Tag::List(TagList::from_decoded(element_type, items)))
        })
    }

    fn read_compound(&mut self) -> Result<Tag, DecodeError> {
        self.nested(|r| {
            let mut compound = Compound::new();
            while let Some(NamedTag { name, tag }) = r.read_named_tag()? {
                compound.insert(name, tag)?;
            }
            Ok(Tag::Compound(compound))
        })
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if self.depth >= self.limits.max_depth {
            return Err(DecodeError::NestingTooDeep {
                max_depth: self.limits.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Read a type id where a clean end of stream is allowed.
    fn read_type_id_or_eof(&mut self) -> Result<Option<u8>, DecodeError> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DecodeError::Io(e)),
            }
        }
    }

    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| DecodeError::from_read(e, context))?;
        Ok(buf)
    }

    fn read_u8(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>(context)?[0])
    }

    fn read_length(&mut self, context: &'static str) -> Result<usize, DecodeError> {
        let length = i32::from_be_bytes(self.read_array(context)?);
        usize::try_from(length).map_err(|_| DecodeError::NegativeLength { context, length })
    }

    fn read_bytes(&mut self, length: usize, context: &'static str) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        let got = (&mut self.inner)
            .take(length as u64)
            .read_to_end(&mut buf)
            .map_err(|e| DecodeError::from_read(e, context))?;
        if got < length {
            return Err(DecodeError::UnexpectedEof { context });
        }
        Ok(buf)
    }

    fn read_string(&mut self, context: &'static str) -> Result<String, DecodeError> {
        let length = u16::from_be_bytes(self.read_array(context)?);
        let bytes = self.read_bytes(usize::from(length), context)?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { context })
    }
}

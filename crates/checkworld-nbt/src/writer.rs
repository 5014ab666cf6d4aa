//! # Binary Tag Writer
//!
//! Encodes a [`Tag`] tree back into the wire format read by
//! [`crate::reader`]. Chunk fixtures in the workspace's tests are built
//! with this writer rather than checked in as binary files.

use std::io::{self, Write};

use crate::tag::{Compound, NamedTag, Tag, TagList, TagType};

/// Encode `root` as a complete single-root stream.
pub fn write_root<W: Write>(writer: W, root: &NamedTag) -> io::Result<()> {
    TagWriter::new(writer).write_named_tag(&root.name, &root.tag)
}

/// Streaming NBT encoder over any [`Write`] sink.
#[derive(Debug)]
pub struct TagWriter<W> {
    inner: W,
}

impl<W: Write> TagWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Type id, name, then payload. `Tag::End` writes only its id byte.
    pub fn write_named_tag(&mut self, name: &str, tag: &Tag) -> io::Result<()> {
        self.inner.write_all(&[tag.tag_type().id()])?;
        if matches!(tag, Tag::End) {
            return Ok(());
        }
        self.write_string(name)?;
        self.write_payload(tag)
    }

    /// Bare payload, as used inside list bodies.
    pub fn write_payload(&mut self, tag: &Tag) -> io::Result<()> {
        match tag {
            Tag::End => Ok(()),
            Tag::Byte(v) => self.inner.write_all(&v.to_be_bytes()),
            Tag::Short(v) => self.inner.write_all(&v.to_be_bytes()),
            Tag::Int(v) => self.inner.write_all(&v.to_be_bytes()),
            Tag::Long(v) => self.inner.write_all(&v.to_be_bytes()),
            Tag::Float(v) => self.inner.write_all(&v.to_be_bytes()),
            Tag::Double(v) => self.inner.write_all(&v.to_be_bytes()),
            Tag::ByteArray(bytes) => {
                self.write_i32_length(bytes.len())?;
                self.inner.write_all(bytes)
            }
            Tag::String(s) => self.write_string(s),
            Tag::List(list) => self.write_list(list),
            Tag::Compound(compound) => self.write_compound(compound),
        }
    }

    fn write_list(&mut self, list: &TagList) -> io::Result<()> {
        self.inner.write_all(&[list.element_type().id()])?;
        self.write_i32_length(list.len())?;
        for item in list {
            self.write_payload(item)?;
        }
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> io::Result<()> {
        for (name, tag) in compound.iter() {
            self.write_named_tag(name, tag)?;
        }
        self.inner.write_all(&[TagType::End.id()])
    }

    fn write_string(&mut self, s: &str) -> io::Result<()> {
        let length = u16::try_from(s.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("string of {} bytes exceeds u16 length prefix", s.len()),
            )
        })?;
        self.inner.write_all(&length.to_be_bytes())?;
        self.inner.write_all(s.as_bytes())
    }

    fn write_i32_length(&mut self, length: usize) -> io::Result<()> {
        let length = i32::try_from(length).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("length {length} exceeds i32 length prefix"),
            )
        })?;
        self.inner.write_all(&length.to_be_bytes())
    }
}

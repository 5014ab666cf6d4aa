//! # Tag Model
//!
//! The in-memory representation of one decoded NBT node. A tree is built
//! once per input by the reader, walked read-only by the validator, and
//! dropped afterwards.
//!
//! ## Invariants
//!
//! - A [`Compound`]'s child names are unique. [`Compound::insert`] rejects
//!   a repeated name with [`DecodeError::DuplicateNamedTag`].
//! - A compound never stores its `End` terminator as a child.
//! - Every element of a [`TagList`] has the list's declared element type.

use std::collections::HashMap;
use std::fmt;

use crate::error::DecodeError;

/// The fixed NBT type-id table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    /// Compound terminator. Carries no name or payload.
    End = 0,
    /// Signed 8-bit integer.
    Byte = 1,
    /// Signed 16-bit integer.
    Short = 2,
    /// Signed 32-bit integer.
    Int = 3,
    /// Signed 64-bit integer.
    Long = 4,
    /// IEEE-754 single precision.
    Float = 5,
    /// IEEE-754 double precision.
    Double = 6,
    /// `i32`-length-prefixed raw bytes.
    ByteArray = 7,
    /// `u16`-length-prefixed UTF-8.
    String = 8,
    /// Homogeneous list with an element type and `i32` count.
    List = 9,
    /// Named children terminated by `End`.
    Compound = 10,
}

impl TagType {
    /// Every type in id order.
    pub const ALL: [TagType; 11] = [
        Self::End,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::ByteArray,
        Self::String,
        Self::List,
        Self::Compound,
    ];

    /// Look up a wire type id.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownTagType`] for ids above 10.
    pub fn from_id(id: u8) -> Result<Self, DecodeError> {
        Self::ALL
            .get(usize::from(id))
            .copied()
            .ok_or(DecodeError::UnknownTagType(id))
    }

    /// The wire type id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Conventional `TAG_*` name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::End => "TAG_End",
            Self::Byte => "TAG_Byte",
            Self::Short => "TAG_Short",
            Self::Int => "TAG_Int",
            Self::Long => "TAG_Long",
            Self::Float => "TAG_Float",
            Self::Double => "TAG_Double",
            Self::ByteArray => "TAG_Byte_Array",
            Self::String => "TAG_String",
            Self::List => "TAG_List",
            Self::Compound => "TAG_Compound",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(TagList),
    Compound(Compound),
}

impl Tag {
    /// The variant's wire type.
    pub fn tag_type(&self) -> TagType {
        match self {
            Self::End => TagType::End,
            Self::Byte(_) => TagType::Byte,
            Self::Short(_) => TagType::Short,
            Self::Int(_) => TagType::Int,
            Self::Long(_) => TagType::Long,
            Self::Float(_) => TagType::Float,
            Self::Double(_) => TagType::Double,
            Self::ByteArray(_) => TagType::ByteArray,
            Self::String(_) => TagType::String,
            Self::List(_) => TagType::List,
            Self::Compound(_) => TagType::Compound,
        }
    }

    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Self::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            Self::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[u8]> {
        match self {
            Self::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&TagList> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Self::Compound(v) => Some(v),
            _ => None,
        }
    }
}

/// Short, non-recursive rendering used inside diagnostics.
///
/// Containers print their size rather than their contents so a message
/// about a 32 KiB block array stays one line.
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End => f.write_str("end"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::ByteArray(v) => write!(f, "<{} bytes>", v.len()),
            Self::String(v) => write!(f, "{v:?}"),
            Self::List(v) => write!(f, "<{} x {}>", v.len(), v.element_type()),
            Self::Compound(v) => write!(f, "<compound with {} children>", v.len()),
        }
    }
}

/// A homogeneous, ordered sequence of tags.
#[derive(Debug, Clone, PartialEq)]
pub struct TagList {
    element_type: TagType,
    items: Vec<Tag>,
}

impl TagList {
    /// An empty list declaring `element_type`.
    pub fn empty(element_type: TagType) -> Self {
        Self {
            element_type,
            items: Vec::new(),
        }
    }

    /// Build a list, returning `None` if any item is not of `element_type`.
    pub fn new(element_type: TagType, items: Vec<Tag>) -> Option<Self> {
        if items.iter().all(|t| t.tag_type() == element_type) {
            Some(Self {
                element_type,
                items,
            })
        } else {
            None
        }
    }

    /// Reader-side constructor; the reader decodes every item as
    /// `element_type` so homogeneity holds by construction.
    pub(crate) fn from_decoded(element_type: TagType, items: Vec<Tag>) -> Self {
        Self {
            element_type,
            items,
        }
    }

    pub fn element_type(&self) -> TagType {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Name-keyed children of a compound tag, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
    index: HashMap<String, usize>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child, rejecting a name that is already present.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::DuplicateNamedTag`] carrying the repeated name.
    pub fn insert(&mut self, name: impl Into<String>, tag: Tag) -> Result<(), DecodeError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(DecodeError::DuplicateNamedTag(name));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, tag));
        Ok(())
    }

    /// Insert or replace a child, keeping the original position on replace.
    /// Returns the previous value.
    pub fn set(&mut self, name: impl Into<String>, tag: Tag) -> Option<Tag> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, tag)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, tag));
                None
            }
        }
    }

    /// Builder form of [`Compound::set`].
    pub fn with(mut self, name: impl Into<String>, tag: Tag) -> Self {
        self.set(name, tag);
        self
    }

    /// Remove a child, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let i = self.index.remove(name)?;
        let (_, tag) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(tag)
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(name, tag)| (name.as_str(), tag))
    }
}

/// A root-level tag together with its name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
    pub name: String,
    pub tag: Tag,
}

impl NamedTag {
    pub fn new(name: impl Into<String>, tag: Tag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }
}

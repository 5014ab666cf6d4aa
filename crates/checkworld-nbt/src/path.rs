//! # Diagnostic Tag Paths
//!
//! Tags do not know their parents. Instead, a walker carries a [`TagPath`]
//! that links back through the walker's own stack frames, one frame per
//! level of the tree. Rendering a path walks those links to the root, so
//! building a path costs nothing until an error actually needs it.
//!
//! Rendered form: `root.Level.TileEntities.[3].Text2`. The root segment is
//! the literal `root`, compound children contribute their name, and list
//! elements contribute `[index]`.

use std::fmt;

/// One step from a parent tag to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Root,
    Name(&'a str),
    Index(usize),
}

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Name(name) => f.write_str(name),
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Position of a tag relative to the root, linked through the walk.
#[derive(Debug, Clone, Copy)]
pub struct TagPath<'a> {
    parent: Option<&'a TagPath<'a>>,
    segment: PathSegment<'a>,
}

impl TagPath<'static> {
    pub fn root() -> Self {
        Self {
            parent: None,
            segment: PathSegment::Root,
        }
    }
}

impl<'a> TagPath<'a> {
    /// Path of the compound child `name`.
    pub fn child<'b>(&'b self, name: &'b str) -> TagPath<'b> {
        TagPath {
            parent: Some(self),
            segment: PathSegment::Name(name),
        }
    }

    /// Path of list element `index`.
    pub fn index(&self, index: usize) -> TagPath<'_> {
        TagPath {
            parent: Some(self),
            segment: PathSegment::Index(index),
        }
    }

    /// Segments from the root down to this tag.
    pub fn segments(&self) -> Vec<PathSegment<'a>> {
        let mut out = vec![self.segment];
        let mut cur = self.parent;
        while let Some(p) = cur {
            out.push(p.segment);
            cur = p.parent;
        }
        out.reverse();
        out
    }
}

impl fmt::Display for TagPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

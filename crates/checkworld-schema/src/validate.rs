//! # Chunk Schema Validation
//!
//! Walks a decoded chunk tree top-down and stops at the first violation.
//!
//! ## Rule Tables
//!
//! Compounds with a fixed shape are described by a table of
//! `(child name, rule)` pairs. Every listed child must be present; each is
//! validated by its rule in table order. Unlisted children are ignored.
//!
//! ```text
//! root
//! └── Level
//!     ├── Blocks            TAG_Byte_Array[32768], block ids checked
//!     ├── Data              TAG_Byte_Array[16384]
//!     ├── SkyLight          TAG_Byte_Array[16384]
//!     ├── BlockLight        TAG_Byte_Array[16384]
//!     ├── HeightMap         TAG_Byte_Array[256]
//!     ├── Entities          TAG_List of entity compounds
//!     ├── TileEntities      TAG_List of tile entity compounds
//!     ├── LastUpdate        TAG_Long
//!     ├── TerrainPopulated  TAG_Byte, 0 or 1
//!     ├── xPos              TAG_Int, equal to the file name's x
//!     └── zPos              TAG_Int, equal to the file name's z
//! ```
//!
//! Entities and tile entities are discriminated by their `id` child; see
//! [`crate::catalog`].
//!
//! ## Diagnostics
//!
//! The walker threads a [`TagPath`] through every call so each error can
//! name the offending tag, e.g. `root.Level.TileEntities.[3].Text2`.

use std::ops::RangeInclusive;

use checkworld_nbt::{Compound, NamedTag, Tag, TagList, TagPath, TagType};

use crate::catalog::{self, EntityKind, TileEntityKind};
use crate::chunk::ChunkCoords;
use crate::error::ValidationError;

pub const BLOCKS_LEN: usize = 32768;
pub const NIBBLE_ARRAY_LEN: usize = 16384;
pub const HEIGHT_MAP_LEN: usize = 256;

/// Highest valid block y.
pub const MAX_BLOCK_Y: i32 = 127;

/// Longest accepted sign line, in characters.
pub const MAX_SIGN_LINE_CHARS: usize = 15;

type Rule = fn(&ChunkValidator, &Tag, &TagPath<'_>) -> Result<(), ValidationError>;

const ROOT_RULES: &[(&str, Rule)] = &[("Level", ChunkValidator::validate_level)];

const LEVEL_RULES: &[(&str, Rule)] = &[
    ("Blocks", ChunkValidator::validate_blocks),
    ("Data", ChunkValidator::validate_data),
    ("SkyLight", ChunkValidator::validate_data),
    ("BlockLight", ChunkValidator::validate_data),
    ("HeightMap", ChunkValidator::validate_height_map),
    ("Entities", ChunkValidator::validate_entities),
    ("TileEntities", ChunkValidator::validate_tile_entities),
    ("LastUpdate", ChunkValidator::validate_last_update),
    ("TerrainPopulated", ChunkValidator::validate_terrain_populated),
    ("xPos", ChunkValidator::validate_x_pos),
    ("zPos", ChunkValidator::validate_z_pos),
];

/// Validates chunk trees against the coordinates of one chunk file.
#[derive(Debug, Clone)]
pub struct ChunkValidator {
    coords: ChunkCoords,
}

impl ChunkValidator {
    pub fn new(coords: ChunkCoords) -> Self {
        Self { coords }
    }

    /// Validate a decoded root tag. The root's own name is not checked.
    pub fn validate_root(&self, root: &NamedTag) -> Result<(), ValidationError> {
        tracing::debug!(x = self.coords.x, z = self.coords.z, "validating chunk");
        let path = TagPath::root();
        self.expect_children(&root.tag, &path, ROOT_RULES)
    }

    pub fn validate_level(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        self.expect_children(tag, path, LEVEL_RULES)
    }

    fn validate_blocks(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        let blocks = expect_byte_array(tag, path, BLOCKS_LEN)?;
        match blocks
            .iter()
            .map(|&b| b as i8)
            .enumerate()
            .find(|&(_, id)| !catalog::is_valid_block_id(id))
        {
            Some((offset, id)) => Err(ValidationError::InvalidBlockId {
                path: path.to_string(),
                offset,
                id,
            }),
            None => Ok(()),
        }
    }

    /// Block data, sky light, and block light: one nibble per block.
    fn validate_data(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        expect_byte_array(tag, path, NIBBLE_ARRAY_LEN).map(|_| ())
    }

    fn validate_height_map(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        expect_byte_array(tag, path, HEIGHT_MAP_LEN).map(|_| ())
    }

    fn validate_entities(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        let list = expect_list(tag, path)?;
        for (i, entity) in list.iter().enumerate() {
            self.validate_entity(entity, &path.index(i))?;
        }
        Ok(())
    }

    fn validate_tile_entities(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        let list = expect_list(tag, path)?;
        for (i, tile) in list.iter().enumerate() {
            self.validate_tile_entity(tile, &path.index(i))?;
        }
        Ok(())
    }

    fn validate_last_update(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        typed(tag, path, TagType::Long, Tag::as_long).map(|_| ())
    }

    fn validate_terrain_populated(
        &self,
        tag: &Tag,
        path: &TagPath<'_>,
    ) -> Result<(), ValidationError> {
        match typed(tag, path, TagType::Byte, Tag::as_byte)? {
            0 | 1 => Ok(()),
            other => Err(ValidationError::InvalidValue {
                path: path.to_string(),
                reason: format!("TerrainPopulated is {other}, neither 0 nor 1"),
            }),
        }
    }

    fn validate_x_pos(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        expect_position(tag, path, self.coords.x)
    }

    fn validate_z_pos(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        expect_position(tag, path, self.coords.z)
    }

    /// An entity must be a compound whose `id` names a known entity group.
    pub fn validate_entity(&self, tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
        let entity = expect_compound(tag, path)?;
        let id = require(entity, path, "id")?;
        match id.as_str().and_then(EntityKind::classify) {
            Some(kind) => {
                tracing::trace!(path = %path, ?kind, "entity accepted");
                Ok(())
            }
            None => Err(ValidationError::UnknownEntityType {
                path: path.to_string(),
                id: discriminator(id),
            }),
        }
    }

    /// A tile entity must sit inside this chunk and match the schema its
    /// `id` selects.
    pub fn validate_tile_entity(
        &self,
        tag: &Tag,
        path: &TagPath<'_>,
    ) -> Result<(), ValidationError> {
        let tile = expect_compound(tag, path)?;
        let id = require(tile, path, "id")?;

        let x = require_as(tile, path, "x", TagType::Int, Tag::as_int)?;
        expect_within(path, 'x', x, self.coords.block_x_range())?;
        let y = require_as(tile, path, "y", TagType::Int, Tag::as_int)?;
        expect_within(path, 'y', y, 0..=i64::from(MAX_BLOCK_Y))?;
        let z = require_as(tile, path, "z", TagType::Int, Tag::as_int)?;
        expect_within(path, 'z', z, self.coords.block_z_range())?;

        let kind = id.as_str().and_then(TileEntityKind::from_id).ok_or_else(|| {
            ValidationError::UnknownTileEntityType {
                path: path.to_string(),
                id: discriminator(id),
            }
        })?;

        match kind {
            TileEntityKind::Furnace => {
                require_as(tile, path, "BurnTime", TagType::Short, Tag::as_short)?;
            }
            TileEntityKind::Sign => {
                for line in ["Text1", "Text2", "Text3", "Text4"] {
                    validate_sign_line(tile, path, line)?;
                }
            }
            TileEntityKind::MobSpawner => {
                let name = require_as(tile, path, "EntityId", TagType::String, Tag::as_str)?;
                if !catalog::is_mob_id(name) {
                    return Err(ValidationError::InvalidMobName {
                        path: path.child("EntityId").to_string(),
                        name: name.to_string(),
                    });
                }
                let delay = require_as(tile, path, "Delay", TagType::Short, Tag::as_short)?;
                if delay < 0 {
                    return Err(ValidationError::InvalidValue {
                        path: path.child("Delay").to_string(),
                        reason: format!("mob spawner delay {delay} < 0"),
                    });
                }
            }
            TileEntityKind::Chest => {
                let items = require_as(tile, path, "Items", TagType::List, Tag::as_list)?;
                let items_path = path.child("Items");
                for (i, item) in items.iter().enumerate() {
                    validate_chest_item(item, &items_path.index(i))?;
                }
            }
        }
        Ok(())
    }

    fn expect_children(
        &self,
        tag: &Tag,
        path: &TagPath<'_>,
        rules: &[(&str, Rule)],
    ) -> Result<(), ValidationError> {
        let compound = expect_compound(tag, path)?;
        for &(name, rule) in rules {
            let child = require(compound, path, name)?;
            rule(self, child, &path.child(name))?;
        }
        Ok(())
    }
}

fn validate_sign_line(
    tile: &Compound,
    path: &TagPath<'_>,
    line: &str,
) -> Result<(), ValidationError> {
    let text = require_as(tile, path, line, TagType::String, Tag::as_str)?;
    let chars = text.chars().count();
    if chars > MAX_SIGN_LINE_CHARS {
        return Err(ValidationError::InvalidValue {
            path: path.child(line).to_string(),
            reason: format!("sign line is {chars} characters, longer than {MAX_SIGN_LINE_CHARS}"),
        });
    }
    Ok(())
}

fn validate_chest_item(tag: &Tag, path: &TagPath<'_>) -> Result<(), ValidationError> {
    let item = expect_compound(tag, path)?;
    let id = require_as(item, path, "id", TagType::Short, Tag::as_short)?;
    if !catalog::is_valid_item_id(id) {
        return Err(ValidationError::InvalidItemId {
            path: path.child("id").to_string(),
            id,
        });
    }
    require_as(item, path, "Damage", TagType::Short, Tag::as_short)?;
    require_as(item, path, "Count", TagType::Byte, Tag::as_byte)?;
    require_as(item, path, "Slot", TagType::Byte, Tag::as_byte)?;
    Ok(())
}

fn wrong_type(tag: &Tag, path: &TagPath<'_>, expected: TagType) -> ValidationError {
    ValidationError::WrongTagType {
        path: path.to_string(),
        expected,
        found: tag.tag_type(),
    }
}

/// Project `tag` through `get`, failing with a wrong-type error naming
/// `expected` when the variant does not match.
fn typed<'t, T>(
    tag: &'t Tag,
    path: &TagPath<'_>,
    expected: TagType,
    get: impl FnOnce(&'t Tag) -> Option<T>,
) -> Result<T, ValidationError> {
    get(tag).ok_or_else(|| wrong_type(tag, path, expected))
}

fn expect_compound<'t>(tag: &'t Tag, path: &TagPath<'_>) -> Result<&'t Compound, ValidationError> {
    typed(tag, path, TagType::Compound, Tag::as_compound)
}

fn expect_list<'t>(tag: &'t Tag, path: &TagPath<'_>) -> Result<&'t TagList, ValidationError> {
    typed(tag, path, TagType::List, Tag::as_list)
}

fn expect_byte_array<'t>(
    tag: &'t Tag,
    path: &TagPath<'_>,
    expected: usize,
) -> Result<&'t [u8], ValidationError> {
    let bytes = typed(tag, path, TagType::ByteArray, Tag::as_byte_array)?;
    if bytes.len() != expected {
        return Err(ValidationError::InvalidLength {
            path: path.to_string(),
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

fn expect_position(tag: &Tag, path: &TagPath<'_>, expected: i64) -> Result<(), ValidationError> {
    let actual = typed(tag, path, TagType::Int, Tag::as_int)?;
    if i64::from(actual) != expected {
        return Err(ValidationError::CoordinateMismatch {
            path: path.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn expect_within(
    path: &TagPath<'_>,
    axis: char,
    value: i32,
    range: RangeInclusive<i64>,
) -> Result<(), ValidationError> {
    if range.contains(&i64::from(value)) {
        return Ok(());
    }
    Err(ValidationError::OutsideChunk {
        path: path.child(&axis.to_string()).to_string(),
        axis,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}

fn require<'t>(
    compound: &'t Compound,
    path: &TagPath<'_>,
    name: &str,
) -> Result<&'t Tag, ValidationError> {
    compound
        .get(name)
        .ok_or_else(|| ValidationError::MissingChild {
            path: path.to_string(),
            name: name.to_string(),
        })
}

/// A required child of a specific type, projected to its payload.
fn require_as<'t, T>(
    compound: &'t Compound,
    path: &TagPath<'_>,
    name: &str,
    expected: TagType,
    get: impl FnOnce(&'t Tag) -> Option<T>,
) -> Result<T, ValidationError> {
    let child = require(compound, path, name)?;
    typed(child, &path.child(name), expected, get)
}

/// Text of an `id` child for diagnostics; non-string ids print their value.
fn discriminator(id: &Tag) -> String {
    match id.as_str() {
        Some(s) => s.to_string(),
        None => id.to_string(),
    }
}

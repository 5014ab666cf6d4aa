//! # Id Catalogs
//!
//! The closed sets of block ids, item ids, entity ids, and tile-entity ids
//! accepted in an unmodded Alpha/Beta world. Anything outside these sets
//! marks a chunk as corrupt (or as written by a mod).

/// Mob entity ids. Also the accepted values of a spawner's `EntityId`.
pub const MOB_IDS: &[&str] = &[
    "Mob",
    "Monster",
    "Creeper",
    "Skeleton",
    "Spider",
    "Giant",
    "Zombie",
    "Slime",
    "PigZombie",
    "Ghast",
    "Pig",
    "Sheep",
    "Cow",
    "Chicken",
];

/// Thrown or dropped objects.
pub const OBJECT_IDS: &[&str] = &["Item", "Arrow", "Snowball", "Egg", "Painting"];

pub const VEHICLE_IDS: &[&str] = &["Minecart", "Boat"];

/// Falling blocks and lit explosives.
pub const FALLING_IDS: &[&str] = &["PrimedTnt", "FallingSand"];

pub fn is_mob_id(id: &str) -> bool {
    MOB_IDS.contains(&id)
}

/// Accepted entity groups. Groups carry no field rules beyond recognition
/// of the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Mob,
    Object,
    Vehicle,
    Falling,
}

impl EntityKind {
    pub fn classify(id: &str) -> Option<Self> {
        if is_mob_id(id) {
            Some(Self::Mob)
        } else if OBJECT_IDS.contains(&id) {
            Some(Self::Object)
        } else if VEHICLE_IDS.contains(&id) {
            Some(Self::Vehicle)
        } else if FALLING_IDS.contains(&id) {
            Some(Self::Falling)
        } else {
            None
        }
    }
}

/// Tile entities with a field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileEntityKind {
    /// Discriminator `"Furnance"`, spelled as in the historic rule table.
    Furnace,
    Sign,
    MobSpawner,
    Chest,
}

impl TileEntityKind {
    /// Discriminator string for the furnace schema.
    pub const FURNACE_ID: &'static str = "Furnance";

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            Self::FURNACE_ID => Some(Self::Furnace),
            "Sign" => Some(Self::Sign),
            "MobSpawner" => Some(Self::MobSpawner),
            "Chest" => Some(Self::Chest),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Furnace => Self::FURNACE_ID,
            Self::Sign => "Sign",
            Self::MobSpawner => "MobSpawner",
            Self::Chest => "Chest",
        }
    }
}

/// Block ids that may appear in a chunk's `Blocks` array.
///
/// Rejects negatives, 21–34, 36, and everything from 92 up.
pub fn is_valid_block_id(id: i8) -> bool {
    id >= 0 && !(21..=34).contains(&id) && id != 36 && id < 92
}

/// Item or block ids that may appear in a chest slot.
pub fn is_valid_item_id(id: i16) -> bool {
    !(id < 0
        || (21..=34).contains(&id)
        || id == 36
        || (92..=255).contains(&id)
        || (351..=2255).contains(&id)
        || id >= 2258)
}

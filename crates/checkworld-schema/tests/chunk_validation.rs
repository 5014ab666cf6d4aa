//! End-to-end checks: build a chunk tree, encode it with the writer, then
//! run the full decode and validate pipeline over the bytes.

use checkworld_nbt::{write_root, Compound, NamedTag, Tag, TagList, TagType};
use checkworld_schema::{check_chunk, CheckError, ChunkStatus, ValidationError};

const FILE: &str = "world/2/1r/c.2.-1.dat";

fn sign(x: i32, text1: &str) -> Tag {
    Tag::Compound(
        Compound::new()
            .with("id", Tag::String("Sign".into()))
            .with("x", Tag::Int(x))
            .with("y", Tag::Int(64))
            .with("z", Tag::Int(-10))
            .with("Text1", Tag::String(text1.into()))
            .with("Text2", Tag::String(String::new()))
            .with("Text3", Tag::String(String::new()))
            .with("Text4", Tag::String(String::new())),
    )
}

fn chest_item(id: i16) -> Compound {
    Compound::new()
        .with("id", Tag::Short(id))
        .with("Damage", Tag::Short(0))
        .with("Count", Tag::Byte(1))
        .with("Slot", Tag::Byte(0))
}

fn chest(items: TagList) -> Tag {
    Tag::Compound(
        Compound::new()
            .with("id", Tag::String("Chest".into()))
            .with("x", Tag::Int(33))
            .with("y", Tag::Int(70))
            .with("z", Tag::Int(-1))
            .with("Items", Tag::List(items)),
    )
}

fn spawner(entity_id: Tag) -> Tag {
    Tag::Compound(
        Compound::new()
            .with("id", Tag::String("MobSpawner".into()))
            .with("x", Tag::Int(36))
            .with("y", Tag::Int(20))
            .with("z", Tag::Int(-12))
            .with("EntityId", entity_id)
            .with("Delay", Tag::Short(200)),
    )
}

fn entity(id: &str) -> Tag {
    Tag::Compound(
        Compound::new()
            .with("id", Tag::String(id.into()))
            .with("Health", Tag::Short(20)),
    )
}

fn list(items: Vec<Tag>) -> Tag {
    Tag::List(compounds(items))
}

fn compounds(items: Vec<Tag>) -> TagList {
    TagList::new(TagType::Compound, items).expect("homogeneous fixture list")
}

fn tiles(tile: Tag) -> Compound {
    with("TileEntities", list(vec![tile]))
}

fn level() -> Compound {
    Compound::new()
        .with("Blocks", Tag::ByteArray(vec![1; 32768]))
        .with("Data", Tag::ByteArray(vec![0; 16384]))
        .with("SkyLight", Tag::ByteArray(vec![0xff; 16384]))
        .with("BlockLight", Tag::ByteArray(vec![0; 16384]))
        .with("HeightMap", Tag::ByteArray(vec![64; 256]))
        .with("Entities", list(vec![entity("Creeper"), entity("Item")]))
        .with("TileEntities", list(vec![sign(40, "hello")]))
        .with("LastUpdate", Tag::Long(123_456))
        .with("TerrainPopulated", Tag::Byte(1))
        .with("xPos", Tag::Int(2))
        .with("zPos", Tag::Int(-1))
}

fn encode(level: Compound) -> Vec<u8> {
    let root = NamedTag::new(
        "",
        Tag::Compound(Compound::new().with("Level", Tag::Compound(level))),
    );
    let mut bytes = Vec::new();
    write_root(&mut bytes, &root).unwrap();
    bytes
}

fn check(level: Compound) -> Result<checkworld_schema::ChunkReport, CheckError> {
    check_chunk(FILE, encode(level).as_slice())
}

fn validation_error(level: Compound) -> ValidationError {
    match check(level) {
        Err(CheckError::Validation(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn with(name: &str, tag: Tag) -> Compound {
    let mut level = level();
    level.set(name, tag);
    level
}

#[test]
fn valid_chunk_passes_with_counts() {
    let report = check(level()).unwrap();
    assert_eq!(report.status, ChunkStatus::Valid);
    assert_eq!(report.entities, 2);
    assert_eq!(report.tile_entities, 1);
}

#[test]
fn blocks_length_is_exact() {
    for len in [32767, 32769] {
        let err = validation_error(with("Blocks", Tag::ByteArray(vec![1; len])));
        assert_eq!(
            err,
            ValidationError::InvalidLength {
                path: "root.Level.Blocks".into(),
                expected: 32768,
                actual: len,
            }
        );
    }
}

#[test]
fn nibble_and_height_map_lengths_are_exact() {
    for name in ["Data", "SkyLight", "BlockLight"] {
        let err = validation_error(with(name, Tag::ByteArray(vec![0; 16383])));
        assert!(matches!(err, ValidationError::InvalidLength { expected: 16384, .. }), "{name}");
    }
    let err = validation_error(with("HeightMap", Tag::ByteArray(vec![0; 257])));
    assert!(matches!(err, ValidationError::InvalidLength { expected: 256, actual: 257, .. }));
}

#[test]
fn oversized_nibble_and_height_maps_fail() {
    for name in ["Data", "SkyLight", "BlockLight"] {
        let err = validation_error(with(name, Tag::ByteArray(vec![0; 16385])));
        assert_eq!(
            err,
            ValidationError::InvalidLength {
                path: format!("root.Level.{name}"),
                expected: 16384,
                actual: 16385,
            }
        );
    }
    let err = validation_error(with("HeightMap", Tag::ByteArray(vec![0; 255])));
    assert_eq!(
        err,
        ValidationError::InvalidLength {
            path: "root.Level.HeightMap".into(),
            expected: 256,
            actual: 255,
        }
    );
}

#[test]
fn x_pos_must_match_file_name() {
    let err = validation_error(with("xPos", Tag::Int(3)));
    assert_eq!(
        err,
        ValidationError::CoordinateMismatch {
            path: "root.Level.xPos".into(),
            expected: 2,
            actual: 3,
        }
    );
}

#[test]
fn x_pos_of_wrong_type_fails() {
    let err = validation_error(with("xPos", Tag::Short(2)));
    assert!(matches!(
        err,
        ValidationError::WrongTagType { expected: TagType::Int, found: TagType::Short, .. }
    ));
}

#[test]
fn tile_entity_x_outside_chunk_fails() {
    for x in [31, 49] {
        let err = validation_error(with("TileEntities", list(vec![sign(x, "")])));
        assert!(
            matches!(err, ValidationError::OutsideChunk { axis: 'x', min: 32, max: 48, .. }),
            "x={x} gave {err:?}"
        );
    }
    for x in [32, 48] {
        check(with("TileEntities", list(vec![sign(x, "")]))).unwrap();
    }
}

#[test]
fn sign_line_limit_is_fifteen_characters() {
    check(with("TileEntities", list(vec![sign(40, "abcdefghijklmno")]))).unwrap();
    let err = validation_error(with("TileEntities", list(vec![sign(40, "abcdefghijklmnop")])));
    assert!(matches!(
        err,
        ValidationError::InvalidValue { ref path, .. } if path == "root.Level.TileEntities.[0].Text1"
    ));
}

#[test]
fn sign_needs_all_four_lines() {
    for name in ["Text3", "Text4"] {
        let Tag::Compound(mut tile) = sign(40, "") else {
            unreachable!()
        };
        tile.remove(name);
        let err = validation_error(tiles(Tag::Compound(tile)));
        assert_eq!(
            err,
            ValidationError::MissingChild {
                path: "root.Level.TileEntities.[0]".into(),
                name: name.into(),
            }
        );
    }
}

#[test]
fn tile_entity_z_outside_chunk_fails() {
    let at_z = |z: i32| {
        let Tag::Compound(tile) = sign(40, "") else {
            unreachable!()
        };
        Tag::Compound(tile.with("z", Tag::Int(z)))
    };
    for z in [-17, 1] {
        let err = validation_error(tiles(at_z(z)));
        assert_eq!(
            err,
            ValidationError::OutsideChunk {
                path: "root.Level.TileEntities.[0].z".into(),
                axis: 'z',
                value: z,
                min: -16,
                max: 0,
            }
        );
    }
    for z in [-16, 0] {
        check(tiles(at_z(z))).unwrap();
    }
}

#[test]
fn unknown_tile_entity_type_fails() {
    let tile = Tag::Compound(
        Compound::new()
            .with("id", Tag::String("Unknown".into()))
            .with("x", Tag::Int(40))
            .with("y", Tag::Int(10))
            .with("z", Tag::Int(-10)),
    );
    let err = validation_error(with("TileEntities", list(vec![tile])));
    assert_eq!(
        err,
        ValidationError::UnknownTileEntityType {
            path: "root.Level.TileEntities.[0]".into(),
            id: "Unknown".into(),
        }
    );
}

#[test]
fn entity_dispatch() {
    check(with("Entities", list(vec![entity("Creeper")]))).unwrap();
    let err = validation_error(with("Entities", list(vec![entity("Creeper"), entity("Wolf")])));
    assert_eq!(
        err,
        ValidationError::UnknownEntityType {
            path: "root.Level.Entities.[1]".into(),
            id: "Wolf".into(),
        }
    );
}

#[test]
fn failure_path_names_list_index_and_child() {
    let mut bad = match sign(40, "ok") {
        Tag::Compound(c) => c,
        _ => unreachable!(),
    };
    bad.set("Text2", Tag::Int(7));
    let tiles = vec![sign(40, "a"), sign(41, "b"), sign(42, "c"), Tag::Compound(bad)];
    let err = validation_error(with("TileEntities", list(tiles)));
    let message = err.to_string();
    assert!(
        message.contains("'root.Level.TileEntities.[3].Text2'"),
        "{message}"
    );
}

#[test]
fn unlisted_children_are_ignored() {
    let level = level()
        .with("Biomes", Tag::ByteArray(vec![0; 3]))
        .with("Custom", Tag::Compound(Compound::new()));
    check(level).unwrap();
}

#[test]
fn missing_child_is_reported_with_parent_path() {
    let mut level = level();
    level.remove("HeightMap");
    let err = validation_error(level);
    assert_eq!(
        err,
        ValidationError::MissingChild {
            path: "root.Level".into(),
            name: "HeightMap".into(),
        }
    );
}

#[test]
fn chest_items_are_checked() {
    let items = |ids: [i16; 2]| compounds(ids.map(|id| Tag::Compound(chest_item(id))).to_vec());

    check(tiles(chest(items([4, 260])))).unwrap();

    let err = validation_error(tiles(chest(items([4, 500]))));
    assert_eq!(
        err,
        ValidationError::InvalidItemId {
            path: "root.Level.TileEntities.[0].Items.[1].id".into(),
            id: 500,
        }
    );
}

#[test]
fn chest_item_children_are_required() {
    for name in ["Damage", "Count", "Slot"] {
        let mut item = chest_item(4);
        item.remove(name);
        let err = validation_error(tiles(chest(compounds(vec![Tag::Compound(item)]))));
        assert_eq!(
            err,
            ValidationError::MissingChild {
                path: "root.Level.TileEntities.[0].Items.[0]".into(),
                name: name.into(),
            }
        );
    }
}

#[test]
fn chest_item_children_have_fixed_types() {
    let cases = [
        ("Damage", Tag::Byte(0), TagType::Short, TagType::Byte),
        ("Count", Tag::Short(1), TagType::Byte, TagType::Short),
        ("Slot", Tag::Int(0), TagType::Byte, TagType::Int),
    ];
    for (name, tag, expected, found) in cases {
        let item = chest_item(4).with(name, tag);
        let err = validation_error(tiles(chest(compounds(vec![Tag::Compound(item)]))));
        assert_eq!(
            err,
            ValidationError::WrongTagType {
                path: format!("root.Level.TileEntities.[0].Items.[0].{name}"),
                expected,
                found,
            }
        );
    }
}

#[test]
fn chest_item_must_be_a_compound() {
    let items = TagList::new(TagType::Int, vec![Tag::Int(4)]).unwrap();
    let err = validation_error(tiles(chest(items)));
    assert_eq!(
        err,
        ValidationError::WrongTagType {
            path: "root.Level.TileEntities.[0].Items.[0]".into(),
            expected: TagType::Compound,
            found: TagType::Int,
        }
    );
}

#[test]
fn spawner_needs_a_mob_name() {
    check(tiles(spawner(Tag::String("Skeleton".into())))).unwrap();
    let err = validation_error(tiles(spawner(Tag::String("Item".into()))));
    assert!(matches!(err, ValidationError::InvalidMobName { ref name, .. } if name == "Item"));
}

#[test]
fn spawner_entity_id_must_be_a_string() {
    let err = validation_error(tiles(spawner(Tag::Int(50))));
    assert_eq!(
        err,
        ValidationError::WrongTagType {
            path: "root.Level.TileEntities.[0].EntityId".into(),
            expected: TagType::String,
            found: TagType::Int,
        }
    );
}

#[test]
fn file_name_is_resolved_before_decoding() {
    let err = check_chunk("world/2/1r/chunk.dat", &[0xffu8][..]).unwrap_err();
    assert!(matches!(
        err,
        CheckError::Validation(ValidationError::InvalidFilename(_))
    ));
}

#[test]
fn decode_errors_surface_as_decode_category() {
    let mut bytes = encode(level());
    bytes.truncate(bytes.len() / 2);
    let err = check_chunk(FILE, bytes.as_slice()).unwrap_err();
    assert_eq!(err.category(), "decode");
}

#[test]
fn second_root_is_rejected_before_validation() {
    let mut bytes = encode(with("xPos", Tag::Int(99)));
    bytes.extend_from_slice(&encode(level()));
    let err = check_chunk(FILE, bytes.as_slice()).unwrap_err();
    assert!(matches!(err, CheckError::Decode(_)));
}

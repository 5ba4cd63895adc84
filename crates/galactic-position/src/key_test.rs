use crate::{GalacticCoordinate, HierarchyPath, KeyError, KeyKind, MAX_X, MAX_Y, MAX_Z, PositionKey};

fn coordinate(x: u32, y: u32, z: u32) -> GalacticCoordinate {
    GalacticCoordinate::new(x, y, z).unwrap()
}

#[test]
fn test_zero_is_always_invalid() {
    assert!(!PositionKey::is_valid_raw(0));
    assert_eq!(PositionKey::from_raw(0), Err(KeyError::Invalid(0)));
    assert_eq!(KeyKind::of(0), None);
}

#[test]
fn test_reference_frame_round_trip() {
    let c = coordinate(100_000, 2_000, 100_000);
    let key = PositionKey::reference_frame(c).unwrap();

    assert!(key.is_reference_frame());
    assert!(!key.is_celestial());
    assert!(!key.is_parent());
    assert_eq!(key.coordinate(), Some(c));
    assert_eq!(key.path(), None);
    assert_eq!(key.depth(), 0);
    assert_eq!(key.reference_frame_key(), Some(key));
}

#[test]
fn test_celestial_field_boundaries() {
    let corners = [
        coordinate(1, 1, 1),
        coordinate(MAX_X, MAX_Y, MAX_Z),
        coordinate(MAX_X, 1, MAX_Z),
        coordinate(1, MAX_Y, 1),
    ];
    let paths: [&[u8]; 5] = [&[0], &[2], &[2, 2], &[2, 2, 30], &[2, 2, 30, 62]];

    for c in corners {
        for levels in paths {
            let path = HierarchyPath::new(levels).unwrap();
            let key = PositionKey::celestial(c, &path).unwrap();

            assert!(key.is_celestial(), "{key:?}");
            assert_eq!(key.coordinate(), Some(c));
            assert_eq!(key.path(), Some(path));
            assert_eq!(PositionKey::from_raw(key.raw()), Ok(key));
            assert!(key.raw() < 1 << 63);
        }
    }
}

#[test]
fn test_parent_alias() {
    let target = PositionKey::from_parts(5, 6, 7, &[1, 0]).unwrap();
    let alias = PositionKey::parent(target.raw()).unwrap();

    assert!(alias.is_parent());
    assert_eq!(alias.coordinate(), None);
    assert_eq!(alias.path(), None);
    assert_eq!(alias.parent_id(), Some(target.raw()));
    assert_eq!(alias.target(), Some(target));
    assert_eq!(alias.reference_frame_key(), None);

    // Aliases of aliases and of invalid values are rejected
    assert_eq!(
        PositionKey::parent(alias.raw()),
        Err(KeyError::ParentIdInvalid(alias.raw()))
    );
    assert_eq!(PositionKey::parent(0), Err(KeyError::ParentIdInvalid(0)));
}

#[test]
fn test_child_and_parent_key_navigation() {
    let frame = PositionKey::reference_frame(coordinate(10, 20, 30)).unwrap();
    let root = frame.child(1).unwrap();
    let planet = root.child(2).unwrap();
    let moon = planet.child(17).unwrap();

    assert_eq!(moon.path().unwrap().indices(), &[1, 2, 17]);
    assert_eq!(moon.level_index(3), Some(17));
    assert_eq!(moon.parent_key(), Some(planet));
    assert_eq!(planet.parent_key(), Some(root));
    assert_eq!(root.parent_key(), Some(frame));
    assert_eq!(frame.parent_key(), None);

    assert!(frame.is_ancestor_of(&moon));
    assert!(root.is_ancestor_of(&moon));
    assert!(!moon.is_ancestor_of(&root));
    assert!(!moon.is_ancestor_of(&moon));

    // root slot capacity is 3
    assert!(frame.child(3).is_err());
}

#[test]
fn test_keys_in_other_cells_are_not_ancestors() {
    let a = PositionKey::from_parts(10, 20, 30, &[1]).unwrap();
    let b = PositionKey::from_parts(11, 20, 30, &[1, 0]).unwrap();
    assert!(!a.is_ancestor_of(&b));
}

#[test]
fn test_gapped_raw_value_is_invalid() {
    let frame = PositionKey::reference_frame(coordinate(10, 20, 30)).unwrap();
    // level2 populated without level1
    let raw = frame.raw() | 1 << 50;
    assert_eq!(KeyKind::of(raw), None);
    assert!(PositionKey::from_raw(raw).is_err());
}

#[test]
fn test_display_and_parse() {
    let key = PositionKey::from_parts(100_000, 2_000, 100_000, &[1, 0, 4]).unwrap();
    assert_eq!(key.to_string(), "100000:2000:100000/1.0.4");
    assert_eq!("100000:2000:100000/1.0.4".parse::<PositionKey>(), Ok(key));
    assert_eq!(key.raw().to_string().parse::<PositionKey>(), Ok(key));

    let frame: PositionKey = "7:8:9".parse().unwrap();
    assert!(frame.is_reference_frame());

    let alias: PositionKey = format!("@{}", key.raw()).parse().unwrap();
    assert_eq!(alias.target(), Some(key));

    assert!(matches!(
        "1:2".parse::<PositionKey>(),
        Err(KeyError::Parse(_))
    ));
    assert!(matches!(
        "1:2:3/x".parse::<PositionKey>(),
        Err(KeyError::Parse(_))
    ));
    assert!(matches!(
        "0:2:3".parse::<PositionKey>(),
        Err(KeyError::CoordinateOutOfRange { .. })
    ));
}

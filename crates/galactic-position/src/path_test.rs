use crate::{HierarchyPath, KeyError, LEVEL_CAPACITY, MAX_DEPTH};

#[test]
fn test_path_rejects_empty_and_deep() {
    assert_eq!(HierarchyPath::new(&[]), Err(KeyError::EmptyPath));
    assert_eq!(
        HierarchyPath::new(&[0, 0, 0, 0, 0]),
        Err(KeyError::PathTooDeep(5))
    );
}

#[test]
fn test_path_level_capacity_boundaries() {
    for level in 0..MAX_DEPTH {
        let capacity = LEVEL_CAPACITY[level];
        let mut indices = vec![0u8; level + 1];

        indices[level] = capacity - 1;
        let path = HierarchyPath::new(&indices).expect("last slot fits");
        assert_eq!(HierarchyPath::decode(path.encode()), Some(path));

        indices[level] = capacity;
        assert_eq!(
            HierarchyPath::new(&indices),
            Err(KeyError::LevelOutOfRange {
                level: level + 1,
                index: capacity,
                capacity
            })
        );
    }
}

#[test]
fn test_every_path_encodes_non_zero() {
    // Root slot 0 must still be distinguishable from "no path"
    let root = HierarchyPath::root(0).unwrap();
    assert_ne!(root.encode(), 0);
    assert_eq!(root.depth(), 1);
}

#[test]
fn test_decode_rejects_gapped_ids() {
    // level1 absent, level2 present
    let gapped = 1u16 << 2;
    assert_eq!(HierarchyPath::decode(gapped), None);
    assert_eq!(HierarchyPath::decode(0), None);
    assert_eq!(HierarchyPath::decode(1 << 15), None);
}

#[test]
fn test_parent_child_navigation() {
    let path = HierarchyPath::new(&[1, 2, 30]).unwrap();
    assert_eq!(path.index(1), Some(1));
    assert_eq!(path.index(3), Some(30));
    assert_eq!(path.index(4), None);
    assert_eq!(path.last(), 30);

    let parent = path.parent().unwrap();
    assert_eq!(parent.indices(), &[1, 2]);
    assert!(parent.is_prefix_of(&path));
    assert!(!path.is_prefix_of(&parent));
    assert_eq!(parent.child(30).unwrap(), path);

    assert_eq!(HierarchyPath::root(2).unwrap().parent(), None);
    assert_eq!(path.child_capacity(), Some(63));
    assert_eq!(path.child(62).unwrap().child_capacity(), None);
}

#[test]
fn test_path_display() {
    let path = HierarchyPath::new(&[0, 2, 17, 40]).unwrap();
    assert_eq!(path.to_string(), "0.2.17.40");
}

//! End-to-end scenarios from spec.md §8, items 1-7 (scenario 8, the
//! randomized property test, lives in `tests/fuzzer.rs`).

mod common;

use common::{chunks, ByteDim, ByteExt, Chunk, LineDim, OtherExt, TextSummary};
use sumtree::{Extension, Tree, TreeConfig, TreeError};

fn new_tree() -> Tree<Chunk, ByteExt> {
    Tree::new(TreeConfig::new()).unwrap()
}

#[test]
fn scenario_1_build_then_read() {
    let tree = new_tree();
    let tree = tree
        .insert_at(0, chunks(&["hello ", "world\n", "next line\n"]))
        .unwrap();
    tree.check().unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.summary(), TextSummary { bytes: 22, lines: 2 });
    assert_eq!(tree.ext(), (ByteExt(22), true));
}

#[test]
fn scenario_2_delete_middle() {
    let tree = new_tree()
        .insert_at(0, chunks(&["hello ", "world\n", "next line\n"]))
        .unwrap();

    let tree = tree.delete_at(1).unwrap();
    tree.check().unwrap();

    let items: Vec<String> = tree.iter().map(|c| c.0.clone()).collect();
    assert_eq!(items, vec!["hello ".to_string(), "next line\n".to_string()]);
    assert_eq!(tree.summary(), TextSummary { bytes: 16, lines: 1 });
    assert_eq!(tree.ext(), (ByteExt(16), true));
}

#[test]
fn scenario_3_split_then_concat() {
    let tree = new_tree()
        .insert_at(0, chunks(&["hello ", "world\n", "next line\n"]))
        .unwrap();

    let (left, right) = tree.split_at(1).unwrap();
    left.check().unwrap();
    right.check().unwrap();

    assert_eq!(left.iter().map(|c| c.0.clone()).collect::<Vec<_>>(), vec!["hello ".to_string()]);
    assert_eq!(left.summary(), TextSummary { bytes: 6, lines: 0 });

    assert_eq!(
        right.iter().map(|c| c.0.clone()).collect::<Vec<_>>(),
        vec!["world\n".to_string(), "next line\n".to_string()]
    );
    assert_eq!(right.summary(), TextSummary { bytes: 16, lines: 2 });

    let rejoined = left.concat(&right).unwrap();
    rejoined.check().unwrap();

    assert_eq!(
        rejoined.iter().map(|c| c.0.clone()).collect::<Vec<_>>(),
        tree.iter().map(|c| c.0.clone()).collect::<Vec<_>>()
    );
    assert_eq!(rejoined.summary(), tree.summary());
    assert_eq!(rejoined.ext(), tree.ext());
    assert_eq!(rejoined.height(), tree.height());
}

#[test]
fn scenario_4_cursor_byte_seek() {
    let tree = new_tree().insert_at(0, chunks(&["ab", "c\n", "de\nf"])).unwrap();
    let cursor = tree.cursor::<ByteDim>();

    let expected: &[(u64, (usize, u64))] = &[
        (0, (0, 0)),
        (1, (0, 2)),
        (2, (0, 2)),
        (3, (1, 4)),
        (4, (1, 4)),
        (5, (2, 8)),
        (9, (3, 8)),
    ];
    for &(target, want) in expected {
        assert_eq!(cursor.seek(&target), want, "seek({target})");
    }
}

#[test]
fn scenario_5_cursor_line_seek() {
    let tree = new_tree().insert_at(0, chunks(&["ab", "c\n", "de\nf"])).unwrap();
    let cursor = tree.cursor::<LineDim>();

    let expected: &[(u64, (usize, u64))] = &[(0, (0, 0)), (1, (1, 1)), (2, (2, 2)), (3, (3, 2))];
    for &(target, want) in expected {
        assert_eq!(cursor.seek(&target), want, "seek({target})");
    }
}

#[test]
fn scenario_6_concat_incompatible_extension() {
    let left = Tree::<Chunk, ByteExt>::new(TreeConfig::new())
        .unwrap()
        .insert_at(0, chunks(&["a"]))
        .unwrap();
    let right_other = Tree::<Chunk, OtherExt>::new(TreeConfig::new())
        .unwrap()
        .insert_at(0, chunks(&["b"]))
        .unwrap();

    // Different MAGIC_IDs ("ext:bytes" vs "ext:other") must fail.
    let err = left.concat_with(&right_other).unwrap_err();
    assert_eq!(err, TreeError::IncompatibleExtension);

    // Left untouched by the failed concat.
    assert_eq!(left.len(), 1);
    assert_eq!(right_other.len(), 1);

    // One side configured, the other not: also incompatible, in both
    // directions (spec.md §9(ii): the empty side never silently
    // inherits the other's configuration, and neither does a
    // non-empty no-extension side).
    let no_ext = Tree::<Chunk, sumtree::NoExtension>::new(TreeConfig::new())
        .unwrap()
        .insert_at(0, chunks(&["c"]))
        .unwrap();
    assert_eq!(left.concat_with(&no_ext).unwrap_err(), TreeError::IncompatibleExtension);
    assert_eq!(no_ext.concat_with(&left).unwrap_err(), TreeError::IncompatibleExtension);

    // Even an empty tree on the mismatched side is incompatible.
    let empty_no_ext = Tree::<Chunk, sumtree::NoExtension>::new(TreeConfig::new()).unwrap();
    assert_eq!(left.concat_with(&empty_no_ext).unwrap_err(), TreeError::IncompatibleExtension);

    // Same MAGIC_ID (even from a distinct Rust type) is accepted and
    // rebuilds the right side under the left's extension type.
    let right_same_id = Tree::<Chunk, ByteExt>::new(TreeConfig::new())
        .unwrap()
        .insert_at(0, chunks(&["d", "e\n"]))
        .unwrap();
    let joined = left.concat_with(&right_same_id).unwrap();
    joined.check().unwrap();
    assert_eq!(joined.iter().map(|c| c.0.clone()).collect::<Vec<_>>(), vec!["a", "d", "e\n"]);
    assert_eq!(joined.ext().0, ByteExt(4));
}

#[test]
fn scenario_7_growth_and_persistence() {
    let mut tree = new_tree();
    let mut snapshots: Vec<(Tree<Chunk, ByteExt>, Vec<String>)> = Vec::new();

    for i in 0..200u32 {
        let ch = char::from_u32('a' as u32 + (i % 26)).unwrap();
        let len = tree.len();
        tree = tree.insert_at(len, chunks(&[&ch.to_string()])).unwrap();
        snapshots.push((tree.clone(), tree.iter().map(|c| c.0.clone()).collect()));
    }

    assert_eq!(tree.len(), 200);
    assert!(tree.height() >= 3, "height {} should be >= 3 for BASE=6 with 200 items", tree.height());
    tree.check().unwrap();

    let expected_final: Vec<String> = (0..200u32)
        .map(|i| char::from_u32('a' as u32 + (i % 26)).unwrap().to_string())
        .collect();
    assert_eq!(tree.iter().map(|c| c.0.clone()).collect::<Vec<_>>(), expected_final);

    for (i, (snap, content)) in snapshots.iter().enumerate() {
        assert_eq!(snap.len(), i + 1);
        assert_eq!(content, &expected_final[..i + 1]);
        assert_eq!(&snap.iter().map(|c| c.0.clone()).collect::<Vec<_>>(), content);
    }
}

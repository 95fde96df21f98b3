// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over random operation sequences.

use proptest::prelude::*;
use std::collections::BTreeMap;
use understory_ordered_tree::{NodeId, Tree, TreeConfig};

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    Delete(u16),
    RotateLeft(u16),
    RotateRight(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..200u16).prop_map(Op::Insert),
        2 => (0..200u16).prop_map(Op::Delete),
        1 => (0..200u16).prop_map(Op::RotateLeft),
        1 => (0..200u16).prop_map(Op::RotateRight),
    ]
}

fn in_order(tree: &Tree<u16, u32>) -> Vec<u16> {
    let mut out = Vec::new();
    let mut cur = tree.first();
    while let Some(id) = cur {
        out.push(*tree.key(id).unwrap());
        cur = tree.find_next(id).unwrap();
    }
    out
}

fn check_heights(tree: &Tree<u16, u32>) {
    for (id, _, _) in tree.iter() {
        let h = |c: Option<NodeId>| c.map_or(0, |c| tree.height(c).unwrap());
        let expected = 1 + h(tree.left(id).unwrap()).max(h(tree.right(id).unwrap()));
        assert_eq!(tree.height(id).unwrap(), expected, "height at {id:?}");
    }
}

fn ceil_log2(n: usize) -> u32 {
    (n as u32).next_power_of_two().trailing_zeros()
}

proptest! {
    #[test]
    fn unbalanced_ops_keep_order_heights_and_count(ops in prop::collection::vec(op_strategy(), 0..300)) {
        let mut tree = Tree::new();
        let mut model: BTreeMap<u16, usize> = BTreeMap::new();
        for op in ops {
            match op {
                Op::Insert(k) => {
                    tree.insert(k, u32::from(k));
                    *model.entry(k).or_default() += 1;
                }
                Op::Delete(k) => {
                    let deleted = tree.find(&k).is_some_and(|id| tree.delete(id));
                    let in_model = model.get(&k).copied().unwrap_or(0) > 0;
                    prop_assert_eq!(deleted, in_model);
                    if deleted {
                        let c = model.get_mut(&k).unwrap();
                        *c -= 1;
                        if *c == 0 {
                            model.remove(&k);
                        }
                    }
                }
                Op::RotateLeft(k) => {
                    if let Some(id) = tree.find(&k) {
                        tree.rotate_left(id).unwrap();
                    }
                }
                Op::RotateRight(k) => {
                    if let Some(id) = tree.find(&k) {
                        tree.rotate_right(id).unwrap();
                    }
                }
            }
            prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
        }
        let expected: Vec<u16> = model
            .iter()
            .flat_map(|(k, n)| std::iter::repeat_n(*k, *n))
            .collect();
        prop_assert_eq!(in_order(&tree), expected);
        prop_assert_eq!(tree.len(), model.values().sum::<usize>());
        check_heights(&tree);
    }

    #[test]
    fn avl_updates_repair_manual_rotations(
        keys in prop::collection::vec(0..200u16, 1..100),
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut tree = Tree::avl();
        for k in &keys {
            tree.insert(*k, 0);
        }
        for op in ops {
            match op {
                Op::Insert(k) => {
                    tree.insert(k, 0);
                    prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
                }
                Op::Delete(k) => {
                    if let Some(id) = tree.find(&k) {
                        prop_assert!(tree.delete(id));
                        prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
                    }
                }
                Op::RotateLeft(k) => {
                    if let Some(id) = tree.find(&k) {
                        tree.rotate_left(id).unwrap();
                    }
                }
                Op::RotateRight(k) => {
                    if let Some(id) = tree.find(&k) {
                        tree.rotate_right(id).unwrap();
                    }
                }
            }
        }
    }

    #[test]
    fn next_prev_round_trip(keys in prop::collection::vec(any::<u16>(), 1..200)) {
        let mut tree = Tree::new();
        for k in keys {
            tree.insert(k, 0);
        }
        let mut cur = tree.first();
        while let Some(id) = cur {
            let next = tree.find_next(id).unwrap();
            if let Some(n) = next {
                prop_assert_eq!(tree.find_prev(n).unwrap(), Some(id));
            }
            if let Some(p) = tree.find_prev(id).unwrap() {
                prop_assert_eq!(tree.find_next(p).unwrap(), Some(id));
            }
            cur = next;
        }
    }

    #[test]
    fn avl_bound_on_distinct_inserts(keys in prop::collection::hash_set(any::<u16>(), 0..500)) {
        let mut tree = Tree::with_config(TreeConfig::AVL);
        for (i, k) in keys.iter().enumerate() {
            tree.insert(*k, 0);
            prop_assert!(tree.is_balanced());
            let n = (i + 1) as f64;
            prop_assert!(f64::from(tree.tree_height()) <= 1.44 * (n + 2.0).log2());
        }
        check_heights(&tree);
    }

    #[test]
    fn avl_bound_survives_deletes(
        keys in prop::collection::vec(0..100u16, 0..300),
        doomed in prop::collection::vec(0..100u16, 0..200),
    ) {
        let mut tree = Tree::avl();
        for k in &keys {
            tree.insert(*k, 0);
        }
        for k in doomed {
            if let Some(id) = tree.find(&k) {
                prop_assert!(tree.delete(id));
            }
            prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
        }
    }

    #[test]
    fn vine_transform_preserves_sequence(keys in prop::collection::vec(any::<u16>(), 0..300)) {
        let mut tree = Tree::new();
        for k in &keys {
            tree.insert(*k, 0);
        }
        let before = in_order(&tree);
        let n = tree.len();

        tree.tree_to_vine().unwrap();
        prop_assert!(tree.is_vine());
        prop_assert_eq!(tree.tree_height() as usize, n);
        prop_assert_eq!(in_order(&tree), before.clone());

        tree.vine_to_tree().unwrap();
        prop_assert_eq!(tree.tree_height(), ceil_log2(n + 1));
        prop_assert_eq!(in_order(&tree), before);
        prop_assert!(tree.validate().is_ok());
    }

    #[test]
    fn stale_handles_never_alias(keys in prop::collection::vec(any::<u16>(), 1..100)) {
        let mut tree = Tree::new();
        let ids: Vec<_> = keys.iter().map(|k| tree.insert(*k, 0)).collect();
        for id in &ids {
            prop_assert!(tree.delete(*id));
        }
        let fresh: Vec<_> = keys.iter().map(|k| tree.insert(*k, 1)).collect();
        for id in &ids {
            prop_assert!(!tree.is_alive(*id));
            prop_assert!(tree.key(*id).is_err());
        }
        for id in &fresh {
            prop_assert!(tree.is_alive(*id));
        }
    }
}

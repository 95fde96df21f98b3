// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered tree basics.
//!
//! Build a small tree, hold a handle the way a viewer holds "the node under the mouse",
//! delete it, and observe that the handle goes stale instead of dangling.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example ordered_tree_basics`

use tracing_subscriber::EnvFilter;
use understory_ordered_tree::{NodeId, Tree, TreeError};

fn print_tree(tree: &Tree<i32, &str>) {
    fn walk(tree: &Tree<i32, &str>, id: Option<NodeId>, depth: usize) {
        let Some(id) = id else { return };
        walk(tree, tree.right(id).unwrap(), depth + 1);
        println!(
            "{:indent$}{} (h={})",
            "",
            tree.key(id).unwrap(),
            tree.height(id).unwrap(),
            indent = depth * 4
        );
        walk(tree, tree.left(id).unwrap(), depth + 1);
    }
    walk(tree, tree.root(), 0);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new();
    for (k, v) in [
        (50, "fifty"),
        (30, "thirty"),
        (70, "seventy"),
        (20, "twenty"),
        (40, "forty"),
        (60, "sixty"),
        (80, "eighty"),
    ] {
        tree.insert(k, v);
    }
    print_tree(&tree);

    // A viewer remembers the node under the cursor.
    let hovered: Option<NodeId> = tree.find(&50);
    if let Some(id) = hovered {
        println!("deleting {} -> {}", tree.key(id).unwrap(), tree.value(id).unwrap());
        assert!(tree.delete(id));
        assert_eq!(tree.key(id), Err(TreeError::InvalidReference(id)));
    }
    print_tree(&tree);

    // Rotate the new root by hand.
    let root = tree.root().unwrap();
    tree.rotate_left(root).unwrap();
    println!("after rotate_left at the root:");
    print_tree(&tree);

    let keys: Vec<_> = tree.keys().copied().collect();
    println!("in order: {keys:?}");
    assert_eq!(keys, [20, 30, 40, 60, 70, 80]);
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global and automatic rebalancing.
//!
//! Sorted inserts degenerate an unbalanced tree into a chain; the Day-Stout-Warren transform
//! folds it back to minimal height. An AVL-configured tree never degenerates.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example ordered_tree_rebalance`

use tracing_subscriber::EnvFilter;
use understory_ordered_tree::{Tree, TreeConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let n = 1_000;
    let mut plain = Tree::new();
    let mut avl = Tree::with_config(TreeConfig::AVL);
    for k in 0..n {
        plain.insert(k, ());
        avl.insert(k, ());
    }
    println!("plain height after sorted inserts: {}", plain.tree_height());
    println!("avl height after sorted inserts:   {}", avl.tree_height());

    plain.tree_to_vine().unwrap();
    println!("vine height: {} (is vine: {})", plain.tree_height(), plain.is_vine());
    plain.vine_to_tree().unwrap();
    println!("height after vine_to_tree: {}", plain.tree_height());

    assert_eq!(plain.tree_height(), 10);
    assert!(plain.is_balanced());
    assert!(avl.is_balanced());
    plain.validate().unwrap();
    avl.validate().unwrap();
    tracing::info!(len = plain.len(), "both trees validated");
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ordered_tree --heading-base-level=0

//! Understory Ordered Tree: an arena-backed binary search tree with generational handles.
//!
//! Understory Ordered Tree is a reusable ordered map for tools that need to *see* the tree:
//! visualizers, editors, and teaching aids that pick nodes, rotate them by hand, and watch
//! the shape change.
//!
//! - Nodes live in an arena and are addressed by [`NodeId`], a copyable generational handle.
//!   A handle held across a delete is detected as stale instead of dangling.
//! - Local AVL-style rebalancing keeps the balance bound after every insert and delete when
//!   the tree is built with [`TreeConfig::AVL`].
//! - Global Day-Stout-Warren rebalancing straightens any shape into a vine and folds it back
//!   into a tree of minimal height in O(n) time and O(1) extra space.
//!
//! ## API overview
//!
//! - [`Tree`]: the container. Duplicate keys are allowed and route right.
//! - [`NodeId`]: generational handle of a node; `Option<NodeId>` is the nullable form.
//! - [`TreeConfig`]: construction-time configuration (automatic rebalancing).
//! - [`TreeError`]: stale handles and structural inconsistencies.
//!
//! Key operations:
//! - [`Tree::insert`] → [`NodeId`], [`Tree::delete`] / [`Tree::remove`].
//! - [`Tree::find`], [`Tree::first`], [`Tree::last`], [`Tree::find_next`], [`Tree::find_prev`], [`Tree::iter`].
//! - [`Tree::rotate_left`], [`Tree::rotate_right`], [`Tree::rebalance`].
//! - [`Tree::tree_to_vine`], [`Tree::vine_to_tree`], [`Tree::rebalance_global`].
//! - [`Tree::validate`] for tests and debugging.
//!
//! ## Handles and mutation
//!
//! Rotations and rebalancing relocate nodes but never recreate them, so a [`NodeId`] stays valid
//! until its node is deleted. Deleting a node with two children moves its in-order predecessor
//! into its place; the predecessor keeps its handle.
//!
//! Every mutation takes `&mut self`. Share a tree across threads behind a lock.
//!
//! # Example
//!
//! ```rust
//! use understory_ordered_tree::{Tree, TreeError};
//!
//! let mut tree = Tree::new();
//! for k in [50, 30, 70, 20, 40, 60, 80] {
//!     tree.insert(k, k * 10);
//! }
//! assert_eq!(tree.tree_height(), 3);
//!
//! // Deleting the root promotes its in-order predecessor.
//! let root = tree.root().unwrap();
//! assert!(tree.delete(root));
//! assert_eq!(tree.key(tree.root().unwrap()), Ok(&40));
//!
//! // The old handle is now stale.
//! assert_eq!(tree.key(root), Err(TreeError::InvalidReference(root)));
//!
//! let keys: Vec<_> = tree.keys().copied().collect();
//! assert_eq!(keys, [20, 30, 40, 60, 70, 80]);
//! ```
//!
//! ### Global rebalancing
//!
//! ```rust
//! use understory_ordered_tree::Tree;
//!
//! // Sorted inserts without automatic rebalancing degenerate into a chain.
//! let mut tree = Tree::new();
//! for k in 1..=7 {
//!     tree.insert(k, ());
//! }
//! assert_eq!(tree.tree_height(), 7);
//!
//! tree.tree_to_vine().unwrap();
//! tree.vine_to_tree().unwrap();
//! assert_eq!(tree.tree_height(), 3);
//! assert!(tree.keys().copied().eq(1..=7));
//! ```
//!
//! ### Automatic rebalancing
//!
//! ```rust
//! use understory_ordered_tree::{Tree, TreeConfig};
//!
//! let mut tree = Tree::with_config(TreeConfig { auto_rebalance: true });
//! for k in 0..1000 {
//!     tree.insert(k, ());
//! }
//! assert!(tree.is_balanced());
//! assert!(tree.tree_height() <= 14);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Diagnostics are emitted through `tracing`.

#![no_std]

extern crate alloc;

mod error;
mod iter;
mod rotate;
mod tree;
mod types;
mod validate;
mod vine;

pub use error::{Inconsistency, TreeError};
pub use iter::Iter;
pub use tree::Tree;
pub use types::{NodeId, TreeConfig};

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global rebalancing via the Day-Stout-Warren transform.
//!
//! The tree is first straightened into a right-only chain (a *vine*) by right rotations,
//! then folded back into a tree of minimal height by rounds of left rotations along the
//! spine. Both phases run in O(n) time and O(1) extra space.
//!
//! Heights are not maintained by the individual rotations here. Each public entry point
//! recomputes them in a single post-order pass before returning.

use crate::error::{Inconsistency, TreeError};
use crate::rotate::{Heights, Rotation};
use crate::tree::Tree;

impl<K, V> Tree<K, V> {
    /// Rebalance the whole tree to height `ceil(log2(n + 1))`.
    ///
    /// Equivalent to [`Tree::tree_to_vine`] followed by [`Tree::vine_to_tree`], with a single
    /// height pass at the end. In-order sequence and all handles are preserved.
    pub fn rebalance_global(&mut self) -> Result<(), TreeError> {
        let before = self.tree_height();
        let res = self.straighten().and_then(|()| self.fold_vine());
        self.recompute_heights();
        self.shape_disturbed = res.is_err() && self.config().auto_rebalance;
        tracing::debug!(len = self.len(), before, after = self.tree_height(), "rebalanced");
        res
    }

    /// Straighten the tree into a vine: a chain of right children, in key order.
    ///
    /// On a tree built with [`TreeConfig::AVL`](crate::TreeConfig::AVL) the vine is unbalanced;
    /// the next insert or delete rebuilds it with [`Tree::rebalance_global`].
    pub fn tree_to_vine(&mut self) -> Result<(), TreeError> {
        let res = self.straighten();
        self.recompute_heights();
        self.mark_shape_disturbed();
        res
    }

    /// Fold a vine into a tree of minimal height.
    ///
    /// The tree must be a vine (see [`Tree::tree_to_vine`]); otherwise this reports
    /// [`Inconsistency::NotAVine`] and leaves the shape untouched.
    pub fn vine_to_tree(&mut self) -> Result<(), TreeError> {
        self.check_vine()?;
        let res = self.fold_vine();
        self.recompute_heights();
        // A fully folded vine has every level full except the last.
        self.shape_disturbed = res.is_err() && self.config().auto_rebalance;
        res
    }

    /// Perform `count` left rotations along the right spine, at every second node.
    ///
    /// This is a single round of [`Tree::vine_to_tree`] and only meaningful on a vine or on
    /// the partially folded shapes that `vine_to_tree` produces between rounds.
    /// Reports [`Inconsistency::NotAVine`] if the spine ends before `count` rotations.
    pub fn compress(&mut self, count: usize) -> Result<(), TreeError> {
        let res = self.fold(count);
        self.recompute_heights();
        self.mark_shape_disturbed();
        res
    }

    /// Returns true if no node has a left child.
    pub fn is_vine(&self) -> bool {
        self.check_vine().is_ok()
    }

    fn check_vine(&self) -> Result<(), TreeError> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = self.node(id);
            if n.left.is_some() {
                return Err(Inconsistency::NotAVine { node: id }.into());
            }
            cur = n.right;
        }
        Ok(())
    }

    fn straighten(&mut self) -> Result<(), TreeError> {
        let mut tail = self.root;
        while let Some(id) = tail {
            if let Some(left) = self.node(id).left {
                self.rotate(id, Rotation::Right, Heights::Defer)?;
                // The promoted child may carry its own left subtree; revisit it.
                tail = Some(left);
            } else {
                tail = self.node(id).right;
            }
        }
        Ok(())
    }

    fn fold_vine(&mut self) -> Result<(), TreeError> {
        let mut size = self.len();
        if size == 0 {
            return Ok(());
        }
        // Nodes beyond the largest perfect tree that fits go to the bottom level first.
        let leaves = size + 1 - (1_usize << (size + 1).ilog2());
        self.fold(leaves)?;
        size -= leaves;
        while size > 1 {
            size /= 2;
            self.fold(size)?;
        }
        Ok(())
    }

    fn fold(&mut self, count: usize) -> Result<(), TreeError> {
        let Some(mut scanner) = self.root else {
            return Ok(());
        };
        for step in 0..count {
            if step > 0 {
                scanner = self
                    .node(scanner)
                    .right
                    .ok_or(Inconsistency::NotAVine { node: scanner })?;
            }
            if !self.rotate(scanner, Rotation::Left, Heights::Defer)? {
                return Err(Inconsistency::NotAVine { node: scanner }.into());
            }
            scanner = self
                .node(scanner)
                .parent
                .ok_or(Inconsistency::ParentLink { node: scanner })?;
        }
        Ok(())
    }

    /// Recompute every height bottom-up, walking parent links instead of a stack.
    pub(crate) fn recompute_heights(&mut self) {
        let mut next = self.root.map(|r| self.first_post_order(r));
        while let Some(id) = next {
            self.update_height(id);
            next = self.post_order_successor(id);
        }
    }
}

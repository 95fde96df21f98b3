// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation primitives and local (AVL-style) rebalancing.
//!
//! Rotations are the only operations that change the shape of the tree without adding or
//! removing nodes. Local rebalancing and the vine transforms are expressed in terms of them.

use crate::error::TreeError;
use crate::tree::{Link, Tree};
use crate::types::NodeId;

/// Direction of a rotation: `Left` promotes the right child, `Right` promotes the left child.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rotation {
    Left,
    Right,
}

/// Whether a rotation refreshes heights itself or leaves that to a later bulk pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Heights {
    Maintain,
    Defer,
}

impl<K, V> Tree<K, V> {
    /// Rotate left at `id`, promoting its right child into its position.
    ///
    /// Returns `Ok(false)` without touching the tree if `id` has no right child.
    ///
    /// On a tree built with [`TreeConfig::AVL`](crate::TreeConfig::AVL), manual rotations can
    /// break the balance bound. The next insert or delete restores it with
    /// [`Tree::rebalance_global`], or call that directly.
    pub fn rotate_left(&mut self, id: NodeId) -> Result<bool, TreeError> {
        self.get(id)?;
        let rotated = self.rotate(id, Rotation::Left, Heights::Maintain)?;
        if rotated {
            self.mark_shape_disturbed();
        }
        Ok(rotated)
    }

    /// Rotate right at `id`, promoting its left child into its position.
    ///
    /// Returns `Ok(false)` without touching the tree if `id` has no left child.
    pub fn rotate_right(&mut self, id: NodeId) -> Result<bool, TreeError> {
        self.get(id)?;
        let rotated = self.rotate(id, Rotation::Right, Heights::Maintain)?;
        if rotated {
            self.mark_shape_disturbed();
        }
        Ok(rotated)
    }

    /// Repair the AVL bound at `id` with a single or double rotation.
    ///
    /// Only `id` is examined. Returns `Ok(true)` if a rotation was performed.
    pub fn rebalance(&mut self, id: NodeId) -> Result<bool, TreeError> {
        self.get(id)?;
        self.rebalance_node(id)
    }

    pub(crate) fn rotate(
        &mut self,
        id: NodeId,
        dir: Rotation,
        heights: Heights,
    ) -> Result<bool, TreeError> {
        let n = self.node(id);
        let pivot = match dir {
            Rotation::Left => n.right,
            Rotation::Right => n.left,
        };
        let Some(pivot) = pivot else {
            return Ok(false);
        };
        let at = self.position(id)?;

        self.set_link(at, Some(pivot));
        match dir {
            Rotation::Left => {
                let inner = self.node(pivot).left;
                self.set_link(Link::Right(id), inner);
                self.set_link(Link::Left(pivot), Some(id));
            }
            Rotation::Right => {
                let inner = self.node(pivot).right;
                self.set_link(Link::Left(id), inner);
                self.set_link(Link::Right(pivot), Some(id));
            }
        }

        if heights == Heights::Maintain {
            self.update_height(id);
            self.update_height_cascade(Some(pivot));
        }
        tracing::trace!(?id, ?pivot, ?dir, "rotated");
        Ok(true)
    }

    pub(crate) fn rebalance_node(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let n = self.node(id);
        let (left, right) = (n.left, n.right);
        let (hl, hr) = (self.height_of(left), self.height_of(right));
        if hl.abs_diff(hr) <= 1 {
            return Ok(false);
        }
        // Resolve our own position first so a double rotation cannot stop halfway.
        self.position(id)?;

        if hr > hl {
            let Some(r) = right else { return Ok(false) };
            let rn = self.node(r);
            if self.height_of(rn.right) < self.height_of(rn.left) {
                self.rotate(r, Rotation::Right, Heights::Maintain)?;
            }
            self.rotate(id, Rotation::Left, Heights::Maintain)?;
        } else {
            let Some(l) = left else { return Ok(false) };
            let ln = self.node(l);
            if self.height_of(ln.left) < self.height_of(ln.right) {
                self.rotate(l, Rotation::Left, Heights::Maintain)?;
            }
            self.rotate(id, Rotation::Right, Heights::Maintain)?;
        }
        tracing::trace!(?id, hl, hr, "repaired balance");
        Ok(true)
    }

    /// Rebalance every node from `start` up to the root.
    pub(crate) fn rebalance_path(&mut self, start: Option<NodeId>) {
        let mut cur = start;
        while let Some(id) = cur {
            if let Err(err) = self.rebalance_node(id) {
                tracing::error!(?id, %err, "rebalance aborted");
            }
            // After a rotation `id` sits below the new subtree root, which is visited next.
            cur = self.node(id).parent;
        }
    }

    /// Restore the AVL bound after an insert or delete whose deepest changed node is `start`.
    ///
    /// Walking one path only repairs what that update broke. If a manual shape operation ran
    /// since the last repair, the whole tree is rebuilt instead.
    pub(crate) fn rebalance_after_update(&mut self, start: Option<NodeId>) {
        if !self.shape_disturbed {
            self.rebalance_path(start);
        } else if let Err(err) = self.rebalance_global() {
            tracing::error!(%err, "global rebalance aborted");
        }
    }

    pub(crate) fn mark_shape_disturbed(&mut self) {
        if self.config().auto_rebalance {
            self.shape_disturbed = true;
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the ordered tree: node identifiers and construction-time configuration.

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable while the node lives, including across
/// rotations and global rebalancing (those relocate a node, they never recreate it).
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On delete, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// A "null" reference is spelled `Option<NodeId>::None`.
///
/// ### Liveness
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
/// Accessors given a stale `NodeId` fail with [`TreeError::InvalidReference`](crate::TreeError::InvalidReference).
///
/// ### Notes
///
/// - The generation increments on slot reuse and never decreases.
/// - A slot that reaches generation `u32::MAX` is retired when freed and never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Construction-time configuration of a [`Tree`](crate::Tree).
///
/// The configuration is fixed for the lifetime of a tree so that the balance guarantee is
/// well defined at every observation point.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TreeConfig {
    /// Keep the AVL balance bound after every insert and delete.
    ///
    /// When `false`, the shape is whatever incremental insertion produced, and only
    /// [`Tree::rebalance_global`](crate::Tree::rebalance_global) restores balance.
    pub auto_rebalance: bool,
}

impl TreeConfig {
    /// Configuration with AVL maintenance turned on.
    pub const AVL: Self = Self {
        auto_rebalance: true,
    };
}

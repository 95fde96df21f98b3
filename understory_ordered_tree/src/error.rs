// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types reported by tree operations.

use core::fmt;

use crate::types::NodeId;

/// Error returned by fallible tree operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The handle does not refer to a live node of this tree.
    ///
    /// Check with [`Tree::is_alive`](crate::Tree::is_alive) before dereferencing a handle that
    /// may have been held across a delete.
    InvalidReference(NodeId),
    /// An internal invariant is broken.
    ///
    /// This indicates a prior bug rather than a usage error. The operation that detected it
    /// did not modify any links.
    StructuralInconsistency(Inconsistency),
}

/// Which structural invariant was found broken.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// The node's parent does not list it as either child.
    Detached {
        /// The orphaned node.
        node: NodeId,
    },
    /// A child's parent link does not point back at the node holding it.
    ParentLink {
        /// The child with the wrong back-reference.
        node: NodeId,
    },
    /// In-order traversal is not non-decreasing at this node.
    Order {
        /// The first node found out of order.
        node: NodeId,
    },
    /// A stored height disagrees with the heights of the node's children.
    Height {
        /// The node with the stale height.
        node: NodeId,
        /// The height stored on the node.
        stored: u32,
        /// The height derived from its children.
        expected: u32,
    },
    /// The element count disagrees with the number of reachable nodes.
    Count {
        /// The count the tree maintains.
        stored: usize,
        /// The number of nodes reachable from the root.
        reachable: usize,
    },
    /// Child heights differ by more than one on an auto-rebalancing tree.
    Unbalanced {
        /// The node violating the AVL bound.
        node: NodeId,
    },
    /// A vine operation found a left child on the right spine, or ran off its end.
    NotAVine {
        /// The node where the walk stopped.
        node: NodeId,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReference(id) => write!(f, "{id:?} does not refer to a live node"),
            Self::StructuralInconsistency(what) => {
                write!(f, "internal tree structure is broken: {what}")
            }
        }
    }
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Detached { node } => write!(f, "{node:?} is not a child of its parent"),
            Self::ParentLink { node } => write!(f, "{node:?} has a wrong parent link"),
            Self::Order { node } => write!(f, "{node:?} is out of order"),
            Self::Height {
                node,
                stored,
                expected,
            } => write!(f, "{node:?} stores height {stored}, expected {expected}"),
            Self::Count { stored, reachable } => {
                write!(f, "count is {stored} but {reachable} nodes are reachable")
            }
            Self::Unbalanced { node } => write!(f, "{node:?} violates the AVL bound"),
            Self::NotAVine { node } => write!(f, "shape is not a vine at {node:?}"),
        }
    }
}

impl core::error::Error for TreeError {}

impl From<Inconsistency> for TreeError {
    fn from(what: Inconsistency) -> Self {
        Self::StructuralInconsistency(what)
    }
}

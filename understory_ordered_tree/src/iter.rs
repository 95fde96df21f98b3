// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-order iteration.

use crate::tree::Tree;
use crate::types::NodeId;

/// In-order iterator over `(NodeId, &K, &V)`.
///
/// Created by [`Tree::iter`]. Walks successor links, so it needs no stack.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    tree: &'a Tree<K, V>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (NodeId, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.next_in_order(id);
        self.remaining = self.remaining.saturating_sub(1);
        let n = self.tree.node(id);
        Some((id, &n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Tree<K, V> {
    /// Iterate nodes in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            next: self.first(),
            remaining: self.len(),
        }
    }

    /// Iterate keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(_, k, _)| k)
    }

    /// Iterate values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, _, v)| v)
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (NodeId, &'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

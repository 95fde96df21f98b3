// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural invariant checks.

use alloc::vec::Vec;

use crate::error::{Inconsistency, TreeError};
use crate::tree::Tree;

impl<K: Ord, V> Tree<K, V> {
    /// Check every structural invariant, reporting the first violation found.
    ///
    /// - every child's parent link points back at the node holding it;
    /// - every stored height is `1 + max(left, right)`;
    /// - the element count matches the number of reachable nodes;
    /// - in-order traversal is non-decreasing;
    /// - with automatic rebalancing, child heights differ by at most one.
    ///
    /// This is O(n) and intended for tests and debugging.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut reachable = 0_usize;
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            if self.get(root)?.parent.is_some() {
                return Err(Inconsistency::ParentLink { node: root }.into());
            }
            stack.push(root);
        }

        while let Some(id) = stack.pop() {
            reachable += 1;
            if reachable > self.len() {
                break;
            }
            let n = self.node(id);
            let mut child_heights = [0_u32; 2];
            for (slot, child) in [n.left, n.right].into_iter().enumerate() {
                let Some(child) = child else { continue };
                let c = self
                    .get(child)
                    .map_err(|_| Inconsistency::ParentLink { node: child })?;
                if c.parent != Some(id) {
                    return Err(Inconsistency::ParentLink { node: child }.into());
                }
                child_heights[slot] = c.height;
                stack.push(child);
            }

            let [hl, hr] = child_heights;
            let expected = 1 + hl.max(hr);
            if n.height != expected {
                return Err(Inconsistency::Height {
                    node: id,
                    stored: n.height,
                    expected,
                }
                .into());
            }
            if self.config().auto_rebalance && hl.abs_diff(hr) > 1 {
                return Err(Inconsistency::Unbalanced { node: id }.into());
            }
        }

        if reachable != self.len() {
            return Err(Inconsistency::Count {
                stored: self.len(),
                reachable,
            }
            .into());
        }

        let mut prev = None;
        for (id, key, _) in self.iter() {
            if prev.is_some_and(|p| p > key) {
                return Err(Inconsistency::Order { node: id }.into());
            }
            prev = Some(key);
        }
        Ok(())
    }
}

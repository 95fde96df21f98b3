// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, handles, lookup, traversal, insert and delete.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use crate::error::{Inconsistency, TreeError};
use crate::types::{NodeId, TreeConfig};

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered map stored as a binary search tree over a node arena.
///
/// Keys are ordered by [`Ord`]; duplicate keys are allowed and route to the right of their
/// equals, so this is a multimap unless the caller keeps keys unique.
pub struct Tree<K, V> {
    nodes: Vec<Option<Node<K, V>>>, // slots
    generations: Vec<u32>,          // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    pub(crate) root: Option<NodeId>,
    len: usize,
    config: TreeConfig,
    // Set when a manual shape operation may have broken the AVL bound of an auto-rebalancing tree.
    pub(crate) shape_disturbed: bool,
}

impl<K, V> core::fmt::Debug for Tree<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("slots_total", &total)
            .field("free_list", &free)
            .field("root", &self.root)
            .field("height", &self.tree_height())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    generation: u32,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) height: u32,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    fn new(generation: u32, key: K, value: V) -> Self {
        Self {
            generation,
            key,
            value,
            height: 1,
            left: None,
            right: None,
            parent: None,
        }
    }
}

/// Where a subtree hangs: the root slot, or one side of a parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Link {
    Root,
    Left(NodeId),
    Right(NodeId),
}

impl Link {
    pub(crate) fn parent(self) -> Option<NodeId> {
        match self {
            Self::Root => None,
            Self::Left(p) | Self::Right(p) => Some(p),
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Create a new empty tree with the default configuration (no automatic rebalancing).
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a new empty tree with the given configuration.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: None,
            len: 0,
            config,
            shape_disturbed: false,
        }
    }

    /// Create a new empty tree that keeps the AVL balance bound after every insert and delete.
    pub fn avl() -> Self {
        Self::with_config(TreeConfig::AVL)
    }

    /// The configuration this tree was built with.
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, or `None` for an empty tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Height of the whole tree: `0` when empty, `1` for a single node.
    pub fn tree_height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    /// Key stored at `id`.
    pub fn key(&self, id: NodeId) -> Result<&K, TreeError> {
        self.get(id).map(|n| &n.key)
    }

    /// Value stored at `id`.
    pub fn value(&self, id: NodeId) -> Result<&V, TreeError> {
        self.get(id).map(|n| &n.value)
    }

    /// Mutable value stored at `id`. Keys are never handed out mutably.
    pub fn value_mut(&mut self, id: NodeId) -> Result<&mut V, TreeError> {
        self.get_mut(id).map(|n| &mut n.value)
    }

    /// Height of the subtree rooted at `id` (a leaf has height `1`).
    pub fn height(&self, id: NodeId) -> Result<u32, TreeError> {
        self.get(id).map(|n| n.height)
    }

    /// Left child of `id`.
    pub fn left(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.get(id).map(|n| n.left)
    }

    /// Right child of `id`.
    pub fn right(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.get(id).map(|n| n.right)
    }

    /// Parent of `id`, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.get(id).map(|n| n.parent)
    }

    /// Left subtree height minus right subtree height.
    pub fn balance_factor(&self, id: NodeId) -> Result<i64, TreeError> {
        let n = self.get(id)?;
        Ok(i64::from(self.height_of(n.left)) - i64::from(self.height_of(n.right)))
    }

    /// Returns true if the child heights of `id` differ by at most one.
    pub fn is_balanced_at(&self, id: NodeId) -> Result<bool, TreeError> {
        self.balance_factor(id).map(|b| b.abs() <= 1)
    }

    /// Returns true if every node satisfies the AVL bound.
    pub fn is_balanced(&self) -> bool {
        self.nodes
            .iter()
            .flatten()
            .all(|n| self.height_of(n.left).abs_diff(self.height_of(n.right)) <= 1)
    }

    /// Leftmost node, `None` for an empty tree.
    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|r| self.leftmost(r))
    }

    /// Rightmost node, `None` for an empty tree.
    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|r| self.rightmost(r))
    }

    /// In-order successor of `id`, `None` if `id` is the last node.
    pub fn find_next(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.get(id)?;
        Ok(self.next_in_order(id))
    }

    /// In-order predecessor of `id`, `None` if `id` is the first node.
    pub fn find_prev(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.get(id)?;
        Ok(self.prev_in_order(id))
    }

    /// Delete the node at `id`.
    ///
    /// Returns false if `id` is stale, or if a structural inconsistency was detected (in which
    /// case nothing was modified).
    pub fn delete(&mut self, id: NodeId) -> bool {
        self.remove(id).is_some()
    }

    /// Delete the node at `id` and return its key and value.
    ///
    /// A node with two children is replaced by its in-order predecessor, which keeps its
    /// `NodeId`; every other live handle stays valid.
    pub fn remove(&mut self, id: NodeId) -> Option<(K, V)> {
        if !self.is_alive(id) {
            return None;
        }
        let changed = match self.unlink(id) {
            Ok(changed) => changed,
            Err(err) => {
                tracing::error!(?id, %err, "delete aborted");
                return None;
            }
        };
        let node = self.free(id);
        self.len -= 1;
        if self.config.auto_rebalance {
            self.rebalance_after_update(changed);
        }
        Some((node.key, node.value))
    }

    /// Remove every node. All outstanding handles become stale.
    ///
    /// Nodes are freed in post-order with an explicit loop, so arbitrarily deep trees are fine.
    pub fn clear(&mut self) {
        let mut next = self.root.map(|r| self.first_post_order(r));
        while let Some(id) = next {
            next = self.post_order_successor(id);
            self.free(id);
        }
        self.root = None;
        self.len = 0;
        self.shape_disturbed = false;
    }

    // --- internals ---

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node<K, V>, TreeError> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|n| n.generation == id.generation())
            .ok_or(TreeError::InvalidReference(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node<K, V>, TreeError> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|n| n.generation == id.generation())
            .ok_or(TreeError::InvalidReference(id))
    }

    /// Access a node reached through an internal link; panics if the link dangles.
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Mutable access through an internal link; panics if the link dangles.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn alloc(&mut self, key: K, value: V) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, key, value));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, key, value)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn free(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.nodes[id.idx()].take().expect("dangling NodeId");
        // A slot whose generation is exhausted is retired instead of reused.
        if self.generations[id.idx()] < u32::MAX {
            self.free_list.push(id.idx());
        }
        node
    }

    pub(crate) fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.node(id).height)
    }

    /// Recompute the height of `id` from its children. Returns true if it changed.
    pub(crate) fn update_height(&mut self, id: NodeId) -> bool {
        let n = self.node(id);
        let height = 1 + self.height_of(n.left).max(self.height_of(n.right));
        let n = self.node_mut(id);
        let changed = n.height != height;
        n.height = height;
        changed
    }

    /// Refresh heights from `start` toward the root.
    ///
    /// Always moves at least one step past `start`, then stops at the first unchanged height.
    pub(crate) fn update_height_cascade(&mut self, start: Option<NodeId>) {
        let mut first = true;
        let mut cur = start;
        while let Some(id) = cur {
            let changed = self.update_height(id);
            if !first && !changed {
                break;
            }
            cur = self.node(id).parent;
            first = false;
        }
    }

    /// Resolve where `id` hangs, checking that its parent really holds it.
    pub(crate) fn position(&self, id: NodeId) -> Result<Link, TreeError> {
        let Some(parent) = self.node(id).parent else {
            return if self.root == Some(id) {
                Ok(Link::Root)
            } else {
                Err(Inconsistency::Detached { node: id }.into())
            };
        };
        let p = self
            .get(parent)
            .map_err(|_| Inconsistency::ParentLink { node: id })?;
        if p.left == Some(id) {
            Ok(Link::Left(parent))
        } else if p.right == Some(id) {
            Ok(Link::Right(parent))
        } else {
            Err(Inconsistency::Detached { node: id }.into())
        }
    }

    /// Hang `child` at `link`, fixing its parent back-reference.
    pub(crate) fn set_link(&mut self, link: Link, child: Option<NodeId>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(p) => self.node_mut(p).left = child,
            Link::Right(p) => self.node_mut(p).right = child,
        }
        if let Some(c) = child {
            self.node_mut(c).parent = link.parent();
        }
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.node(id).left {
            id = l;
        }
        id
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.node(id).right {
            id = r;
        }
        id
    }

    pub(crate) fn next_in_order(&self, id: NodeId) -> Option<NodeId> {
        if let Some(r) = self.node(id).right {
            return Some(self.leftmost(r));
        }
        // Climb until we arrive from a left child.
        let mut cur = id;
        while let Some(p) = self.node(cur).parent {
            if self.node(p).left == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    pub(crate) fn prev_in_order(&self, id: NodeId) -> Option<NodeId> {
        if let Some(l) = self.node(id).left {
            return Some(self.rightmost(l));
        }
        let mut cur = id;
        while let Some(p) = self.node(cur).parent {
            if self.node(p).right == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// First node of the post-order walk of the subtree at `id`.
    pub(crate) fn first_post_order(&self, mut id: NodeId) -> NodeId {
        loop {
            let n = self.node(id);
            match (n.left, n.right) {
                (Some(l), _) => id = l,
                (None, Some(r)) => id = r,
                (None, None) => return id,
            }
        }
    }

    /// Post-order successor using parent links only.
    pub(crate) fn post_order_successor(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let p = self.node(parent);
        match p.right {
            Some(r) if p.left == Some(id) => Some(self.first_post_order(r)),
            _ => Some(parent),
        }
    }

    /// Detach `id` from the shape. Returns the lowest node whose subtree changed.
    ///
    /// Every link position is resolved before the first write.
    fn unlink(&mut self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let (left, right) = {
            let n = self.node(id);
            (n.left, n.right)
        };
        let at = self.position(id)?;
        let (Some(left), Some(_)) = (left, right) else {
            self.set_link(at, left.or(right));
            let changed = at.parent();
            self.update_height_cascade(changed);
            return Ok(changed);
        };

        // Two children: the in-order predecessor has no right child, so it detaches simply
        // and then takes over our position.
        let pred = self.rightmost(left);
        let pred_at = self.position(pred)?;
        let pred_left = self.node(pred).left;
        self.set_link(pred_at, pred_left);

        let (left, right) = {
            let n = self.node(id);
            (n.left, n.right)
        };
        self.set_link(at, Some(pred));
        self.set_link(Link::Left(pred), left);
        self.set_link(Link::Right(pred), right);

        let changed = match pred_at.parent() {
            Some(p) if p != id => p,
            _ => pred,
        };
        self.update_height_cascade(Some(changed));
        // The cascade may stop below `pred`, whose stored height is still its old one.
        self.update_height_cascade(Some(pred));
        Ok(Some(changed))
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Insert a new node and return its handle.
    ///
    /// Always inserts: an equal key goes to the right of the existing ones.
    pub fn insert(&mut self, key: K, value: V) -> NodeId {
        let mut at = Link::Root;
        let mut cur = self.root;
        while let Some(c) = cur {
            let n = self.node(c);
            if key < n.key {
                at = Link::Left(c);
                cur = n.left;
            } else {
                at = Link::Right(c);
                cur = n.right;
            }
        }
        let id = self.alloc(key, value);
        self.set_link(at, Some(id));
        self.len += 1;
        self.update_height_cascade(Some(id));
        if self.config.auto_rebalance {
            self.rebalance_after_update(at.parent());
        }
        id
    }

    /// Find a node with the given key.
    ///
    /// With duplicates, returns the equal node closest to the root.
    pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = self.node(id);
            cur = match key.cmp(n.key.borrow()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
            };
        }
        None
    }

    /// Returns true if some node holds `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }
}

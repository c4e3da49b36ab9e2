//! Arena-backed tree with expandable nodes.
//!
//! `TreeArena` stores nodes in a slot map. Each node keeps its children as an
//! ordered list of [`NodeId`]s and a parent index, so there are no reference
//! cycles and parent lookup is O(1). Removed IDs never resolve again.
//!
//! Every change that can alter the visible rows bumps a revision counter,
//! which [`VisibleRows`](super::VisibleRows) uses to decide when to rebuild,
//! and is announced on the [`changed`](TreeArena::changed) signal.

use slotmap::{SlotMap, new_key_type};
use thicket_core::Signal;
use thicket_core::logging::targets;

use crate::error::TreeError;

new_key_type! {
    /// Stable identity of a node in a [`TreeArena`].
    pub struct NodeId;
}

/// A structural change made to a [`TreeArena`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChange {
    /// A node was inserted under `parent` at child `index`.
    Inserted {
        /// The new node.
        node: NodeId,
        /// Its parent.
        parent: NodeId,
        /// Position in the parent's child list.
        index: usize,
    },
    /// A subtree was removed.
    Removed {
        /// Root of the removed subtree.
        node: NodeId,
        /// Former parent of `node`.
        parent: NodeId,
        /// Former position in the parent's child list.
        index: usize,
        /// Every removed node, `node` first, in pre-order.
        removed: Vec<NodeId>,
    },
    /// A node's expanded flag flipped.
    ExpandedChanged {
        /// The node.
        node: NodeId,
        /// The new value of the flag.
        expanded: bool,
    },
}

#[derive(Debug)]
struct TreeNode<T> {
    data: T,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    expanded: bool,
}

impl<T> TreeNode<T> {
    fn new(data: T, parent: Option<NodeId>) -> Self {
        Self {
            data,
            children: Vec::new(),
            parent,
            expanded: false,
        }
    }
}

/// A rooted tree of `T` values with per-node expansion state.
///
/// # Example
///
/// ```
/// use thicket::model::TreeArena;
///
/// let mut tree = TreeArena::new("root");
/// let root = tree.root();
/// let docs = tree.add_child(root, "docs").unwrap();
/// tree.add_child(docs, "readme.md").unwrap();
///
/// assert_eq!(tree.children(root), &[docs]);
/// assert!(!tree.is_leaf(docs));
/// ```
pub struct TreeArena<T> {
    nodes: SlotMap<NodeId, TreeNode<T>>,
    root: NodeId,
    revision: u64,
    journal: Option<Vec<TreeChange>>,
    changed: Signal<TreeChange>,
}

impl<T> TreeArena<T> {
    /// Create a tree holding only a root node. The root starts collapsed.
    pub fn new(root_data: T) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode::new(root_data, None));
        Self {
            nodes,
            root,
            revision: 0,
            journal: None,
            changed: Signal::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The data stored at `id`.
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).map(|n| &n.data)
    }

    /// Mutable access to the data stored at `id`.
    ///
    /// Data edits never change the visible rows, so no change is recorded.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|n| &mut n.data)
    }

    /// The parent of `id`, or `None` for the root and unknown nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// The ordered children of `id`; empty for leaves and unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// A node without children is a leaf regardless of its expanded flag.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// The node's expanded flag.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.expanded)
    }

    /// Position of `id` within its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        Some(self.ancestors(id).count())
    }

    /// Iterate over the proper ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Collect the subtree rooted at `id` in pre-order, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Counter bumped on every structural or expansion change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Signal emitted after every structural or expansion change.
    pub fn changed(&self) -> &Signal<TreeChange> {
        &self.changed
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append a child to `parent`.
    pub fn add_child(&mut self, parent: NodeId, data: T) -> Result<NodeId, TreeError> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, data)
    }

    /// Insert a child into `parent` at `index`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        data: T,
    ) -> Result<NodeId, TreeError> {
        let len = self.node(parent)?.children.len();
        if index > len {
            return Err(TreeError::ChildIndexOutOfRange { index, len });
        }

        let node = self.nodes.insert(TreeNode::new(data, Some(parent)));
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.insert(index, node);
        }
        tracing::trace!(target: targets::TREE, ?node, ?parent, index, "node inserted");
        self.record(TreeChange::Inserted {
            node,
            parent,
            index,
        });
        Ok(node)
    }

    /// Remove `id` and its whole subtree, returning the data of `id`.
    pub fn remove(&mut self, id: NodeId) -> Result<T, TreeError> {
        if id == self.root {
            return Err(TreeError::CannotRemoveRoot);
        }
        let parent = self
            .node(id)?
            .parent
            .ok_or(TreeError::NodeNotFound(id))?;
        let index = self.index_in_parent(id).ok_or(TreeError::NodeNotFound(id))?;

        let removed = self.descendants(id);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.remove(index);
        }
        let mut data = None;
        for &node in &removed {
            if let Some(n) = self.nodes.remove(node)
                && node == id
            {
                data = Some(n.data);
            }
        }

        tracing::trace!(target: targets::TREE, node = ?id, count = removed.len(), "subtree removed");
        self.record(TreeChange::Removed {
            node: id,
            parent,
            index,
            removed,
        });
        data.ok_or(TreeError::NodeNotFound(id))
    }

    /// Remove every child of `id`, returning how many subtrees were removed.
    pub fn clear_children(&mut self, id: NodeId) -> Result<usize, TreeError> {
        let children = self.node(id)?.children.clone();
        for &child in children.iter().rev() {
            self.remove(child)?;
        }
        Ok(children.len())
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Set the expanded flag. Returns whether the flag changed.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> Result<bool, TreeError> {
        let node = self.node_mut(id)?;
        if node.expanded == expanded {
            return Ok(false);
        }
        node.expanded = expanded;
        tracing::trace!(target: targets::TREE, node = ?id, expanded, "expansion changed");
        self.record(TreeChange::ExpandedChanged { node: id, expanded });
        Ok(true)
    }

    /// Expand `id` and every branch below it. Returns the number of flags flipped.
    pub fn expand_all(&mut self, id: NodeId) -> Result<usize, TreeError> {
        self.node(id)?;
        let mut flipped = 0;
        for node in self.descendants(id) {
            if !self.is_leaf(node) && self.set_expanded(node, true)? {
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    // =========================================================================
    // Change journal
    // =========================================================================

    /// Start or stop buffering changes for [`take_changes`](Self::take_changes).
    ///
    /// Disabling the journal drops anything still buffered.
    pub fn set_change_journal(&mut self, enabled: bool) {
        match (enabled, self.journal.is_some()) {
            (true, false) => self.journal = Some(Vec::new()),
            (false, true) => self.journal = None,
            _ => {}
        }
    }

    /// Drain buffered changes, oldest first.
    pub fn take_changes(&mut self) -> Vec<TreeChange> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn record(&mut self, change: TreeChange) {
        self.revision = self.revision.wrapping_add(1);
        self.changed.emit(change.clone());
        if let Some(journal) = self.journal.as_mut() {
            journal.push(change);
        }
    }

    fn node(&self, id: NodeId) -> Result<&TreeNode<T>, TreeError> {
        self.nodes.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut TreeNode<T>, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::NodeNotFound(id))
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TreeArena<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeArena")
            .field("len", &self.nodes.len())
            .field("root", &self.root)
            .field("revision", &self.revision)
            .finish()
    }
}

static_assertions::assert_impl_all!(TreeArena<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn sample() -> (TreeArena<&'static str>, NodeId, NodeId, NodeId) {
        let mut tree = TreeArena::new("root");
        let root = tree.root();
        let a = tree.add_child(root, "a").unwrap();
        let b = tree.add_child(root, "b").unwrap();
        tree.add_child(a, "a1").unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn test_add_and_query() {
        let (tree, root, a, b) = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.data(b), Some(&"b"));
        assert!(tree.is_leaf(b));
        assert!(!tree.is_leaf(a));
        assert_eq!(tree.depth(tree.children(a)[0]), Some(2));
    }

    #[test]
    fn test_insert_child_at_index() {
        let (mut tree, root, a, b) = sample();
        let c = tree.insert_child(root, 1, "c").unwrap();
        assert_eq!(tree.children(root), &[a, c, b]);
        assert_eq!(tree.index_in_parent(c), Some(1));

        let err = tree.insert_child(root, 9, "z").unwrap_err();
        assert_eq!(err, TreeError::ChildIndexOutOfRange { index: 9, len: 3 });
    }

    #[test]
    fn test_remove_subtree() {
        let (mut tree, root, a, b) = sample();
        let a1 = tree.children(a)[0];
        assert_eq!(tree.remove(a), Ok("a"));
        assert_eq!(tree.children(root), &[b]);
        assert!(!tree.contains(a));
        assert!(!tree.contains(a1));
        assert_eq!(tree.remove(a), Err(TreeError::NodeNotFound(a)));
        assert_eq!(tree.remove(root), Err(TreeError::CannotRemoveRoot));
    }

    #[test]
    fn test_leaf_expansion_is_flag_only() {
        let (mut tree, _, _, b) = sample();
        assert!(tree.set_expanded(b, true).unwrap());
        assert!(tree.is_expanded(b));
        assert!(tree.is_leaf(b));
        assert!(!tree.set_expanded(b, true).unwrap());
    }

    #[test]
    fn test_expand_all_skips_leaves() {
        let (mut tree, root, a, b) = sample();
        assert_eq!(tree.expand_all(root).unwrap(), 2);
        assert!(tree.is_expanded(root));
        assert!(tree.is_expanded(a));
        assert!(!tree.is_expanded(b));
    }

    #[test]
    fn test_revision_and_journal() {
        let (mut tree, root, a, _) = sample();
        let before = tree.revision();
        assert!(tree.take_changes().is_empty());

        tree.set_change_journal(true);
        tree.set_expanded(root, true).unwrap();
        let removed = tree.descendants(a);
        tree.remove(a).unwrap();

        assert_eq!(tree.revision(), before + 2);
        assert_eq!(
            tree.take_changes(),
            vec![
                TreeChange::ExpandedChanged {
                    node: root,
                    expanded: true
                },
                TreeChange::Removed {
                    node: a,
                    parent: root,
                    index: 0,
                    removed,
                },
            ]
        );
        assert!(tree.take_changes().is_empty());
    }

    #[test]
    fn test_changed_signal() {
        let (mut tree, root, _, _) = sample();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        tree.changed().connect(move |change| seen_clone.lock().push(change.clone()));

        let c = tree.add_child(root, "c").unwrap();
        assert_eq!(
            *seen.lock(),
            vec![TreeChange::Inserted {
                node: c,
                parent: root,
                index: 2
            }]
        );
    }

    #[test]
    fn test_clear_children() {
        let (mut tree, root, _, _) = sample();
        assert_eq!(tree.clear_children(root).unwrap(), 2);
        assert!(tree.is_leaf(root));
        assert_eq!(tree.len(), 1);
    }
}

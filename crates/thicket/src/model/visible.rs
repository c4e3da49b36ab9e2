//! Hierarchical index mapper.
//!
//! Converts between tree nodes and dense, zero-based visible row numbers. A
//! node is visible when every ancestor up to the root is expanded. Rows are
//! assigned in pre-order.
//!
//! The flattened rows are cached and keyed by the tree's revision counter, so
//! every query reflects the current structure without an explicit rebuild.

use std::collections::HashMap;

use parking_lot::RwLock;
use thicket_core::PerfSpan;
use thicket_core::logging::{span_names, targets};

use super::tree::{NodeId, TreeArena};

/// A single visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    /// The node shown on this row.
    pub node: NodeId,
    /// Depth of the node in the tree (the root is 0).
    pub depth: usize,
}

#[derive(Debug)]
struct RowCache {
    revision: u64,
    rows: Vec<VisibleRow>,
    index: HashMap<NodeId, usize>,
}

/// Lazily rebuilt mapping between nodes and visible rows.
#[derive(Debug)]
pub struct VisibleRows {
    show_root: bool,
    cache: RwLock<Option<RowCache>>,
}

impl Default for VisibleRows {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VisibleRows {
    /// Create a mapper. When `show_root` is false the root is not a row and
    /// its children start at row 0.
    pub fn new(show_root: bool) -> Self {
        Self {
            show_root,
            cache: RwLock::new(None),
        }
    }

    /// Whether the root occupies row 0.
    pub fn show_root(&self) -> bool {
        self.show_root
    }

    /// Change whether the root is shown.
    pub fn set_show_root(&mut self, show_root: bool) {
        if self.show_root != show_root {
            self.show_root = show_root;
            self.invalidate();
        }
    }

    /// Drop the cached rows; the next query rebuilds them.
    pub fn invalidate(&mut self) {
        *self.cache.get_mut() = None;
    }

    /// Number of visible rows.
    pub fn visible_count<T>(&self, tree: &TreeArena<T>) -> usize {
        self.with_rows(tree, |cache| cache.rows.len())
    }

    /// The visible row of `node`, or `None` if it is hidden or unknown.
    pub fn row_of<T>(&self, tree: &TreeArena<T>, node: NodeId) -> Option<usize> {
        self.with_rows(tree, |cache| cache.index.get(&node).copied())
    }

    /// The node on `row`, or `None` when out of range.
    pub fn node_at<T>(&self, tree: &TreeArena<T>, row: usize) -> Option<NodeId> {
        self.row(tree, row).map(|r| r.node)
    }

    /// Full information about `row`.
    pub fn row<T>(&self, tree: &TreeArena<T>, row: usize) -> Option<VisibleRow> {
        self.with_rows(tree, |cache| cache.rows.get(row).copied())
    }

    /// Snapshot of every visible row.
    pub fn rows<T>(&self, tree: &TreeArena<T>) -> Vec<VisibleRow> {
        self.with_rows(tree, |cache| cache.rows.clone())
    }

    /// `node` itself when visible, otherwise its nearest visible ancestor.
    pub fn nearest_visible<T>(&self, tree: &TreeArena<T>, node: NodeId) -> Option<NodeId> {
        if !tree.contains(node) {
            return None;
        }
        self.with_rows(tree, |cache| {
            std::iter::once(node)
                .chain(tree.ancestors(node))
                .find(|n| cache.index.contains_key(n))
        })
    }

    fn with_rows<T, R>(&self, tree: &TreeArena<T>, f: impl FnOnce(&RowCache) -> R) -> R {
        {
            let cache = self.cache.read();
            if let Some(cache) = cache.as_ref()
                && cache.revision == tree.revision()
            {
                return f(cache);
            }
        }

        let mut cache = self.cache.write();
        let stale = cache
            .as_ref()
            .is_none_or(|c| c.revision != tree.revision());
        if stale {
            *cache = Some(self.flatten(tree));
        }
        match cache.as_ref() {
            Some(cache) => f(cache),
            None => f(&self.flatten(tree)),
        }
    }

    fn flatten<T>(&self, tree: &TreeArena<T>) -> RowCache {
        let _perf = PerfSpan::new(span_names::ROW_INDEX);
        let root = tree.root();

        let mut rows = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        if self.show_root {
            stack.push((root, 0));
        } else if tree.is_expanded(root) {
            stack.extend(tree.children(root).iter().rev().map(|&c| (c, 1)));
        }

        while let Some((node, depth)) = stack.pop() {
            rows.push(VisibleRow { node, depth });
            if tree.is_expanded(node) {
                stack.extend(tree.children(node).iter().rev().map(|&c| (c, depth + 1)));
            }
        }

        let index = rows.iter().enumerate().map(|(i, r)| (r.node, i)).collect();
        tracing::debug!(
            target: targets::ROW_INDEX,
            revision = tree.revision(),
            visible = rows.len(),
            "rebuilt visible rows"
        );
        RowCache {
            revision: tree.revision(),
            rows,
            index,
        }
    }
}

//! Positions, cell references and the row-mapping seam.
//!
//! A [`Position`] addresses a visible row (and optionally a column) and is
//! only meaningful against the current visible rows. A [`CellRef`] addresses
//! a node by identity and survives rows shifting around it. The selection,
//! focus and anchor models store `CellRef`s and derive positions on demand
//! through a [`RowMapping`].

use super::column::{ColumnId, Columns};
use super::tree::{NodeId, TreeArena};
use super::visible::VisibleRows;

/// A visible row, optionally narrowed to one column.
///
/// `column` is `None` for whole-row positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Visible row index.
    pub row: usize,
    /// Column, or `None` for the whole row.
    pub column: Option<ColumnId>,
}

impl Position {
    /// A whole-row position.
    pub const fn row(row: usize) -> Self {
        Self { row, column: None }
    }

    /// A single-cell position.
    pub const fn cell(row: usize, column: ColumnId) -> Self {
        Self {
            row,
            column: Some(column),
        }
    }
}

/// Node-identity form of a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// The node.
    pub node: NodeId,
    /// Column, or `None` for the whole row.
    pub column: Option<ColumnId>,
}

impl CellRef {
    /// A whole-row reference.
    pub const fn row(node: NodeId) -> Self {
        Self { node, column: None }
    }

    /// The same node with a different column.
    pub const fn with_column(self, column: Option<ColumnId>) -> Self {
        Self {
            node: self.node,
            column,
        }
    }

    /// The same column on a different node.
    pub const fn with_node(self, node: NodeId) -> Self {
        Self {
            node,
            column: self.column,
        }
    }
}

/// Read-only view of the current visible structure.
///
/// The navigation controller and the selection, focus and anchor models only
/// see the tree through this trait.
pub trait RowMapping {
    /// Number of visible rows.
    fn visible_count(&self) -> usize;

    /// The node on `row`.
    fn node_at(&self, row: usize) -> Option<NodeId>;

    /// The visible row of `node`; `None` when hidden or removed.
    fn row_of(&self, node: NodeId) -> Option<usize>;

    /// Parent of `node` in the tree.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Whether `node` is still part of the tree.
    fn contains(&self, node: NodeId) -> bool;

    /// The child of `node` at `index`.
    fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId>;

    /// Whether `node` has no children.
    fn is_leaf(&self, node: NodeId) -> bool;

    /// The node's expanded flag.
    fn is_expanded(&self, node: NodeId) -> bool;

    /// The tree root.
    fn root(&self) -> NodeId;

    /// Displayed columns in order.
    fn columns(&self) -> &[ColumnId];

    /// `node` when visible, otherwise its nearest visible ancestor.
    fn nearest_visible(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node).filter(|&n| self.contains(n));
        while let Some(n) = current {
            if self.row_of(n).is_some() {
                return Some(n);
            }
            current = self.parent_of(n);
        }
        None
    }

    /// Display index of `column`.
    fn column_index(&self, column: ColumnId) -> Option<usize> {
        self.columns().iter().position(|&c| c == column)
    }

    /// Resolve a position to a cell; `None` when the row is out of range.
    fn cell_at(&self, position: Position) -> Option<CellRef> {
        self.node_at(position.row).map(|node| CellRef {
            node,
            column: position.column,
        })
    }

    /// Resolve a cell to its current position, following hidden nodes up to
    /// their nearest visible ancestor.
    fn position_of(&self, cell: CellRef) -> Option<Position> {
        let node = self.nearest_visible(cell.node)?;
        self.row_of(node).map(|row| Position {
            row,
            column: cell.column,
        })
    }

    /// Like [`position_of`](Self::position_of) but without the ancestor fallback.
    fn exact_position_of(&self, cell: CellRef) -> Option<Position> {
        self.row_of(cell.node).map(|row| Position {
            row,
            column: cell.column,
        })
    }
}

/// [`RowMapping`] over a tree, its visible rows and its columns.
pub struct ViewContext<'a, T> {
    tree: &'a TreeArena<T>,
    rows: &'a VisibleRows,
    columns: &'a Columns,
}

impl<T> Clone for ViewContext<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ViewContext<'_, T> {}

impl<'a, T> ViewContext<'a, T> {
    /// Bundle the pieces a view is made of.
    pub fn new(tree: &'a TreeArena<T>, rows: &'a VisibleRows, columns: &'a Columns) -> Self {
        Self {
            tree,
            rows,
            columns,
        }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &'a TreeArena<T> {
        self.tree
    }

    /// The underlying visible-row mapper.
    pub fn rows(&self) -> &'a VisibleRows {
        self.rows
    }
}

impl<T> RowMapping for ViewContext<'_, T> {
    fn visible_count(&self) -> usize {
        self.rows.visible_count(self.tree)
    }

    fn node_at(&self, row: usize) -> Option<NodeId> {
        self.rows.node_at(self.tree, row)
    }

    fn row_of(&self, node: NodeId) -> Option<usize> {
        self.rows.row_of(self.tree, node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.tree.contains(node)
    }

    fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.tree.children(node).get(index).copied()
    }

    fn is_leaf(&self, node: NodeId) -> bool {
        self.tree.is_leaf(node)
    }

    fn is_expanded(&self, node: NodeId) -> bool {
        self.tree.is_expanded(node)
    }

    fn root(&self) -> NodeId {
        self.tree.root()
    }

    fn columns(&self) -> &[ColumnId] {
        self.columns.ids()
    }

    fn nearest_visible(&self, node: NodeId) -> Option<NodeId> {
        self.rows.nearest_visible(self.tree, node)
    }
}

//! Keyboard focus.
//!
//! At most one row or cell is focused. Focus never implies selection. The
//! focused cell is stored by node identity; when its node is hidden under a
//! collapsed ancestor the focus reads as the nearest visible ancestor.

use thicket_core::Signal;
use thicket_core::logging::targets;

use super::column::ColumnId;
use super::position::{CellRef, Position, RowMapping};

/// The focused position.
pub struct FocusModel {
    focused: Option<CellRef>,

    /// Emitted when the focused cell changes. Args: (new, old)
    pub focus_changed: Signal<(Option<CellRef>, Option<CellRef>)>,
}

impl Default for FocusModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusModel {
    /// Creates a model with nothing focused.
    pub fn new() -> Self {
        Self {
            focused: None,
            focus_changed: Signal::new(),
        }
    }

    /// Focus `position`, clamping its row into the visible range.
    ///
    /// With no visible rows the focus is cleared. A column that is not
    /// displayed is dropped.
    pub fn focus<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        let count = map.visible_count();
        if count == 0 {
            self.clear();
            return;
        }
        let row = position.row.min(count - 1);
        let column = position
            .column
            .filter(|&c| map.column_index(c).is_some());
        let cell = map.node_at(row).map(|node| CellRef { node, column });
        self.set_cell(cell);
    }

    /// The focused cell as stored, which may be hidden.
    pub fn focused_cell(&self) -> Option<CellRef> {
        self.focused
    }

    /// The focused position, resolved against the current visible rows.
    pub fn focused_position<M>(&self, map: &M) -> Option<Position>
    where
        M: RowMapping + ?Sized,
    {
        self.focused.and_then(|cell| map.position_of(cell))
    }

    /// Whether `row` (and `column`, when given) holds the focus.
    pub fn is_focused<M>(&self, map: &M, row: usize, column: Option<ColumnId>) -> bool
    where
        M: RowMapping + ?Sized,
    {
        match self.focused_position(map) {
            Some(focused) => focused.row == row && (column.is_none() || focused.column == column),
            None => false,
        }
    }

    /// Remove the focus.
    pub fn clear(&mut self) {
        self.set_cell(None);
    }

    /// Replace the focused cell directly.
    pub(crate) fn set_cell(&mut self, cell: Option<CellRef>) {
        if self.focused == cell {
            return;
        }
        let old = std::mem::replace(&mut self.focused, cell);
        tracing::trace!(target: targets::SELECTION, new = ?cell, ?old, "focus changed");
        self.focus_changed.emit((cell, old));
    }
}

impl std::fmt::Debug for FocusModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusModel")
            .field("focused", &self.focused)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Columns, TreeArena, ViewContext, VisibleRows};

    fn tree() -> TreeArena<&'static str> {
        let mut tree = TreeArena::new("root");
        let root = tree.root();
        let a = tree.add_child(root, "a").unwrap();
        tree.add_child(a, "a1").unwrap();
        tree.add_child(root, "b").unwrap();
        tree.set_expanded(root, true).unwrap();
        tree.set_expanded(a, true).unwrap();
        tree
    }

    #[test]
    fn test_focus_clamps() {
        let tree = tree();
        let rows = VisibleRows::default();
        let columns = Columns::new();
        let ctx = ViewContext::new(&tree, &rows, &columns);
        let mut focus = FocusModel::new();

        focus.focus(&ctx, Position::row(42));
        assert_eq!(focus.focused_position(&ctx), Some(Position::row(3)));
        assert!(focus.is_focused(&ctx, 3, None));
        assert!(!focus.is_focused(&ctx, 2, None));
    }

    #[test]
    fn test_focus_without_rows_clears() {
        let mut tree = tree();
        let mut rows = VisibleRows::default();
        rows.set_show_root(false);
        let columns = Columns::new();
        let mut focus = FocusModel::new();

        focus.focus(&ViewContext::new(&tree, &rows, &columns), Position::row(0));
        assert!(focus.focused_cell().is_some());

        tree.set_expanded(tree.root(), false).unwrap();
        let ctx = ViewContext::new(&tree, &rows, &columns);
        focus.focus(&ctx, Position::row(0));
        assert_eq!(focus.focused_cell(), None);
    }

    #[test]
    fn test_hidden_focus_resolves_to_ancestor() {
        let mut tree = tree();
        let rows = VisibleRows::default();
        let columns = Columns::new();
        let mut focus = FocusModel::new();
        focus.focus(&ViewContext::new(&tree, &rows, &columns), Position::row(2));

        let a = tree.children(tree.root())[0];
        tree.set_expanded(a, false).unwrap();
        let ctx = ViewContext::new(&tree, &rows, &columns);
        assert_eq!(focus.focused_position(&ctx), Some(Position::row(1)));
    }

    #[test]
    fn test_cell_focus() {
        let tree = tree();
        let rows = VisibleRows::default();
        let mut columns = Columns::new();
        let first = columns.push("first");
        let second = columns.push("second");
        let ctx = ViewContext::new(&tree, &rows, &columns);
        let mut focus = FocusModel::new();

        focus.focus(&ctx, Position::cell(1, second));
        assert!(focus.is_focused(&ctx, 1, Some(second)));
        assert!(focus.is_focused(&ctx, 1, None));
        assert!(!focus.is_focused(&ctx, 1, Some(first)));
    }
}

//! Selection model for tree and tree-table views.
//!
//! [`SelectionModel`] stores selected rows (or cells) by node identity, so
//! an entry survives rows shifting around it and stays selected while an
//! ancestor is collapsed. Row numbers are derived on demand through a
//! [`RowMapping`].
//!
//! # Example
//!
//! ```
//! use thicket::model::{Columns, Position, SelectionMode, SelectionModel, TreeArena, ViewContext, VisibleRows};
//!
//! let mut tree = TreeArena::new("root");
//! let root = tree.root();
//! tree.add_child(root, "a").unwrap();
//! tree.add_child(root, "b").unwrap();
//! tree.set_expanded(root, true).unwrap();
//!
//! let rows = VisibleRows::default();
//! let columns = Columns::new();
//! let ctx = ViewContext::new(&tree, &rows, &columns);
//!
//! let mut selection = SelectionModel::new(SelectionMode::Multiple);
//! selection.select_range(&ctx, Position::row(0), Position::row(2));
//! assert_eq!(selection.selected_rows(&ctx), vec![0, 1, 2]);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thicket_core::Signal;
use thicket_core::logging::targets;

use super::column::ColumnId;
use super::position::{CellRef, Position, RowMapping};
use super::tree::NodeId;

/// How many entries may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one entry is selected.
    #[default]
    Single,
    /// Any number of entries may be selected.
    Multiple,
}

/// Cells added to and removed from the selection by one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Newly selected cells.
    pub added: Vec<CellRef>,
    /// Cells no longer selected.
    pub removed: Vec<CellRef>,
}

impl SelectionChange {
    fn removed(removed: Vec<CellRef>) -> Self {
        Self {
            added: Vec::new(),
            removed,
        }
    }
}

/// Selection state.
pub struct SelectionModel {
    mode: SelectionMode,
    cell_selection_enabled: bool,

    /// Set of selected cells for O(1) lookup.
    selected_ids: HashSet<CellRef>,

    /// Selected cells in insertion order.
    selected: Vec<CellRef>,

    /// Emitted when selection changes.
    pub selection_changed: Signal<SelectionChange>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl SelectionModel {
    /// Creates an empty row-mode selection model.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            cell_selection_enabled: false,
            selected_ids: HashSet::new(),
            selected: Vec::new(),
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Gets the selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Sets the selection mode.
    ///
    /// Switching to [`SelectionMode::Single`] keeps only the most recently
    /// selected entry.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        if mode == SelectionMode::Single && self.selected.len() > 1 {
            let keep = self.selected.last().copied();
            self.retain(|cell| Some(cell) == keep);
        }
    }

    /// Whether entries address single cells rather than whole rows.
    pub fn cell_selection_enabled(&self) -> bool {
        self.cell_selection_enabled
    }

    /// Switch between row and cell granularity.
    ///
    /// Changing the granularity clears the selection so that row mode never
    /// holds column-bearing entries.
    pub fn set_cell_selection_enabled(&mut self, enabled: bool) {
        if self.cell_selection_enabled != enabled {
            self.clear_selection();
            self.cell_selection_enabled = enabled;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Membership query for a visible row, honoring the selection granularity.
    ///
    /// In cell mode a `None` column asks whether any cell of the row is
    /// selected. In row mode the column is ignored.
    pub fn is_selected<M>(&self, map: &M, row: usize, column: Option<ColumnId>) -> bool
    where
        M: RowMapping + ?Sized,
    {
        let Some(node) = map.node_at(row) else {
            return false;
        };
        if !self.cell_selection_enabled {
            return self.selected_ids.contains(&CellRef::row(node));
        }
        match column {
            None => self.selected.iter().any(|c| c.node == node),
            Some(column) => {
                self.selected_ids.contains(&CellRef::row(node))
                    || self.selected_ids.contains(&CellRef {
                        node,
                        column: Some(column),
                    })
            }
        }
    }

    /// Whether this exact cell reference is selected.
    pub fn is_cell_selected(&self, cell: CellRef) -> bool {
        self.selected_ids.contains(&cell)
    }

    /// Whether anything is selected.
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Number of selected entries, including hidden ones.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Every selected entry in insertion order, including hidden ones.
    pub fn selected_cells(&self) -> &[CellRef] {
        &self.selected
    }

    /// Distinct selected nodes in insertion order.
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.selected
            .iter()
            .filter(|c| seen.insert(c.node))
            .map(|c| c.node)
            .collect()
    }

    /// Visible selected positions in insertion order. Hidden entries are skipped.
    pub fn selected_positions<M>(&self, map: &M) -> Vec<Position>
    where
        M: RowMapping + ?Sized,
    {
        self.selected
            .iter()
            .filter_map(|&cell| map.exact_position_of(cell))
            .collect()
    }

    /// Sorted, distinct visible rows that hold a selected entry.
    pub fn selected_rows<M>(&self, map: &M) -> Vec<usize>
    where
        M: RowMapping + ?Sized,
    {
        let mut rows: Vec<usize> = self
            .selected_positions(map)
            .into_iter()
            .map(|p| p.row)
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add `position` to the selection.
    ///
    /// In single mode every other entry is removed first. Out-of-range rows
    /// and unknown columns are ignored.
    pub fn select<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        let Some(cell) = self.resolve(map, position) else {
            tracing::trace!(target: targets::SELECTION, ?position, "select ignored: out of range");
            return;
        };
        match self.mode {
            SelectionMode::Single => self.apply(true, vec![cell]),
            SelectionMode::Multiple => self.apply(false, vec![cell]),
        }
    }

    /// Clear the selection, then select `position`.
    pub fn clear_and_select<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        match self.resolve(map, position) {
            Some(cell) => self.apply(true, vec![cell]),
            None => {
                tracing::trace!(target: targets::SELECTION, ?position, "clear_and_select ignored: out of range");
            }
        }
    }

    /// Replace the selection with every row (or the rectangle of cells)
    /// between `from` and `to`, inclusive, in either direction.
    ///
    /// Multiple mode only; a no-op in single mode.
    pub fn select_range<M>(&mut self, map: &M, from: Position, to: Position)
    where
        M: RowMapping + ?Sized,
    {
        if self.mode == SelectionMode::Single {
            tracing::trace!(target: targets::SELECTION, "select_range ignored in single mode");
            return;
        }
        let cells = self.range_cells(map, from, to);
        self.apply(true, cells);
    }

    /// Add the range between `from` and `to` without removing anything.
    ///
    /// Multiple mode only; a no-op in single mode.
    pub fn extend_range<M>(&mut self, map: &M, from: Position, to: Position)
    where
        M: RowMapping + ?Sized,
    {
        if self.mode == SelectionMode::Single {
            tracing::trace!(target: targets::SELECTION, "extend_range ignored in single mode");
            return;
        }
        let cells = self.range_cells(map, from, to);
        self.apply(false, cells);
    }

    /// Flip membership of `position` without touching other entries.
    pub fn toggle<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        let Some(cell) = self.resolve(map, position) else {
            return;
        };
        if self.selected_ids.contains(&cell) {
            self.retain(|c| c != cell);
        } else {
            self.apply(self.mode == SelectionMode::Single, vec![cell]);
        }
    }

    /// Remove `position` from the selection.
    pub fn deselect<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        if let Some(cell) = self.resolve(map, position) {
            self.retain(|c| c != cell);
        }
    }

    /// Select every visible row, or in cell mode every visible row times every
    /// column. Entries hidden under collapsed branches are kept.
    ///
    /// A no-op in single mode, and in cell mode when there are no columns.
    pub fn select_all<M>(&mut self, map: &M)
    where
        M: RowMapping + ?Sized,
    {
        if self.mode == SelectionMode::Single {
            tracing::trace!(target: targets::SELECTION, "select_all ignored in single mode");
            return;
        }
        let columns: Vec<Option<ColumnId>> = if self.cell_selection_enabled {
            map.columns().iter().copied().map(Some).collect()
        } else {
            vec![None]
        };
        let cells: Vec<CellRef> = (0..map.visible_count())
            .filter_map(|row| map.node_at(row))
            .flat_map(|node| columns.iter().map(move |&column| CellRef { node, column }))
            .collect();
        self.apply(false, cells);
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        if self.selected.is_empty() {
            return;
        }

        let deselected = std::mem::take(&mut self.selected);
        self.selected_ids.clear();
        self.selection_changed.emit(SelectionChange::removed(deselected));
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(CellRef) -> bool) {
        let mut deselected = Vec::new();
        self.selected.retain(|&cell| {
            let kept = keep(cell);
            if !kept {
                deselected.push(cell);
            }
            kept
        });
        if deselected.is_empty() {
            return;
        }
        for cell in &deselected {
            self.selected_ids.remove(cell);
        }
        self.selection_changed.emit(SelectionChange::removed(deselected));
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Map a position to a storable cell, applying the granularity rule.
    ///
    /// Cell mode stores no whole-row entries: a missing column means the
    /// first one, and with no columns there is nothing to select.
    fn resolve<M>(&self, map: &M, position: Position) -> Option<CellRef>
    where
        M: RowMapping + ?Sized,
    {
        let node = map.node_at(position.row)?;
        let column = if self.cell_selection_enabled {
            match position.column {
                Some(column) => Some(map.column_index(column).map(|_| column)?),
                None => Some(*map.columns().first()?),
            }
        } else {
            None
        };
        Some(CellRef { node, column })
    }

    /// Cells covered by the range from `from` to `to`, walked from `from`.
    fn range_cells<M>(&self, map: &M, from: Position, to: Position) -> Vec<CellRef>
    where
        M: RowMapping + ?Sized,
    {
        let count = map.visible_count();
        if count == 0 {
            return Vec::new();
        }
        let start = from.row.min(count - 1);
        let end = to.row.min(count - 1);
        let rows: Vec<usize> = if start <= end {
            (start..=end).collect()
        } else {
            (end..=start).rev().collect()
        };

        let columns = if self.cell_selection_enabled {
            self.range_columns(map, from.column, to.column)
        } else {
            vec![None]
        };

        rows.into_iter()
            .filter_map(|row| map.node_at(row))
            .flat_map(|node| columns.iter().map(move |&column| CellRef { node, column }))
            .collect()
    }

    fn range_columns<M>(
        &self,
        map: &M,
        from: Option<ColumnId>,
        to: Option<ColumnId>,
    ) -> Vec<Option<ColumnId>>
    where
        M: RowMapping + ?Sized,
    {
        let from_index = from.and_then(|c| map.column_index(c));
        let to_index = to.and_then(|c| map.column_index(c));
        let (a, b) = match (from_index, to_index) {
            (Some(a), Some(b)) => (a, b),
            (Some(a), None) | (None, Some(a)) => (a, a),
            (None, None) if map.columns().is_empty() => return Vec::new(),
            (None, None) => (0, 0),
        };
        let columns = map.columns();
        let indices: Vec<usize> = if a <= b {
            (a..=b).collect()
        } else {
            (b..=a).rev().collect()
        };
        indices.into_iter().map(|i| Some(columns[i])).collect()
    }

    /// Optionally clear, then add `cells`, emitting one change notification.
    fn apply(&mut self, clear: bool, cells: Vec<CellRef>) {
        let mut newly_selected = Vec::new();
        let mut newly_deselected = Vec::new();

        if clear && !self.selected.is_empty() {
            newly_deselected = std::mem::take(&mut self.selected);
            self.selected_ids.clear();
        }

        let was_selected: HashSet<CellRef> = newly_deselected.iter().copied().collect();
        for cell in cells {
            if self.selected_ids.insert(cell) {
                self.selected.push(cell);
                if !was_selected.contains(&cell) {
                    newly_selected.push(cell);
                }
            }
        }

        // Enforce single selection mode
        if self.mode == SelectionMode::Single && self.selected.len() > 1 {
            let keep = self.selected.len() - 1;
            for removed in self.selected.drain(..keep) {
                self.selected_ids.remove(&removed);
                newly_selected.retain(|&c| c != removed);
                newly_deselected.push(removed);
            }
        }

        // Items that were cleared but then re-selected did not change.
        newly_deselected.retain(|c| !self.selected_ids.contains(c));

        if !newly_selected.is_empty() || !newly_deselected.is_empty() {
            self.selection_changed.emit(SelectionChange {
                added: newly_selected,
                removed: newly_deselected,
            });
        }
    }
}

impl std::fmt::Debug for SelectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionModel")
            .field("mode", &self.mode)
            .field("cell_selection_enabled", &self.cell_selection_enabled)
            .field("selected", &self.selected)
            .finish()
    }
}

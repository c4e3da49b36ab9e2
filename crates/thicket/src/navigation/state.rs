//! The interaction state a navigation command operates on.

use std::collections::{HashMap, HashSet};

use thicket_core::logging::targets;

use crate::model::{
    AnchorTracker, ColumnId, FocusModel, NodeId, Position, RowMapping, SelectionMode,
    SelectionModel, TreeChange,
};

/// Selection, focus and anchor, kept as three independent models.
///
/// The methods here coordinate the three for the operations that touch more
/// than one of them. Everything else goes through the public fields.
#[derive(Debug, Default)]
pub struct NavState {
    /// Selected rows or cells.
    pub selection: SelectionModel,
    /// The focused row or cell.
    pub focus: FocusModel,
    /// Pivot for range selection.
    pub anchor: AnchorTracker,
}

impl NavState {
    /// Create an empty state.
    pub fn new(mode: SelectionMode, cell_selection: bool) -> Self {
        let mut selection = SelectionModel::new(mode);
        selection.set_cell_selection_enabled(cell_selection);
        Self {
            selection,
            focus: FocusModel::new(),
            anchor: AnchorTracker::new(),
        }
    }

    /// Whether selection works on cells rather than rows.
    pub fn cell_mode(&self) -> bool {
        self.selection.cell_selection_enabled()
    }

    /// Drop the column of a position when selection works on whole rows.
    pub fn normalize(&self, position: Position) -> Position {
        if self.cell_mode() {
            position
        } else {
            Position::row(position.row)
        }
    }

    /// Clear the selection, select `position`, and move focus and anchor
    /// there. Ignored when `position` does not address a visible row or a
    /// displayed column.
    pub fn clear_and_select<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        let position = self.normalize(position);
        if !addressable(map, position) {
            return;
        }
        self.selection.clear_and_select(map, position);
        self.focus.focus(map, position);
        self.anchor.set_anchor(map, position);
    }

    /// Add `position` to the selection and move focus and anchor there.
    pub fn select<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        let position = self.normalize(position);
        if !addressable(map, position) {
            return;
        }
        self.selection.select(map, position);
        self.focus.focus(map, position);
        self.anchor.set_anchor(map, position);
    }

    /// Replace the selection with the range `from..=to`, anchor at `from`
    /// and focus `to`. Multiple mode only.
    pub fn select_range<M>(&mut self, map: &M, from: Position, to: Position)
    where
        M: RowMapping + ?Sized,
    {
        let (from, to) = (self.normalize(from), self.normalize(to));
        if self.selection.mode() == SelectionMode::Single
            || !addressable(map, from)
            || !addressable(map, to)
        {
            return;
        }
        self.selection.select_range(map, from, to);
        self.anchor.set_anchor(map, from);
        self.focus.focus(map, to);
    }

    /// Switch selection granularity, moving focus and anchor onto (or off)
    /// the first column.
    pub fn set_cell_selection_enabled<M>(&mut self, map: &M, enabled: bool)
    where
        M: RowMapping + ?Sized,
    {
        if self.cell_mode() == enabled {
            return;
        }
        self.selection.set_cell_selection_enabled(enabled);
        let column = if enabled {
            map.columns().first().copied()
        } else {
            None
        };
        if let Some(cell) = self.focus.focused_cell() {
            self.focus.set_cell(Some(cell.with_column(column)));
        }
        if let Some(cell) = self.anchor.anchor_cell() {
            self.anchor.set_cell(Some(cell.with_column(column)));
        }
    }

    // =========================================================================
    // Structural re-validation
    // =========================================================================

    /// Bring the models back in line with the tree after `changes`.
    ///
    /// Removed nodes leave the selection. A removed focus or anchor moves to
    /// the removed subtree's parent, or to a neighbouring sibling when the
    /// parent is not shown. A focus hidden by a collapse moves to its nearest
    /// visible ancestor. Hidden selection entries stay selected.
    ///
    /// `changes` may hold several removals from one edit. A parent that was
    /// itself removed later in the batch is resolved through its own former
    /// parent.
    pub fn revalidate<M>(&mut self, map: &M, changes: &[TreeChange])
    where
        M: RowMapping + ?Sized,
    {
        let had_focus = self.focus.focused_cell();
        let had_anchor = self.anchor.anchor_cell();
        let former_slots: HashMap<NodeId, (NodeId, usize)> = changes
            .iter()
            .filter_map(|change| match change {
                TreeChange::Removed {
                    node,
                    parent,
                    index,
                    ..
                } => Some((*node, (*parent, *index))),
                _ => None,
            })
            .collect();

        for change in changes {
            match change {
                TreeChange::Removed {
                    parent,
                    index,
                    removed,
                    ..
                } => {
                    let gone: HashSet<NodeId> = removed.iter().copied().collect();
                    self.selection.retain(|cell| !gone.contains(&cell.node));

                    let (parent, index) = surviving_slot(&former_slots, *parent, *index);
                    let replacement = replacement_for_removed(map, parent, index);
                    if let Some(cell) = self.focus.focused_cell()
                        && gone.contains(&cell.node)
                    {
                        self.focus
                            .set_cell(replacement.map(|node| cell.with_node(node)));
                    }
                    if let Some(cell) = self.anchor.anchor_cell()
                        && gone.contains(&cell.node)
                    {
                        self.anchor
                            .set_cell(replacement.map(|node| cell.with_node(node)));
                    }
                }
                TreeChange::ExpandedChanged {
                    expanded: false, ..
                } => self.pull_focus_into_view(map),
                TreeChange::ExpandedChanged { expanded: true, .. }
                | TreeChange::Inserted { .. } => {}
            }
        }

        if map.visible_count() == 0 {
            self.focus.clear();
        } else {
            let first = map.node_at(0);
            if let (Some(cell), None) = (had_focus, self.focus.focused_cell()) {
                self.focus.set_cell(first.map(|node| cell.with_node(node)));
            }
            if let (Some(cell), None) = (had_anchor, self.anchor.anchor_cell()) {
                self.anchor.set_cell(first.map(|node| cell.with_node(node)));
            }
            self.pull_focus_into_view(map);
        }
        tracing::debug!(
            target: targets::VIEW,
            changes = changes.len(),
            focus = ?self.focus.focused_cell(),
            selected = self.selection.selected_count(),
            "revalidated after tree change"
        );
    }

    /// Forget every entry that refers to `column` after it was removed.
    pub fn purge_column<M>(&mut self, map: &M, column: ColumnId)
    where
        M: RowMapping + ?Sized,
    {
        self.selection.retain(|cell| cell.column != Some(column));
        let fallback = if self.cell_mode() {
            map.columns().first().copied()
        } else {
            None
        };
        if let Some(cell) = self.focus.focused_cell()
            && cell.column == Some(column)
        {
            self.focus.set_cell(Some(cell.with_column(fallback)));
        }
        if let Some(cell) = self.anchor.anchor_cell()
            && cell.column == Some(column)
        {
            self.anchor.set_cell(Some(cell.with_column(fallback)));
        }
    }

    fn pull_focus_into_view<M>(&mut self, map: &M)
    where
        M: RowMapping + ?Sized,
    {
        let Some(cell) = self.focus.focused_cell() else {
            return;
        };
        if map.row_of(cell.node).is_some() {
            return;
        }
        match map.nearest_visible(cell.node) {
            Some(node) => self.focus.set_cell(Some(cell.with_node(node))),
            None => {
                tracing::trace!(target: targets::VIEW, ?cell, "focus has no visible ancestor");
                let first = map.node_at(0).map(|node| cell.with_node(node));
                self.focus.set_cell(first);
            }
        }
    }
}

/// Whether `position` names a visible row and, if any, a displayed column.
fn addressable<M>(map: &M, position: Position) -> bool
where
    M: RowMapping + ?Sized,
{
    position.row < map.visible_count()
        && position
            .column
            .is_none_or(|column| map.column_index(column).is_some())
}

/// Climb from `parent` past nodes removed in the same batch to the slot
/// that still exists.
fn surviving_slot(
    former_slots: &HashMap<NodeId, (NodeId, usize)>,
    mut parent: NodeId,
    mut index: usize,
) -> (NodeId, usize) {
    for _ in 0..former_slots.len() {
        match former_slots.get(&parent) {
            Some(&slot) => (parent, index) = slot,
            None => break,
        }
    }
    (parent, index)
}

/// Where focus goes when the subtree at `parent[index]` disappears.
fn replacement_for_removed<M>(map: &M, parent: NodeId, index: usize) -> Option<NodeId>
where
    M: RowMapping + ?Sized,
{
    if map.row_of(parent).is_some() {
        return Some(parent);
    }
    // The parent is not shown (a hidden root): prefer the sibling that took
    // the removed node's place, then the one before it.
    map.child_at(parent, index)
        .or_else(|| index.checked_sub(1).and_then(|i| map.child_at(parent, i)))
        .or_else(|| map.nearest_visible(parent))
}

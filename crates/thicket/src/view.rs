//! The view host.
//!
//! [`TreeGridView`] owns a tree, its visible-row mapping, the displayed
//! columns and the navigation state, and wires them together: key presses
//! go through the normalizer and keymap into the controller, tree effects
//! are applied to the arena, and every structural change is followed by a
//! re-validation of selection, focus and anchor.
//!
//! # Example
//!
//! ```
//! use thicket::prelude::*;
//!
//! let mut tree = TreeArena::new("root");
//! let root = tree.root();
//! for name in ["a", "b", "c"] {
//!     tree.add_child(root, name).unwrap();
//! }
//! tree.set_expanded(root, true).unwrap();
//!
//! let mut view = TreeGridView::new(tree);
//! view.clear_and_select(Position::row(0));
//!
//! let shift_down = KeyPressEvent::new(Key::ArrowDown, KeyboardModifiers::SHIFT);
//! assert!(view.handle_key(&shift_down));
//! assert!(view.handle_key(&shift_down));
//! assert_eq!(view.selected_rows(), vec![0, 1, 2]);
//! ```

use std::path::Path;

use static_assertions::assert_impl_all;
use thicket_core::logging::{span_names, targets};
use thicket_core::{PerfSpan, Signal, thicket_warn};

use crate::config::NavigationConfig;
use crate::error::{ConfigError, Result, TreeError};
use crate::model::{
    CellRef, Column, ColumnId, Columns, NodeId, Position, RowMapping, SelectionChange,
    SelectionMode, TreeArena, ViewContext, VisibleRow, VisibleRows,
};
use crate::navigation::{
    self, KeyChord, KeyNormalizer, KeyPressEvent, Keymap, NavCommand, NavState, ShortcutModifier,
    TreeEffect,
};

/// A keyboard-driven tree (or tree-table) view.
///
/// # Signals
///
/// - `expanded(NodeId)`: Emitted when a node is expanded by the view
/// - `collapsed(NodeId)`: Emitted when a node is collapsed by the view
///
/// Selection and focus changes are reported by the signals on the
/// underlying models, see [`selection_changed`](Self::selection_changed) and
/// [`focus_changed`](Self::focus_changed).
pub struct TreeGridView<T> {
    tree: TreeArena<T>,
    rows: VisibleRows,
    columns: Columns,
    state: NavState,
    config: NavigationConfig,
    normalizer: KeyNormalizer,
    keymap: Keymap,

    /// Emitted when a node is expanded.
    pub expanded: Signal<NodeId>,
    /// Emitted when a node is collapsed.
    pub collapsed: Signal<NodeId>,
}

assert_impl_all!(TreeGridView<String>: Send, Sync);

impl<T> TreeGridView<T> {
    /// Creates a view over `tree` with the default configuration.
    pub fn new(tree: TreeArena<T>) -> Self {
        Self::build(tree, NavigationConfig::default())
    }

    /// Creates a view with an explicit configuration.
    pub fn with_config(
        tree: TreeArena<T>,
        config: NavigationConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(tree, config))
    }

    /// Creates a view with settings read from a TOML file.
    pub fn from_config_file(tree: TreeArena<T>, path: impl AsRef<Path>) -> Result<Self> {
        let config = NavigationConfig::load(path)?;
        Ok(Self::build(tree, config))
    }

    fn build(mut tree: TreeArena<T>, config: NavigationConfig) -> Self {
        tree.set_change_journal(true);
        Self {
            tree,
            rows: VisibleRows::new(config.show_root),
            columns: Columns::new(),
            state: NavState::new(config.selection_mode, config.cell_selection),
            normalizer: KeyNormalizer::new(config.shortcut),
            keymap: Keymap::default(),
            config,
            expanded: Signal::new(),
            collapsed: Signal::new(),
        }
    }

    /// Gives the tree back, dropping the view state.
    pub fn into_tree(self) -> TreeArena<T> {
        let mut tree = self.tree;
        tree.set_change_journal(false);
        tree
    }

    /// The visible structure as a [`RowMapping`].
    pub fn context(&self) -> ViewContext<'_, T> {
        ViewContext::new(&self.tree, &self.rows, &self.columns)
    }

    fn split(&mut self) -> (ViewContext<'_, T>, &mut NavState) {
        (
            ViewContext::new(&self.tree, &self.rows, &self.columns),
            &mut self.state,
        )
    }

    // =========================================================================
    // Keyboard Input
    // =========================================================================

    /// Handle a raw key press. Returns whether the key was bound.
    pub fn handle_key(&mut self, event: &KeyPressEvent) -> bool {
        let chord = self.normalizer.normalize(event);
        self.handle_chord(chord)
    }

    /// Handle an already normalized chord. Returns whether it was bound.
    pub fn handle_chord(&mut self, chord: KeyChord) -> bool {
        match self.keymap.lookup(chord) {
            Some(command) => {
                self.dispatch(command);
                true
            }
            None => {
                tracing::trace!(target: targets::NAVIGATION, %chord, "unbound chord ignored");
                false
            }
        }
    }

    /// Run a navigation command and apply the tree effects it produces.
    pub fn dispatch(&mut self, command: NavCommand) {
        let _perf = PerfSpan::new(span_names::NAVIGATION);
        let config = &self.config;
        let effects = {
            let ctx = ViewContext::new(&self.tree, &self.rows, &self.columns);
            navigation::apply(&mut self.state, &ctx, command, config)
        };
        for effect in effects {
            self.apply_effect(effect);
        }
        self.sync_with_tree();
    }

    fn apply_effect(&mut self, effect: TreeEffect) {
        match effect {
            TreeEffect::SetExpanded { node, expanded } => {
                match self.tree.set_expanded(node, expanded) {
                    Ok(true) if expanded => self.expanded.emit(node),
                    Ok(true) => self.collapsed.emit(node),
                    Ok(false) => {}
                    Err(err) => thicket_warn!(%err, "dropping tree effect"),
                }
            }
            TreeEffect::ExpandAll { node } => match self.tree.expand_all(node) {
                Ok(count) => {
                    tracing::debug!(target: targets::VIEW, ?node, count, "expanded subtree");
                    if count > 0 {
                        self.expanded.emit(node);
                    }
                }
                Err(err) => thicket_warn!(%err, "dropping tree effect"),
            },
        }
    }

    /// Re-validate the interaction state against changes recorded since the
    /// last call.
    fn sync_with_tree(&mut self) {
        let changes = self.tree.take_changes();
        if changes.is_empty() {
            return;
        }
        let (ctx, state) = self.split();
        state.revalidate(&ctx, &changes);
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// The tree.
    pub fn tree(&self) -> &TreeArena<T> {
        &self.tree
    }

    /// Edit the tree. Selection, focus and anchor are re-validated afterwards.
    pub fn edit_tree<R>(&mut self, edit: impl FnOnce(&mut TreeArena<T>) -> R) -> R {
        let result = edit(&mut self.tree);
        self.sync_with_tree();
        result
    }

    /// Expand or collapse `node`, emitting `expanded` or `collapsed`.
    pub fn set_expanded(
        &mut self,
        node: NodeId,
        expanded: bool,
    ) -> std::result::Result<bool, TreeError> {
        let changed = self.tree.set_expanded(node, expanded)?;
        if changed {
            if expanded {
                self.expanded.emit(node);
            } else {
                self.collapsed.emit(node);
            }
            self.sync_with_tree();
        }
        Ok(changed)
    }

    /// Show or hide the root row.
    pub fn set_show_root(&mut self, show_root: bool) {
        if self.rows.show_root() == show_root {
            return;
        }
        self.config.show_root = show_root;
        self.rows.set_show_root(show_root);
        let (ctx, state) = self.split();
        state.revalidate(&ctx, &[]);
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Displayed columns.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Append a column.
    pub fn add_column(&mut self, title: impl Into<String>) -> ColumnId {
        self.columns.push(title)
    }

    /// Insert a column at `index` (clamped).
    pub fn insert_column(&mut self, index: usize, title: impl Into<String>) -> ColumnId {
        self.columns.insert(index, title)
    }

    /// Remove a column, forgetting every selected cell in it.
    pub fn remove_column(&mut self, id: ColumnId) -> Option<Column> {
        let column = self.columns.remove(id)?;
        let (ctx, state) = self.split();
        state.purge_column(&ctx, id);
        Some(column)
    }

    /// Move a column to display index `index`.
    pub fn move_column(&mut self, id: ColumnId, index: usize) -> bool {
        self.columns.move_to(id, index)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The active settings.
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Replace the page size used by PageUp and PageDown.
    pub fn set_page_size(&mut self, page_size: usize) -> std::result::Result<(), ConfigError> {
        let config = self.config.clone().with_page_size(page_size);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Change which physical key acts as the shortcut modifier.
    pub fn set_shortcut(&mut self, shortcut: ShortcutModifier) {
        self.config.shortcut = shortcut;
        self.normalizer = KeyNormalizer::new(shortcut);
    }

    /// The key bindings.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Mutable access to the key bindings.
    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    /// The selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.state.selection.mode()
    }

    /// Change the selection mode.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        self.state.selection.set_mode(mode);
    }

    /// Whether selection works on cells.
    pub fn cell_selection_enabled(&self) -> bool {
        self.state.cell_mode()
    }

    /// Switch between row and cell selection. Clears the selection.
    pub fn set_cell_selection_enabled(&mut self, enabled: bool) {
        self.config.cell_selection = enabled;
        let (ctx, state) = self.split();
        state.set_cell_selection_enabled(&ctx, enabled);
    }

    // =========================================================================
    // Selection, Focus and Anchor
    // =========================================================================

    /// The interaction state.
    pub fn state(&self) -> &NavState {
        &self.state
    }

    /// Add `position` to the selection, moving focus and anchor there.
    pub fn select(&mut self, position: Position) {
        let (ctx, state) = self.split();
        state.select(&ctx, position);
    }

    /// Make `position` the only selected entry, moving focus and anchor there.
    pub fn clear_and_select(&mut self, position: Position) {
        let (ctx, state) = self.split();
        state.clear_and_select(&ctx, position);
    }

    /// Replace the selection with a range; anchor at `from`, focus at `to`.
    pub fn select_range(&mut self, from: Position, to: Position) {
        let (ctx, state) = self.split();
        state.select_range(&ctx, from, to);
    }

    /// Select every visible row (or cell).
    pub fn select_all(&mut self) {
        let (ctx, state) = self.split();
        state.selection.select_all(&ctx);
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.state.selection.clear_selection();
    }

    /// Flip membership of `position`.
    pub fn toggle(&mut self, position: Position) {
        let position = self.state.normalize(position);
        let (ctx, state) = self.split();
        state.selection.toggle(&ctx, position);
    }

    /// Remove `position` from the selection.
    pub fn deselect(&mut self, position: Position) {
        let position = self.state.normalize(position);
        let (ctx, state) = self.split();
        state.selection.deselect(&ctx, position);
    }

    /// Move the focus without touching the selection.
    pub fn focus(&mut self, position: Position) {
        let position = self.state.normalize(position);
        let (ctx, state) = self.split();
        state.focus.focus(&ctx, position);
    }

    /// Set the anchor.
    pub fn set_anchor(&mut self, position: Position) {
        let position = self.state.normalize(position);
        let (ctx, state) = self.split();
        state.anchor.set_anchor(&ctx, position);
    }

    /// Unset the anchor.
    pub fn clear_anchor(&mut self) {
        self.state.anchor.clear_anchor();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of visible rows.
    pub fn visible_count(&self) -> usize {
        self.context().visible_count()
    }

    /// Snapshot of every visible row.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.rows.rows(&self.tree)
    }

    /// The node on `row`.
    pub fn node_at(&self, row: usize) -> Option<NodeId> {
        self.context().node_at(row)
    }

    /// The visible row of `node`.
    pub fn row_of(&self, node: NodeId) -> Option<usize> {
        self.context().row_of(node)
    }

    /// Whether `row` (and `column` in cell mode) is selected.
    pub fn is_selected(&self, row: usize, column: Option<ColumnId>) -> bool {
        self.state.selection.is_selected(&self.context(), row, column)
    }

    /// Whether `row` (and `column`, when given) holds the focus.
    pub fn is_focused(&self, row: usize, column: Option<ColumnId>) -> bool {
        self.state.focus.is_focused(&self.context(), row, column)
    }

    /// The focused position.
    pub fn focused_position(&self) -> Option<Position> {
        self.state.focus.focused_position(&self.context())
    }

    /// The anchor position.
    pub fn anchor(&self) -> Option<Position> {
        self.state.anchor.anchor(&self.context())
    }

    /// Visible selected positions in selection order.
    pub fn selected_positions(&self) -> Vec<Position> {
        self.state.selection.selected_positions(&self.context())
    }

    /// Visible rows holding at least one selected entry.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.state.selection.selected_rows(&self.context())
    }

    /// Selected cells, including ones hidden under collapsed ancestors.
    pub fn selected_cells(&self) -> &[CellRef] {
        self.state.selection.selected_cells()
    }

    /// Emitted with the added and removed cells when the selection changes.
    pub fn selection_changed(&self) -> &Signal<SelectionChange> {
        &self.state.selection.selection_changed
    }

    /// Emitted with `(new, old)` when the focus changes.
    pub fn focus_changed(&self) -> &Signal<(Option<CellRef>, Option<CellRef>)> {
        &self.state.focus.focus_changed
    }
}

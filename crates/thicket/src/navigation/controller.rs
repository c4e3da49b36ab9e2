//! The navigation state machine.
//!
//! [`apply`] interprets one [`NavCommand`] against a [`NavState`] and the
//! current visible structure. It changes selection, focus and anchor
//! directly but never touches the tree: expanding and collapsing are
//! returned as [`TreeEffect`]s for the caller to carry out.

use thicket_core::logging::targets;

use super::keymap::{Gesture, Motion, NavCommand};
use super::state::NavState;
use crate::config::{ExpandScope, LeafRightArrow, NavigationConfig};
use crate::model::{NodeId, Position, RowMapping, SelectionMode};

/// A tree change requested by a navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEffect {
    /// Expand or collapse one node.
    SetExpanded {
        /// The node.
        node: NodeId,
        /// New expanded state.
        expanded: bool,
    },
    /// Expand `node` and every branch below it.
    ExpandAll {
        /// Top of the subtree.
        node: NodeId,
    },
}

/// Interpret `command`, updating `state` in place.
///
/// Returns the tree changes the command asks for, in order.
#[tracing::instrument(skip_all, target = "thicket::navigation", level = "trace", fields(command = ?command))]
pub fn apply<M>(
    state: &mut NavState,
    map: &M,
    command: NavCommand,
    config: &NavigationConfig,
) -> Vec<TreeEffect>
where
    M: RowMapping + ?Sized,
{
    let mut effects = Vec::new();
    match command {
        NavCommand::Navigate { motion, gesture } => {
            navigate(state, map, motion, gesture, config, &mut effects);
        }
        NavCommand::ToggleFocused => {
            if let Some(focus) = current_focus(state, map) {
                state.selection.toggle(map, focus);
                state.anchor.set_anchor(map, focus);
            }
        }
        NavCommand::SelectToFocus => {
            if let Some(focus) = current_focus(state, map) {
                if state.selection.mode() == SelectionMode::Single {
                    state.selection.select(map, focus);
                } else {
                    let anchor = anchor_or(state, map, focus);
                    state.selection.select_range(map, anchor, focus);
                }
            }
        }
        NavCommand::SelectAll => state.selection.select_all(map),
        NavCommand::ExpandAll => {
            let node = match config.asterisk_scope {
                ExpandScope::Root => Some(map.root()),
                ExpandScope::Focused => focused_node(state, map),
            };
            if let Some(node) = node {
                effects.push(TreeEffect::ExpandAll { node });
            }
        }
        NavCommand::ExpandFocused => set_focused_expanded(state, map, true, &mut effects),
        NavCommand::CollapseFocused => set_focused_expanded(state, map, false, &mut effects),
    }

    tracing::trace!(
        target: targets::NAVIGATION,
        focus = ?state.focus.focused_position(map),
        anchor = ?state.anchor.anchor(map),
        selected = state.selection.selected_count(),
        effects = effects.len(),
        "command applied"
    );
    effects
}

/// By-value form of [`apply`].
pub fn transition<M>(
    mut state: NavState,
    map: &M,
    command: NavCommand,
    config: &NavigationConfig,
) -> (NavState, Vec<TreeEffect>)
where
    M: RowMapping + ?Sized,
{
    let effects = apply(&mut state, map, command, config);
    (state, effects)
}

// =========================================================================
// Motions
// =========================================================================

fn navigate<M>(
    state: &mut NavState,
    map: &M,
    motion: Motion,
    gesture: Gesture,
    config: &NavigationConfig,
    effects: &mut Vec<TreeEffect>,
) where
    M: RowMapping + ?Sized,
{
    if map.visible_count() == 0 {
        return;
    }

    let Some(base) = current_focus(state, map) else {
        // Nothing focused yet: every motion lands on the first position.
        let start = effective(state, map, Position::row(0));
        apply_gesture(state, map, gesture, start, start);
        return;
    };

    if !state.cell_mode() && matches!(motion, Motion::Left | Motion::Right) {
        if gesture == Gesture::Select {
            tree_motion(state, map, motion, base, config, effects);
        }
        return;
    }

    let target = target_position(map, base, motion, config.page_size);
    if motion.is_step() && target == base {
        return;
    }
    apply_gesture(state, map, gesture, base, target);
}

fn apply_gesture<M>(
    state: &mut NavState,
    map: &M,
    gesture: Gesture,
    base: Position,
    target: Position,
) where
    M: RowMapping + ?Sized,
{
    match gesture {
        Gesture::Select => state.clear_and_select(map, target),
        Gesture::FocusOnly => state.focus.focus(map, target),
        Gesture::ExtendReplace | Gesture::ExtendAdd => {
            if state.selection.mode() == SelectionMode::Single {
                state.select(map, target);
                return;
            }
            let anchor = anchor_or(state, map, base);
            state.focus.focus(map, target);
            if gesture == Gesture::ExtendReplace {
                state.selection.select_range(map, anchor, target);
            } else {
                state.selection.extend_range(map, anchor, target);
            }
        }
    }
}

/// Where `motion` takes the focus from `base`, clamped to the bounds.
fn target_position<M>(map: &M, base: Position, motion: Motion, page_size: usize) -> Position
where
    M: RowMapping + ?Sized,
{
    let last = map.visible_count().saturating_sub(1);
    let row = match motion {
        Motion::Up => base.row.saturating_sub(1),
        Motion::Down => base.row.saturating_add(1).min(last),
        Motion::PageUp => base.row.saturating_sub(page_size),
        Motion::PageDown => base.row.saturating_add(page_size).min(last),
        Motion::Home => 0,
        Motion::End => last,
        Motion::Left | Motion::Right => base.row,
    };

    let column = match motion {
        Motion::Left | Motion::Right => {
            let columns = map.columns();
            let current = base.column.and_then(|c| map.column_index(c)).unwrap_or(0);
            let index = if motion == Motion::Left {
                current.saturating_sub(1)
            } else {
                current.saturating_add(1).min(columns.len().saturating_sub(1))
            };
            columns.get(index).copied().or(base.column)
        }
        _ => base.column,
    };
    Position { row, column }
}

/// Left and Right in row mode walk the tree instead of moving a column.
fn tree_motion<M>(
    state: &mut NavState,
    map: &M,
    motion: Motion,
    base: Position,
    config: &NavigationConfig,
    effects: &mut Vec<TreeEffect>,
) where
    M: RowMapping + ?Sized,
{
    let Some(node) = map.node_at(base.row) else {
        return;
    };
    let branch = !map.is_leaf(node);
    let expanded = map.is_expanded(node);

    if motion == Motion::Right {
        if branch && !expanded {
            effects.push(TreeEffect::SetExpanded {
                node,
                expanded: true,
            });
            return;
        }
        if !branch && config.leaf_right_arrow == LeafRightArrow::Ignore {
            return;
        }
        let next = base.row + 1;
        if next < map.visible_count() {
            state.clear_and_select(map, Position::row(next));
        }
        return;
    }

    if branch && expanded {
        effects.push(TreeEffect::SetExpanded {
            node,
            expanded: false,
        });
        return;
    }
    match map.parent_of(node).and_then(|parent| map.row_of(parent)) {
        Some(row) => state.clear_and_select(map, Position::row(row)),
        None => tracing::trace!(target: targets::NAVIGATION, ?node, "no parent row to ascend to"),
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn set_focused_expanded<M>(state: &NavState, map: &M, expanded: bool, effects: &mut Vec<TreeEffect>)
where
    M: RowMapping + ?Sized,
{
    if let Some(node) = focused_node(state, map)
        && !map.is_leaf(node)
        && map.is_expanded(node) != expanded
    {
        effects.push(TreeEffect::SetExpanded { node, expanded });
    }
}

fn focused_node<M>(state: &NavState, map: &M) -> Option<NodeId>
where
    M: RowMapping + ?Sized,
{
    state
        .focus
        .focused_position(map)
        .and_then(|position| map.node_at(position.row))
}

fn current_focus<M>(state: &NavState, map: &M) -> Option<Position>
where
    M: RowMapping + ?Sized,
{
    state
        .focus
        .focused_position(map)
        .map(|position| effective(state, map, position))
}

/// The anchor, or `fallback` after making it the anchor.
fn anchor_or<M>(state: &mut NavState, map: &M, fallback: Position) -> Position
where
    M: RowMapping + ?Sized,
{
    match state.anchor.anchor(map) {
        Some(anchor) => effective(state, map, anchor),
        None => {
            state.anchor.set_anchor(map, fallback);
            fallback
        }
    }
}

/// Fit a position to the selection granularity. Cell mode treats a missing
/// column as the first one.
fn effective<M>(state: &NavState, map: &M, position: Position) -> Position
where
    M: RowMapping + ?Sized,
{
    if state.cell_mode() {
        Position {
            row: position.row,
            column: position.column.or_else(|| map.columns().first().copied()),
        }
    } else {
        Position::row(position.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Columns, TreeArena, ViewContext, VisibleRows};

    /// root, a (with a1, a2), b, c; every branch expanded. Rows:
    /// 0 root, 1 a, 2 a1, 3 a2, 4 b, 5 c.
    fn fixture() -> (TreeArena<&'static str>, Vec<NodeId>) {
        let mut tree = TreeArena::new("root");
        let root = tree.root();
        let a = tree.add_child(root, "a").unwrap();
        let a1 = tree.add_child(a, "a1").unwrap();
        let a2 = tree.add_child(a, "a2").unwrap();
        let b = tree.add_child(root, "b").unwrap();
        let c = tree.add_child(root, "c").unwrap();
        tree.set_expanded(root, true).unwrap();
        tree.set_expanded(a, true).unwrap();
        (tree, vec![root, a, a1, a2, b, c])
    }

    fn nav(motion: Motion, gesture: Gesture) -> NavCommand {
        NavCommand::Navigate { motion, gesture }
    }

    fn rows(state: &NavState, ctx: &ViewContext<'_, &str>) -> Vec<usize> {
        state.selection.selected_rows(ctx)
    }

    #[test]
    fn test_plain_down_moves_selection_and_anchor() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(0));

        let effects = apply(&mut state, &ctx, nav(Motion::Down, Gesture::Select), &config);
        assert!(effects.is_empty());
        assert_eq!(rows(&state, &ctx), vec![1]);
        assert_eq!(state.focus.focused_position(&ctx), Some(Position::row(1)));
        assert_eq!(state.anchor.anchor(&ctx), Some(Position::row(1)));
    }

    #[test]
    fn test_step_at_boundary_is_noop() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(0));
        state.selection.select(&ctx, Position::row(4));

        apply(&mut state, &ctx, nav(Motion::Up, Gesture::Select), &config);
        assert_eq!(rows(&state, &ctx), vec![0, 4]);

        apply(&mut state, &ctx, nav(Motion::End, Gesture::Select), &config);
        apply(&mut state, &ctx, nav(Motion::Down, Gesture::Select), &config);
        assert_eq!(rows(&state, &ctx), vec![5]);
        assert_eq!(state.focus.focused_position(&ctx), Some(Position::row(5)));
    }

    #[test]
    fn test_no_focus_lands_on_first_row() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let mut state = NavState::new(SelectionMode::Multiple, false);

        apply(&mut state, &ctx, nav(Motion::End, Gesture::Select), &NavigationConfig::default());
        assert_eq!(rows(&state, &ctx), vec![0]);
        assert_eq!(state.focus.focused_position(&ctx), Some(Position::row(0)));
    }

    #[test]
    fn test_page_motions_clamp() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default().with_page_size(4);
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(1));

        apply(&mut state, &ctx, nav(Motion::PageDown, Gesture::Select), &config);
        assert_eq!(rows(&state, &ctx), vec![5]);
        apply(&mut state, &ctx, nav(Motion::PageUp, Gesture::ExtendReplace), &config);
        assert_eq!(rows(&state, &ctx), vec![1, 2, 3, 4, 5]);
        apply(&mut state, &ctx, nav(Motion::PageUp, Gesture::ExtendReplace), &config);
        assert_eq!(rows(&state, &ctx), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_right_expands_then_advances() {
        let (mut tree, ids) = fixture();
        tree.set_expanded(ids[1], false).unwrap();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(1));

        let effects = apply(&mut state, &ctx, nav(Motion::Right, Gesture::Select), &config);
        assert_eq!(
            effects,
            vec![TreeEffect::SetExpanded {
                node: ids[1],
                expanded: true
            }]
        );
        assert_eq!(rows(&state, &ctx), vec![1]);
    }

    #[test]
    fn test_right_on_leaf_follows_config() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(2));

        let ignore = NavigationConfig::default().with_leaf_right_arrow(LeafRightArrow::Ignore);
        apply(&mut state, &ctx, nav(Motion::Right, Gesture::Select), &ignore);
        assert_eq!(rows(&state, &ctx), vec![2]);

        apply(&mut state, &ctx, nav(Motion::Right, Gesture::Select), &NavigationConfig::default());
        assert_eq!(rows(&state, &ctx), vec![3]);
    }

    #[test]
    fn test_left_collapses_then_ascends() {
        let (tree, ids) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(3));

        let effects = apply(&mut state, &ctx, nav(Motion::Left, Gesture::Select), &config);
        assert!(effects.is_empty());
        assert_eq!(rows(&state, &ctx), vec![1]);

        let effects = apply(&mut state, &ctx, nav(Motion::Left, Gesture::Select), &config);
        assert_eq!(
            effects,
            vec![TreeEffect::SetExpanded {
                node: ids[1],
                expanded: false
            }]
        );
    }

    #[test]
    fn test_modified_left_right_in_row_mode_are_noops() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(3));

        for gesture in [Gesture::FocusOnly, Gesture::ExtendReplace, Gesture::ExtendAdd] {
            assert!(apply(&mut state, &ctx, nav(Motion::Left, gesture), &config).is_empty());
            assert!(apply(&mut state, &ctx, nav(Motion::Right, gesture), &config).is_empty());
        }
        assert_eq!(rows(&state, &ctx), vec![3]);
        assert_eq!(state.focus.focused_position(&ctx), Some(Position::row(3)));
    }

    #[test]
    fn test_toggle_and_select_to_focus() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(0));

        apply(&mut state, &ctx, nav(Motion::Down, Gesture::FocusOnly), &config);
        apply(&mut state, &ctx, nav(Motion::Down, Gesture::FocusOnly), &config);
        apply(&mut state, &ctx, NavCommand::ToggleFocused, &config);
        assert_eq!(rows(&state, &ctx), vec![0, 2]);
        assert_eq!(state.anchor.anchor(&ctx), Some(Position::row(2)));

        apply(&mut state, &ctx, nav(Motion::Down, Gesture::FocusOnly), &config);
        apply(&mut state, &ctx, nav(Motion::Down, Gesture::FocusOnly), &config);
        apply(&mut state, &ctx, NavCommand::SelectToFocus, &config);
        assert_eq!(rows(&state, &ctx), vec![2, 3, 4]);
        assert_eq!(state.focus.focused_position(&ctx), Some(Position::row(4)));
    }

    #[test]
    fn test_single_mode_extend_selects_target() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Single, false);
        state.clear_and_select(&ctx, Position::row(1));

        apply(&mut state, &ctx, nav(Motion::Down, Gesture::ExtendReplace), &config);
        assert_eq!(rows(&state, &ctx), vec![2]);
        apply(&mut state, &ctx, NavCommand::SelectAll, &config);
        assert_eq!(rows(&state, &ctx), vec![2]);
    }

    #[test]
    fn test_expand_commands() {
        let (mut tree, ids) = fixture();
        tree.set_expanded(ids[1], false).unwrap();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(1));

        let root_scope = NavigationConfig::default();
        assert_eq!(
            apply(&mut state, &ctx, NavCommand::ExpandAll, &root_scope),
            vec![TreeEffect::ExpandAll { node: ids[0] }]
        );
        let focused_scope = root_scope.with_asterisk_scope(ExpandScope::Focused);
        assert_eq!(
            apply(&mut state, &ctx, NavCommand::ExpandAll, &focused_scope),
            vec![TreeEffect::ExpandAll { node: ids[1] }]
        );
        assert_eq!(
            apply(&mut state, &ctx, NavCommand::ExpandFocused, &focused_scope),
            vec![TreeEffect::SetExpanded {
                node: ids[1],
                expanded: true
            }]
        );
        assert!(apply(&mut state, &ctx, NavCommand::CollapseFocused, &focused_scope).is_empty());
        assert_eq!(rows(&state, &ctx), vec![1]);
    }

    #[test]
    fn test_cell_mode_left_right_move_column() {
        let (tree, _) = fixture();
        let visible = VisibleRows::default();
        let mut columns = Columns::new();
        let first = columns.push("name");
        let second = columns.push("size");
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let config = NavigationConfig::default();
        let mut state = NavState::new(SelectionMode::Multiple, true);
        state.clear_and_select(&ctx, Position::cell(1, first));

        apply(&mut state, &ctx, nav(Motion::Right, Gesture::Select), &config);
        assert_eq!(state.focus.focused_position(&ctx), Some(Position::cell(1, second)));
        apply(&mut state, &ctx, nav(Motion::Right, Gesture::Select), &config);
        assert_eq!(state.focus.focused_position(&ctx), Some(Position::cell(1, second)));

        apply(&mut state, &ctx, nav(Motion::Down, Gesture::ExtendReplace), &config);
        apply(&mut state, &ctx, nav(Motion::Left, Gesture::ExtendReplace), &config);
        assert_eq!(
            state.selection.selected_positions(&ctx).len(),
            4,
            "rectangle of two rows by two columns"
        );
    }

    #[test]
    fn test_transition_by_value() {
        let (tree, _) = fixture();
        let (visible, columns) = (VisibleRows::default(), Columns::new());
        let ctx = ViewContext::new(&tree, &visible, &columns);
        let mut state = NavState::new(SelectionMode::Multiple, false);
        state.clear_and_select(&ctx, Position::row(0));

        let (state, effects) = transition(
            state,
            &ctx,
            nav(Motion::End, Gesture::ExtendReplace),
            &NavigationConfig::default(),
        );
        assert!(effects.is_empty());
        assert_eq!(rows(&state, &ctx), vec![0, 1, 2, 3, 4, 5]);
    }
}

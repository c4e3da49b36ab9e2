//! Text rendering of a view for logs and test failure messages.

use std::fmt;

use thicket_core::{TreeFormatOptions, TreeStyle};

use crate::model::{NodeId, RowMapping, TreeArena};
use crate::view::TreeGridView;

/// Renders the visible rows of a [`TreeGridView`] as an indented tree.
///
/// With markers enabled each line is annotated with `[S]` when the row holds
/// a selected entry, `[F]` on the focused row and `[A]` on the anchor row.
///
/// ```text
///   0 root [S]
///   1 ├── a
///   2 │  └── a1 [F] [A]
///   3 └── b
/// ```
#[derive(Debug, Clone, Default)]
pub struct ViewDebug {
    options: TreeFormatOptions,
}

impl ViewDebug {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Use the given branch style.
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.options.style = style;
        self
    }

    /// Render every visible row, labelling nodes with their `Display` form.
    pub fn format<T: fmt::Display>(&self, view: &TreeGridView<T>) -> String {
        self.format_with(view, |data| data.to_string())
    }

    /// Render every visible row with a custom label.
    pub fn format_with<T>(&self, view: &TreeGridView<T>, label: impl Fn(&T) -> String) -> String {
        let tree = view.tree();
        let hidden_levels = usize::from(!view.context().rows().show_root());
        let focus_row = view.focused_position().map(|p| p.row);
        let anchor_row = view.anchor().map(|p| p.row);

        let mut output = String::new();
        for (row, visible) in view.visible_rows().into_iter().enumerate() {
            let depth = visible.depth.saturating_sub(hidden_levels);
            if self.options.max_depth.is_some_and(|max| depth > max) {
                continue;
            }

            if self.options.show_rows {
                output.push_str(&format!("{row:>3} "));
            }
            let open_levels = open_levels(tree, visible.node, depth);
            output.push_str(&self.options.build_prefix(
                depth,
                is_last_child(tree, visible.node),
                &open_levels,
            ));
            match tree.data(visible.node) {
                Some(data) => output.push_str(&label(data)),
                None => output.push_str("(removed)"),
            }

            if self.options.show_markers {
                if view.is_selected(row, None) {
                    output.push_str(" [S]");
                }
                if focus_row == Some(row) {
                    output.push_str(" [F]");
                }
                if anchor_row == Some(row) {
                    output.push_str(" [A]");
                }
            }
            output.push('\n');
        }
        output
    }

    /// One-line state summary.
    pub fn summary<T>(&self, view: &TreeGridView<T>) -> String {
        let describe = |row: Option<usize>| match row {
            Some(row) => row.to_string(),
            None => "-".to_string(),
        };
        let ctx = view.context();
        format!(
            "{} rows, selected {:?} ({} hidden), focus {}, anchor {}, {:?} {}",
            ctx.visible_count(),
            view.selected_rows(),
            view.selected_cells().len() - view.selected_positions().len(),
            describe(view.focused_position().map(|p| p.row)),
            describe(view.anchor().map(|p| p.row)),
            view.selection_mode(),
            if view.cell_selection_enabled() { "cells" } else { "rows" },
        )
    }
}

fn is_last_child<T>(tree: &TreeArena<T>, node: NodeId) -> bool {
    match (tree.parent(node), tree.index_in_parent(node)) {
        (Some(parent), Some(index)) => index + 1 == tree.children(parent).len(),
        _ => true,
    }
}

/// Whether each displayed ancestor level still has siblings further down.
fn open_levels<T>(tree: &TreeArena<T>, node: NodeId, depth: usize) -> Vec<bool> {
    let ancestors: Vec<NodeId> = tree.ancestors(node).collect();
    (1..depth)
        .map(|level| {
            ancestors
                .get(depth - level - 1)
                .is_some_and(|&ancestor| !is_last_child(tree, ancestor))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn view() -> TreeGridView<&'static str> {
        let mut tree = TreeArena::new("root");
        let root = tree.root();
        let a = tree.add_child(root, "a").unwrap();
        tree.add_child(a, "a1").unwrap();
        tree.add_child(root, "b").unwrap();
        tree.set_expanded(root, true).unwrap();
        tree.set_expanded(a, true).unwrap();
        TreeGridView::new(tree)
    }

    #[test]
    fn test_ascii_rendering_with_markers() {
        let mut view = view();
        view.clear_and_select(Position::row(0));
        view.focus(Position::row(2));

        let text = ViewDebug::new().with_style(TreeStyle::Ascii).format(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  0 root [S] [A]");
        assert_eq!(lines[1], "  1 +-- a");
        assert_eq!(lines[2], "  2 |  `-- a1 [F]");
        assert_eq!(lines[3], "  3 `-- b");
    }

    #[test]
    fn test_minimal_rendering() {
        let view = view();
        let text = ViewDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Compact,
            ..TreeFormatOptions::minimal()
        })
        .format(&view);
        assert_eq!(text, "root\n- a\n - a1\n- b\n");
    }

    #[test]
    fn test_max_depth() {
        let view = view();
        let options = TreeFormatOptions {
            max_depth: Some(1),
            ..TreeFormatOptions::minimal()
        };
        let text = ViewDebug::with_options(options).format(&view);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_summary() {
        let mut view = view();
        view.select_range(Position::row(1), Position::row(2));
        assert_eq!(
            ViewDebug::new().summary(&view),
            "4 rows, selected [1, 2] (0 hidden), focus 2, anchor 1, Multiple rows"
        );
    }
}

//! Anchor tracking for range selection.

use super::position::{CellRef, Position, RowMapping};

/// The pivot of every range (shift-style) selection.
///
/// Stored by node identity. A hidden anchor reads as its nearest visible
/// ancestor.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnchorTracker {
    anchor: Option<CellRef>,
}

impl AnchorTracker {
    /// Creates a tracker with no anchor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor at `position`. Out-of-range rows are ignored.
    pub fn set_anchor<M>(&mut self, map: &M, position: Position)
    where
        M: RowMapping + ?Sized,
    {
        if let Some(cell) = map.cell_at(position) {
            self.anchor = Some(cell);
        }
    }

    /// The anchor resolved against the current visible rows.
    pub fn anchor<M>(&self, map: &M) -> Option<Position>
    where
        M: RowMapping + ?Sized,
    {
        self.anchor.and_then(|cell| map.position_of(cell))
    }

    /// The anchor as stored.
    pub fn anchor_cell(&self) -> Option<CellRef> {
        self.anchor
    }

    /// Whether an anchor is set.
    pub fn is_set(&self) -> bool {
        self.anchor.is_some()
    }

    /// Remove the anchor.
    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    pub(crate) fn set_cell(&mut self, cell: Option<CellRef>) {
        self.anchor = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Columns, TreeArena, ViewContext, VisibleRows};

    #[test]
    fn test_set_and_clear() {
        let mut tree = TreeArena::new(0);
        let root = tree.root();
        tree.add_child(root, 1).unwrap();
        tree.set_expanded(root, true).unwrap();
        let rows = VisibleRows::default();
        let columns = Columns::new();
        let ctx = ViewContext::new(&tree, &rows, &columns);

        let mut anchor = AnchorTracker::new();
        assert_eq!(anchor.anchor(&ctx), None);

        anchor.set_anchor(&ctx, Position::row(1));
        assert_eq!(anchor.anchor(&ctx), Some(Position::row(1)));

        anchor.set_anchor(&ctx, Position::row(5));
        assert_eq!(anchor.anchor(&ctx), Some(Position::row(1)));

        anchor.clear_anchor();
        assert!(!anchor.is_set());
    }

    #[test]
    fn test_anchor_follows_node() {
        let mut tree = TreeArena::new(0);
        let root = tree.root();
        let a = tree.add_child(root, 1).unwrap();
        let b = tree.add_child(root, 2).unwrap();
        tree.set_expanded(root, true).unwrap();
        let rows = VisibleRows::default();
        let columns = Columns::new();

        let mut anchor = AnchorTracker::new();
        anchor.set_anchor(&ViewContext::new(&tree, &rows, &columns), Position::row(2));
        assert_eq!(anchor.anchor_cell(), Some(CellRef::row(b)));

        tree.insert_child(root, 0, 3).unwrap();
        let ctx = ViewContext::new(&tree, &rows, &columns);
        assert_eq!(anchor.anchor(&ctx), Some(Position::row(3)));
        assert_eq!(ctx.row_of(a), Some(2));
    }
}

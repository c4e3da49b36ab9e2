//! Displayed columns of a tree-table.
//!
//! Columns have stable identity: a [`ColumnId`] keeps referring to the same
//! column when columns are inserted or reordered around it.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Opaque identity of a displayed column.
    pub struct ColumnId;
}

/// Metadata for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text.
    pub title: String,
}

/// Ordered set of displayed columns.
#[derive(Debug, Default)]
pub struct Columns {
    columns: SlotMap<ColumnId, Column>,
    order: Vec<ColumnId>,
}

impl Columns {
    /// Create an empty column set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn push(&mut self, title: impl Into<String>) -> ColumnId {
        let id = self.columns.insert(Column {
            title: title.into(),
        });
        self.order.push(id);
        id
    }

    /// Insert a column at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, title: impl Into<String>) -> ColumnId {
        let id = self.columns.insert(Column {
            title: title.into(),
        });
        self.order.insert(index.min(self.order.len()), id);
        id
    }

    /// Remove a column.
    pub fn remove(&mut self, id: ColumnId) -> Option<Column> {
        let column = self.columns.remove(id)?;
        self.order.retain(|&c| c != id);
        Some(column)
    }

    /// Move a column to `index`, clamped to the end. Returns false for unknown IDs.
    pub fn move_to(&mut self, id: ColumnId, index: usize) -> bool {
        let Some(current) = self.index_of(id) else {
            return false;
        };
        self.order.remove(current);
        self.order.insert(index.min(self.order.len()), id);
        true
    }

    /// Column IDs in display order.
    pub fn ids(&self) -> &[ColumnId] {
        &self.order
    }

    /// The column at display position `index`.
    pub fn at(&self, index: usize) -> Option<ColumnId> {
        self.order.get(index).copied()
    }

    /// Display position of `id`.
    pub fn index_of(&self, id: ColumnId) -> Option<usize> {
        self.order.iter().position(|&c| c == id)
    }

    /// Metadata for `id`.
    pub fn get(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Whether `id` is a live column.
    pub fn contains(&self, id: ColumnId) -> bool {
        self.columns.contains_key(id)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no columns.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_survives_reorder() {
        let mut columns = Columns::new();
        let name = columns.push("Name");
        let size = columns.push("Size");
        let kind = columns.insert(1, "Kind");

        assert_eq!(columns.ids(), &[name, kind, size]);
        assert!(columns.move_to(name, 5));
        assert_eq!(columns.ids(), &[kind, size, name]);
        assert_eq!(columns.index_of(name), Some(2));
        assert_eq!(columns.get(name).map(|c| c.title.as_str()), Some("Name"));
    }

    #[test]
    fn test_remove() {
        let mut columns = Columns::new();
        let a = columns.push("A");
        let b = columns.push("B");
        assert_eq!(columns.remove(a).map(|c| c.title), Some("A".to_string()));
        assert!(columns.remove(a).is_none());
        assert!(!columns.move_to(a, 0));
        assert_eq!(columns.ids(), &[b]);
        assert_eq!(columns.len(), 1);
    }
}

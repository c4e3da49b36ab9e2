//! Data side of a tree view: the node arena, visible-row mapping, columns,
//! and the selection, focus and anchor models.
//!
//! # Core Types
//!
//! - [`TreeArena`]: Rooted tree with expandable nodes
//! - [`VisibleRows`]: Node to visible-row mapping, rebuilt lazily
//! - [`Columns`]: Ordered displayed columns with stable [`ColumnId`]s
//! - [`Position`] / [`CellRef`]: Row-based and identity-based addressing
//! - [`SelectionModel`], [`FocusModel`], [`AnchorTracker`]: Interaction state

mod anchor;
mod column;
mod focus;
mod position;
mod selection;
mod tree;
mod visible;

pub use anchor::AnchorTracker;
pub use column::{Column, ColumnId, Columns};
pub use focus::FocusModel;
pub use position::{CellRef, Position, RowMapping, ViewContext};
pub use selection::{SelectionChange, SelectionMode, SelectionModel};
pub use tree::{NodeId, TreeArena, TreeChange};
pub use visible::{VisibleRow, VisibleRows};

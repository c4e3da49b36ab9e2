//! Prelude module for Thicket.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use thicket::prelude::*;
//! ```

// ============================================================================
// View
// ============================================================================

pub use crate::config::{ExpandScope, LeafRightArrow, NavigationConfig};
pub use crate::debug::ViewDebug;
pub use crate::view::TreeGridView;

// ============================================================================
// Tree, Rows and Columns
// ============================================================================

pub use crate::model::{CellRef, ColumnId, NodeId, Position, RowMapping, TreeArena, TreeChange};

// ============================================================================
// Interaction State
// ============================================================================

pub use crate::model::{SelectionChange, SelectionMode};
pub use crate::navigation::{NavCommand, NavState, TreeEffect};

// ============================================================================
// Keyboard Input
// ============================================================================

pub use crate::navigation::{
    Key, KeyChord, KeyPressEvent, KeyboardModifiers, NavModifiers, ShortcutModifier,
};

// ============================================================================
// Signals and Errors
// ============================================================================

pub use crate::error::{ConfigError, Error, TreeError};
pub use thicket_core::{ConnectionId, Signal};

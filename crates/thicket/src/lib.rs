//! Thicket - keyboard selection, focus and anchor coordination for
//! expandable tree and tree-table views.
//!
//! The crate keeps three independent pieces of interaction state in step
//! with a tree whose visible rows change as branches expand and collapse:
//!
//! - **Selection**: which rows (or cells) are selected
//! - **Focus**: the single row (or cell) keyboard input acts on
//! - **Anchor**: the pivot range selection extends from
//!
//! Entries are stored by node identity, so they survive rows shifting and
//! stay selected while hidden under a collapsed branch. Rendering is left to
//! the host, which queries [`TreeGridView`] between events.
//!
//! # Example
//!
//! ```
//! use thicket::prelude::*;
//!
//! let mut tree = TreeArena::new("root");
//! let root = tree.root();
//! let docs = tree.add_child(root, "docs").unwrap();
//! tree.add_child(docs, "guide.md").unwrap();
//! tree.add_child(root, "src").unwrap();
//! tree.set_expanded(root, true).unwrap();
//!
//! let mut view = TreeGridView::new(tree);
//! view.clear_and_select(Position::row(1));
//!
//! // Right expands "docs", a second Right moves onto its first child.
//! let right = KeyPressEvent::new(Key::ArrowRight, KeyboardModifiers::NONE);
//! view.handle_key(&right);
//! view.handle_key(&right);
//! assert_eq!(view.selected_rows(), vec![2]);
//! ```

pub mod config;
pub mod debug;
pub mod error;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod view;

pub use config::NavigationConfig;
pub use debug::ViewDebug;
pub use error::{Error, Result};
pub use view::TreeGridView;

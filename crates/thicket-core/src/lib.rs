//! Core primitives for Thicket.
//!
//! This crate provides the foundational pieces the `thicket` crate is built on:
//!
//! - **Signal/Slot System**: Synchronous, type-safe change notification
//! - **Errors**: Shared error types
//! - **Logging**: `tracing` targets, span guards and tree formatting options
//!
//! # Signal/Slot Example
//!
//! ```
//! use thicket_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::SignalError;
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionGuard, ConnectionId, Signal};

//! Keyboard navigation.
//!
//! Raw key presses are normalized into [`KeyChord`]s, looked up in a
//! [`Keymap`] and interpreted by [`apply`] against a [`NavState`].
//!
//! ```
//! use thicket::navigation::{Key, KeyNormalizer, KeyPressEvent, KeyboardModifiers, Keymap, ShortcutModifier};
//!
//! let normalizer = KeyNormalizer::new(ShortcutModifier::Meta);
//! let chord = normalizer.normalize(&KeyPressEvent::new(Key::A, KeyboardModifiers::META));
//! assert_eq!(chord.to_string(), "Shortcut+A");
//! assert!(Keymap::default().lookup(chord).is_some());
//! ```

mod controller;
mod key;
mod keymap;
mod state;

pub use controller::{TreeEffect, apply, transition};
pub use key::{
    Key, KeyChord, KeyChordParseError, KeyNormalizer, KeyPressEvent, KeyboardModifiers,
    NavModifiers, ShortcutModifier,
};
pub use keymap::{Gesture, Keymap, Motion, NavCommand};
pub use state::NavState;

//! Key codes and modifier normalization.
//!
//! Raw input carries the physical Control and Meta keys. Navigation only
//! cares about a platform-neutral "shortcut" modifier, which a
//! [`KeyNormalizer`] resolves from whichever physical key the platform uses
//! (Control on most desktops, Meta/Command on macOS). The choice is a
//! configuration value; nothing downstream branches on the platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyboard key codes.
///
/// Covers the keys navigation binds plus enough of the rest of the keyboard
/// for unbound keys to be represented faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Enter, Tab, Escape, Backspace, Delete,

    // Whitespace
    Space,

    // Punctuation and symbols
    Minus, Equal, Slash, Backslash,

    // Numpad
    NumpadAdd, NumpadSubtract, NumpadMultiply, NumpadDivide,

    // Unknown/unmapped key
    Unknown(u16),
}

#[rustfmt::skip]
const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
];

impl Key {
    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }

    /// The letter key for an ASCII character, case-insensitively.
    pub fn from_letter(c: char) -> Option<Key> {
        let upper = c.to_ascii_uppercase();
        upper
            .is_ascii_uppercase()
            .then(|| LETTERS[(upper as u8 - b'A') as usize])
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowUp => write!(f, "Up"),
            Key::ArrowDown => write!(f, "Down"),
            Key::ArrowLeft => write!(f, "Left"),
            Key::ArrowRight => write!(f, "Right"),
            Key::NumpadAdd => write!(f, "Add"),
            Key::NumpadSubtract => write!(f, "Subtract"),
            Key::NumpadMultiply => write!(f, "Multiply"),
            Key::NumpadDivide => write!(f, "Divide"),
            Key::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Physical keyboard modifiers held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Command on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        control: true,
        ..Self::NONE
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        ..Self::NONE
    };

    /// Meta + Shift modifiers.
    pub const META_SHIFT: Self = Self {
        shift: true,
        meta: true,
        ..Self::NONE
    };
}

/// A key press as delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Physical modifiers held at the time.
    pub modifiers: KeyboardModifiers,
}

impl KeyPressEvent {
    /// Create a key press event.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }
}

/// Which physical key acts as the platform "shortcut" modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutModifier {
    /// Control (Windows, Linux).
    #[default]
    Control,
    /// Meta/Command (macOS).
    Meta,
}

/// Platform-neutral modifier set seen by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct NavModifiers {
    /// Shift is held.
    pub shift: bool,
    /// The platform shortcut key is held.
    pub shortcut: bool,
    /// Alt/Option is held. Nothing is bound with Alt by default.
    pub alt: bool,
}

impl NavModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        shortcut: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Shortcut only.
    pub const SHORTCUT: Self = Self {
        shortcut: true,
        ..Self::NONE
    };

    /// Shift + Shortcut.
    pub const SHIFT_SHORTCUT: Self = Self {
        shift: true,
        shortcut: true,
        alt: false,
    };
}

/// A normalized key plus modifiers, the unit the keymap is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// The key.
    pub key: Key,
    /// Normalized modifiers.
    pub modifiers: NavModifiers,
}

impl KeyChord {
    /// Create a chord.
    pub const fn new(key: Key, modifiers: NavModifiers) -> Self {
        Self { key, modifiers }
    }

    /// A chord without modifiers.
    pub const fn plain(key: Key) -> Self {
        Self::new(key, NavModifiers::NONE)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.shift {
            write!(f, "Shift+")?;
        }
        if self.modifiers.shortcut {
            write!(f, "Shortcut+")?;
        }
        if self.modifiers.alt {
            write!(f, "Alt+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Error type for parsing key chords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyChordParseError {
    /// The string is empty.
    #[error("empty key chord")]
    Empty,
    /// No key was specified (only modifiers).
    #[error("no key specified (only modifiers)")]
    NoKey,
    /// More than one non-modifier key.
    #[error("more than one key in chord: {0}")]
    MultipleKeys(String),
    /// Unknown key name.
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

impl FromStr for KeyChord {
    type Err = KeyChordParseError;

    /// Parse a chord such as `"Shift+Shortcut+Home"` or `"Shortcut+A"`.
    ///
    /// Modifier names: `Shift`, `Shortcut` (also `Mod`), `Alt` (also
    /// `Option`). Physical `Ctrl`/`Cmd` are deliberately not accepted: chords
    /// describe normalized input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyChordParseError::Empty);
        }

        let mut modifiers = NavModifiers::NONE;
        let mut key: Option<Key> = None;

        for part in split_chord(s) {
            match part.to_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "shortcut" | "mod" => modifiers.shortcut = true,
                "alt" | "option" => modifiers.alt = true,
                _ => {
                    if key.is_some() {
                        return Err(KeyChordParseError::MultipleKeys(s.to_string()));
                    }
                    key = Some(parse_key(part)?);
                }
            }
        }

        key.map(|key| KeyChord { key, modifiers })
            .ok_or(KeyChordParseError::NoKey)
    }
}

/// Split on `+`, treating a trailing `+` (as in `"Shortcut++"`) as the key.
fn split_chord(s: &str) -> Vec<&str> {
    if let Some(head) = s.strip_suffix("++") {
        let mut parts: Vec<&str> = head.split('+').map(str::trim).collect();
        parts.push("+");
        return parts;
    }
    if s == "+" {
        return vec!["+"];
    }
    s.split('+').map(str::trim).collect()
}

fn parse_key(s: &str) -> Result<Key, KeyChordParseError> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(letter) = Key::from_letter(c) {
            return Ok(letter);
        }
        return match c {
            '*' => Ok(Key::NumpadMultiply),
            '+' => Ok(Key::NumpadAdd),
            '-' => Ok(Key::NumpadSubtract),
            '/' => Ok(Key::Slash),
            '\\' => Ok(Key::Backslash),
            '=' => Ok(Key::Equal),
            ' ' => Ok(Key::Space),
            _ => Err(KeyChordParseError::UnknownKey(s.to_string())),
        };
    }

    match s.to_lowercase().as_str() {
        "up" | "arrowup" => Ok(Key::ArrowUp),
        "down" | "arrowdown" => Ok(Key::ArrowDown),
        "left" | "arrowleft" => Ok(Key::ArrowLeft),
        "right" | "arrowright" => Ok(Key::ArrowRight),
        "home" => Ok(Key::Home),
        "end" => Ok(Key::End),
        "pageup" | "pgup" => Ok(Key::PageUp),
        "pagedown" | "pgdn" => Ok(Key::PageDown),
        "space" => Ok(Key::Space),
        "enter" | "return" => Ok(Key::Enter),
        "tab" => Ok(Key::Tab),
        "escape" | "esc" => Ok(Key::Escape),
        "backspace" => Ok(Key::Backspace),
        "delete" | "del" => Ok(Key::Delete),
        "minus" => Ok(Key::Minus),
        "equal" => Ok(Key::Equal),
        "slash" => Ok(Key::Slash),
        "backslash" => Ok(Key::Backslash),
        "add" | "plus" | "numpadadd" => Ok(Key::NumpadAdd),
        "subtract" | "numpadsubtract" => Ok(Key::NumpadSubtract),
        "multiply" | "asterisk" | "numpadmultiply" => Ok(Key::NumpadMultiply),
        "divide" | "numpaddivide" => Ok(Key::NumpadDivide),
        _ => Err(KeyChordParseError::UnknownKey(s.to_string())),
    }
}

/// Resolves physical modifiers into [`NavModifiers`].
///
/// The physical key that is not the shortcut key (Control on macOS, Meta
/// elsewhere) is ignored, so `Control+Command+Space` on macOS normalizes to
/// `Shortcut+Space`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyNormalizer {
    shortcut: ShortcutModifier,
}

impl KeyNormalizer {
    /// Create a normalizer for the given shortcut key.
    pub fn new(shortcut: ShortcutModifier) -> Self {
        Self { shortcut }
    }

    /// The configured shortcut key.
    pub fn shortcut(&self) -> ShortcutModifier {
        self.shortcut
    }

    /// Normalize a raw key press.
    pub fn normalize(&self, event: &KeyPressEvent) -> KeyChord {
        let raw = event.modifiers;
        let shortcut = match self.shortcut {
            ShortcutModifier::Control => raw.control,
            ShortcutModifier::Meta => raw.meta,
        };
        KeyChord {
            key: event.key,
            modifiers: NavModifiers {
                shift: raw.shift,
                shortcut,
                alt: raw.alt,
            },
        }
    }
}

//! Navigation commands and the chord-to-command table.

use std::collections::HashMap;

use super::key::{Key, KeyChord, NavModifiers};

/// Where a navigation command moves the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left in cell mode; tree collapse/ascend in row mode.
    Left,
    /// One column right in cell mode; tree expand/advance in row mode.
    Right,
    /// One page up.
    PageUp,
    /// One page down.
    PageDown,
    /// First row.
    Home,
    /// Last row.
    End,
}

impl Motion {
    /// Up, Down, Left, Right, PageUp and PageDown are relative moves that
    /// stop at the bounds; Home and End always land on a boundary row.
    pub fn is_step(self) -> bool {
        !matches!(self, Motion::Home | Motion::End)
    }
}

/// What a navigation command does besides moving the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// No modifier: select only the new focus; the anchor follows.
    Select,
    /// Shortcut: move the focus only.
    FocusOnly,
    /// Shift: replace the selection with the run from the anchor.
    ExtendReplace,
    /// Shift+Shortcut: add the run from the anchor to the selection.
    ExtendAdd,
}

impl Gesture {
    /// The gesture a modifier set selects, if any.
    pub fn from_modifiers(modifiers: NavModifiers) -> Option<Self> {
        if modifiers.alt {
            return None;
        }
        Some(match (modifiers.shift, modifiers.shortcut) {
            (false, false) => Gesture::Select,
            (false, true) => Gesture::FocusOnly,
            (true, false) => Gesture::ExtendReplace,
            (true, true) => Gesture::ExtendAdd,
        })
    }
}

/// A key command understood by the navigation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    /// Move the focus and update selection according to the gesture.
    Navigate {
        /// Where to move.
        motion: Motion,
        /// How selection follows.
        gesture: Gesture,
    },
    /// Toggle the focused position and anchor there.
    ToggleFocused,
    /// Replace the selection with the run from the anchor to the focus.
    SelectToFocus,
    /// Select every visible row (or cell).
    SelectAll,
    /// Recursively expand every branch in scope.
    ExpandAll,
    /// Expand the focused node.
    ExpandFocused,
    /// Collapse the focused node.
    CollapseFocused,
}

/// Table from normalized chords to commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<KeyChord, NavCommand>,
}

impl Default for Keymap {
    /// The standard bindings: arrows, Home/End and PageUp/PageDown under all
    /// four modifier combinations, Space with Shortcut or Shift, Shortcut+A,
    /// and the numpad `*`, `+` and `-` keys.
    fn default() -> Self {
        let motions = [
            (Key::ArrowUp, Motion::Up),
            (Key::ArrowDown, Motion::Down),
            (Key::ArrowLeft, Motion::Left),
            (Key::ArrowRight, Motion::Right),
            (Key::PageUp, Motion::PageUp),
            (Key::PageDown, Motion::PageDown),
            (Key::Home, Motion::Home),
            (Key::End, Motion::End),
        ];
        let modifier_sets = [
            NavModifiers::NONE,
            NavModifiers::SHORTCUT,
            NavModifiers::SHIFT,
            NavModifiers::SHIFT_SHORTCUT,
        ];

        let mut keymap = Self::empty();
        for (key, motion) in motions {
            for modifiers in modifier_sets {
                if let Some(gesture) = Gesture::from_modifiers(modifiers) {
                    keymap.bind(
                        KeyChord::new(key, modifiers),
                        NavCommand::Navigate { motion, gesture },
                    );
                }
            }
        }

        keymap.bind(KeyChord::new(Key::Space, NavModifiers::SHORTCUT), NavCommand::ToggleFocused);
        keymap.bind(KeyChord::new(Key::Space, NavModifiers::SHIFT), NavCommand::SelectToFocus);
        keymap.bind(KeyChord::new(Key::A, NavModifiers::SHORTCUT), NavCommand::SelectAll);
        keymap.bind(KeyChord::plain(Key::NumpadMultiply), NavCommand::ExpandAll);
        keymap.bind(KeyChord::plain(Key::NumpadAdd), NavCommand::ExpandFocused);
        keymap.bind(KeyChord::plain(Key::NumpadSubtract), NavCommand::CollapseFocused);
        keymap
    }
}

impl Keymap {
    /// A keymap with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `chord`, returning the command it replaced.
    pub fn bind(&mut self, chord: KeyChord, command: NavCommand) -> Option<NavCommand> {
        self.bindings.insert(chord, command)
    }

    /// Remove the binding for `chord`.
    pub fn unbind(&mut self, chord: KeyChord) -> Option<NavCommand> {
        self.bindings.remove(&chord)
    }

    /// The command bound to `chord`.
    pub fn lookup(&self, chord: KeyChord) -> Option<NavCommand> {
        self.bindings.get(&chord).copied()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

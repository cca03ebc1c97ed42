//! Keyboard input model shared by the input engine and the command AST.

pub mod notation;

use serde::{Deserialize, Serialize};

/// Logical key identity, independent of any host keyboard layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VimKey {
    /// A key that is processed and then dropped on the floor.
    Nop,
    Escape,
    Enter,
    Tab,
    Back,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Char(char),
    Function(u8),
}

/// Modifier state carried alongside a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        control: false,
        alt: false,
    };

    pub const CONTROL: KeyModifiers = KeyModifiers {
        shift: false,
        control: true,
        alt: false,
    };

    pub fn is_none(self) -> bool {
        self == KeyModifiers::NONE
    }
}

/// One keystroke as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: VimKey,
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    pub fn new(key: VimKey, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn char(c: char) -> Self {
        Self::new(VimKey::Char(c), KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(VimKey::Char(c), KeyModifiers::CONTROL)
    }

    pub fn named(key: VimKey) -> Self {
        Self::new(key, KeyModifiers::NONE)
    }

    pub fn escape() -> Self {
        Self::named(VimKey::Escape)
    }

    pub fn enter() -> Self {
        Self::named(VimKey::Enter)
    }

    pub fn nop() -> Self {
        Self::named(VimKey::Nop)
    }

    pub fn is_nop(&self) -> bool {
        self.key == VimKey::Nop
    }

    pub fn is_escape(&self) -> bool {
        self.key == VimKey::Escape
    }

    /// The raw character for plain printable keys, `None` for everything else.
    pub fn raw_char(&self) -> Option<char> {
        match self.key {
            VimKey::Char(c) if self.modifiers.is_none() => Some(c),
            _ => None,
        }
    }
}

/// An ordered, non-empty sequence of keystrokes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyInputSet(Vec<KeyInput>);

impl KeyInputSet {
    pub fn single(input: KeyInput) -> Self {
        Self(vec![input])
    }

    /// Builds a set from a vector; empty input is rejected to preserve the
    /// non-empty invariant.
    pub fn from_vec(inputs: Vec<KeyInput>) -> Option<Self> {
        if inputs.is_empty() {
            None
        } else {
            Some(Self(inputs))
        }
    }

    /// Appends one keystroke, consuming and returning the set.
    pub fn with(mut self, input: KeyInput) -> Self {
        self.0.push(input);
        self
    }

    pub fn first(&self) -> KeyInput {
        self.0[0]
    }

    pub fn keys(&self) -> &[KeyInput] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &KeyInputSet) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn into_vec(self) -> Vec<KeyInput> {
        self.0
    }
}

/// The classification under which the key-map table is consulted.
///
/// Distinct from `ModeKind`: several mode kinds share one remap mode, and
/// Select / OperatorPending / Language exist only on this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyRemapMode {
    Insert,
    Command,
    Normal,
    Visual,
    Select,
    OperatorPending,
    Language,
}

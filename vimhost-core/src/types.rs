//! Small shared value types: mode kinds, marks and register names.

use crate::keys::KeyRemapMode;
use serde::{Deserialize, Serialize};

/// Identity of a mode installed in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    Normal,
    Insert,
    Replace,
    VisualCharacter,
    VisualLine,
    VisualBlock,
    Command,
    SubstituteConfirm,
    Disabled,
    ExternalEdit,
    Uninitialized,
}

impl ModeKind {
    pub fn is_visual(self) -> bool {
        matches!(
            self,
            ModeKind::VisualCharacter | ModeKind::VisualLine | ModeKind::VisualBlock
        )
    }

    /// The remap-table classification a mode of this kind consults by default.
    ///
    /// Insert and Replace share the Insert table, the three visual kinds share
    /// the Visual table, and the remaining kinds have no remap mode at all.
    /// Normal mode varies its own answer while an operator is pending, which
    /// is why this is only a default.
    pub fn default_remap_mode(self) -> Option<KeyRemapMode> {
        match self {
            ModeKind::Insert | ModeKind::Replace => Some(KeyRemapMode::Insert),
            ModeKind::Command => Some(KeyRemapMode::Command),
            ModeKind::Normal => Some(KeyRemapMode::Normal),
            ModeKind::VisualCharacter | ModeKind::VisualLine | ModeKind::VisualBlock => {
                Some(KeyRemapMode::Visual)
            }
            _ => None,
        }
    }
}

/// A named buffer position (`'a` .. `'z`, `'A` .. `'Z` and the special marks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark(char);

impl Mark {
    pub fn of(c: char) -> Option<Mark> {
        if c.is_ascii_alphabetic() || matches!(c, '\'' | '`' | '<' | '>' | '.' | '^' | '[' | ']' | '"')
        {
            Some(Mark(c))
        } else {
            None
        }
    }

    pub fn char(self) -> char {
        self.0
    }
}

/// A register name (`a` .. `z`, `0` .. `9` and the special registers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterName(char);

impl RegisterName {
    pub fn of(c: char) -> Option<RegisterName> {
        if c.is_ascii_alphanumeric()
            || matches!(c, '"' | '-' | '_' | '*' | '+' | '.' | ':' | '%' | '#' | '/' | '=')
        {
            Some(RegisterName(c))
        } else {
            None
        }
    }

    pub fn char(self) -> char {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_kinds() {
        assert!(ModeKind::VisualCharacter.is_visual());
        assert!(ModeKind::VisualLine.is_visual());
        assert!(ModeKind::VisualBlock.is_visual());
        assert!(!ModeKind::Normal.is_visual());
        assert!(!ModeKind::Insert.is_visual());
    }

    #[test]
    fn test_remap_mode_projection() {
        assert_eq!(
            ModeKind::Insert.default_remap_mode(),
            Some(KeyRemapMode::Insert)
        );
        assert_eq!(
            ModeKind::Replace.default_remap_mode(),
            Some(KeyRemapMode::Insert)
        );
        assert_eq!(
            ModeKind::VisualBlock.default_remap_mode(),
            Some(KeyRemapMode::Visual)
        );
        assert_eq!(ModeKind::Disabled.default_remap_mode(), None);
        assert_eq!(ModeKind::SubstituteConfirm.default_remap_mode(), None);
    }

    #[test]
    fn test_mark_validity() {
        assert!(Mark::of('a').is_some());
        assert!(Mark::of('Z').is_some());
        assert!(Mark::of('<').is_some());
        assert!(Mark::of('7').is_none());
        assert!(Mark::of('!').is_none());
    }
}

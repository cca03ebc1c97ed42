//! The set of installed modes plus current / previous tracking.

use crate::mode::{Mode, ModeArgument, UninitializedMode};
use std::collections::HashMap;
use vimhost_core::error::{Result, VimError};
use vimhost_core::types::ModeKind;

/// Owns every installed mode and tracks which one is current.
///
/// After construction the registry holds the Uninitialized mode and points at
/// it; `previous` starts out empty.
pub struct ModeRegistry {
    modes: HashMap<ModeKind, Box<dyn Mode>>,
    current: ModeKind,
    previous: Option<ModeKind>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        let mut modes: HashMap<ModeKind, Box<dyn Mode>> = HashMap::new();
        modes.insert(ModeKind::Uninitialized, Box::new(UninitializedMode));
        Self {
            modes,
            current: ModeKind::Uninitialized,
            previous: None,
        }
    }

    /// Installs a mode, replacing any previous mode of the same kind.
    pub fn add(&mut self, mode: Box<dyn Mode>) {
        self.modes.insert(mode.kind(), mode);
    }

    /// Removes a mode. The current mode and the Uninitialized placeholder
    /// cannot be removed.
    pub fn remove(&mut self, kind: ModeKind) -> Option<Box<dyn Mode>> {
        if kind == self.current || kind == ModeKind::Uninitialized {
            return None;
        }
        self.modes.remove(&kind)
    }

    pub fn get(&self, kind: ModeKind) -> Option<&dyn Mode> {
        self.modes.get(&kind).map(|m| m.as_ref())
    }

    pub fn get_mut(&mut self, kind: ModeKind) -> Option<&mut (dyn Mode + 'static)> {
        self.modes.get_mut(&kind).map(|m| m.as_mut())
    }

    pub fn contains(&self, kind: ModeKind) -> bool {
        self.modes.contains_key(&kind)
    }

    /// Kinds of all installed modes, in no particular order.
    pub fn kinds(&self) -> Vec<ModeKind> {
        self.modes.keys().copied().collect()
    }

    pub fn current_kind(&self) -> ModeKind {
        self.current
    }

    pub fn previous_kind(&self) -> Option<ModeKind> {
        self.previous
    }

    pub fn current(&self) -> &dyn Mode {
        match self.modes.get(&self.current) {
            Some(mode) => mode.as_ref(),
            // The current mode is kept installed by construction; fall back
            // to the placeholder if the map was tampered with.
            None => &UninitializedMode,
        }
    }

    pub fn current_mut(&mut self) -> Option<&mut (dyn Mode + 'static)> {
        self.modes.get_mut(&self.current).map(|m| m.as_mut())
    }

    /// Makes `kind` current: leaves the old mode, updates `previous` under
    /// the skip-consecutive-visual rule, then enters the new mode.
    ///
    /// Returns the kind that was current before the switch.
    pub fn switch(&mut self, kind: ModeKind, argument: ModeArgument) -> Result<ModeKind> {
        if !self.modes.contains_key(&kind) {
            return Err(VimError::UnknownMode(kind));
        }

        let left = self.current;
        self.current = kind;

        if let Some(mode) = self.modes.get_mut(&left) {
            mode.on_leave();
        }

        // Moving between the visual kinds keeps the pre-visual mode as the
        // return target of a later switch-to-previous.
        match self.previous {
            Some(_) if left.is_visual() && kind.is_visual() => {}
            _ => self.previous = Some(left),
        }

        if let Some(mode) = self.modes.get_mut(&kind) {
            mode.on_enter(argument);
        }

        log::debug!("mode switch {:?} -> {:?}", left, kind);
        Ok(left)
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ProcessResult;
    use vimhost_core::keys::KeyInput;

    struct StubMode {
        kind: ModeKind,
    }

    impl Mode for StubMode {
        fn kind(&self) -> ModeKind {
            self.kind
        }

        fn can_process(&self, _input: &KeyInput) -> bool {
            true
        }

        fn process(&mut self, _input: &KeyInput) -> ProcessResult {
            ProcessResult::Handled(crate::mode::ModeSwitch::NoSwitch)
        }
    }

    fn registry_with(kinds: &[ModeKind]) -> ModeRegistry {
        let mut registry = ModeRegistry::new();
        for &kind in kinds {
            registry.add(Box::new(StubMode { kind }));
        }
        registry
    }

    #[test]
    fn test_initial_state() {
        let registry = ModeRegistry::new();
        assert_eq!(registry.current_kind(), ModeKind::Uninitialized);
        assert_eq!(registry.previous_kind(), None);
        assert!(registry.contains(ModeKind::Uninitialized));
    }

    #[test]
    fn test_switch_to_unknown_mode_fails() {
        let mut registry = ModeRegistry::new();
        assert_eq!(
            registry.switch(ModeKind::Normal, ModeArgument::None),
            Err(VimError::UnknownMode(ModeKind::Normal))
        );
    }

    #[test]
    fn test_switch_updates_previous() {
        let mut registry = registry_with(&[ModeKind::Normal, ModeKind::Insert]);
        registry.switch(ModeKind::Normal, ModeArgument::None).unwrap();
        assert_eq!(registry.previous_kind(), Some(ModeKind::Uninitialized));

        registry.switch(ModeKind::Insert, ModeArgument::None).unwrap();
        assert_eq!(registry.current_kind(), ModeKind::Insert);
        assert_eq!(registry.previous_kind(), Some(ModeKind::Normal));
    }

    #[test]
    fn test_switching_between_visual_kinds_preserves_previous() {
        let mut registry = registry_with(&[
            ModeKind::Normal,
            ModeKind::VisualCharacter,
            ModeKind::VisualLine,
            ModeKind::VisualBlock,
        ]);
        registry.switch(ModeKind::Normal, ModeArgument::None).unwrap();
        registry
            .switch(ModeKind::VisualCharacter, ModeArgument::None)
            .unwrap();
        assert_eq!(registry.previous_kind(), Some(ModeKind::Normal));

        registry
            .switch(ModeKind::VisualLine, ModeArgument::None)
            .unwrap();
        assert_eq!(registry.previous_kind(), Some(ModeKind::Normal));

        registry
            .switch(ModeKind::VisualBlock, ModeArgument::None)
            .unwrap();
        assert_eq!(registry.previous_kind(), Some(ModeKind::Normal));

        // Leaving the visual family records the visual mode as previous.
        registry.switch(ModeKind::Normal, ModeArgument::None).unwrap();
        assert_eq!(registry.previous_kind(), Some(ModeKind::VisualBlock));
    }

    #[test]
    fn test_cannot_remove_current_mode() {
        let mut registry = registry_with(&[ModeKind::Normal]);
        registry.switch(ModeKind::Normal, ModeArgument::None).unwrap();
        assert!(registry.remove(ModeKind::Normal).is_none());
        assert!(registry.remove(ModeKind::Uninitialized).is_none());
    }
}

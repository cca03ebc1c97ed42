//! The capability contract every mode satisfies, and the dispatch result
//! model the engine acts on.

use serde::{Deserialize, Serialize};
use vimhost_core::ex::SubstituteFlags;
use vimhost_core::keys::{KeyInput, KeyRemapMode};
use vimhost_core::types::ModeKind;

/// Argument handed to a mode when it is entered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeArgument {
    #[default]
    None,
    /// Entering from a visual selection that should be preserved.
    FromVisual,
    /// Insert entered with a repeat count, e.g. `3i`.
    InsertWithCount(u32),
    /// Data for a confirm-each-match substitute session.
    Substitute {
        pattern: String,
        replacement: String,
        flags: SubstituteFlags,
    },
}

/// Transition directive attached to a handled keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeSwitch {
    NoSwitch,
    SwitchMode(ModeKind),
    SwitchModeWithArgument(ModeKind, ModeArgument),
    SwitchPreviousMode,
    /// Run one command in Normal mode, then return to the current mode.
    SwitchModeOneTimeCommand,
}

/// Outcome of handing one keystroke to a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessResult {
    /// Input consumed; carries the transition directive.
    Handled(ModeSwitch),
    /// Input consumed, the mode awaits more input.
    HandledNeedMoreInput,
    /// The mode refused the input.
    NotHandled,
    /// Input consumed with a semantic failure.
    Error,
}

impl ProcessResult {
    pub fn is_any_handled(&self) -> bool {
        matches!(
            self,
            ProcessResult::Handled(_) | ProcessResult::HandledNeedMoreInput
        )
    }
}

/// One mode installed in the engine.
pub trait Mode {
    fn kind(&self) -> ModeKind;

    /// Whether this mode would accept the keystroke right now.
    fn can_process(&self, input: &KeyInput) -> bool;

    /// Handles one keystroke.
    fn process(&mut self, input: &KeyInput) -> ProcessResult;

    fn on_enter(&mut self, _argument: ModeArgument) {}

    fn on_leave(&mut self) {}

    fn on_close(&mut self) {}

    /// The remap classification under which this mode's input is resolved.
    /// Normal mode overrides this while an operator is pending.
    fn key_remap_mode(&self) -> Option<KeyRemapMode> {
        self.kind().default_remap_mode()
    }

    /// For Insert and Replace: whether the keystroke would land in the text
    /// as-is instead of acting as a command.
    fn is_direct_insert(&self, _input: &KeyInput) -> bool {
        false
    }
}

/// The placeholder mode the registry starts out with. It refuses every
/// keystroke and ignores lifecycle callbacks.
pub struct UninitializedMode;

impl Mode for UninitializedMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Uninitialized
    }

    fn can_process(&self, _input: &KeyInput) -> bool {
        false
    }

    fn process(&mut self, _input: &KeyInput) -> ProcessResult {
        ProcessResult::NotHandled
    }
}

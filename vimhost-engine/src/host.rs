//! Contracts the engine consumes from its host editor.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vimhost_core::keys::KeyInput;
use vimhost_core::types::ModeKind;

/// Who initiated a mode switch travelling over the host boundary.
///
/// The engine tags its own writebacks with `Engine`; hosts must only feed
/// `External` switches back into `VimEngine::converge_mode`, which is what
/// keeps the engine and the underlying buffer from ping-ponging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchOrigin {
    Engine,
    External,
}

/// The services the engine itself needs from the host editor. Everything
/// else a host offers is consumed by the concrete modes, not by the engine.
pub trait EditorHost {
    /// Display name of the underlying text buffer.
    fn buffer_name(&self) -> String;

    /// Mode-state writeback into the underlying buffer.
    fn publish_mode(&mut self, kind: ModeKind, origin: SwitchOrigin);

    /// Invoked once while the engine closes.
    fn clear_jump_list(&mut self);
}

/// Engine-level settings shared across buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// The keystroke that drops the engine into Disabled mode; `None` leaves
    /// disabling entirely to the host.
    pub disable_command: Option<KeyInput>,
    /// Default magic-ness of substitute patterns.
    pub magic: bool,
    /// How long hosts should let a buffered prefix sit before calling
    /// `flush_buffered`. The engine itself never waits.
    pub timeout_len: Option<Duration>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            disable_command: None,
            magic: true,
            timeout_len: Some(Duration::from_millis(1000)),
        }
    }
}

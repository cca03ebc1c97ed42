//! Events the engine publishes and the synchronous dispatcher behind them.

use crate::mode::ProcessResult;
use serde::{Deserialize, Serialize};
use vimhost_core::keys::KeyInput;
use vimhost_core::types::ModeKind;

/// Everything observable about one engine.
///
/// Within one `process` call the ordering is fixed: `KeyInputStart`, any
/// `SwitchedMode` events raised by dispatch, then exactly one of
/// `KeyInputProcessed` (once per original input, carrying the final result)
/// or `KeyInputBuffered`, then `KeyInputEnd`. An `ErrorMessage` for a
/// recursive mapping fires before its `KeyInputProcessed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    SwitchedMode {
        previous: ModeKind,
        current: ModeKind,
    },
    KeyInputStart {
        input: KeyInput,
    },
    KeyInputBuffered {
        input: KeyInput,
    },
    KeyInputProcessed {
        input: KeyInput,
        result: ProcessResult,
    },
    KeyInputEnd {
        input: KeyInput,
    },
    ErrorMessage {
        message: String,
    },
    WarningMessage {
        message: String,
    },
    StatusMessage {
        message: String,
    },
    StatusMessageLong {
        lines: Vec<String>,
    },
    Closed,
}

/// Type alias for event listener functions
type EventListener = Box<dyn Fn(&EngineEvent)>;

/// Synchronous, same-thread event fan-out.
pub struct EventDispatcher {
    listeners: Vec<EventListener>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> usize
    where
        F: Fn(&EngineEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
        self.listeners.len() - 1
    }

    pub fn unsubscribe(&mut self, index: usize) {
        if index < self.listeners.len() {
            let _ = self.listeners.remove(index);
        }
    }

    pub fn dispatch(&self, event: &EngineEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//! The per-buffer input-processing engine: remap resolution, mode dispatch,
//! one-time-command bookkeeping and event emission.

use crate::events::{EngineEvent, EventDispatcher};
use crate::host::{EditorHost, GlobalSettings, SwitchOrigin};
use crate::mode::{Mode, ModeArgument, ModeSwitch, ProcessResult};
use crate::registry::ModeRegistry;
use crate::remap::{KeyMapping, KeyMappingResult};
use std::cell::RefCell;
use std::rc::Rc;
use vimhost_core::error::{Result, VimError};
use vimhost_core::keys::{KeyInput, KeyInputSet};
use vimhost_core::types::ModeKind;

/// One engine instance per text buffer.
///
/// The engine owns its modes and event dispatcher; the key-map table, the
/// global settings and the host adapter are shared collaborators held by
/// reference. All processing happens synchronously on the caller's thread.
pub struct VimEngine {
    registry: ModeRegistry,
    key_map: Rc<RefCell<dyn KeyMapping>>,
    settings: Rc<RefCell<GlobalSettings>>,
    host: Option<Rc<RefCell<dyn EditorHost>>>,
    events: EventDispatcher,
    /// Pending remap prefix awaiting more input.
    buffered_input: Option<KeyInputSet>,
    /// The mode to return to after the next completed command.
    one_time_mode: Option<ModeKind>,
    processing_depth: u32,
    closed: bool,
}

impl VimEngine {
    pub fn new(
        key_map: Rc<RefCell<dyn KeyMapping>>,
        settings: Rc<RefCell<GlobalSettings>>,
        host: Rc<RefCell<dyn EditorHost>>,
    ) -> Self {
        Self {
            registry: ModeRegistry::new(),
            key_map,
            settings,
            host: Some(host),
            events: EventDispatcher::new(),
            buffered_input: None,
            one_time_mode: None,
            processing_depth: 0,
            closed: false,
        }
    }

    pub fn add_mode(&mut self, mode: Box<dyn Mode>) {
        self.registry.add(mode);
    }

    pub fn remove_mode(&mut self, kind: ModeKind) -> Option<Box<dyn Mode>> {
        self.registry.remove(kind)
    }

    pub fn mode(&self, kind: ModeKind) -> Option<&dyn Mode> {
        self.registry.get(kind)
    }

    pub fn current_mode_kind(&self) -> ModeKind {
        self.registry.current_kind()
    }

    pub fn previous_mode_kind(&self) -> Option<ModeKind> {
        self.registry.previous_kind()
    }

    /// The one-time-command return target, when one is armed.
    pub fn in_one_time_command(&self) -> Option<ModeKind> {
        self.one_time_mode
    }

    pub fn buffered_key_inputs(&self) -> Option<&KeyInputSet> {
        self.buffered_input.as_ref()
    }

    pub fn is_processing_input(&self) -> bool {
        self.processing_depth > 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn events(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    pub fn post_error_message(&self, message: &str) {
        self.dispatch_event(&EngineEvent::ErrorMessage {
            message: message.to_string(),
        });
    }

    pub fn post_warning_message(&self, message: &str) {
        self.dispatch_event(&EngineEvent::WarningMessage {
            message: message.to_string(),
        });
    }

    pub fn post_status_message(&self, message: &str) {
        self.dispatch_event(&EngineEvent::StatusMessage {
            message: message.to_string(),
        });
    }

    pub fn post_status_message_long(&self, lines: Vec<String>) {
        self.dispatch_event(&EngineEvent::StatusMessageLong { lines });
    }

    /// Whether the engine would accept `input` right now, counting direct
    /// inserts into Insert / Replace as acceptance.
    pub fn can_process(&self, input: &KeyInput) -> bool {
        self.can_process_core(input, true)
    }

    /// Like `can_process`, but false for keystrokes Insert / Replace would
    /// swallow as literal text.
    pub fn can_process_as_command(&self, input: &KeyInput) -> bool {
        self.can_process_core(input, false)
    }

    fn can_process_core(&self, input: &KeyInput, allow_direct_insert: bool) -> bool {
        if self.closed {
            return false;
        }
        let (mapping, keys) = self.resolve_with_buffer(*input);
        match mapping {
            // Buffering or reporting the error both count as processing.
            KeyMappingResult::NeedsMoreInput | KeyMappingResult::Recursive => true,
            KeyMappingResult::Mapped(mapped) => {
                self.can_process_one(mapped.first(), allow_direct_insert)
            }
            KeyMappingResult::NoMapping => {
                self.can_process_one(keys.first(), allow_direct_insert)
            }
        }
    }

    fn can_process_one(&self, input: KeyInput, allow_direct_insert: bool) -> bool {
        if self.settings.borrow().disable_command == Some(input) {
            return true;
        }
        if input.is_nop() {
            return true;
        }
        // Escape must force the return to Insert / Replace even when the
        // current mode would refuse it.
        if input.is_escape() && self.one_time_mode.is_some() {
            return true;
        }

        let mode = self.registry.current();
        if !mode.can_process(&input) {
            return false;
        }
        if allow_direct_insert {
            return true;
        }
        let kind = mode.kind();
        if matches!(kind, ModeKind::Insert | ModeKind::Replace) && mode.is_direct_insert(&input) {
            return false;
        }
        true
    }

    /// Feeds one keystroke through remapping and mode dispatch.
    pub fn process(&mut self, input: KeyInput) -> Result<ProcessResult> {
        if self.closed {
            return Err(VimError::AlreadyClosed);
        }
        self.processing_depth += 1;
        self.dispatch_event(&EngineEvent::KeyInputStart { input });

        let result = self.process_core(input);

        self.dispatch_event(&EngineEvent::KeyInputEnd { input });
        self.processing_depth -= 1;
        result
    }

    fn process_core(&mut self, input: KeyInput) -> Result<ProcessResult> {
        let (mapping, keys) = self.resolve_with_buffer(input);
        self.buffered_input = None;

        match mapping {
            KeyMappingResult::NoMapping => self.dispatch_sequence(input, keys),
            KeyMappingResult::Mapped(mapped) => self.dispatch_sequence(input, mapped),
            KeyMappingResult::NeedsMoreInput => {
                log::trace!("buffering prefix {}", keys);
                self.buffered_input = Some(keys);
                self.dispatch_event(&EngineEvent::KeyInputBuffered { input });
                Ok(ProcessResult::Handled(ModeSwitch::NoSwitch))
            }
            KeyMappingResult::Recursive => {
                self.dispatch_event(&EngineEvent::ErrorMessage {
                    message: "recursive mapping".to_string(),
                });
                self.dispatch_event(&EngineEvent::KeyInputProcessed {
                    input,
                    result: ProcessResult::Error,
                });
                Ok(ProcessResult::Error)
            }
        }
    }

    /// Dispatches every key of an expanded sequence in order and reports the
    /// last result once, for the originally supplied input.
    fn dispatch_sequence(&mut self, input: KeyInput, keys: KeyInputSet) -> Result<ProcessResult> {
        let mut last = ProcessResult::Handled(ModeSwitch::NoSwitch);
        for key in keys.keys() {
            last = self.dispatch_one(*key)?;
        }
        self.dispatch_event(&EngineEvent::KeyInputProcessed {
            input,
            result: last.clone(),
        });
        Ok(last)
    }

    /// Resolves the incoming key, together with any buffered prefix, against
    /// the key-map table of the current remap mode.
    fn resolve_with_buffer(&self, input: KeyInput) -> (KeyMappingResult, KeyInputSet) {
        let keys = match &self.buffered_input {
            Some(buffered) => buffered.clone().with(input),
            None => KeyInputSet::single(input),
        };
        match self.registry.current().key_remap_mode() {
            Some(remap_mode) => (
                self.key_map.borrow().get_key_mapping(&keys, remap_mode),
                keys,
            ),
            None => (KeyMappingResult::Mapped(keys.clone()), keys),
        }
    }

    fn dispatch_one(&mut self, key: KeyInput) -> Result<ProcessResult> {
        let disable = self.settings.borrow().disable_command;
        if disable == Some(key) && self.registry.current_kind() != ModeKind::Disabled {
            self.switch_mode(ModeKind::Disabled, ModeArgument::None)?;
            return Ok(ProcessResult::Handled(ModeSwitch::SwitchMode(
                ModeKind::Disabled,
            )));
        }

        if key.is_nop() {
            return Ok(ProcessResult::Handled(ModeSwitch::NoSwitch));
        }

        // Escape forces the way back from a one-time command when the current
        // mode will not take it itself.
        if key.is_escape()
            && self.one_time_mode.is_some()
            && !self.registry.current().can_process(&key)
        {
            if let Some(target) = self.one_time_mode.take() {
                self.switch_mode(target, ModeArgument::None)?;
                return Ok(ProcessResult::Handled(ModeSwitch::SwitchMode(target)));
            }
        }

        let result = match self.registry.current_mut() {
            Some(mode) => mode.process(&key),
            None => ProcessResult::NotHandled,
        };
        self.apply_dispatch_result(&result)?;
        Ok(result)
    }

    fn apply_dispatch_result(&mut self, result: &ProcessResult) -> Result<()> {
        match result {
            ProcessResult::Handled(ModeSwitch::NoSwitch) => {
                // Visual modes keep the one-time-command bracket open across
                // intra-visual motion.
                if !self.registry.current_kind().is_visual() {
                    self.leave_one_time_command()?;
                }
            }
            ProcessResult::Handled(ModeSwitch::SwitchMode(kind)) => {
                self.switch_mode(*kind, ModeArgument::None)?;
            }
            ProcessResult::Handled(ModeSwitch::SwitchModeWithArgument(kind, argument)) => {
                self.switch_mode(*kind, argument.clone())?;
            }
            ProcessResult::Handled(ModeSwitch::SwitchPreviousMode) => {
                if let Some(target) = self.one_time_mode.take() {
                    self.switch_mode(target, ModeArgument::None)?;
                } else {
                    self.switch_previous_mode()?;
                }
            }
            ProcessResult::Handled(ModeSwitch::SwitchModeOneTimeCommand) => {
                self.one_time_mode = Some(self.registry.current_kind());
                self.switch_mode(ModeKind::Normal, ModeArgument::None)?;
            }
            ProcessResult::HandledNeedMoreInput => {}
            ProcessResult::NotHandled | ProcessResult::Error => {
                self.leave_one_time_command()?;
            }
        }
        Ok(())
    }

    fn leave_one_time_command(&mut self) -> Result<()> {
        if let Some(target) = self.one_time_mode.take() {
            self.switch_mode(target, ModeArgument::None)?;
        }
        Ok(())
    }

    /// Declares that `input` was handled outside the engine: buffered input
    /// is dropped and the usual event bracket fires without dispatch.
    pub fn simulate_processed(&mut self, input: KeyInput) -> Result<()> {
        if self.closed {
            return Err(VimError::AlreadyClosed);
        }
        self.buffered_input = None;
        self.dispatch_event(&EngineEvent::KeyInputStart { input });
        self.dispatch_event(&EngineEvent::KeyInputProcessed {
            input,
            result: ProcessResult::Handled(ModeSwitch::NoSwitch),
        });
        self.dispatch_event(&EngineEvent::KeyInputEnd { input });
        Ok(())
    }

    /// Dispatches a pending prefix literally, bypassing remap resolution.
    /// This is the hook a host-side `timeout_len` timer drives; there are no
    /// timers inside the engine.
    pub fn flush_buffered(&mut self) -> Result<Option<ProcessResult>> {
        if self.closed {
            return Err(VimError::AlreadyClosed);
        }
        let Some(keys) = self.buffered_input.take() else {
            return Ok(None);
        };
        self.processing_depth += 1;
        let mut last = ProcessResult::Handled(ModeSwitch::NoSwitch);
        for key in keys.keys() {
            match self.dispatch_one(*key) {
                Ok(result) => last = result,
                Err(error) => {
                    self.processing_depth -= 1;
                    return Err(error);
                }
            }
        }
        self.processing_depth -= 1;
        Ok(Some(last))
    }

    /// Explicit transition. Emits `SwitchedMode` and writes the new mode back
    /// into the host with `SwitchOrigin::Engine`.
    pub fn switch_mode(&mut self, kind: ModeKind, argument: ModeArgument) -> Result<ModeKind> {
        if self.closed {
            return Err(VimError::AlreadyClosed);
        }
        let previous = self.registry.switch(kind, argument)?;
        self.dispatch_event(&EngineEvent::SwitchedMode {
            previous,
            current: kind,
        });
        if let Some(host) = &self.host {
            host.borrow_mut().publish_mode(kind, SwitchOrigin::Engine);
        }
        Ok(kind)
    }

    /// Switches back to the previous mode; with no previous mode recorded the
    /// current mode stays put.
    pub fn switch_previous_mode(&mut self) -> Result<ModeKind> {
        match self.registry.previous_kind() {
            None => Ok(self.registry.current_kind()),
            Some(kind) => self.switch_mode(kind, ModeArgument::None),
        }
    }

    /// Converges on a mode switch that originated outside the engine. A
    /// matching kind is a no-op, which breaks the writeback cycle between the
    /// engine and the underlying buffer.
    pub fn converge_mode(&mut self, kind: ModeKind, argument: ModeArgument) -> Result<ModeKind> {
        if kind == self.registry.current_kind() {
            return Ok(kind);
        }
        self.switch_mode(kind, argument)
    }

    /// Tears the engine down. A second call fails with `AlreadyClosed`.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(VimError::AlreadyClosed);
        }
        self.closed = true;

        if let Some(mode) = self.registry.current_mut() {
            mode.on_leave();
        }
        for kind in self.registry.kinds() {
            if let Some(mode) = self.registry.get_mut(kind) {
                mode.on_close();
            }
        }

        if let Some(host) = self.host.take() {
            host.borrow_mut().clear_jump_list();
        }

        self.buffered_input = None;
        self.one_time_mode = None;
        self.dispatch_event(&EngineEvent::Closed);
        self.events.clear();
        Ok(())
    }

    fn dispatch_event(&self, event: &EngineEvent) {
        self.events.dispatch(event);
    }
}

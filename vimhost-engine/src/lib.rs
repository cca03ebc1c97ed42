pub mod engine;
pub mod events;
pub mod host;
pub mod mode;
pub mod registry;
pub mod remap;


// Re-export key types
pub use engine::VimEngine;
pub use events::{EngineEvent, EventDispatcher};
pub use host::{EditorHost, GlobalSettings, SwitchOrigin};
pub use mode::{Mode, ModeArgument, ModeSwitch, ProcessResult, UninitializedMode};
pub use registry::ModeRegistry;
pub use remap::{KeyMapEntry, KeyMapTable, KeyMapping, KeyMappingResult};

pub mod error;
pub mod ex;
pub mod keys;
pub mod types;

// Re-export key types
pub use error::{Result, VimError};
pub use ex::{LineCommand, LineRange, LineSpecifier, SubstituteFlags};
pub use keys::{KeyInput, KeyInputSet, KeyModifiers, KeyRemapMode, VimKey};
pub use types::{Mark, ModeKind, RegisterName};

use crate::types::ModeKind;
use thiserror::Error;

/// Errors surfaced by the command parser and the input engine.
///
/// The parser never panics; the first failure short-circuits the remainder of
/// the current command parse and is returned as one of these values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VimError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("E477: No ! allowed")]
    NoBangAllowed,

    #[error("E481: No range allowed")]
    NoRangeAllowed,

    #[error("E488: Trailing characters")]
    TrailingCharacters,

    #[error("E283: No marks matching \"{0}\"")]
    NoMarksMatching(char),

    #[error("E474: Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid key notation: {0}")]
    InvalidKeyNotation(String),

    #[error("recursive mapping")]
    RecursiveMapping,

    #[error("the input engine is already closed")]
    AlreadyClosed,

    #[error("mode {0:?} is not registered")]
    UnknownMode(ModeKind),
}

pub type Result<T> = std::result::Result<T, VimError>;

//! The line-command AST produced by the parser and consumed by an external
//! interpreter.

use crate::keys::KeyRemapMode;
use crate::types::{Mark, RegisterName};
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// One element of a line range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSpecifier {
    CurrentLine,
    LastLine,
    MarkLine(Mark),
    Number(u32),
    NextLineWithPattern(String),
    PreviousLineWithPattern(String),
    NextLineWithPreviousPattern,
    PreviousLineWithPreviousPattern,
    NextLineWithPreviousSubstitutePattern,
    /// A bare `+N` / `-N` relative to the current line.
    AdjustmentOnCurrent(i32),
    /// A base specifier followed by a trailing `+N` / `-N`.
    LineSpecifierWithAdjustment(Box<LineSpecifier>, i32),
}

/// The line range prefixing a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRange {
    EntireBuffer,
    SingleLine(LineSpecifier),
    Range {
        start: LineSpecifier,
        end: LineSpecifier,
        /// True for `;` ranges, where the end specifier is resolved after
        /// moving the cursor to the start line.
        includes_current_line: bool,
    },
}

/// Flag set accepted by `:substitute` and its repeat forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubstituteFlags(u16);

impl SubstituteFlags {
    pub const NONE: SubstituteFlags = SubstituteFlags(0);
    pub const CONFIRM: SubstituteFlags = SubstituteFlags(1);
    pub const USE_PREVIOUS_SEARCH_PATTERN: SubstituteFlags = SubstituteFlags(1 << 1);
    pub const SUPPRESS_ERROR: SubstituteFlags = SubstituteFlags(1 << 2);
    pub const REPLACE_ALL: SubstituteFlags = SubstituteFlags(1 << 3);
    pub const IGNORE_CASE: SubstituteFlags = SubstituteFlags(1 << 4);
    pub const ORDINAL_CASE: SubstituteFlags = SubstituteFlags(1 << 5);
    pub const REPORT_ONLY: SubstituteFlags = SubstituteFlags(1 << 6);
    pub const PRINT_LAST: SubstituteFlags = SubstituteFlags(1 << 7);
    pub const PRINT_LAST_WITH_LIST: SubstituteFlags = SubstituteFlags(1 << 8);
    pub const PRINT_LAST_WITH_NUMBER: SubstituteFlags = SubstituteFlags(1 << 9);
    pub const USE_PREVIOUS_FLAGS: SubstituteFlags = SubstituteFlags(1 << 10);
    pub const MAGIC: SubstituteFlags = SubstituteFlags(1 << 11);
    pub const NOMAGIC: SubstituteFlags = SubstituteFlags(1 << 12);

    /// The flag a single trailing character stands for, if any.
    pub fn of_char(c: char) -> Option<SubstituteFlags> {
        let flag = match c {
            'c' => Self::CONFIRM,
            'r' => Self::USE_PREVIOUS_SEARCH_PATTERN,
            'e' => Self::SUPPRESS_ERROR,
            'g' => Self::REPLACE_ALL,
            'i' => Self::IGNORE_CASE,
            'I' => Self::ORDINAL_CASE,
            'n' => Self::REPORT_ONLY,
            'p' => Self::PRINT_LAST,
            'l' => Self::PRINT_LAST_WITH_LIST,
            '#' => Self::PRINT_LAST_WITH_NUMBER,
            '&' => Self::USE_PREVIOUS_FLAGS,
            _ => return None,
        };
        Some(flag)
    }

    pub fn contains(self, other: SubstituteFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: SubstituteFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: SubstituteFlags) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SubstituteFlags {
    type Output = SubstituteFlags;

    fn bitor(self, rhs: SubstituteFlags) -> SubstituteFlags {
        SubstituteFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for SubstituteFlags {
    fn bitor_assign(&mut self, rhs: SubstituteFlags) {
        self.0 |= rhs.0;
    }
}

/// One item of a `:set` argument chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetArgument {
    /// `all`
    DisplayAllButTerminal,
    /// `termcap`
    DisplayAllTerminal,
    /// `all&`
    ResetAllToDefault,
    /// `name`
    DisplaySetting(String),
    /// `noname`
    ToggleSetting(String),
    /// `invname` or `name!`
    InvertSetting(String),
    /// `name=value` or `name:value`
    AssignSetting(String, String),
    /// `name+=value`
    AddSetting(String, String),
    /// `name^=value`
    MultiplySetting(String, String),
    /// `name-=value`
    SubtractSetting(String, String),
}

/// The `+` argument of `:edit` and `:split`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOption {
    StartAtLastLine,
    StartAtLine(u32),
    StartAtPattern(String),
    ExecuteLineCommand(Box<LineCommand>),
}

/// `++opt` file options. The grammar is not parsed yet; commands that accept
/// them always carry an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOption {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// A parsed ex command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineCommand {
    ClearKeyMap {
        modes: Vec<KeyRemapMode>,
    },
    Close {
        bang: bool,
    },
    Delete {
        range: Option<LineRange>,
        register: Option<RegisterName>,
        count: Option<u32>,
    },
    DisplayKeyMap {
        modes: Vec<KeyRemapMode>,
        left: Option<String>,
    },
    DisplayMarks {
        marks: Vec<Mark>,
    },
    DisplayRegisters {
        register: Option<RegisterName>,
    },
    Edit {
        bang: bool,
        file_options: Vec<FileOption>,
        command_option: Option<CommandOption>,
        file: String,
    },
    Fold {
        range: Option<LineRange>,
    },
    GotoFirstTab,
    GotoLastTab,
    GotoNextTab {
        count: Option<u32>,
    },
    GotoPreviousTab {
        count: Option<u32>,
    },
    Join {
        range: Option<LineRange>,
        count: Option<u32>,
    },
    JumpToLastLine,
    JumpToLine(u32),
    Make {
        bang: bool,
        arguments: String,
    },
    MapKeys {
        left: String,
        right: String,
        modes: Vec<KeyRemapMode>,
        allow_remap: bool,
    },
    NoHighlightSearch,
    PutAfter {
        range: Option<LineRange>,
        register: Option<RegisterName>,
    },
    PutBefore {
        range: Option<LineRange>,
        register: Option<RegisterName>,
    },
    Quit {
        bang: bool,
    },
    QuitAll {
        bang: bool,
    },
    QuitWithWrite {
        range: Option<LineRange>,
        bang: bool,
        file_options: Vec<FileOption>,
        file: Option<String>,
    },
    Redo,
    Retab {
        range: Option<LineRange>,
        bang: bool,
        tab_stop: Option<u32>,
    },
    Search {
        direction: SearchDirection,
        pattern: String,
    },
    Set {
        arguments: Vec<SetArgument>,
    },
    ShiftLeft {
        range: Option<LineRange>,
        count: Option<u32>,
    },
    ShiftRight {
        range: Option<LineRange>,
        count: Option<u32>,
    },
    Source {
        bang: bool,
        file: String,
    },
    Split {
        range: Option<LineRange>,
        file_options: Vec<FileOption>,
        command_option: Option<CommandOption>,
    },
    Substitute {
        range: Option<LineRange>,
        pattern: String,
        replace: String,
        flags: SubstituteFlags,
        count: Option<u32>,
    },
    SubstituteRepeatLast {
        range: Option<LineRange>,
        flags: SubstituteFlags,
        count: Option<u32>,
    },
    SubstituteRepeatLastWithSearch {
        range: Option<LineRange>,
        flags: SubstituteFlags,
        count: Option<u32>,
    },
    UnmapKeys {
        left: String,
        modes: Vec<KeyRemapMode>,
    },
    Undo,
    Yank {
        range: Option<LineRange>,
        register: Option<RegisterName>,
        count: Option<u32>,
    },
}

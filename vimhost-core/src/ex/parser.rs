//! The single-pass recursive parser for ex command lines.

use super::command::{
    CommandOption, FileOption, LineCommand, LineRange, SearchDirection, SetArgument,
    SubstituteFlags,
};
use super::cursor::CharCursor;
use super::names::expand;
use crate::error::{Result, VimError};
use crate::keys::KeyRemapMode;
use crate::types::{Mark, RegisterName};

/// Parser for one ex command line.
pub struct CommandParser<'a> {
    pub(crate) cursor: CharCursor<'a>,
}

impl<'a> CommandParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            cursor: CharCursor::new(text),
        }
    }

    /// Parses a complete command line. A single leading `:` is tolerated.
    pub fn parse(text: &str) -> Result<LineCommand> {
        let text = text.strip_prefix(':').unwrap_or(text);
        CommandParser::new(text).parse_single_command()
    }

    /// Parses one command and requires the rest of the line to be blank.
    pub fn parse_single_command(&mut self) -> Result<LineCommand> {
        let command = self.parse_single_command_core()?;
        self.cursor.skip_blanks();
        if !self.cursor.is_at_end() {
            return Err(VimError::TrailingCharacters);
        }
        Ok(command)
    }

    /// Parses one command without the trailing-characters check; also the
    /// entry point for the recursive `+command` option parse.
    fn parse_single_command_core(&mut self) -> Result<LineCommand> {
        self.cursor.skip_blanks();

        // A bare number or `$` is a jump; anything following makes the token
        // an ordinary line-range element instead.
        if let Some(c) = self.cursor.peek() {
            if c.is_ascii_digit() {
                let start = self.cursor.index();
                if let Some(number) = self.cursor.parse_number() {
                    self.cursor.skip_blanks();
                    if self.cursor.is_at_end() {
                        return Ok(LineCommand::JumpToLine(number));
                    }
                }
                self.cursor.reset(start);
            } else if c == '$' {
                let start = self.cursor.index();
                self.cursor.advance();
                self.cursor.skip_blanks();
                if self.cursor.is_at_end() {
                    return Ok(LineCommand::JumpToLastLine);
                }
                self.cursor.reset(start);
            }
        }

        let range = self.parse_line_range();
        self.cursor.skip_blanks();

        let name = match self.cursor.peek() {
            Some(c) if c.is_ascii_alphabetic() => self
                .cursor
                .parse_while(|c| c.is_ascii_alphabetic())
                .unwrap_or_default(),
            Some(c) => {
                self.cursor.advance();
                c.to_string()
            }
            None => String::new(),
        };

        match expand(&name) {
            "close" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                Ok(LineCommand::Close { bang })
            }
            "delete" => {
                let (register, count) = self.parse_register_and_count();
                Ok(LineCommand::Delete {
                    range,
                    register,
                    count,
                })
            }
            "yank" => {
                let (register, count) = self.parse_register_and_count();
                Ok(LineCommand::Yank {
                    range,
                    register,
                    count,
                })
            }
            "put" => {
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let register = self.parse_register_name();
                if bang {
                    Ok(LineCommand::PutBefore { range, register })
                } else {
                    Ok(LineCommand::PutAfter { range, register })
                }
            }
            "join" => {
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::Join { range, count })
            }
            "edit" => {
                Self::reject_range(&range)?;
                self.parse_edit()
            }
            "quit" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                Ok(LineCommand::Quit { bang })
            }
            "qall" | "quitall" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                Ok(LineCommand::QuitAll { bang })
            }
            "wq" | "xit" | "exit" => self.parse_quit_with_write(range),
            "make" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let arguments = self.cursor.parse_to_end_of_line();
                Ok(LineCommand::Make { bang, arguments })
            }
            "fold" => Ok(LineCommand::Fold { range }),
            "retab" => {
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let tab_stop = self.cursor.parse_number();
                Ok(LineCommand::Retab {
                    range,
                    bang,
                    tab_stop,
                })
            }
            "source" => {
                Self::reject_range(&range)?;
                let bang = self.cursor.parse_bang();
                self.cursor.skip_blanks();
                let file = self.cursor.parse_to_end_of_line();
                Ok(LineCommand::Source { bang, file })
            }
            "split" => {
                self.cursor.skip_blanks();
                let file_options = self.parse_file_options();
                self.cursor.skip_blanks();
                let command_option = self.parse_command_option()?;
                Ok(LineCommand::Split {
                    range,
                    file_options,
                    command_option,
                })
            }
            "set" => {
                Self::reject_range(&range)?;
                self.parse_set()
            }
            "registers" | "display" => {
                Self::reject_range(&range)?;
                self.cursor.skip_blanks();
                let register = self.parse_register_name();
                Ok(LineCommand::DisplayRegisters { register })
            }
            "marks" => {
                Self::reject_range(&range)?;
                self.parse_marks()
            }
            "tabnext" => {
                Self::reject_range(&range)?;
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::GotoNextTab { count })
            }
            "tabprevious" | "tabNext" => {
                Self::reject_range(&range)?;
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::GotoPreviousTab { count })
            }
            "tabfirst" | "tabrewind" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::GotoFirstTab)
            }
            "tablast" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::GotoLastTab)
            }
            "substitute" => self.parse_substitute(range, SubstituteFlags::NONE),
            "smagic" => {
                let forced = SubstituteFlags::MAGIC;
                self.parse_substitute(range, forced)
            }
            "snomagic" => {
                let forced = SubstituteFlags::NOMAGIC;
                self.parse_substitute(range, forced)
            }
            "&" => {
                let flags = self.parse_substitute_flags();
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::SubstituteRepeatLast {
                    range,
                    flags,
                    count,
                })
            }
            "~" => {
                let flags = self.parse_substitute_flags();
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::SubstituteRepeatLastWithSearch {
                    range,
                    flags,
                    count,
                })
            }
            "/" => {
                Self::reject_range(&range)?;
                let pattern = self.cursor.parse_to_end_of_line();
                Ok(LineCommand::Search {
                    direction: SearchDirection::Forward,
                    pattern,
                })
            }
            "?" => {
                Self::reject_range(&range)?;
                let pattern = self.cursor.parse_to_end_of_line();
                Ok(LineCommand::Search {
                    direction: SearchDirection::Backward,
                    pattern,
                })
            }
            "<" => {
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::ShiftLeft { range, count })
            }
            ">" => {
                self.cursor.skip_blanks();
                let count = self.cursor.parse_number();
                Ok(LineCommand::ShiftRight { range, count })
            }
            "nohlsearch" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::NoHighlightSearch)
            }
            "redo" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::Redo)
            }
            "undo" => {
                Self::reject_range(&range)?;
                Ok(LineCommand::Undo)
            }
            "map" | "nmap" | "vmap" | "xmap" | "smap" | "omap" | "imap" | "lmap" | "cmap" => {
                Self::reject_range(&range)?;
                let canonical = expand(&name).to_string();
                self.parse_map_keys(&canonical, true)
            }
            "noremap" | "nnoremap" | "vnoremap" | "xnoremap" | "snoremap" | "onoremap"
            | "inoremap" | "lnoremap" | "cnoremap" => {
                Self::reject_range(&range)?;
                let canonical = expand(&name).to_string();
                self.parse_map_keys(&canonical, false)
            }
            "unmap" | "nunmap" | "vunmap" | "xunmap" | "sunmap" | "ounmap" | "iunmap"
            | "lunmap" | "cunmap" => {
                Self::reject_range(&range)?;
                let canonical = expand(&name).to_string();
                self.parse_unmap_keys(&canonical)
            }
            "mapclear" | "nmapclear" | "vmapclear" | "xmapclear" | "smapclear" | "omapclear"
            | "imapclear" | "lmapclear" | "cmapclear" => {
                Self::reject_range(&range)?;
                let canonical = expand(&name).to_string();
                self.parse_map_clear(&canonical)
            }
            "" => Err(VimError::Parse("expected a command".to_string())),
            unknown => Err(VimError::Parse(format!("unknown command: {}", unknown))),
        }
    }

    fn reject_range(range: &Option<LineRange>) -> Result<()> {
        if range.is_some() {
            Err(VimError::NoRangeAllowed)
        } else {
            Ok(())
        }
    }

    /// A register name standing on its own; digits are left alone so they can
    /// be picked up as counts.
    fn parse_register_name(&mut self) -> Option<RegisterName> {
        let c = self.cursor.peek()?;
        if c.is_ascii_digit() {
            return None;
        }
        let register = RegisterName::of(c)?;
        self.cursor.advance();
        Some(register)
    }

    fn parse_register_and_count(&mut self) -> (Option<RegisterName>, Option<u32>) {
        self.cursor.skip_blanks();
        let register = self.parse_register_name();
        self.cursor.skip_blanks();
        let count = self.cursor.parse_number();
        (register, count)
    }

    fn parse_edit(&mut self) -> Result<LineCommand> {
        let bang = self.cursor.parse_bang();
        self.cursor.skip_blanks();
        let file_options = self.parse_file_options();
        self.cursor.skip_blanks();
        let command_option = self.parse_command_option()?;
        self.cursor.skip_blanks();
        let file = self.cursor.parse_to_end_of_line();
        Ok(LineCommand::Edit {
            bang,
            file_options,
            command_option,
            file,
        })
    }

    fn parse_quit_with_write(&mut self, range: Option<LineRange>) -> Result<LineCommand> {
        let bang = self.cursor.parse_bang();
        self.cursor.skip_blanks();
        let file_options = self.parse_file_options();
        self.cursor.skip_blanks();
        let rest = self.cursor.parse_to_end_of_line();
        let file = if rest.is_empty() { None } else { Some(rest) };
        Ok(LineCommand::QuitWithWrite {
            range,
            bang,
            file_options,
            file,
        })
    }

    /// `++opt` file options are recognized nowhere yet; the list stays empty
    /// until the grammar is pinned down.
    fn parse_file_options(&mut self) -> Vec<FileOption> {
        Vec::new()
    }

    /// The `+` command option of `:edit` and `:split`.
    fn parse_command_option(&mut self) -> Result<Option<CommandOption>> {
        if self.cursor.peek() != Some('+') {
            return Ok(None);
        }
        let start = self.cursor.index();
        self.cursor.advance();

        match self.cursor.peek() {
            None => Ok(Some(CommandOption::StartAtLastLine)),
            Some(c) if c.is_ascii_digit() => match self.cursor.parse_number() {
                Some(n) => Ok(Some(CommandOption::StartAtLine(n))),
                None => Ok(None),
            },
            Some('/') => {
                self.cursor.advance();
                let pattern = self.cursor.parse_to_end_of_line();
                Ok(Some(CommandOption::StartAtPattern(pattern)))
            }
            Some(_) => match self.parse_single_command_core() {
                Ok(command) => Ok(Some(CommandOption::ExecuteLineCommand(Box::new(command)))),
                Err(_) => {
                    self.cursor.reset(start);
                    Ok(None)
                }
            },
        }
    }

    fn parse_set(&mut self) -> Result<LineCommand> {
        let mut arguments = Vec::new();
        loop {
            self.cursor.skip_blanks();
            if self.cursor.is_at_end() {
                break;
            }
            arguments.push(self.parse_set_argument()?);
        }
        Ok(LineCommand::Set { arguments })
    }

    fn parse_set_argument(&mut self) -> Result<SetArgument> {
        let name = self
            .cursor
            .parse_while(|c| c.is_ascii_alphanumeric())
            .unwrap_or_default();

        if name.is_empty() {
            return Err(VimError::Parse(format!(
                "invalid :set argument: {}",
                self.cursor.remaining()
            )));
        }

        if name == "all" {
            if self.cursor.peek() == Some('&') {
                self.cursor.advance();
                return Ok(SetArgument::ResetAllToDefault);
            }
            return Ok(SetArgument::DisplayAllButTerminal);
        }
        if name == "termcap" {
            return Ok(SetArgument::DisplayAllTerminal);
        }
        if let Some(setting) = name.strip_prefix("no") {
            if !setting.is_empty() {
                return Ok(SetArgument::ToggleSetting(setting.to_string()));
            }
        }
        if let Some(setting) = name.strip_prefix("inv") {
            if !setting.is_empty() {
                return Ok(SetArgument::InvertSetting(setting.to_string()));
            }
        }

        match self.cursor.peek() {
            Some('!') => {
                self.cursor.advance();
                Ok(SetArgument::InvertSetting(name))
            }
            Some(':') | Some('=') => {
                self.cursor.advance();
                let value = self.cursor.parse_word().unwrap_or_default();
                Ok(SetArgument::AssignSetting(name, value))
            }
            Some(operator @ ('+' | '^' | '-')) => {
                self.cursor.advance();
                if self.cursor.peek() != Some('=') {
                    return Err(VimError::Parse(format!(
                        "invalid :set argument: {}{}",
                        name, operator
                    )));
                }
                self.cursor.advance();
                let value = self.cursor.parse_word().unwrap_or_default();
                Ok(match operator {
                    '+' => SetArgument::AddSetting(name, value),
                    '^' => SetArgument::MultiplySetting(name, value),
                    _ => SetArgument::SubtractSetting(name, value),
                })
            }
            _ => Ok(SetArgument::DisplaySetting(name)),
        }
    }

    fn parse_marks(&mut self) -> Result<LineCommand> {
        self.cursor.skip_blanks();
        let mut marks = Vec::new();
        if let Some(word) = self.cursor.parse_word() {
            for c in word.chars() {
                match Mark::of(c) {
                    Some(mark) => marks.push(mark),
                    None => return Err(VimError::NoMarksMatching(c)),
                }
            }
        }
        Ok(LineCommand::DisplayMarks { marks })
    }

    fn parse_substitute(
        &mut self,
        range: Option<LineRange>,
        forced_flags: SubstituteFlags,
    ) -> Result<LineCommand> {
        self.cursor.skip_blanks();

        let mut pattern = String::new();
        let mut replace = String::new();
        let mut flags = SubstituteFlags::NONE;
        let mut count = None;

        match self.cursor.peek() {
            Some(delimiter) if Self::is_substitute_delimiter(delimiter) => {
                self.cursor.advance();
                match self.cursor.parse_pattern(delimiter) {
                    Some(parsed) => {
                        pattern = parsed;
                        match self.cursor.parse_pattern(delimiter) {
                            Some(parsed) => {
                                replace = parsed;
                                flags = self.parse_substitute_flags();
                                self.cursor.skip_blanks();
                                count = self.cursor.parse_number();
                            }
                            // `:s/foo/bar` with no final delimiter: the
                            // replacement runs to the end of the line.
                            None => replace = self.cursor.parse_to_end_of_line(),
                        }
                    }
                    // `:s/foo` unclosed: the pattern runs to the end of the line.
                    None => pattern = self.cursor.parse_to_end_of_line(),
                }
            }
            // Bare `:s [flags] [count]` reuses the previous pattern.
            _ => {
                flags = self.parse_substitute_flags();
                self.cursor.skip_blanks();
                count = self.cursor.parse_number();
            }
        }

        if forced_flags.contains(SubstituteFlags::MAGIC) {
            flags.remove(SubstituteFlags::NOMAGIC);
            flags.insert(SubstituteFlags::MAGIC);
        }
        if forced_flags.contains(SubstituteFlags::NOMAGIC) {
            flags.remove(SubstituteFlags::MAGIC);
            flags.insert(SubstituteFlags::NOMAGIC);
        }

        Ok(LineCommand::Substitute {
            range,
            pattern,
            replace,
            flags,
            count,
        })
    }

    fn is_substitute_delimiter(c: char) -> bool {
        !c.is_alphanumeric() && c != '\\' && c != '"' && c != '|'
    }

    fn parse_substitute_flags(&mut self) -> SubstituteFlags {
        let mut flags = SubstituteFlags::NONE;
        while let Some(flag) = self.cursor.peek().and_then(SubstituteFlags::of_char) {
            flags.insert(flag);
            self.cursor.advance();
        }
        flags
    }

    /// The remap modes a map-family command addresses, derived from its
    /// canonical name prefix.
    fn map_command_modes(canonical: &str) -> Vec<KeyRemapMode> {
        match canonical.chars().next() {
            Some('n') if canonical != "noremap" => vec![KeyRemapMode::Normal],
            Some('v') => vec![KeyRemapMode::Visual, KeyRemapMode::Select],
            Some('x') => vec![KeyRemapMode::Visual],
            Some('s') => vec![KeyRemapMode::Select],
            Some('o') => vec![KeyRemapMode::OperatorPending],
            Some('i') => vec![KeyRemapMode::Insert],
            Some('c') => vec![KeyRemapMode::Command],
            Some('l') => vec![KeyRemapMode::Language],
            _ => vec![
                KeyRemapMode::Normal,
                KeyRemapMode::Visual,
                KeyRemapMode::Select,
                KeyRemapMode::OperatorPending,
            ],
        }
    }

    fn is_unprefixed_map_command(canonical: &str) -> bool {
        matches!(canonical, "map" | "noremap" | "unmap" | "mapclear")
    }

    /// A `!` on the generic map commands retargets them at Insert and
    /// Command; on the prefixed variants it is an error.
    fn parse_map_bang_modes(&mut self, canonical: &str) -> Result<Vec<KeyRemapMode>> {
        let bang = self.cursor.parse_bang();
        if bang && !Self::is_unprefixed_map_command(canonical) {
            return Err(VimError::NoBangAllowed);
        }
        if bang {
            Ok(vec![KeyRemapMode::Insert, KeyRemapMode::Command])
        } else {
            Ok(Self::map_command_modes(canonical))
        }
    }

    fn parse_map_keys(&mut self, canonical: &str, allow_remap: bool) -> Result<LineCommand> {
        let modes = self.parse_map_bang_modes(canonical)?;
        self.cursor.skip_blanks();
        let Some(left) = self.cursor.parse_word() else {
            return Ok(LineCommand::DisplayKeyMap { modes, left: None });
        };
        self.cursor.skip_blanks();
        let right = self.cursor.parse_to_end_of_line();
        if right.is_empty() {
            return Ok(LineCommand::DisplayKeyMap {
                modes,
                left: Some(left),
            });
        }
        Ok(LineCommand::MapKeys {
            left,
            right,
            modes,
            allow_remap,
        })
    }

    fn parse_unmap_keys(&mut self, canonical: &str) -> Result<LineCommand> {
        let modes = self.parse_map_bang_modes(canonical)?;
        self.cursor.skip_blanks();
        match self.cursor.parse_word() {
            Some(left) => Ok(LineCommand::UnmapKeys { left, modes }),
            None => Err(VimError::InvalidArgument(
                "unmap requires a key notation".to_string(),
            )),
        }
    }

    fn parse_map_clear(&mut self, canonical: &str) -> Result<LineCommand> {
        let modes = self.parse_map_bang_modes(canonical)?;
        Ok(LineCommand::ClearKeyMap { modes })
    }
}

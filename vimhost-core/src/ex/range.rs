//! Line-range parsing: single specifiers and `,` / `;` composites.

use super::command::{LineRange, LineSpecifier};
use super::parser::CommandParser;
use crate::types::Mark;

impl<'a> CommandParser<'a> {
    /// Parses a line range at the current index.
    ///
    /// Returns `None` without moving the index when no specifier is present.
    /// On a partial parse that fails after `,` or `;` the result is also
    /// `None`, but the index is left one past the separator.
    pub fn parse_line_range(&mut self) -> Option<LineRange> {
        if self.cursor.peek() == Some('%') {
            self.cursor.advance();
            return Some(LineRange::EntireBuffer);
        }

        let left = self.parse_line_specifier()?;

        let includes_current_line = match self.cursor.peek() {
            Some(',') => false,
            Some(';') => true,
            _ => return Some(LineRange::SingleLine(left)),
        };
        self.cursor.advance();

        let right = self.parse_line_specifier()?;
        Some(LineRange::Range {
            start: left,
            end: right,
            includes_current_line,
        })
    }

    /// Parses one line specifier; the index is restored when nothing valid
    /// starts here.
    pub fn parse_line_specifier(&mut self) -> Option<LineSpecifier> {
        let start = self.cursor.index();

        let base = match self.cursor.peek()? {
            '.' => {
                self.cursor.advance();
                LineSpecifier::CurrentLine
            }
            '$' | '%' => {
                self.cursor.advance();
                LineSpecifier::LastLine
            }
            '\'' => {
                self.cursor.advance();
                match self.cursor.parse_char().and_then(Mark::of) {
                    Some(mark) => LineSpecifier::MarkLine(mark),
                    None => {
                        self.cursor.reset(start);
                        return None;
                    }
                }
            }
            '/' => {
                self.cursor.advance();
                match self.cursor.parse_pattern('/') {
                    Some(pattern) if pattern.is_empty() => {
                        LineSpecifier::NextLineWithPreviousPattern
                    }
                    Some(pattern) => LineSpecifier::NextLineWithPattern(pattern),
                    None => {
                        self.cursor.reset(start);
                        return None;
                    }
                }
            }
            '?' => {
                self.cursor.advance();
                match self.cursor.parse_pattern('?') {
                    Some(pattern) if pattern.is_empty() => {
                        LineSpecifier::PreviousLineWithPreviousPattern
                    }
                    Some(pattern) => LineSpecifier::PreviousLineWithPattern(pattern),
                    None => {
                        self.cursor.reset(start);
                        return None;
                    }
                }
            }
            '\\' => {
                self.cursor.advance();
                match self.cursor.parse_char() {
                    Some('/') => LineSpecifier::NextLineWithPreviousPattern,
                    Some('?') => LineSpecifier::PreviousLineWithPreviousPattern,
                    Some('&') => LineSpecifier::NextLineWithPreviousSubstitutePattern,
                    _ => {
                        self.cursor.reset(start);
                        return None;
                    }
                }
            }
            '+' => {
                self.cursor.advance();
                let n = self.cursor.parse_number().unwrap_or(1).min(i32::MAX as u32);
                LineSpecifier::AdjustmentOnCurrent(n as i32)
            }
            '-' => {
                self.cursor.advance();
                let n = self.cursor.parse_number().unwrap_or(1).min(i32::MAX as u32);
                LineSpecifier::AdjustmentOnCurrent(-(n as i32))
            }
            c if c.is_ascii_digit() => match self.cursor.parse_number() {
                Some(n) => LineSpecifier::Number(n),
                None => return None,
            },
            _ => return None,
        };

        Some(self.parse_trailing_adjustment(base))
    }

    /// A `+` or `-` with an optional count directly after a base specifier.
    fn parse_trailing_adjustment(&mut self, base: LineSpecifier) -> LineSpecifier {
        let adjustment = match self.cursor.peek() {
            Some('+') => {
                self.cursor.advance();
                self.cursor.parse_number().unwrap_or(1).min(i32::MAX as u32) as i32
            }
            Some('-') => {
                self.cursor.advance();
                -(self.cursor.parse_number().unwrap_or(1).min(i32::MAX as u32) as i32)
            }
            _ => return base,
        };
        LineSpecifier::LineSpecifierWithAdjustment(Box::new(base), adjustment)
    }
}

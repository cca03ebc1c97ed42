//! Vim key-notation codec: `<C-x>`, `<CR>`, `abc` and friends.
//!
//! Map commands carry their key arguments as raw notation strings; this
//! module converts between that syntax and `KeyInputSet`.

use super::{KeyInput, KeyInputSet, KeyModifiers, VimKey};
use crate::error::{Result, VimError};
use std::fmt;

/// Parses a whole notation string into a key sequence.
///
/// Bare characters map to themselves; bracketed names (`<CR>`, `<C-x>`,
/// `<S-Tab>`) map to named or modified keys. An unterminated or unrecognized
/// bracketed form, or an empty input, is an error.
pub fn parse_key_notation(text: &str) -> Result<KeyInputSet> {
    let mut inputs = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut index = 0;

    while index < chars.len() {
        if chars[index] == '<' {
            let close = chars[index..]
                .iter()
                .position(|&c| c == '>')
                .map(|offset| index + offset);
            match close {
                Some(close) if close > index + 1 => {
                    let inner: String = chars[index + 1..close].iter().collect();
                    inputs.push(parse_bracketed(&inner, text)?);
                    index = close + 1;
                }
                _ => {
                    // A lone '<' with no closing bracket is the literal key.
                    inputs.push(KeyInput::char('<'));
                    index += 1;
                }
            }
        } else {
            inputs.push(KeyInput::char(chars[index]));
            index += 1;
        }
    }

    KeyInputSet::from_vec(inputs).ok_or_else(|| VimError::InvalidKeyNotation(text.to_string()))
}

fn parse_bracketed(inner: &str, whole: &str) -> Result<KeyInput> {
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = inner;

    // Strip modifier prefixes, but never the trailing token itself so that
    // forms like <C--> keep their '-' key.
    loop {
        if rest.len() <= 2 {
            break;
        }
        if rest.starts_with("C-") || rest.starts_with("c-") {
            modifiers.control = true;
        } else if rest.starts_with("S-") || rest.starts_with("s-") {
            modifiers.shift = true;
        } else if rest.starts_with("A-")
            || rest.starts_with("a-")
            || rest.starts_with("M-")
            || rest.starts_with("m-")
        {
            modifiers.alt = true;
        } else {
            break;
        }
        rest = &rest[2..];
    }

    let mut chars = rest.chars();
    let key = match (chars.next(), chars.next()) {
        (Some(c), None) => VimKey::Char(c),
        _ => match named_key(rest) {
            Some(key) => key,
            None => return Err(VimError::InvalidKeyNotation(whole.to_string())),
        },
    };

    Ok(KeyInput::new(key, modifiers))
}

fn named_key(name: &str) -> Option<VimKey> {
    let folded = name.to_ascii_lowercase();
    let key = match folded.as_str() {
        "nop" => VimKey::Nop,
        "esc" => VimKey::Escape,
        "cr" | "enter" | "return" => VimKey::Enter,
        "tab" => VimKey::Tab,
        "bs" => VimKey::Back,
        "del" => VimKey::Delete,
        "up" => VimKey::Up,
        "down" => VimKey::Down,
        "left" => VimKey::Left,
        "right" => VimKey::Right,
        "home" => VimKey::Home,
        "end" => VimKey::End,
        "pageup" => VimKey::PageUp,
        "pagedown" => VimKey::PageDown,
        "space" => VimKey::Char(' '),
        "lt" => VimKey::Char('<'),
        _ => {
            let number = folded.strip_prefix('f')?.parse::<u8>().ok()?;
            if number == 0 || number > 12 {
                return None;
            }
            VimKey::Function(number)
        }
    };
    Some(key)
}

fn key_name(key: VimKey) -> Option<&'static str> {
    let name = match key {
        VimKey::Nop => "Nop",
        VimKey::Escape => "Esc",
        VimKey::Enter => "CR",
        VimKey::Tab => "Tab",
        VimKey::Back => "BS",
        VimKey::Delete => "Del",
        VimKey::Up => "Up",
        VimKey::Down => "Down",
        VimKey::Left => "Left",
        VimKey::Right => "Right",
        VimKey::Home => "Home",
        VimKey::End => "End",
        VimKey::PageUp => "PageUp",
        VimKey::PageDown => "PageDown",
        _ => return None,
    };
    Some(name)
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prefix = String::new();
        if self.modifiers.control {
            prefix.push_str("C-");
        }
        if self.modifiers.shift {
            prefix.push_str("S-");
        }
        if self.modifiers.alt {
            prefix.push_str("A-");
        }

        match self.key {
            VimKey::Char(c) if prefix.is_empty() => match c {
                ' ' => write!(f, "<Space>"),
                '<' => write!(f, "<Lt>"),
                _ => write!(f, "{}", c),
            },
            VimKey::Char(c) => write!(f, "<{}{}>", prefix, c),
            VimKey::Function(n) => write!(f, "<{}F{}>", prefix, n),
            key => match key_name(key) {
                Some(name) => write!(f, "<{}{}>", prefix, name),
                None => Ok(()),
            },
        }
    }
}

impl fmt::Display for KeyInputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in self.keys() {
            write!(f, "{}", input)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_characters() {
        let set = parse_key_notation("gg").unwrap();
        assert_eq!(set.keys(), &[KeyInput::char('g'), KeyInput::char('g')]);
    }

    #[test]
    fn test_parse_control_key() {
        let set = parse_key_notation("<C-x>").unwrap();
        assert_eq!(set.keys(), &[KeyInput::ctrl('x')]);
    }

    #[test]
    fn test_parse_lowercase_modifiers() {
        assert_eq!(
            parse_key_notation("<c-x>").unwrap().keys(),
            &[KeyInput::ctrl('x')]
        );
        let shift_tab = KeyInput::new(
            VimKey::Tab,
            KeyModifiers {
                shift: true,
                ..KeyModifiers::NONE
            },
        );
        assert_eq!(parse_key_notation("<s-tab>").unwrap().keys(), &[shift_tab]);

        let alt_x = KeyInput::new(
            VimKey::Char('x'),
            KeyModifiers {
                alt: true,
                ..KeyModifiers::NONE
            },
        );
        assert_eq!(parse_key_notation("<a-x>").unwrap().keys(), &[alt_x]);
        assert_eq!(parse_key_notation("<m-x>").unwrap().keys(), &[alt_x]);
        assert_eq!(parse_key_notation("<M-x>").unwrap().keys(), &[alt_x]);
    }

    #[test]
    fn test_parse_named_keys() {
        let set = parse_key_notation("<Esc><CR><Tab>").unwrap();
        assert_eq!(
            set.keys(),
            &[
                KeyInput::escape(),
                KeyInput::enter(),
                KeyInput::named(VimKey::Tab)
            ]
        );
    }

    #[test]
    fn test_parse_mixed_sequence() {
        let set = parse_key_notation(":echo<CR>").unwrap();
        assert_eq!(set.len(), 6);
        assert_eq!(set.first(), KeyInput::char(':'));
        assert_eq!(set.keys()[5], KeyInput::enter());
    }

    #[test]
    fn test_parse_modifier_on_named_key() {
        let set = parse_key_notation("<S-Tab>").unwrap();
        let expected = KeyInput::new(
            VimKey::Tab,
            KeyModifiers {
                shift: true,
                ..KeyModifiers::NONE
            },
        );
        assert_eq!(set.keys(), &[expected]);
    }

    #[test]
    fn test_parse_dash_key() {
        let set = parse_key_notation("<C-->").unwrap();
        assert_eq!(set.keys(), &[KeyInput::ctrl('-')]);
    }

    #[test]
    fn test_lone_angle_bracket_is_literal() {
        let set = parse_key_notation("a<b").unwrap();
        assert_eq!(
            set.keys(),
            &[KeyInput::char('a'), KeyInput::char('<'), KeyInput::char('b')]
        );
    }

    #[test]
    fn test_unknown_name_fails() {
        assert!(parse_key_notation("<NoSuchKey>").is_err());
        assert!(parse_key_notation("").is_err());
    }

    #[test]
    fn test_function_keys() {
        let set = parse_key_notation("<F5>").unwrap();
        assert_eq!(set.keys(), &[KeyInput::named(VimKey::Function(5))]);
        assert!(parse_key_notation("<F13>").is_err());
    }

    #[test]
    fn test_render_round_trip() {
        for text in ["gg", "<C-x>", "<Esc>", ":echo<CR>", "<Space>", "<Lt>x"] {
            let set = parse_key_notation(text).unwrap();
            let rendered = set.to_string();
            assert_eq!(parse_key_notation(&rendered).unwrap(), set);
        }
    }
}

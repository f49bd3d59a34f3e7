//! Parser for comma separated value literals.
//!
//! | Literal | Value |
//! |---------|-------|
//! | `1`, `-0`, `2.5e3`, `NaN`, `inf` | `Number` |
//! | `42n`, `-7n` | `Int` |
//! | `true`, `false` | `Bool` |
//! | `null`, `undefined` | `Null`, `Undefined` |
//! | `"a, b"` | `Str` (supports `\"`, `\\`, `\n`, `\t`) |
//! | `@name` | `Symbol`, one per name per parser |
//! | `&name` | `Object`, one per name per parser |
//! | `&` | a fresh `Object` |
//! | anything else | `Str` of the trimmed text |
//!
//! A sequence may be wrapped in `[...]`. An empty input (or `[]`) is the empty
//! sequence.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tupl_core::{Object, Symbol, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseValueError {
    #[error("unterminated string literal starting at byte {0}")]
    UnterminatedString(usize),
    #[error("invalid escape `\\{escape}` at byte {offset}")]
    InvalidEscape { offset: usize, escape: char },
    #[error("unexpected text after string literal at byte {0}")]
    TrailingText(usize),
    #[error("empty element at position {0}")]
    EmptyElement(usize),
    #[error("integer literal `{0}` does not fit in 64 bits")]
    IntOverflow(String),
}

/// Parses literal sequences, keeping named symbols and objects stable across
/// calls on the same parser.
#[derive(Default)]
pub struct LiteralParser {
    symbols: FxHashMap<String, Symbol>,
    objects: FxHashMap<String, Object>,
}

impl LiteralParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_sequence(&mut self, text: &str) -> Result<Vec<Value>, ParseValueError> {
        let (body, base) = strip_brackets(text);
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        split_elements(body, base)?
            .into_iter()
            .enumerate()
            .map(|(index, (offset, raw))| self.parse_element(raw, offset, index))
            .collect()
    }

    fn parse_element(
        &mut self,
        raw: &str,
        offset: usize,
        index: usize,
    ) -> Result<Value, ParseValueError> {
        let leading = raw.len() - raw.trim_start().len();
        let text = raw.trim();
        if text.is_empty() {
            return Err(ParseValueError::EmptyElement(index));
        }

        if text.starts_with('"') {
            return parse_string(text, offset + leading).map(Value::from);
        }

        match text {
            "undefined" => return Ok(Value::Undefined),
            "null" => return Ok(Value::Null),
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "&" => return Ok(Value::from(Object::new(()))),
            _ => {}
        }

        if let Some(name) = text.strip_prefix('@') {
            let symbol = self
                .symbols
                .entry(name.to_string())
                .or_insert_with(|| Symbol::new(name));
            return Ok(Value::from(symbol.clone()));
        }

        if let Some(name) = text.strip_prefix('&') {
            let object = self
                .objects
                .entry(name.to_string())
                .or_insert_with(|| Object::new(name.to_string()));
            return Ok(Value::from(object.clone()));
        }

        if let Some(digits) = text.strip_suffix('n').filter(|d| is_integer(d)) {
            return digits
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ParseValueError::IntOverflow(text.to_string()));
        }

        if let Ok(number) = text.parse::<f64>() {
            return Ok(Value::Number(number));
        }

        Ok(Value::from(text))
    }
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Remove one pair of enclosing brackets, returning the body and its byte offset.
fn strip_brackets(text: &str) -> (&str, usize) {
    let trimmed = text.trim();
    let start = text.len() - text.trim_start().len();
    match trimmed
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(inner) => (inner, start + 1),
        None => (text, 0),
    }
}

/// Split on commas outside string literals. Returns `(byte offset, raw element)`.
fn split_elements(body: &str, base: usize) -> Result<Vec<(usize, &str)>, ParseValueError> {
    let mut elements = Vec::new();
    let mut start = 0;
    let mut string_start = None;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if string_start.is_some() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                string_start = None;
            }
        } else if c == '"' {
            string_start = Some(i);
        } else if c == ',' {
            elements.push((base + start, &body[start..i]));
            start = i + 1;
        }
    }

    if let Some(open) = string_start {
        return Err(ParseValueError::UnterminatedString(base + open));
    }
    elements.push((base + start, &body[start..]));
    Ok(elements)
}

/// Decode a quoted string literal. `text` starts with `"`.
fn parse_string(text: &str, offset: usize) -> Result<String, ParseValueError> {
    let mut out = String::new();
    let mut chars = text.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                if i + 1 != text.len() {
                    return Err(ParseValueError::TrailingText(offset + i + 1));
                }
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, escape)) => {
                    return Err(ParseValueError::InvalidEscape {
                        offset: offset + i,
                        escape,
                    });
                }
                None => return Err(ParseValueError::UnterminatedString(offset)),
            },
            _ => out.push(c),
        }
    }
    Err(ParseValueError::UnterminatedString(offset))
}

#[cfg(test)]
#[path = "../tests/literal_tests.rs"]
mod tests;

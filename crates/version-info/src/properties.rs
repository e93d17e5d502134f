//! Reader for the flat `key=value` property format produced by the build.
//!
//! Follows the usual property-file rules: `#`/`!` comments, `=`, `:` or
//! whitespace as separator, backslash line continuations and `\uXXXX`
//! escapes. Later duplicates win.

use std::collections::HashMap;
use std::str::Chars;

use crate::error::MalformedReason;

/// Parsed key/value pairs of a property resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Parse raw bytes decoded as ISO-8859-1; other characters need `\uXXXX`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MalformedReason> {
        let text: String = bytes.iter().map(|&b| b as char).collect();
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, MalformedReason> {
        let mut entries = HashMap::new();
        let mut logical = String::new();
        let mut start_line = 0;
        let mut continuing = false;

        for (idx, raw) in NaturalLines::new(text).enumerate() {
            let line = raw.trim_start_matches(is_blank);

            if !continuing {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                start_line = idx + 1;
            }

            if trailing_backslashes(line) % 2 == 1 {
                logical.push_str(&line[..line.len() - 1]);
                continuing = true;
                continue;
            }

            logical.push_str(line);
            continuing = false;
            let (key, value) = split_entry(&logical, start_line)?;
            entries.insert(key, value);
            logical.clear();
        }

        // Input ended in the middle of a continuation.
        if continuing {
            let (key, value) = split_entry(&logical, start_line)?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lines ended by `\n`, `\r\n` or a lone `\r`.
struct NaturalLines<'a> {
    rest: &'a str,
}

impl<'a> NaturalLines<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for NaturalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find(|c: char| c == '\r' || c == '\n') {
            Some(i) => {
                let line = &self.rest[..i];
                let skip = if self.rest[i..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[i + skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn trailing_backslashes(line: &str) -> usize {
    line.chars().rev().take_while(|&c| c == '\\').count()
}

fn split_entry(logical: &str, line: usize) -> Result<(String, String), MalformedReason> {
    let mut key_end = logical.len();
    let mut value_start = logical.len();
    let mut escaped = false;

    for (i, c) in logical.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                let rest = logical[i..].trim_start_matches(is_blank);
                value_start = logical.len() - rest.len();
                if rest.starts_with('=') || rest.starts_with(':') {
                    value_start += 1;
                }
                break;
            }
            _ => {}
        }
    }

    let key = unescape(&logical[..key_end], line)?;
    let value = unescape(logical[value_start..].trim_start_matches(is_blank), line)?;
    Ok((key, value))
}

fn unescape(raw: &str, line: usize) -> Result<String, MalformedReason> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_hex4(&mut chars).ok_or(MalformedReason::InvalidEscape { line })?;
                let decoded = if (0xD800..=0xDBFF).contains(&unit) {
                    let mut ahead = chars.clone();
                    let low = match (ahead.next(), ahead.next()) {
                        (Some('\\'), Some('u')) => read_hex4(&mut ahead),
                        _ => None,
                    }
                    .filter(|low| (0xDC00..=0xDFFF).contains(low))
                    .ok_or(MalformedReason::InvalidEscape { line })?;
                    chars = ahead;
                    char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                } else {
                    char::from_u32(unit)
                };
                out.push(decoded.ok_or(MalformedReason::InvalidEscape { line })?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

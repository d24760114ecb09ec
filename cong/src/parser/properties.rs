//! Java-style `.properties` documents.
//!
//! Supports `#` and `!` comments, `=`, `:` or whitespace separators,
//! backslash line continuations and the usual escapes including `\uXXXX`.
//! Dotted keys become nested mappings.

use super::{Parser, text};
use crate::error::BoxError;
use crate::value::Value;

/// Line-oriented `key=value` parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertiesParser;

impl Parser for PropertiesParser {
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        let mut tree = Value::mapping();
        for line in logical_lines(text(data)?) {
            let (key, value) = split_pair(&line)?;
            if key.is_empty() {
                continue;
            }
            let path: Vec<&str> = key.split('.').collect();
            tree.insert_path(&path, Value::from(value));
        }
        Ok(tree)
    }
}

/// Join continued lines and drop blanks and comments.
fn logical_lines(input: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for raw in input.lines() {
        let trimmed = raw.trim_start();
        let line = match pending.take() {
            Some(mut acc) => {
                acc.push_str(trimmed);
                acc
            }
            None if trimmed.is_empty() || trimmed.starts_with(['#', '!']) => continue,
            None => trimmed.to_owned(),
        };
        if ends_with_continuation(&line) {
            let mut head = line;
            head.pop();
            pending = Some(head);
        } else {
            lines.push(line);
        }
    }
    lines.extend(pending);
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    !line.chars().rev().take_while(|c| *c == '\\').count().is_multiple_of(2)
}

fn split_pair(line: &str) -> Result<(String, String), BoxError> {
    let mut key = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => key.push(unescape(&mut chars)?),
            '=' | ':' => break,
            _ if c.is_whitespace() => {
                while chars.next_if(|next| next.is_whitespace()).is_some() {}
                if let Some(&sep) = chars.peek()
                    && (sep == '=' || sep == ':')
                {
                    chars.next();
                }
                break;
            }
            other => key.push(other),
        }
    }
    while chars.next_if(|next| next.is_whitespace()).is_some() {}
    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            value.push(unescape(&mut chars)?);
        } else {
            value.push(c);
        }
    }
    Ok((key, value))
}

fn unescape(chars: &mut impl Iterator<Item = char>) -> Result<char, BoxError> {
    Ok(match chars.next() {
        Some('t') => '\t',
        Some('n') => '\n',
        Some('r') => '\r',
        Some('f') => '\u{c}',
        Some('u') => {
            let hex: String = chars.by_ref().take(4).collect();
            u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| format!("invalid unicode escape '\\u{hex}'"))?
        }
        Some(other) => other,
        None => '\\',
    })
}

//! Indentation-aware line parser used when full YAML support is unavailable.
//!
//! Handles the subset of YAML the role and tool documents are written in:
//! `key: value` scalars, `key:` blocks holding either a nested mapping or a
//! list of `- item` scalars, blank lines and `#` comments. Blocks nest to any
//! depth. Sequences of mappings and flow collections are not supported.

use regex::Regex;
use std::sync::LazyLock;

use super::{DocumentValue, Mapping};
use crate::error::ParseError;

static ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+?):\s*(.*?)\s*$").expect("entry pattern is valid"));

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    content: &'a str,
}

impl Line<'_> {
    fn is_ignorable(&self) -> bool {
        self.content.is_empty() || self.content.starts_with('#')
    }

    fn is_list_item(&self) -> bool {
        self.content.starts_with('-')
    }
}

/// Parse `text` into a mapping document.
pub fn parse(text: &str) -> Result<DocumentValue, ParseError> {
    let lines: Vec<Line<'_>> = text
        .lines()
        .enumerate()
        .map(|(idx, raw)| {
            let content = raw.trim_start();
            Line {
                number: idx + 1,
                indent: raw.len() - content.len(),
                content: content.trim_end(),
            }
        })
        .collect();

    parse_mapping(&lines).map(DocumentValue::Mapping)
}

fn parse_mapping(lines: &[Line<'_>]) -> Result<Mapping, ParseError> {
    let mut map = Mapping::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if line.is_ignorable() {
            i += 1;
            continue;
        }
        if line.is_list_item() {
            return Err(ParseError::ListItemWithoutKey { line: line.number });
        }

        let Some(caps) = ENTRY.captures(line.content) else {
            log::debug!("skipping unrecognised line {}: {}", line.number, line.content);
            i += 1;
            continue;
        };
        let key = caps[1].to_string();
        let value = caps.get(2).map_or("", |m| m.as_str());

        if !value.is_empty() {
            map.insert(key, DocumentValue::Scalar(unquote(value).to_string()));
            i += 1;
            continue;
        }

        let start = i + 1;
        let mut end = start;
        while end < lines.len() && (lines[end].is_ignorable() || lines[end].indent > line.indent) {
            end += 1;
        }

        let value = parse_block(&key, &lines[start..end])?;
        map.insert(key, value);
        i = end;
    }

    Ok(map)
}

fn parse_block(key: &str, block: &[Line<'_>]) -> Result<DocumentValue, ParseError> {
    let first = block.iter().find(|line| !line.is_ignorable());

    match first {
        Some(line) if line.is_list_item() => parse_sequence(key, block),
        Some(_) => parse_mapping(block).map(DocumentValue::Mapping),
        None => Ok(DocumentValue::Mapping(Mapping::new())),
    }
}

fn parse_sequence(key: &str, block: &[Line<'_>]) -> Result<DocumentValue, ParseError> {
    let mut items = Vec::new();

    for line in block.iter().filter(|line| !line.is_ignorable()) {
        if !line.is_list_item() {
            return Err(ParseError::UnterminatedBlock {
                line: line.number,
                key: key.to_string(),
            });
        }
        let item = line.content[1..].trim();
        items.push(DocumentValue::Scalar(unquote(item).to_string()));
    }

    Ok(DocumentValue::Sequence(items))
}

/// Strip one layer of matching single or double quotes.
pub(crate) fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

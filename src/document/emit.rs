//! Canonical text form of a `DocumentValue`.
//!
//! Two-space indentation, every scalar double-quoted, sequence items as
//! `- "item"`. The fallback parser reads this form back to an equal value.
//! Values without such a form are rejected: a non-mapping root, keys the
//! line grammar cannot hold, scalars containing line breaks, empty sequences
//! (read back as empty mappings) and sequences of collections.

use std::fmt::Write;

use super::{DocumentValue, Mapping};
use crate::error::EmitError;

const INDENT: &str = "  ";

impl DocumentValue {
    pub fn to_document_string(&self) -> Result<String, EmitError> {
        let DocumentValue::Mapping(map) = self else {
            return Err(EmitError::NotAMapping { found: self.kind() });
        };
        let mut out = String::new();
        write_mapping(&mut out, map, 0, "$")?;
        Ok(out)
    }
}

fn write_mapping(out: &mut String, map: &Mapping, depth: usize, path: &str) -> Result<(), EmitError> {
    let pad = INDENT.repeat(depth);
    for (key, value) in map.iter() {
        let path = format!("{path}.{key}");
        if !is_plain_key(key) {
            return Err(EmitError::UnrepresentableKey { path });
        }
        match value {
            DocumentValue::Scalar(s) => {
                check_single_line(s, &path)?;
                let _ = writeln!(out, "{pad}{key}: \"{s}\"");
            }
            DocumentValue::Sequence(items) => {
                let _ = writeln!(out, "{pad}{key}:");
                write_sequence(out, items, depth + 1, &path)?;
            }
            DocumentValue::Mapping(inner) => {
                let _ = writeln!(out, "{pad}{key}:");
                write_mapping(out, inner, depth + 1, &path)?;
            }
        }
    }
    Ok(())
}

fn write_sequence(
    out: &mut String,
    items: &[DocumentValue],
    depth: usize,
    path: &str,
) -> Result<(), EmitError> {
    if items.is_empty() {
        return Err(EmitError::EmptySequence {
            path: path.to_string(),
        });
    }
    let pad = INDENT.repeat(depth);
    for (idx, item) in items.iter().enumerate() {
        let path = format!("{path}[{idx}]");
        let DocumentValue::Scalar(s) = item else {
            return Err(EmitError::NestedSequenceItem { path });
        };
        check_single_line(s, &path)?;
        let _ = writeln!(out, "{pad}- \"{s}\"");
    }
    Ok(())
}

fn check_single_line(s: &str, path: &str) -> Result<(), EmitError> {
    if s.contains(['\n', '\r']) {
        return Err(EmitError::MultilineScalar {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// A key the line grammar reads back unchanged: non-empty, no whitespace or
/// colon, and not mistaken for a comment or list item.
fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(['#', '-'])
        && !key.contains(|c: char| c == ':' || c.is_whitespace())
}

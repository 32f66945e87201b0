//! Structural schema checks for parsed documents.
//!
//! Schemas are written in a subset of JSON Schema: `type`, `required`,
//! `properties`, `items`, `additionalProperties: false`, `enum`, `minLength`
//! and `minItems`. Other keywords are accepted and ignored.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::document::DocumentValue;
use crate::error::SchemaError;

pub const ROLE_SCHEMA: &str = include_str!("../../schemas/role_schema.json");
pub const TOOL_SCHEMA: &str = include_str!("../../schemas/tool_schema.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
}

impl SchemaType {
    fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &DocumentValue) -> bool {
        match (self, value) {
            (SchemaType::Object, DocumentValue::Mapping(_)) => true,
            (SchemaType::Array, DocumentValue::Sequence(_)) => true,
            (SchemaType::String, DocumentValue::Scalar(_)) => true,
            (SchemaType::Number, DocumentValue::Scalar(s)) => s.parse::<f64>().is_ok(),
            (SchemaType::Integer, DocumentValue::Scalar(s)) => s.parse::<i64>().is_ok(),
            (SchemaType::Boolean, DocumentValue::Scalar(s)) => matches!(s.as_str(), "true" | "false"),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: Option<SchemaType>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,
    pub items: Option<Box<Schema>>,
    pub additional_properties: Option<bool>,
    #[serde(rename = "enum")]
    pub allowed: Option<Vec<String>>,
    pub min_length: Option<usize>,
    pub min_items: Option<usize>,
}

/// One failed constraint, located by a dotted field path (`$` is the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, found {}", self.path, self.expected, self.actual)
    }
}

impl Schema {
    pub fn from_json(text: &str, origin: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(|source| SchemaError::Decode {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, &path.display().to_string())
    }

    pub fn role() -> Result<Self, SchemaError> {
        Self::from_json(ROLE_SCHEMA, "built-in role schema")
    }

    pub fn tool() -> Result<Self, SchemaError> {
        Self::from_json(TOOL_SCHEMA, "built-in tool schema")
    }

    /// Every violation in `value`; empty when it conforms.
    pub fn validate(&self, value: &DocumentValue) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        self.check(value, "$", &mut violations);
        violations
    }

    fn check(&self, value: &DocumentValue, path: &str, out: &mut Vec<SchemaViolation>) {
        if let Some(kind) = self.kind {
            if !kind.accepts(value) {
                out.push(SchemaViolation {
                    path: path.to_string(),
                    expected: kind.as_str().to_string(),
                    actual: describe(value),
                });
                return;
            }
        }

        match value {
            DocumentValue::Scalar(s) => self.check_scalar(s, path, out),
            DocumentValue::Sequence(items) => self.check_sequence(items, path, out),
            DocumentValue::Mapping(map) => {
                for field in &self.required {
                    if !map.contains_key(field) {
                        out.push(SchemaViolation {
                            path: join(path, field),
                            expected: "required field".to_string(),
                            actual: "nothing".to_string(),
                        });
                    }
                }
                for (key, child) in map.iter() {
                    match self.properties.get(key) {
                        Some(schema) => schema.check(child, &join(path, key), out),
                        None if self.additional_properties == Some(false) => {
                            out.push(SchemaViolation {
                                path: join(path, key),
                                expected: "no additional properties".to_string(),
                                actual: format!("unexpected field '{key}'"),
                            });
                        }
                        None => {}
                    }
                }
            }
        }
    }

    fn check_scalar(&self, s: &str, path: &str, out: &mut Vec<SchemaViolation>) {
        if let Some(min) = self.min_length {
            let len = s.chars().count();
            if len < min {
                out.push(SchemaViolation {
                    path: path.to_string(),
                    expected: format!("at least {min} characters"),
                    actual: format!("{len}"),
                });
            }
        }
        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|a| a == s) {
                out.push(SchemaViolation {
                    path: path.to_string(),
                    expected: format!("one of [{}]", allowed.join(", ")),
                    actual: format!("'{s}'"),
                });
            }
        }
    }

    fn check_sequence(&self, items: &[DocumentValue], path: &str, out: &mut Vec<SchemaViolation>) {
        if let Some(min) = self.min_items {
            if items.len() < min {
                out.push(SchemaViolation {
                    path: path.to_string(),
                    expected: format!("at least {min} items"),
                    actual: format!("{}", items.len()),
                });
            }
        }
        if let Some(item_schema) = &self.items {
            for (idx, item) in items.iter().enumerate() {
                item_schema.check(item, &format!("{path}[{idx}]"), out);
            }
        }
    }
}

fn join(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

fn describe(value: &DocumentValue) -> String {
    match value {
        DocumentValue::Scalar(s) => format!("string '{s}'"),
        other => other.kind().to_string(),
    }
}

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{fallback, DocumentValue, Mapping};
use crate::error::ParseError;

/// Which parser a `DocumentParser` should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ParserMode {
    /// Full YAML through serde_yaml (requires the `yaml` feature).
    #[default]
    Primary,
    /// Built-in indentation parser.
    Fallback,
}

impl ParserMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserMode::Primary => "primary",
            ParserMode::Fallback => "fallback",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "yaml" => Some(ParserMode::Primary),
            "fallback" => Some(ParserMode::Fallback),
            _ => None,
        }
    }

    pub fn primary_available() -> bool {
        cfg!(feature = "yaml")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DocumentParser {
    mode: ParserMode,
}

impl DocumentParser {
    /// Build a parser for the requested mode, degrading to the fallback
    /// parser when the primary one is not compiled in.
    pub fn new(requested: ParserMode) -> Self {
        let mode = match requested {
            ParserMode::Primary if !ParserMode::primary_available() => {
                log::warn!("YAML support not compiled in; using fallback document parser");
                ParserMode::Fallback
            }
            mode => mode,
        };
        Self { mode }
    }

    pub fn fallback() -> Self {
        Self {
            mode: ParserMode::Fallback,
        }
    }

    pub fn mode(&self) -> ParserMode {
        self.mode
    }

    pub fn parse(&self, text: &str) -> Result<DocumentValue, ParseError> {
        match self.mode {
            ParserMode::Primary => parse_primary(text),
            ParserMode::Fallback => fallback::parse(text),
        }
    }

    /// Parse a document whose root must be a mapping.
    pub fn parse_mapping(&self, text: &str) -> Result<Mapping, ParseError> {
        self.parse(text)?
            .into_mapping()
            .ok_or(ParseError::NotAMapping)
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new(ParserMode::default())
    }
}

#[cfg(feature = "yaml")]
fn parse_primary(text: &str) -> Result<DocumentValue, ParseError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| ParseError::Yaml(e.to_string()))?;
    Ok(from_yaml(value))
}

#[cfg(not(feature = "yaml"))]
fn parse_primary(text: &str) -> Result<DocumentValue, ParseError> {
    fallback::parse(text)
}

#[cfg(feature = "yaml")]
fn from_yaml(value: serde_yaml::Value) -> DocumentValue {
    use serde_yaml::Value;

    match value {
        // `key:` with nothing under it reads as an empty block in both parsers.
        Value::Null => DocumentValue::Mapping(Mapping::new()),
        Value::Bool(b) => DocumentValue::Scalar(b.to_string()),
        Value::Number(n) => DocumentValue::Scalar(n.to_string()),
        Value::String(s) => DocumentValue::Scalar(s),
        Value::Sequence(items) => {
            DocumentValue::Sequence(items.into_iter().map(from_yaml).collect())
        }
        Value::Mapping(map) => DocumentValue::Mapping(
            map.into_iter()
                .map(|(k, v)| (yaml_key(k), from_yaml(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

#[cfg(feature = "yaml")]
fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;

    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

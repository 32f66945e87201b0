pub mod read_file;
pub mod registry;
pub mod serena;
pub mod stubs;
pub mod write_file;

pub use registry::{Binding, CapabilityConfig, CapabilityRegistry};

use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Arguments handed to a capability: either an ordered list or named values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgumentBag {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl ArgumentBag {
    pub fn empty() -> Self {
        ArgumentBag::Positional(Vec::new())
    }

    /// Build a bag from command-line style words. When every word is a
    /// `key=value` pair the bag is named, otherwise positional.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let pairs: Option<Map<String, Value>> = words
            .iter()
            .map(|word| {
                word.as_ref()
                    .split_once('=')
                    .filter(|(key, _)| !key.is_empty())
                    .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            })
            .collect();

        match pairs {
            Some(named) if !named.is_empty() => ArgumentBag::Named(named),
            _ => ArgumentBag::Positional(
                words
                    .iter()
                    .map(|w| Value::String(w.as_ref().to_string()))
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ArgumentBag::Positional(values) => values.is_empty(),
            ArgumentBag::Named(values) => values.is_empty(),
        }
    }

    /// Look up an argument by name, or by position for positional bags.
    pub fn get(&self, name: &str, position: usize) -> Option<&Value> {
        match self {
            ArgumentBag::Named(values) => values.get(name),
            ArgumentBag::Positional(values) => values.get(position),
        }
    }

    pub fn require_str(&self, name: &str, position: usize) -> Result<&str> {
        self.get(name, position)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Missing {} parameter", name))
    }

    pub fn to_value(&self) -> Value {
        match self {
            ArgumentBag::Positional(values) => Value::Array(values.clone()),
            ArgumentBag::Named(values) => Value::Object(values.clone()),
        }
    }
}

impl Default for ArgumentBag {
    fn default() -> Self {
        Self::empty()
    }
}

/// One invocable unit of behaviour. Every capability has this shape.
pub trait Capability: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    fn execute(&self, args: &ArgumentBag) -> Result<Value>;
}

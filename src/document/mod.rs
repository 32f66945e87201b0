pub mod emit;
pub mod fallback;
pub mod parser;

pub use parser::{DocumentParser, ParserMode};

use serde::Serialize;

/// Generic value produced by the document parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentValue {
    Scalar(String),
    Sequence(Vec<DocumentValue>),
    Mapping(Mapping),
}

impl DocumentValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        DocumentValue::Scalar(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            DocumentValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            DocumentValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Empty scalars, sequences and mappings count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentValue::Scalar(s) => s.is_empty(),
            DocumentValue::Sequence(items) => items.is_empty(),
            DocumentValue::Mapping(map) => map.is_empty(),
        }
    }

    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentValue::Scalar(_) => "string",
            DocumentValue::Sequence(_) => "array",
            DocumentValue::Mapping(_) => "object",
        }
    }

    /// Follow a dotted path of mapping keys, e.g. `execution_policy.default_mode`.
    pub fn pointer(&self, dotted: &str) -> Option<&DocumentValue> {
        dotted
            .split('.')
            .try_fold(self, |value, key| value.as_mapping()?.get(key))
    }
}

impl From<Mapping> for DocumentValue {
    fn from(map: Mapping) -> Self {
        DocumentValue::Mapping(map)
    }
}

/// String-keyed map that keeps insertion order. Assigning an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, DocumentValue)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: DocumentValue) -> Option<DocumentValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&DocumentValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DocumentValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocumentValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, DocumentValue)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, DocumentValue)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for Mapping {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_overwrites_in_place() {
        let mut map = Mapping::new();
        map.insert("a", DocumentValue::scalar("1"));
        map.insert("b", DocumentValue::scalar("2"));
        let previous = map.insert("a", DocumentValue::scalar("3"));

        assert_eq!(previous, Some(DocumentValue::scalar("1")));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get_str("a"), Some("3"));
    }

    #[test]
    fn test_pointer_follows_nested_mappings() {
        let mut policy = Mapping::new();
        policy.insert("default_mode", DocumentValue::scalar("auto"));
        let mut root = Mapping::new();
        root.insert("execution_policy", policy.into());
        let doc = DocumentValue::from(root);

        assert_eq!(
            doc.pointer("execution_policy.default_mode").and_then(DocumentValue::as_str),
            Some("auto")
        );
        assert!(doc.pointer("execution_policy.missing").is_none());
    }

    #[test]
    fn test_serializes_to_json_in_order() {
        let mut map = Mapping::new();
        map.insert("z", DocumentValue::scalar("last"));
        map.insert(
            "a",
            DocumentValue::Sequence(vec![DocumentValue::scalar("x")]),
        );

        let json = serde_json::to_string(&DocumentValue::from(map)).unwrap();
        assert_eq!(json, r#"{"z":"last","a":["x"]}"#);
    }
}

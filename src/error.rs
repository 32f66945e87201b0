use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn document text into a `DocumentValue`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: list item appears before any key has been opened")]
    ListItemWithoutKey { line: usize },

    #[error("line {line}: sequence block '{key}' is not terminated by a dedent before non-item content")]
    UnterminatedBlock { line: usize, key: String },

    #[error("document root is not a mapping")]
    NotAMapping,

    #[error("invalid YAML: {0}")]
    Yaml(String),
}

/// Fail-fast errors raised while loading a role into an `Agent`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing import '{reference}' (resolved to {})", resolved_path.display())]
    MissingImport {
        reference: String,
        resolved_path: PathBuf,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Errors reported as values by capability invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("capability '{name}' is not registered")]
    NotFound { name: String },

    #[error("capability '{name}' is registered but has no implementation bound")]
    NotBound { name: String },

    #[error("capability '{name}' failed: {cause}")]
    Execution { name: String, cause: String },
}

impl CapabilityError {
    pub fn name(&self) -> &str {
        match self {
            CapabilityError::NotFound { name }
            | CapabilityError::NotBound { name }
            | CapabilityError::Execution { name, .. } => name,
        }
    }
}

/// A schema document that could not be loaded.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A value that has no canonical document text. `path` is the dotted
/// location of the offending entry (`$` is the root).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("document root must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    #[error("{path}: key cannot be written as a document key")]
    UnrepresentableKey { path: String },

    #[error("{path}: scalar spans more than one line")]
    MultilineScalar { path: String },

    #[error("{path}: empty sequence reads back as an empty mapping")]
    EmptySequence { path: String },

    #[error("{path}: sequence items must be scalars")]
    NestedSequenceItem { path: String },
}

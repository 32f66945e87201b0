use serde::Serialize;
use std::path::Path;

use crate::document::{DocumentValue, Mapping};
use crate::error::LoadError;

/// Root document of a role: who the agent is and what it imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub name: String,
    pub description: Option<String>,
    pub imports: Imports,
}

/// Ordered path references, relative to the role document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Imports {
    pub prompts: Vec<String>,
    pub rules: Vec<String>,
    pub tools: Vec<String>,
}

impl RoleDefinition {
    /// Read a role from its parsed document. `path` supplies the fallback name
    /// (the enclosing directory) and error context.
    pub fn from_document(document: &Mapping, path: &Path) -> Result<Self, LoadError> {
        let name = document
            .get_str("name")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| directory_name(path));

        let description = document
            .get_str("description")
            .map(str::to_string)
            .filter(|d| !d.is_empty());

        let imports = match document.get("imports") {
            None => Imports::default(),
            Some(DocumentValue::Mapping(imports)) => Imports {
                prompts: reference_list(imports, "prompts", path)?,
                rules: reference_list(imports, "rules", path)?,
                tools: reference_list(imports, "tools", path)?,
            },
            Some(other) => {
                return Err(LoadError::Malformed {
                    path: path.to_path_buf(),
                    message: format!("'imports' must be a mapping, found {}", other.kind()),
                })
            }
        };

        Ok(Self {
            name,
            description,
            imports,
        })
    }
}

fn directory_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn reference_list(imports: &Mapping, key: &str, path: &Path) -> Result<Vec<String>, LoadError> {
    let malformed = |found: &str| LoadError::Malformed {
        path: path.to_path_buf(),
        message: format!("'imports.{key}' must be a list of paths, found {found}"),
    };

    match imports.get(key) {
        None => Ok(Vec::new()),
        Some(DocumentValue::Scalar(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(DocumentValue::Scalar(s)) => Ok(vec![s.trim().to_string()]),
        Some(DocumentValue::Mapping(map)) if map.is_empty() => Ok(Vec::new()),
        Some(DocumentValue::Mapping(_)) => Err(malformed("object")),
        Some(DocumentValue::Sequence(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| malformed(&format!("{} item", item.kind())))
            })
            .collect(),
    }
}

/// Declarative description of one tool. Only the recognised fields are
/// lifted out; the full document is kept for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSpecification {
    pub name: String,
    pub description: Option<String>,
    pub execution_environment: Option<String>,
    pub default_mode: Option<String>,
    #[serde(skip)]
    pub document: Mapping,
}

impl ToolSpecification {
    /// Build a specification from its document. A missing `name` falls back
    /// to the file stem of `path`.
    pub fn from_document(document: Mapping, path: &Path) -> Self {
        let root = DocumentValue::Mapping(document);
        let text = |pointer: &str| {
            root.pointer(pointer)
                .and_then(DocumentValue::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let name = text("name").unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let description = text("description");
        let execution_environment = text("execution_environment.type");
        let default_mode = text("execution_policy.default_mode");

        let document = root.into_mapping().unwrap_or_default();
        Self {
            name,
            description,
            execution_environment,
            default_mode,
            document,
        }
    }

    pub fn declares_name(&self) -> bool {
        self.document
            .get_str("name")
            .is_some_and(|name| !name.is_empty())
    }
}

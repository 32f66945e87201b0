use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::schema::{Schema, SchemaViolation};
use crate::document::DocumentParser;
use crate::error::{ParseError, SchemaError};

/// The two document trees a workspace holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Role,
    Tool,
}

impl DocumentKind {
    pub fn all() -> [Self; 2] {
        [DocumentKind::Role, DocumentKind::Tool]
    }

    /// Directory name of the tree under the workspace root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            DocumentKind::Role => "role",
            DocumentKind::Tool => "tool",
        }
    }

    pub fn schema_file(&self) -> &'static str {
        match self {
            DocumentKind::Role => "role_schema.json",
            DocumentKind::Tool => "tool_schema.json",
        }
    }

    /// Load this kind's schema from `schema_dir` when present there,
    /// otherwise use the built-in copy.
    pub fn load_schema(&self, schema_dir: &Path) -> Result<Schema, SchemaError> {
        let path = schema_dir.join(self.schema_file());
        if path.is_file() {
            return Schema::from_file(&path);
        }
        log::debug!("{} not found; using built-in schema", path.display());
        match self {
            DocumentKind::Role => Schema::role(),
            DocumentKind::Tool => Schema::tool(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    Read(String),
    Parse(ParseError),
    Schema(Vec<SchemaViolation>),
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::Read(message) => write!(f, "read error: {message}"),
            ValidationFailure::Parse(e) => write!(f, "parse error: {e}"),
            ValidationFailure::Schema(violations) => {
                let details: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "{}", details.join("; "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(ValidationFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub path: PathBuf,
    pub outcome: ValidationOutcome,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.outcome == ValidationOutcome::Valid
    }
}

pub fn is_document(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Validate every document file under `root` against `schema`.
///
/// A failing file is recorded and the walk continues. A missing root yields
/// no results.
pub fn validate_tree(root: &Path, schema: &Schema, parser: &DocumentParser) -> Vec<ValidationResult> {
    if !root.exists() {
        log::warn!("validation root {} does not exist", root.display());
        return Vec::new();
    }

    let mut results = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                results.push(ValidationResult {
                    path,
                    outcome: ValidationOutcome::Invalid(ValidationFailure::Read(e.to_string())),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_document(entry.path()) {
            continue;
        }

        let path = entry.into_path();
        let outcome = validate_file(&path, schema, parser);
        results.push(ValidationResult { path, outcome });
    }

    results
}

pub fn validate_file(path: &Path, schema: &Schema, parser: &DocumentParser) -> ValidationOutcome {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return ValidationOutcome::Invalid(ValidationFailure::Read(e.to_string())),
    };

    let document = match parser.parse(&text) {
        Ok(document) => document,
        Err(e) => return ValidationOutcome::Invalid(ValidationFailure::Parse(e)),
    };

    let violations = schema.validate(&document);
    if violations.is_empty() {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid(ValidationFailure::Schema(violations))
    }
}

#[derive(Debug, Clone)]
pub struct TreeReport {
    pub kind: DocumentKind,
    pub root: PathBuf,
    pub results: Vec<ValidationResult>,
}

impl TreeReport {
    pub fn invalid(&self) -> usize {
        self.results.iter().filter(|r| !r.is_valid()).count()
    }
}

/// Aggregate over every validated tree.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub trees: Vec<TreeReport>,
}

impl ValidationReport {
    pub fn scanned(&self) -> usize {
        self.trees.iter().map(|t| t.results.len()).sum()
    }

    pub fn invalid(&self) -> usize {
        self.trees.iter().map(TreeReport::invalid).sum()
    }

    pub fn is_success(&self) -> bool {
        self.invalid() == 0
    }
}

/// Validate the `role/` and `tool/` trees of a workspace, each against its
/// own schema.
pub fn validate_workspace(
    workspace_root: &Path,
    schema_dir: &Path,
    parser: &DocumentParser,
) -> Result<ValidationReport, SchemaError> {
    let mut report = ValidationReport::default();
    for kind in DocumentKind::all() {
        let schema = kind.load_schema(schema_dir)?;
        let root = workspace_root.join(kind.dir_name());
        let results = validate_tree(&root, &schema, parser);
        report.trees.push(TreeReport {
            kind,
            root,
            results,
        });
    }
    Ok(report)
}

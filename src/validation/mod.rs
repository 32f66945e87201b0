pub mod schema;
pub mod walker;

pub use schema::{Schema, SchemaViolation};
pub use walker::{
    validate_file, validate_tree, validate_workspace, DocumentKind, TreeReport, ValidationFailure,
    ValidationOutcome, ValidationReport, ValidationResult,
};

pub mod resolver;
pub mod schema;

pub use resolver::{normalize, resolve, resolve_from_cwd};
pub use schema::{Imports, RoleDefinition, ToolSpecification};

pub mod agent;
pub mod config;
pub mod definitions;
pub mod document;
pub mod error;
pub mod logging;
pub mod tools;
pub mod validation;

pub use agent::{Agent, AgentLoader, LoadWarning, ToolEntry};
pub use config::Config;
pub use document::{DocumentParser, DocumentValue, Mapping, ParserMode};
pub use error::{CapabilityError, EmitError, LoadError, ParseError, SchemaError};
pub use tools::{ArgumentBag, Binding, Capability, CapabilityConfig, CapabilityRegistry};

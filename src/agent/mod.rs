//! Assembled agents: persona, rules and a tool registry bound to
//! capabilities.

pub mod loader;

pub use loader::AgentLoader;

use serde_json::Value;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::definitions::ToolSpecification;
use crate::document::DocumentValue;
use crate::error::CapabilityError;
use crate::tools::registry::run_capability;
use crate::tools::{ArgumentBag, Capability};

/// One tool an agent declares. The implementation is absent when the
/// capability registry had nothing bound under the tool's name.
#[derive(Clone)]
pub struct ToolEntry {
    pub name: String,
    pub spec: ToolSpecification,
    pub source: PathBuf,
    implementation: Option<Arc<dyn Capability>>,
}

impl ToolEntry {
    pub fn new(
        spec: ToolSpecification,
        source: PathBuf,
        implementation: Option<Arc<dyn Capability>>,
    ) -> Self {
        Self {
            name: spec.name.clone(),
            spec,
            source,
            implementation,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.implementation.is_some()
    }

    pub fn implementation(&self) -> Option<&Arc<dyn Capability>> {
        self.implementation.as_ref()
    }
}

impl fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Non-fatal conditions met while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// No capability of this name exists in the registry.
    UnregisteredTool { name: String },
    /// The name is registered but has no implementation bound.
    UnboundTool { name: String },
    /// The tool document has no `name`; its file stem was used.
    UnnamedTool { path: PathBuf, name: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnregisteredTool { name } => {
                write!(f, "tool '{name}' has no registered implementation")
            }
            LoadWarning::UnboundTool { name } => {
                write!(f, "tool '{name}' is registered but not bound in this environment")
            }
            LoadWarning::UnnamedTool { path, name } => {
                write!(f, "{} declares no name; using '{name}'", path.display())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) persona: Option<DocumentValue>,
    pub(crate) prompt: String,
    pub(crate) rules: Vec<String>,
    pub(crate) tools: Vec<ToolEntry>,
    pub(crate) warnings: Vec<LoadWarning>,
    pub(crate) source: PathBuf,
}

impl Agent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn persona(&self) -> Option<&DocumentValue> {
        self.persona.as_ref()
    }

    /// The persona's `role` field, if the persona has one.
    pub fn persona_role(&self) -> Option<&str> {
        self.persona.as_ref()?.pointer("role")?.as_str()
    }

    /// Combined `prompt` text of all prompt imports.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn tools(&self) -> &[ToolEntry] {
        &self.tools
    }

    pub fn tool(&self, name: &str) -> Option<&ToolEntry> {
        self.tools.iter().find(|entry| entry.name == name)
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Invoke one of this agent's tools. Failures come back as values.
    pub fn invoke(&self, name: &str, args: &ArgumentBag) -> Result<Value, CapabilityError> {
        let entry = self.tool(name).ok_or_else(|| CapabilityError::NotFound {
            name: name.to_string(),
        })?;
        let capability = entry
            .implementation()
            .ok_or_else(|| CapabilityError::NotBound {
                name: name.to_string(),
            })?;

        run_capability(name, capability.as_ref(), args)
    }

    pub fn preview(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Agent: {}", self.name);
        if let Some(description) = &self.description {
            let _ = writeln!(out, "Description: {description}");
        }
        if let Some(role) = self.persona_role() {
            let _ = writeln!(out, "Persona: {role}");
        }
        let _ = writeln!(out, "Rules: {}", self.rules.len());
        let _ = writeln!(out, "Tools: {}", self.tools.len());
        for entry in &self.tools {
            let status = if entry.is_bound() { "bound" } else { "unbound" };
            let _ = writeln!(out, "  - {} [{status}]", entry.name);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentParser, Mapping};

    fn entry(name: &str, implementation: Option<Arc<dyn Capability>>) -> ToolEntry {
        let doc = DocumentParser::fallback()
            .parse_mapping(&format!("name: {name}\n"))
            .unwrap();
        ToolEntry::new(
            ToolSpecification::from_document(doc, Path::new("tool.yaml")),
            PathBuf::from("tool.yaml"),
            implementation,
        )
    }

    fn agent(tools: Vec<ToolEntry>) -> Agent {
        let mut persona = Mapping::new();
        persona.insert("role", DocumentValue::scalar("Senior engineer"));
        Agent {
            name: "coder".to_string(),
            description: Some("Writes code".to_string()),
            persona: Some(persona.into()),
            prompt: String::new(),
            rules: vec!["be kind".to_string()],
            tools,
            warnings: Vec::new(),
            source: PathBuf::from("role/coder/role.yaml"),
        }
    }

    #[test]
    fn test_preview_lists_binding_state() {
        let stub = crate::tools::stubs::canned_capabilities().remove(0);
        let agent = agent(vec![entry("delete_file", Some(Arc::new(stub))), entry("ghost", None)]);

        let preview = agent.preview();
        assert!(preview.contains("Agent: coder"));
        assert!(preview.contains("Persona: Senior engineer"));
        assert!(preview.contains("Rules: 1"));
        assert!(preview.contains("Tools: 2"));
        assert!(preview.contains("  - delete_file [bound]"));
        assert!(preview.contains("  - ghost [unbound]"));
    }

    #[test]
    fn test_invoke_distinguishes_missing_and_unbound() {
        let agent = agent(vec![entry("ghost", None)]);

        assert_eq!(
            agent.invoke("ghost", &ArgumentBag::empty()),
            Err(CapabilityError::NotBound {
                name: "ghost".to_string()
            })
        );
        assert_eq!(
            agent.invoke("nonexistent_tool", &ArgumentBag::empty()),
            Err(CapabilityError::NotFound {
                name: "nonexistent_tool".to_string()
            })
        );
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use super::{Agent, LoadWarning, ToolEntry};
use crate::definitions::{resolve, resolve_from_cwd, RoleDefinition, ToolSpecification};
use crate::document::{DocumentParser, DocumentValue, Mapping};
use crate::error::LoadError;
use crate::tools::{Binding, CapabilityRegistry};

/// Builds `Agent`s from role documents. Any missing import or parse failure
/// aborts the load; only unbound tools are tolerated.
pub struct AgentLoader<'a> {
    registry: &'a CapabilityRegistry,
    parser: DocumentParser,
}

impl<'a> AgentLoader<'a> {
    pub fn new(registry: &'a CapabilityRegistry, parser: DocumentParser) -> Self {
        Self { registry, parser }
    }

    pub fn load(&self, role_path: impl AsRef<Path>) -> Result<Agent, LoadError> {
        let role_path = resolve_from_cwd(role_path.as_ref())?;
        let document = self.parse_file(&role_path)?;
        let role = RoleDefinition::from_document(&document, &role_path)?;
        log::debug!(
            "loading role '{}' from {} ({} parser)",
            role.name,
            role_path.display(),
            self.parser.mode().as_str()
        );

        let mut persona: Option<DocumentValue> = None;
        let mut prompts: Vec<String> = Vec::new();
        for reference in &role.imports.prompts {
            let path = resolve(&role_path, reference)?;
            let prompt_doc = self.parse_file(&path)?;

            if let Some(value) = prompt_doc.get("persona").filter(|v| !v.is_empty()) {
                persona = Some(value.clone());
            }
            if let Some(text) = prompt_doc.get_str("prompt").filter(|t| !t.trim().is_empty()) {
                prompts.push(text.to_string());
            }
        }

        let mut rules = Vec::with_capacity(role.imports.rules.len());
        for reference in &role.imports.rules {
            let path = resolve(&role_path, reference)?;
            rules.push(read_text(&path)?);
        }

        let mut specs = Vec::with_capacity(role.imports.tools.len());
        for reference in &role.imports.tools {
            let path = resolve(&role_path, reference)?;
            let spec = ToolSpecification::from_document(self.parse_file(&path)?, &path);
            specs.push((spec, path));
        }

        let mut warnings = Vec::new();
        let tools = self.bind_tools(specs, &mut warnings);

        Ok(Agent {
            name: role.name,
            description: role.description,
            persona,
            prompt: prompts.join("\n\n"),
            rules,
            tools,
            warnings,
            source: role_path,
        })
    }

    fn bind_tools(
        &self,
        specs: Vec<(ToolSpecification, PathBuf)>,
        warnings: &mut Vec<LoadWarning>,
    ) -> Vec<ToolEntry> {
        let mut tools: Vec<ToolEntry> = Vec::with_capacity(specs.len());

        for (spec, path) in specs {
            if !spec.declares_name() {
                let warning = LoadWarning::UnnamedTool {
                    path: path.clone(),
                    name: spec.name.clone(),
                };
                log::warn!("{warning}");
                warnings.push(warning);
            }

            let implementation = match self.registry.binding(&spec.name) {
                Some(Binding::Bound(capability)) => Some(capability.clone()),
                Some(Binding::Unbound) => {
                    let warning = LoadWarning::UnboundTool {
                        name: spec.name.clone(),
                    };
                    log::warn!("{warning}");
                    warnings.push(warning);
                    None
                }
                None => {
                    let warning = LoadWarning::UnregisteredTool {
                        name: spec.name.clone(),
                    };
                    log::warn!("{warning}");
                    warnings.push(warning);
                    None
                }
            };

            let entry = ToolEntry::new(spec, path, implementation);
            match tools.iter_mut().find(|existing| existing.name == entry.name) {
                Some(existing) => {
                    log::debug!("tool '{}' imported twice; keeping the later one", entry.name);
                    *existing = entry;
                }
                None => tools.push(entry),
            }
        }

        tools
    }

    fn parse_file(&self, path: &Path) -> Result<Mapping, LoadError> {
        let text = read_text(path)?;
        self.parser
            .parse_mapping(&text)
            .map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use super::read_file::ReadFileTool;
use super::serena::{self, SerenaTool, SERENA_CAPABILITIES};
use super::stubs::canned_capabilities;
use super::write_file::WriteFileTool;
use super::{ArgumentBag, Capability};
use crate::error::CapabilityError;

/// Registry slot for a capability name.
#[derive(Clone)]
pub enum Binding {
    Bound(Arc<dyn Capability>),
    /// The name is known but nothing implements it in this process.
    Unbound,
}

impl Binding {
    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Bound(_))
    }

    pub fn implementation(&self) -> Option<&Arc<dyn Capability>> {
        match self {
            Binding::Bound(capability) => Some(capability),
            Binding::Unbound => None,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Bound(capability) => write!(f, "Bound({})", capability.name()),
            Binding::Unbound => f.write_str("Unbound"),
        }
    }
}

pub struct CapabilityConfig {
    pub sandbox_root: PathBuf,
    pub serena_executable: Option<PathBuf>,
}

impl CapabilityConfig {
    pub fn new(sandbox_root: PathBuf) -> Self {
        Self {
            sandbox_root,
            serena_executable: serena::locate_executable(),
        }
    }
}

/// Name to implementation table. Built once at startup, read-only after.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    bindings: HashMap<String, Binding>,
}

impl CapabilityRegistry {
    pub fn builtin(config: &CapabilityConfig) -> Self {
        let mut bindings: Vec<(String, Binding)> = vec![
            // Register file operation tools
            bound(Arc::new(ReadFileTool::new(config.sandbox_root.clone()))),
            bound(Arc::new(WriteFileTool::new(config.sandbox_root.clone()))),
        ];

        for capability in canned_capabilities() {
            bindings.push(bound(Arc::new(capability)));
        }

        // Register serena tools only if the executable is available
        for (name, description) in SERENA_CAPABILITIES {
            let binding = match &config.serena_executable {
                Some(executable) => {
                    Binding::Bound(Arc::new(SerenaTool::new(name, description, executable)))
                }
                None => Binding::Unbound,
            };
            bindings.push((name.to_string(), binding));
        }

        Self::from_bindings(bindings)
    }

    pub fn from_bindings(bindings: impl IntoIterator<Item = (String, Binding)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.binding(name)?.implementation().cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn describe(&self) -> Vec<Value> {
        self.names()
            .into_iter()
            .map(|name| match &self.bindings[name] {
                Binding::Bound(capability) => json!({
                    "name": name,
                    "description": capability.description(),
                    "bound": true,
                }),
                Binding::Unbound => json!({ "name": name, "bound": false }),
            })
            .collect()
    }

    pub fn invoke(&self, name: &str, args: &ArgumentBag) -> Result<Value, CapabilityError> {
        match self.binding(name) {
            None => Err(CapabilityError::NotFound {
                name: name.to_string(),
            }),
            Some(Binding::Unbound) => Err(CapabilityError::NotBound {
                name: name.to_string(),
            }),
            Some(Binding::Bound(capability)) => run_capability(name, capability.as_ref(), args),
        }
    }
}

fn bound(capability: Arc<dyn Capability>) -> (String, Binding) {
    (capability.name().to_string(), Binding::Bound(capability))
}

/// Call `capability`, turning both errors and panics into
/// `CapabilityError::Execution`.
pub(crate) fn run_capability(
    name: &str,
    capability: &dyn Capability,
    args: &ArgumentBag,
) -> Result<Value, CapabilityError> {
    log::info!("--- invoking tool: {name} ---");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| capability.execute(args)));
    let result = match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(format!("{e:#}")),
        Err(payload) => Err(panic_message(payload.as_ref())),
    };

    match result {
        Ok(value) => {
            log::info!("--- finished tool: {name} ---");
            Ok(value)
        }
        Err(cause) => {
            log::info!("--- finished tool: {name} (error) ---");
            Err(CapabilityError::Execution {
                name: name.to_string(),
                cause,
            })
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tempfile::TempDir;

    struct Failing;

    impl Capability for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn execute(&self, _args: &ArgumentBag) -> anyhow::Result<Value> {
            Err(anyhow!("disk on fire"))
        }
    }

    struct Panicking;

    impl Capability for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn description(&self) -> &str {
            "always panics"
        }

        fn execute(&self, _args: &ArgumentBag) -> anyhow::Result<Value> {
            panic!("unexpected state")
        }
    }

    fn test_registry() -> CapabilityRegistry {
        CapabilityRegistry::from_bindings([
            ("failing".to_string(), Binding::Bound(Arc::new(Failing))),
            ("panicking".to_string(), Binding::Bound(Arc::new(Panicking))),
            ("dormant".to_string(), Binding::Unbound),
        ])
    }

    #[test]
    fn test_builtin_registry_without_serena() {
        let temp_dir = TempDir::new().unwrap();
        let config = CapabilityConfig {
            sandbox_root: temp_dir.path().to_path_buf(),
            serena_executable: None,
        };
        let registry = CapabilityRegistry::builtin(&config);

        assert!(registry.lookup("read_file").is_some());
        assert!(registry.lookup("web_search").is_some());
        assert!(registry.contains("find_symbol"));
        assert!(registry.lookup("find_symbol").is_none());
        assert_eq!(
            registry.invoke("insert_after_symbol", &ArgumentBag::empty()),
            Err(CapabilityError::NotBound {
                name: "insert_after_symbol".to_string()
            })
        );
    }

    #[test]
    fn test_invoke_unknown_name() {
        let registry = test_registry();
        let err = registry
            .invoke("nonexistent_tool", &ArgumentBag::empty())
            .unwrap_err();
        assert!(matches!(err, CapabilityError::NotFound { .. }));
        assert_eq!(err.name(), "nonexistent_tool");
    }

    #[test]
    fn test_execution_errors_are_values() {
        let registry = test_registry();

        match registry.invoke("failing", &ArgumentBag::empty()) {
            Err(CapabilityError::Execution { name, cause }) => {
                assert_eq!(name, "failing");
                assert!(cause.contains("disk on fire"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_panics_are_caught() {
        let registry = test_registry();

        match registry.invoke("panicking", &ArgumentBag::empty()) {
            Err(CapabilityError::Execution { cause, .. }) => {
                assert!(cause.contains("unexpected state"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_describe_lists_bound_state() {
        let described = test_registry().describe();
        let names: Vec<&str> = described
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();

        assert_eq!(names, vec!["dormant", "failing", "panicking"]);
        assert_eq!(described[0]["bound"], false);
        assert_eq!(described[1]["bound"], true);
    }
}

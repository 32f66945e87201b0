//! Integration tests for role loading
//!
//! Covers:
//! - Loading the shipped sample roles
//! - Unregistered tools loading as unbound entries with a warning
//! - Fail-fast on missing imports
//! - Invocation errors reported as values

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use agent_sandbox::{
    AgentLoader, ArgumentBag, CapabilityConfig, CapabilityError, CapabilityRegistry,
    DocumentParser, LoadError, LoadWarning, ParserMode,
};

fn workspace() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn builtin_registry(sandbox: &Path) -> CapabilityRegistry {
    CapabilityRegistry::builtin(&CapabilityConfig {
        sandbox_root: sandbox.to_path_buf(),
        serena_executable: None,
    })
}

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_sample_coder_role() {
    let registry = builtin_registry(&workspace());

    for mode in [ParserMode::Primary, ParserMode::Fallback] {
        let loader = AgentLoader::new(&registry, DocumentParser::new(mode));
        let agent = loader
            .load(workspace().join("role/coder/role.yaml"))
            .unwrap();

        assert_eq!(agent.name(), "coder");
        assert_eq!(agent.persona_role(), Some("Senior software engineer"));
        assert_eq!(agent.rules().len(), 2);
        assert!(agent.rules()[0].contains("Safety"));
        assert_eq!(agent.tools().len(), 3);
        assert!(agent.tool("read_file").unwrap().is_bound());
        assert!(agent.tool("write_file").unwrap().is_bound());

        // serena is not configured, so find_symbol is known but unbound
        assert!(!agent.tool("find_symbol").unwrap().is_bound());
        assert_eq!(
            agent.warnings(),
            [LoadWarning::UnboundTool {
                name: "find_symbol".to_string()
            }]
        );
    }
}

#[test]
fn test_unregistered_capability_loads_unbound() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "tool/unregistered_capability/tool.yaml",
        "name: \"unregistered_capability\"\ndescription: Nobody implements this\n",
    );
    let role = write(
        root,
        "role/ghost/role.yaml",
        "name: ghost\nimports:\n  tools:\n    - ../../tool/unregistered_capability/tool.yaml\n",
    );

    let registry = builtin_registry(root);
    let agent = AgentLoader::new(&registry, DocumentParser::default())
        .load(&role)
        .unwrap();

    let entries: Vec<_> = agent
        .tools()
        .iter()
        .filter(|t| t.name == "unregistered_capability")
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].implementation().is_none());
    assert_eq!(
        agent.warnings(),
        [LoadWarning::UnregisteredTool {
            name: "unregistered_capability".to_string()
        }]
    );

    assert_eq!(
        agent.invoke("unregistered_capability", &ArgumentBag::empty()),
        Err(CapabilityError::NotBound {
            name: "unregistered_capability".to_string()
        })
    );
}

#[test]
fn test_missing_tool_import_fails_whole_load() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "rules/ok.md", "fine");
    let role = write(
        root,
        "role/broken/role.yaml",
        "imports:\n  rules:\n    - ../../rules/ok.md\n  tools:\n    - ../../tool/nowhere/tool.yaml\n",
    );

    let registry = builtin_registry(root);
    let err = AgentLoader::new(&registry, DocumentParser::default())
        .load(&role)
        .unwrap_err();

    match err {
        LoadError::MissingImport {
            reference,
            resolved_path,
        } => {
            assert_eq!(reference, "../../tool/nowhere/tool.yaml");
            assert!(resolved_path.ends_with("tool/nowhere/tool.yaml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_root_document() {
    let temp_dir = TempDir::new().unwrap();
    let registry = builtin_registry(temp_dir.path());

    let err = AgentLoader::new(&registry, DocumentParser::default())
        .load(temp_dir.path().join("role/none/role.yaml"))
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingImport { .. }));
}

#[test]
fn test_invoke_through_agent_and_registry() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "notes.txt", "remember the milk");
    write(root, "tool/read_file/tool.yaml", "name: read_file\n");
    let role = write(
        root,
        "role/reader/role.yaml",
        "imports:\n  tools:\n    - ../../tool/read_file/tool.yaml\n",
    );

    let registry = builtin_registry(root);
    let agent = AgentLoader::new(&registry, DocumentParser::fallback())
        .load(&role)
        .unwrap();

    let output = agent
        .invoke("read_file", &ArgumentBag::from_words(&["path=notes.txt"]))
        .unwrap();
    assert_eq!(output["content"], "remember the milk");

    // A failing capability is reported, not propagated
    let err = agent
        .invoke("read_file", &ArgumentBag::from_words(&["path=../outside.txt"]))
        .unwrap_err();
    assert!(matches!(err, CapabilityError::Execution { .. }));

    // The agent only knows its own tools
    assert!(matches!(
        agent.invoke("web_search", &ArgumentBag::empty()),
        Err(CapabilityError::NotFound { .. })
    ));
    assert!(registry.invoke("web_search", &ArgumentBag::empty()).is_ok());
    assert!(matches!(
        registry.invoke("nonexistent_tool", &ArgumentBag::empty()),
        Err(CapabilityError::NotFound { .. })
    ));
}

#[test]
fn test_nested_fallback_document() {
    let doc = DocumentParser::fallback()
        .parse("a:\n  b:\n    - x\n    - y\n  c: z")
        .unwrap();

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json, serde_json::json!({ "a": { "b": ["x", "y"], "c": "z" } }));
}

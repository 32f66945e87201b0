use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::read_file::sandboxed_path;
use super::{ArgumentBag, Capability};
use crate::definitions::normalize;

pub struct WriteFileTool {
    sandbox_root: PathBuf,
}

impl WriteFileTool {
    pub fn new(sandbox_root: PathBuf) -> Self {
        Self {
            sandbox_root: normalize(&sandbox_root),
        }
    }

    fn validate_path(&self, path: &str) -> Result<PathBuf> {
        sandboxed_path(&self.sandbox_root, path)
    }
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

impl Capability for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file within the sandbox. Creates parent directories if needed. Can append or overwrite."
    }

    fn execute(&self, args: &ArgumentBag) -> Result<Value> {
        let path = args.require_str("path", 0)?;
        let content = args.require_str("content", 1)?;
        let append = flag(args.get("append", 2));

        let validated_path = self.validate_path(path)?;

        if let Some(parent) = validated_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if append {
            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&validated_path)?;
            file.write_all(content.as_bytes())?;
        } else {
            fs::write(&validated_path, content)
                .map_err(|e| anyhow!("Failed to write {}: {}", validated_path.display(), e))?;
        }

        let size = fs::metadata(&validated_path)
            .map(|m| m.len())
            .unwrap_or(content.len() as u64);

        Ok(json!({
            "status": "success",
            "path": path,
            "size": size,
            "appended": append,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use tempfile::TempDir;

    fn named(pairs: &[(&str, Value)]) -> ArgumentBag {
        let map: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ArgumentBag::Named(map)
    }

    #[test]
    fn test_write_file_local() {
        let temp_dir = TempDir::new().unwrap();
        let tool = WriteFileTool::new(temp_dir.path().to_path_buf());

        let output = tool
            .execute(&named(&[
                ("path", json!("test.txt")),
                ("content", json!("Hello, World!")),
            ]))
            .unwrap();

        assert_eq!(output["path"], "test.txt");
        let written = fs::read_to_string(temp_dir.path().join("test.txt")).unwrap();
        assert_eq!(written, "Hello, World!");
    }

    #[test]
    fn test_write_file_append() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("test.txt");
        fs::write(&test_file, "First line\n").unwrap();

        let tool = WriteFileTool::new(temp_dir.path().to_path_buf());
        tool.execute(&named(&[
            ("path", json!("test.txt")),
            ("content", json!("Second line\n")),
            ("append", json!(true)),
        ]))
        .unwrap();

        let content = fs::read_to_string(&test_file).unwrap();
        assert_eq!(content, "First line\nSecond line\n");
    }

    #[test]
    fn test_write_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let tool = WriteFileTool::new(temp_dir.path().to_path_buf());

        let args = ArgumentBag::from_words(&["nested/dir/test.txt", "content"]);
        tool.execute(&args).unwrap();

        assert!(temp_dir.path().join("nested/dir/test.txt").exists());
    }

    #[test]
    fn test_path_validation() {
        let temp_dir = TempDir::new().unwrap();
        let tool = WriteFileTool::new(temp_dir.path().to_path_buf());

        assert!(tool.validate_path("safe.txt").is_ok());
        assert!(tool.validate_path("../escape.txt").is_err());
    }
}

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::{ArgumentBag, Capability};
use crate::definitions::normalize;

pub struct ReadFileTool {
    sandbox_root: PathBuf,
}

impl ReadFileTool {
    pub fn new(sandbox_root: PathBuf) -> Self {
        Self {
            sandbox_root: normalize(&sandbox_root),
        }
    }

    fn validate_path(&self, path: &str) -> Result<PathBuf> {
        sandboxed_path(&self.sandbox_root, path)
    }
}

/// Resolve `path` under `sandbox_root`, rejecting anything that escapes it.
pub(crate) fn sandboxed_path(sandbox_root: &Path, path: &str) -> Result<PathBuf> {
    let full_path = if path.starts_with('/') {
        PathBuf::from(path)
    } else {
        sandbox_root.join(path)
    };
    let full_path = normalize(&full_path);

    if !full_path.starts_with(sandbox_root) {
        return Err(anyhow!("Path escapes sandbox: {}", path));
    }

    Ok(full_path)
}

impl Capability for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read contents of a file within the sandbox. Path must be relative to sandbox root or absolute within sandbox."
    }

    fn execute(&self, args: &ArgumentBag) -> Result<Value> {
        let path = args.require_str("path", 0)?;
        let validated_path = self.validate_path(path)?;

        let content = fs::read_to_string(&validated_path)
            .map_err(|e| anyhow!("Failed to read {}: {}", validated_path.display(), e))?;
        let size = content.len();

        Ok(json!({
            "status": "success",
            "path": path,
            "content": content,
            "size": size,
        }))
    }
}

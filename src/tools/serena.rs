//! Proxies to the external `serena` code-navigation CLI.

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{ArgumentBag, Capability};

pub const SERENA_CAPABILITIES: [(&str, &str); 2] = [
    ("find_symbol", "Locate a symbol definition with serena"),
    ("insert_after_symbol", "Insert code after a symbol with serena"),
];

/// Find the `serena` executable on `PATH`.
pub fn locate_executable() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join("serena"))
        .find(|candidate| candidate.is_file())
}

pub struct SerenaTool {
    subcommand: &'static str,
    description: &'static str,
    executable: PathBuf,
}

impl SerenaTool {
    pub fn new(subcommand: &'static str, description: &'static str, executable: &Path) -> Self {
        Self {
            subcommand,
            description,
            executable: executable.to_path_buf(),
        }
    }
}

fn command_args(args: &ArgumentBag) -> Result<Vec<String>> {
    let ArgumentBag::Positional(values) = args else {
        bail!("serena arguments must be positional");
    };

    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if text.contains('\0') {
            bail!("null bytes are not permitted in serena arguments");
        }
        out.push(text);
    }
    Ok(out)
}

impl Capability for SerenaTool {
    fn name(&self) -> &str {
        self.subcommand
    }

    fn description(&self) -> &str {
        self.description
    }

    fn execute(&self, args: &ArgumentBag) -> Result<Value> {
        let output = Command::new(&self.executable)
            .arg(self.subcommand)
            .args(command_args(args)?)
            .output()
            .map_err(|e| anyhow!("failed to run {}: {}", self.executable.display(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("serena {} failed: {}", self.subcommand, stderr.trim());
        }

        Ok(Value::String(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

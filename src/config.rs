use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::document::ParserMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `role/`, `tool/` and `schemas/`.
    pub workspace_root: PathBuf,
    pub parser: ParserMode,
    /// Root that file capabilities are confined to.
    pub sandbox_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let workspace_root = std::env::var("AGENT_SANDBOX_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let parser = std::env::var("AGENT_SANDBOX_PARSER")
            .ok()
            .and_then(|value| {
                let mode = ParserMode::from_name(&value);
                if mode.is_none() {
                    log::warn!("ignoring unknown AGENT_SANDBOX_PARSER value '{value}'");
                }
                mode
            })
            .unwrap_or_default();

        let sandbox_root = std::env::var("AGENT_SANDBOX_SANDBOX")
            .map(PathBuf::from)
            .unwrap_or_else(|_| workspace_root.clone());

        Self {
            workspace_root,
            parser,
            sandbox_root,
        }
    }

    pub fn schema_dir(&self) -> PathBuf {
        self.workspace_root.join("schemas")
    }

    /// Absolute sandbox root, for capabilities that compare paths against it.
    pub fn absolute_sandbox_root(&self) -> PathBuf {
        let root = if self.sandbox_root.is_absolute() {
            self.sandbox_root.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.sandbox_root))
                .unwrap_or_else(|_| self.sandbox_root.clone())
        };
        crate::definitions::normalize(&root)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            parser: ParserMode::default(),
            sandbox_root: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_dir_under_workspace_root() {
        let config = Config {
            workspace_root: PathBuf::from("/srv/agents"),
            ..Config::default()
        };

        assert_eq!(config.schema_dir(), PathBuf::from("/srv/agents/schemas"));
    }

    #[test]
    fn test_absolute_sandbox_root_is_normalized() {
        let config = Config {
            sandbox_root: PathBuf::from("/srv/agents/./work/.."),
            ..Config::default()
        };
        assert_eq!(config.absolute_sandbox_root(), PathBuf::from("/srv/agents"));
    }
}

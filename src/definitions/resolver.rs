use std::path::{Component, Path, PathBuf};

use crate::error::LoadError;

/// Resolve `reference` against the directory containing `base_file`.
///
/// The result is absolute and lexically normalized. Fails with
/// `MissingImport` when nothing exists at the resolved path; the file is not
/// read.
pub fn resolve(base_file: &Path, reference: &str) -> Result<PathBuf, LoadError> {
    let base_dir = base_file.parent().unwrap_or_else(|| Path::new(""));
    let reference = reference.trim();
    resolve_in(base_dir, Path::new(reference), reference)
}

/// Resolve a path given on the command line against the current working
/// directory. The path is used as given, without trimming.
pub fn resolve_from_cwd(path: &Path) -> Result<PathBuf, LoadError> {
    resolve_in(Path::new(""), path, &path.to_string_lossy())
}

fn resolve_in(base_dir: &Path, target: &Path, reference: &str) -> Result<PathBuf, LoadError> {
    let joined = base_dir.join(target);
    let absolute = if joined.is_absolute() {
        joined
    } else {
        let cwd = std::env::current_dir().map_err(|source| LoadError::Io {
            path: joined.clone(),
            source,
        })?;
        cwd.join(joined)
    };

    let resolved = normalize(&absolute);
    if !resolved.exists() {
        return Err(LoadError::MissingImport {
            reference: reference.to_string(),
            resolved_path: resolved,
        });
    }

    Ok(resolved)
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_collapses_dot_segments() {
        assert_eq!(
            normalize(Path::new("/a/b/./c/../../d/e.yaml")),
            PathBuf::from("/a/d/e.yaml")
        );
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_resolve_relative_to_referencing_file() {
        let temp_dir = TempDir::new().unwrap();
        let role_dir = temp_dir.path().join("role/coder");
        let tool_dir = temp_dir.path().join("tool/read_file");
        fs::create_dir_all(&role_dir).unwrap();
        fs::create_dir_all(&tool_dir).unwrap();
        fs::write(tool_dir.join("tool.yaml"), "name: read_file\n").unwrap();

        let resolved = resolve(
            &role_dir.join("role.yaml"),
            "../../tool/read_file/./tool.yaml",
        )
        .unwrap();

        assert_eq!(resolved, normalize(&tool_dir.join("tool.yaml")));
        assert!(resolved.is_absolute());
    }

    #[test]
    fn test_resolve_from_cwd_keeps_path_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let role = temp_dir.path().join(" coder /role.yaml");
        fs::create_dir_all(role.parent().unwrap()).unwrap();
        fs::write(&role, "name: coder\n").unwrap();

        assert_eq!(resolve_from_cwd(&role).unwrap(), normalize(&role));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_from_cwd_accepts_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let role = temp_dir.path().join(OsStr::from_bytes(b"role-\xff.yaml"));
        if fs::write(&role, "name: coder\n").is_err() {
            // Some filesystems refuse non-UTF-8 names outright.
            return;
        }

        assert_eq!(resolve_from_cwd(&role).unwrap(), normalize(&role));
    }

    #[test]
    fn test_resolve_missing_target() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("role.yaml");

        let err = resolve(&base, "rules/absent.md").unwrap_err();
        match err {
            LoadError::MissingImport {
                reference,
                resolved_path,
            } => {
                assert_eq!(reference, "rules/absent.md");
                assert_eq!(resolved_path, normalize(&temp_dir.path().join("rules/absent.md")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

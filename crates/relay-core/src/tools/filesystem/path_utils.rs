//! Path helpers shared by the filesystem tools.
//!
//! Every path the model hands us is taken relative to the workspace root and
//! must stay inside it after `.`/`..` and symlinks are resolved.

use std::path::{Component, Path, PathBuf};

use crate::error::ToolError;

/// Render a path with forward slashes so tool output looks the same on every platform.
pub fn path_to_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve `.` and `..` lexically, without touching the filesystem.
///
/// Used for paths that may not exist yet. `..` never climbs above the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | Some(Component::CurDir) | None => {
                    out.push(Component::ParentDir);
                }
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

fn canonical_workspace(workspace: &Path) -> Result<PathBuf, ToolError> {
    dunce::canonicalize(workspace).map_err(|e| {
        ToolError::Io(std::io::Error::new(
            e.kind(),
            format!("Cannot resolve workspace '{}': {}", workspace.display(), e),
        ))
    })
}

fn outside(path: &Path, workspace: &Path) -> ToolError {
    ToolError::PermissionDenied(format!(
        "Path {} is outside workspace {}",
        path.display(),
        workspace.display()
    ))
}

/// Canonicalize an existing path and check it lives under the workspace.
pub fn validate_path(path: &Path, workspace: &Path) -> Result<PathBuf, ToolError> {
    let canonical = dunce::canonicalize(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolError::ResourceNotFound(format!("Path not found: {}", path.display()))
        } else {
            ToolError::Io(e)
        }
    })?;

    if canonical.starts_with(canonical_workspace(workspace)?) {
        Ok(canonical)
    } else {
        Err(outside(path, workspace))
    }
}

/// Symlink hops followed before a write path is refused
const MAX_LINK_HOPS: usize = 40;

/// Check a path that may not exist yet (a file about to be created).
///
/// The nearest existing ancestor is canonicalized so a symlinked directory
/// can't be used to escape the workspace. A dangling symlink counts as
/// existing and is followed to its target, which must also stay inside.
pub fn validate_write_path(path: &Path, workspace: &Path) -> Result<PathBuf, ToolError> {
    let workspace = canonical_workspace(workspace)?;
    let mut current = if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&workspace.join(path))
    };

    for _ in 0..MAX_LINK_HOPS {
        let mut existing = current.as_path();
        let mut missing = Vec::new();
        // symlink_metadata so a dangling link is not mistaken for a gap
        while std::fs::symlink_metadata(existing).is_err() {
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => break,
            }
        }

        let is_link = std::fs::symlink_metadata(existing)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);

        let mut resolved = match dunce::canonicalize(existing) {
            Ok(resolved) => resolved,
            Err(_) if is_link => {
                let target = std::fs::read_link(existing).map_err(ToolError::Io)?;
                let target = match existing.parent() {
                    Some(parent) if target.is_relative() => parent.join(target),
                    _ => target,
                };
                let mut next = normalize_path(&target);
                for name in missing.iter().rev() {
                    next.push(name);
                }
                current = next;
                continue;
            }
            Err(_) => existing.to_path_buf(),
        };
        for name in missing.iter().rev() {
            resolved.push(name);
        }

        return if resolved.starts_with(&workspace) {
            Ok(resolved)
        } else {
            Err(outside(path, &workspace))
        };
    }

    Err(ToolError::PermissionDenied(format!(
        "Too many levels of symbolic links: {}",
        path.display()
    )))
}

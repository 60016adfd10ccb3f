//! Path helpers for output targeting.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` segments and resolve `..`
/// against preceding segments, without touching the filesystem. Output
/// targets go through this so that equal targets compare equal in the
/// collision registry regardless of how they were spelled.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let poppable = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if poppable {
                    out.pop();
                } else if !path.has_root() {
                    // leading ".." in a relative path stays; above an
                    // absolute root it is dropped
                    out.push("..");
                }
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}

/// Human-readable form of `target` for messages: relative to the
/// workspace output root when it lies inside it, absolute otherwise.
pub fn workspace_display(root: &Path, target: &Path) -> String {
    match pathdiff::diff_paths(target, root) {
        Some(rel) if !rel.as_os_str().is_empty() && !rel.starts_with("..") => {
            rel.display().to_string()
        }
        _ => target.display().to_string(),
    }
}

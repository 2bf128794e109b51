use std::path::{Component, Path, PathBuf};

/// Directory name used below the platform configuration directory.
pub const APP_DIR: &str = "fav_files";

/// Platform configuration directory for the application, falling back to
/// the working directory when the platform does not provide one.
pub fn config_dir() -> PathBuf {
    dirs_next::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve `relative` against the directory holding `settings_path`.
/// Absolute paths are returned unchanged.
pub fn resolve_config_path(settings_path: &Path, relative: &str) -> PathBuf {
    let candidate = Path::new(relative);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    let base_dir = settings_path.parent().unwrap_or_else(|| Path::new("."));
    base_dir.join(candidate)
}

/// Turn user input into the absolute, lexically normalised form stored in
/// favorites. Returns `None` for blank input.
///
/// A leading `~` expands to the home directory. The path is not required to
/// exist, so symlinks are left alone and `..` is resolved textually.
pub fn normalize_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let expanded = match trimmed.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => {
            match dirs_next::home_dir() {
                Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
                None => PathBuf::from(trimmed),
            }
        }
        _ => PathBuf::from(trimmed),
    };
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    };
    Some(lexical_normalize(&absolute))
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(comp.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether two paths name the same location.
///
/// Falls back to comparing canonicalised parent directories so a watcher
/// reporting `/private/tmp/x` still matches a favorite stored as `/tmp/x`.
/// The file itself may be gone, which is why only the parent is resolved.
pub fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (canonical_parent(a), canonical_parent(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn canonical_parent(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = path.parent()?.canonicalize().ok()?;
    Some(parent.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_rejected() {
        assert!(normalize_path("").is_none());
        assert!(normalize_path("   ").is_none());
    }

    #[test]
    fn relative_paths_become_absolute() {
        let p = normalize_path("some/file.txt").unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("some/file.txt"));
    }

    #[test]
    fn dot_segments_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{}/a/./b/../c.txt", dir.path().display());
        assert_eq!(normalize_path(&raw).unwrap(), dir.path().join("a").join("c.txt"));
    }

    #[test]
    fn resolves_relative_to_settings_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        assert_eq!(
            resolve_config_path(&settings, "favorites.json"),
            dir.path().join("favorites.json")
        );
        let abs = dir.path().join("elsewhere.json");
        assert_eq!(
            resolve_config_path(&settings, abs.to_str().unwrap()),
            abs
        );
    }

    #[test]
    fn same_location_through_parent() {
        let dir = tempfile::tempdir().unwrap();
        let direct = dir.path().join("gone.txt");
        let dotted = dir.path().join(".").join("gone.txt");
        assert!(same_location(&direct, &dotted));
        assert!(!same_location(&direct, &dir.path().join("other.txt")));
    }
}

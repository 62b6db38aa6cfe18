use std::path::{Component, Path, PathBuf};

/// Resolves `path` to an absolute form without requiring it to exist.
///
/// Existing paths are canonicalized. For a path that does not exist yet (a
/// destination root before the first sync), the parent is canonicalized and
/// the final component appended, falling back to lexical normalization
/// against the current directory.
pub fn resolve_best_effort(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = absolute_lexical(path);
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => parent.join(name),
            Err(_) => absolute,
        },
        _ => absolute,
    }
}

fn absolute_lexical(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(current_dir) => current_dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    normalize_lexical(&absolute)
}

/// Drops `.` components and folds `..` into the preceding component.
fn normalize_lexical(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Path rendering for log lines and error messages.
pub trait PathDisplayExt {
    fn best_effort_path_display(&self) -> String;
}

impl PathDisplayExt for Path {
    fn best_effort_path_display(&self) -> String {
        resolve_best_effort(self).display().to_string()
    }
}

impl PathDisplayExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        self.as_path().best_effort_path_display()
    }
}

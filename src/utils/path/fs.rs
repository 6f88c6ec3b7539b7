//! Path normalization.
//!
//! Every path that enters the cache or the classifier goes through
//! [`normalize_path`], so roots from the config and paths from the watcher
//! compare equal even through symlinks (`/tmp` vs `/private/tmp`).

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute canonical form.
///
/// Paths that no longer exist (removal events) are resolved through their
/// nearest existing ancestor, so a deleted file keeps the same prefix as
/// its still-existing root.
///
/// # Example
/// ```ignore
/// let abs = normalize_path(Path::new("./src/client/app/index.ts"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    if let Ok(canonical) = absolute.canonicalize() {
        return canonical;
    }

    // Walk up to the first ancestor that exists, then re-append the tail.
    let mut tail = Vec::new();
    let mut current = absolute.as_path();
    while let Some(parent) = current.parent() {
        if let Some(name) = current.file_name() {
            tail.push(name.to_owned());
        }
        if let Ok(canonical) = parent.canonicalize() {
            let mut out = canonical;
            out.extend(tail.iter().rev());
            return out;
        }
        current = parent;
    }

    absolute
}

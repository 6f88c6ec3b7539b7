//! Separator-agnostic relative paths.
//!
//! Classification rules match on path components, never on raw strings,
//! so `client\alpha\index.js` and `client/alpha/index.js` are the same path.

use std::path::{Component, Path, PathBuf};

/// A path relative to some root, split into normal components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelPath {
    parts: Vec<String>,
}

impl RelPath {
    /// Relative path of `path` under `root`, or `None` if it is not a descendant.
    ///
    /// `root` itself yields an empty `RelPath`.
    pub fn under(path: &Path, root: &Path) -> Option<Self> {
        let rest = path.strip_prefix(root).ok()?;
        Some(Self::from_path(rest))
    }

    /// Split a relative path into components, accepting both separators.
    pub fn from_path(path: &Path) -> Self {
        let parts = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .flat_map(|s| {
                s.split(['/', '\\'])
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { parts }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// Extension of the last component (text after the last `.`), lowercased.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// True if any component is a dotfile/dotdir.
    pub fn is_hidden(&self) -> bool {
        self.parts.iter().any(|p| p.starts_with('.'))
    }

    /// Rebuild under a new root using the host separator.
    pub fn join_onto(&self, root: &Path) -> PathBuf {
        let mut out = root.to_path_buf();
        out.extend(&self.parts);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_root() {
        let rel = RelPath::under(Path::new("/p/build/client/a/index.js"), Path::new("/p/build"))
            .unwrap();
        assert_eq!(rel.parts(), ["client", "a", "index.js"]);
    }

    #[test]
    fn test_not_under_root() {
        assert!(RelPath::under(Path::new("/p/src/a.js"), Path::new("/p/build")).is_none());
    }

    #[test]
    fn test_backslash_components() {
        let rel = RelPath::from_path(Path::new("client\\alpha\\index.js"));
        assert_eq!(rel.parts(), ["client", "alpha", "index.js"]);
    }

    #[test]
    fn test_extension_and_hidden() {
        let rel = RelPath::from_path(Path::new("styles/_vars.SCSS"));
        assert_eq!(rel.extension().as_deref(), Some("scss"));

        let dotfile = RelPath::from_path(Path::new(".env"));
        assert_eq!(dotfile.extension(), None);
        assert!(dotfile.is_hidden());
    }

    #[test]
    fn test_join_onto() {
        let rel = RelPath::from_path(Path::new("shared/util.js"));
        assert_eq!(
            rel.join_onto(Path::new("/p/build")),
            PathBuf::from("/p/build/shared/util.js")
        );
    }
}

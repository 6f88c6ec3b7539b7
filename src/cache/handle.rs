//! File handles.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Dir,
}

/// Last observed state of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleState {
    pub exists: bool,
    /// Kind at the last time the path existed; `File` if it never did.
    pub kind: FileKind,
    pub mtime: Option<SystemTime>,
}

impl HandleState {
    pub const MISSING: Self = Self {
        exists: false,
        kind: FileKind::File,
        mtime: None,
    };

    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            exists: true,
            kind: if meta.is_dir() {
                FileKind::Dir
            } else {
                FileKind::File
            },
            mtime: meta.modified().ok(),
        }
    }
}

/// The cache's record of one canonical path.
///
/// Shared as `Arc<FileHandle>`. Refreshing updates the state in place, so
/// every holder sees the same handle object.
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    state: RwLock<HandleState>,
}

impl FileHandle {
    pub(super) fn new(path: PathBuf, state: HandleState) -> Self {
        Self {
            path,
            state: RwLock::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> HandleState {
        *self.state.read()
    }

    pub fn exists(&self) -> bool {
        self.state.read().exists
    }

    pub fn kind(&self) -> FileKind {
        self.state.read().kind
    }

    pub fn is_file(&self) -> bool {
        let state = self.state();
        state.exists && state.kind == FileKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == FileKind::Dir
    }

    pub fn mtime(&self) -> Option<SystemTime> {
        self.state.read().mtime
    }

    /// Replace the state. A missing path keeps its last known kind.
    pub(super) fn update(&self, next: HandleState) {
        let mut state = self.state.write();
        *state = if next.exists {
            next
        } else {
            HandleState {
                kind: state.kind,
                ..HandleState::MISSING
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_dir_keeps_kind() {
        let handle = FileHandle::new(
            PathBuf::from("/p/build/client/alpha"),
            HandleState {
                exists: true,
                kind: FileKind::Dir,
                mtime: None,
            },
        );
        handle.update(HandleState::MISSING);
        assert!(!handle.exists());
        assert!(handle.is_dir());
        assert!(!handle.is_file());
    }
}

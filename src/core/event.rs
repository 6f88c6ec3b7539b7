use std::path::PathBuf;

use super::SourceRoot;

/// What happened to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Changed,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Changed => "changed",
            Self::Removed => "removed",
        }
    }
}

/// One normalized filesystem change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub root: SourceRoot,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind, root: SourceRoot) -> Self {
        Self {
            path: path.into(),
            kind,
            root,
        }
    }

    pub fn is_removal(&self) -> bool {
        self.kind == ChangeKind::Removed
    }
}

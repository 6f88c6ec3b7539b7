use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which transform failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Transpile,
    Copy,
    Bundle,
    Minify,
    Stylesheet,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Transpile => "transpile",
            Self::Copy => "copy",
            Self::Bundle => "bundle",
            Self::Minify => "minify",
            Self::Stylesheet => "css",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("{kind} failed: {}", input.display())]
pub struct TransformError {
    pub kind: ToolKind,
    pub input: PathBuf,
    #[source]
    pub cause: TransformCause,
}

#[derive(Debug, Error)]
pub enum TransformCause {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Parser or transformer diagnostics, one per line
    #[error("{0}")]
    Diagnostics(String),

    #[error(transparent)]
    Command(anyhow::Error),

    #[error("{0}")]
    Unsupported(String),
}

impl TransformError {
    pub fn new(kind: ToolKind, input: impl Into<PathBuf>, cause: impl Into<TransformCause>) -> Self {
        Self {
            kind,
            input: input.into(),
            cause: cause.into(),
        }
    }
}

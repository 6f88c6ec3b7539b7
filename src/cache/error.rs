use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Stat failure other than "not found".
#[derive(Debug, Error)]
#[error("failed to resolve `{}`", path.display())]
pub struct ResolutionError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
#[error("failed to delete `{}`", path.display())]
pub struct DeleteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::ServerState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server is {0}, not stopped")]
    NotStopped(ServerState),

    #[error("server entry `{}` does not exist", .0.display())]
    MissingEntry(PathBuf),

    #[error("failed to launch server")]
    Launch(#[source] io::Error),

    #[error("failed to terminate server")]
    Terminate(#[source] io::Error),
}

//! Launching the managed server process.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use super::ServerError;
use crate::config::ProjectConfig;

/// Starts a server process for an entry file.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, entry: &Path) -> Result<Box<dyn ServerProcess>, ServerError>;
}

/// A running server process.
#[async_trait]
pub trait ServerProcess: Send {
    fn id(&self) -> Option<u32>;

    /// Terminate and wait for exit.
    async fn terminate(&mut self) -> io::Result<()>;
}

/// Runs `[server] command` with the entry appended as the last argument.
pub struct CommandLauncher {
    command: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: PathBuf,
}

impl CommandLauncher {
    pub fn new(command: Vec<String>, env: BTreeMap<String, String>, cwd: PathBuf) -> Self {
        Self { command, env, cwd }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(
            config.server.command.clone(),
            config.server.env.clone(),
            config.root.clone(),
        )
    }
}

#[async_trait]
impl Launcher for CommandLauncher {
    async fn launch(&self, entry: &Path) -> Result<Box<dyn ServerProcess>, ServerError> {
        if !entry.is_file() {
            return Err(ServerError::MissingEntry(entry.to_path_buf()));
        }
        let Some((program, args)) = self.command.split_first() else {
            return Err(ServerError::Launch(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty server command",
            )));
        };

        let child = Command::new(program)
            .args(args)
            .arg(entry)
            .envs(&self.env)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(ServerError::Launch)?;

        Ok(Box::new(ChildProcess { child }))
    }
}

/// Child process, killed on drop.
struct ChildProcess {
    child: Child,
}

#[async_trait]
impl ServerProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn terminate(&mut self) -> io::Result<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }
        self.child.kill().await
    }
}

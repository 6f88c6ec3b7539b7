//! Server lifecycle controller.
//!
//! The single managed server process is owned by [`ServerController`], an
//! explicit state machine:
//!
//! ```text
//! Stopped ──start──▶ Starting ──▶ Running ──stop──▶ Stopping ──▶ Stopped
//!    ▲                  │ launch failed                  │ terminate failed
//!    └──────────────────┘                                └──▶ stays Stopping
//! ```
//!
//! Every transition runs under one async lock, so a restart requested while
//! another is in flight waits for it to finish, and stop always precedes
//! start.

mod error;
mod process;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;

pub use error::ServerError;
pub use process::{CommandLauncher, Launcher, ServerProcess};

use crate::logger::elapsed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        })
    }
}

type Slot = Option<Box<dyn ServerProcess>>;

/// Owns the server process. Share as `Arc<ServerController>`.
pub struct ServerController {
    launcher: Box<dyn Launcher>,
    /// Observable state, readable without waiting on a transition
    state: Mutex<ServerState>,
    /// Held for the whole of every transition
    process: tokio::sync::Mutex<Slot>,
}

impl ServerController {
    pub fn new(launcher: Box<dyn Launcher>) -> Self {
        Self {
            launcher,
            state: Mutex::new(ServerState::Stopped),
            process: tokio::sync::Mutex::new(None),
        }
    }

    pub fn state(&self) -> ServerState {
        *self.state.lock()
    }

    /// Launch the server. Fails unless currently stopped.
    pub async fn start(&self, entry: &Path) -> Result<(), ServerError> {
        let mut slot = self.process.lock().await;
        self.start_locked(&mut slot, entry).await
    }

    /// Terminate the server and wait for exit. No-op when stopped.
    pub async fn stop(&self) -> Result<(), ServerError> {
        let mut slot = self.process.lock().await;
        self.stop_locked(&mut slot).await
    }

    /// `stop` then `start`, as one transition.
    pub async fn restart(&self, entry: &Path) -> Result<(), ServerError> {
        let mut slot = self.process.lock().await;
        self.stop_locked(&mut slot).await?;
        self.start_locked(&mut slot, entry).await
    }

    fn set_state(&self, next: ServerState) {
        *self.state.lock() = next;
    }

    async fn start_locked(&self, slot: &mut Slot, entry: &Path) -> Result<(), ServerError> {
        let current = self.state();
        if current != ServerState::Stopped {
            return Err(ServerError::NotStopped(current));
        }

        self.set_state(ServerState::Starting);
        let started = Instant::now();
        match self.launcher.launch(entry).await {
            Ok(process) => {
                let pid = process.id().map(|id| format!(" (pid {id})")).unwrap_or_default();
                *slot = Some(process);
                self.set_state(ServerState::Running);
                crate::log!("server"; "started{} in {}", pid, elapsed(started.elapsed()));
                Ok(())
            }
            Err(e) => {
                self.set_state(ServerState::Stopped);
                Err(e)
            }
        }
    }

    async fn stop_locked(&self, slot: &mut Slot) -> Result<(), ServerError> {
        if self.state() == ServerState::Stopped {
            return Ok(());
        }

        self.set_state(ServerState::Stopping);
        let started = Instant::now();
        if let Some(process) = slot.as_mut() {
            // On failure the process is kept so a later stop retries
            process.terminate().await.map_err(ServerError::Terminate)?;
        }
        *slot = None;
        self.set_state(ServerState::Stopped);
        crate::debug!("server"; "stopped in {}", elapsed(started.elapsed()));
        Ok(())
    }
}

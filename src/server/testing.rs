//! Fake launcher for lifecycle tests.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Launcher, ServerError, ServerProcess};

/// Records `launch:<n>`/`launched:<n>`/`terminate:<n>`/`terminated:<n>`
/// with injected delays.
#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub events: Arc<Mutex<Vec<String>>>,
    pub delay: Duration,
    pub fail_launch: Arc<AtomicBool>,
    pub fail_terminate: Arc<AtomicBool>,
    next_id: Arc<Mutex<u32>>,
}

impl FakeLauncher {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch(&self, _entry: &Path) -> Result<Box<dyn ServerProcess>, ServerError> {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        self.record(format!("launch:{id}"));
        tokio::time::sleep(self.delay).await;
        if self.fail_launch.load(Ordering::SeqCst) {
            return Err(ServerError::Launch(io::Error::other("launch refused")));
        }
        self.record(format!("launched:{id}"));
        Ok(Box::new(FakeProcess {
            id,
            launcher: self.clone(),
        }))
    }
}

struct FakeProcess {
    id: u32,
    launcher: FakeLauncher,
}

#[async_trait]
impl ServerProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.id)
    }

    async fn terminate(&mut self) -> io::Result<()> {
        self.launcher.record(format!("terminate:{}", self.id));
        tokio::time::sleep(self.launcher.delay).await;
        if self.launcher.fail_terminate.load(Ordering::SeqCst) {
            return Err(io::Error::other("terminate refused"));
        }
        self.launcher.record(format!("terminated:{}", self.id));
        Ok(())
    }
}

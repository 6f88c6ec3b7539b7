//! Wiring shared by every command.

use std::sync::Arc;

use crate::cache::FileCache;
use crate::config::ProjectConfig;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::server::{CommandLauncher, ServerController};
use crate::toolchain::ProjectToolchain;

/// Build the dispatcher and its collaborators from a loaded config.
pub fn dispatcher(config: ProjectConfig) -> Arc<Dispatcher> {
    let config = Arc::new(config);
    let server = ServerController::new(Box::new(CommandLauncher::from_config(&config)));
    Arc::new(Dispatcher::new(
        Arc::clone(&config),
        Arc::new(FileCache::new()),
        Arc::new(ProjectToolchain::new(Arc::clone(&config))),
        Arc::new(server),
    ))
}

/// Fail the command when any action failed. Individual failures were
/// already logged as they happened.
pub fn check(report: &DispatchReport, what: &str) -> anyhow::Result<()> {
    if report.is_ok() {
        return Ok(());
    }
    anyhow::bail!(
        "{} failed: {} of {} action(s) did not complete",
        what,
        report.failure_count(),
        report.outcomes.len()
    )
}

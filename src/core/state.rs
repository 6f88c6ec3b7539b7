//! Process-wide shutdown state.
//!
//! Ctrl+C exits immediately unless a long-running mode (watch, start) has
//! registered a shutdown channel; then the handler only signals it and the
//! mode stops the managed server before exiting.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the long-running mode
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        let repeated = SHUTDOWN.swap(true, Ordering::SeqCst);

        match SHUTDOWN_TX.get() {
            Some(tx) if !repeated => {
                crate::log!("server"; "shutting down...");
                let _ = tx.try_send(());
            }
            // Nothing to stop gracefully, or a second Ctrl+C
            _ => std::process::exit(130),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Route Ctrl+C to the returned receiver instead of exiting.
///
/// Call once when entering watch or start mode.
pub fn register_shutdown() -> crossbeam::channel::Receiver<()> {
    let (tx, rx) = crossbeam::channel::bounded(1);
    let _ = SHUTDOWN_TX.set(tx);
    rx
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_shutdown_by_default() {
        assert!(!is_shutdown());
    }
}

//! Long-running commands: `watch` and `start`.
//!
//! Both register for Ctrl+C; the first interrupt stops the managed server
//! and returns, a second one exits immediately.

use std::sync::Arc;

use anyhow::Result;

use crate::core::register_shutdown;
use crate::dispatch::{Dispatcher, error_chain};
use crate::watch::WatchManager;

/// Build once, start the server, then dispatch every change.
pub async fn watch(dispatcher: &Arc<Dispatcher>) -> Result<()> {
    let shutdown = register_shutdown();

    // Watcher first: changes made during the initial build are not lost.
    let manager = WatchManager::new(dispatcher.config(), Arc::clone(dispatcher.cache()));

    if let Err(e) = super::build::build(dispatcher).await {
        crate::log!("error"; "{:#}", e);
    }
    if let Err(e) = dispatcher
        .server()
        .start(&dispatcher.config().server_entry())
        .await
    {
        // A later server change restarts it
        crate::log!("error"; "{}", error_chain(&e));
    }

    crate::watch::run(Arc::clone(dispatcher), manager, shutdown).await;
    Ok(())
}

/// Start the server and keep it running until interrupted.
pub async fn start(dispatcher: &Arc<Dispatcher>) -> Result<()> {
    let shutdown = register_shutdown();
    let server = dispatcher.server();
    server.start(&dispatcher.config().server_entry()).await?;

    // Either an interrupt or the handler going away ends the wait.
    let _ = tokio::task::spawn_blocking(move || shutdown.recv()).await;

    server.stop().await?;
    Ok(())
}

//! Watch manager and the watch-mode event loop.
//!
//! ```text
//! PollWatcher (per root) → translate → channel → directory filter → Dispatcher::spawn
//! ```
//!
//! No debouncing: every reported change dispatches on its own.

mod event;
mod roots;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::cache::FileCache;
use crate::config::ProjectConfig;
use crate::core::{ChangeEvent, SourceRoot};
use crate::dispatch::Dispatcher;
use roots::WatchRoots;

/// How often missing roots are retried.
const MAINTAIN_INTERVAL: Duration = Duration::from_secs(1);

/// How often the shutdown channel is polled.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Directory a source root is watched at.
pub fn root_path(config: &ProjectConfig, root: SourceRoot) -> &Path {
    match root {
        SourceRoot::Scripts => &config.paths.source,
        SourceRoot::Stylesheets => &config.paths.stylesheets,
        SourceRoot::Templates => &config.paths.templates,
        SourceRoot::VendorClient => &config.paths.vendor_client,
        SourceRoot::VendorServer => &config.paths.vendor_server,
    }
}

/// Subscriptions over every source root, yielding filtered change events.
pub struct WatchManager {
    roots: WatchRoots,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    /// Received but not yet accepted or dropped
    pending: Option<ChangeEvent>,
    cache: Arc<FileCache>,
}

impl WatchManager {
    /// Attach every existing root. Events start buffering immediately.
    pub fn new(config: &ProjectConfig, cache: Arc<FileCache>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let roots = SourceRoot::ALL
            .iter()
            .map(|&root| (root, root_path(config, root).to_path_buf()))
            .collect();

        let mut roots = WatchRoots::new(roots, config.watch.poll_interval(), tx);
        roots.attach_existing();
        crate::debug!("watch"; "{} root(s) attached", roots.attached());

        Self {
            roots,
            events,
            pending: None,
            cache,
        }
    }

    pub fn attached(&self) -> usize {
        self.roots.attached()
    }

    /// Re-attach roots that appeared since the last call.
    pub fn maintain(&mut self) {
        self.roots.maintain();
    }

    /// Next change worth dispatching.
    ///
    /// Cancel-safe: an event being checked when the future is dropped is
    /// checked again by the next call.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            let event = match &self.pending {
                Some(event) => event.clone(),
                None => {
                    let event = self.events.recv().await?;
                    self.pending = Some(event.clone());
                    event
                }
            };
            let accepted = accept(&self.cache, &event).await;
            self.pending = None;
            if accepted {
                return Some(event);
            }
        }
    }
}

/// Directories have no artifact of their own: drop their create/change
/// events. Removals always pass, since the output tree must go too.
async fn accept(cache: &FileCache, event: &ChangeEvent) -> bool {
    if event.is_removal() {
        cache.evict(&event.path);
        return true;
    }
    match cache.refresh(&event.path).await {
        Ok(handle) if handle.is_dir() => {
            crate::debug!("watch"; "skip directory {}", event.path.display());
            false
        }
        Ok(handle) => {
            crate::debug!(
                "watch";
                "{} {} (mtime {:?})",
                event.kind.label(),
                event.path.display(),
                handle.mtime()
            );
            true
        }
        Err(e) => {
            crate::debug!("watch"; "{}", e);
            true
        }
    }
}

/// Dispatch every change until shutdown, then stop the server.
pub async fn run(
    dispatcher: Arc<Dispatcher>,
    mut manager: WatchManager,
    shutdown: Receiver<()>,
) {
    let mut maintain = tokio::time::interval(MAINTAIN_INTERVAL);
    let mut poll = tokio::time::interval(SHUTDOWN_POLL);

    crate::log!("watch"; "watching {} root(s)", manager.attached());
    loop {
        tokio::select! {
            Some(event) = manager.next() => dispatcher.spawn(event),
            _ = maintain.tick() => manager.maintain(),
            _ = poll.tick() => {
                if shutdown.try_recv().is_ok() || crate::core::is_shutdown() {
                    break;
                }
            }
        }
    }

    if let Err(e) = dispatcher.server().stop().await {
        crate::log!("error"; "{}", crate::dispatch::error_chain(&e));
    }
}

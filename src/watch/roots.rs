use std::path::PathBuf;
use std::time::Duration;

use notify::{Config, PollWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use super::event::translate;
use crate::core::{ChangeEvent, SourceRoot};

/// One source root and its own poll watcher.
struct Subscription {
    root: SourceRoot,
    path: PathBuf,
    watcher: Option<PollWatcher>,
}

/// Watch-root consistency manager.
///
/// Responsibility:
/// - Attach every existing root at startup, each with its own watcher
/// - Re-attach roots that appear (or reappear) later
///
/// A root that fails to attach never affects the others.
pub(super) struct WatchRoots {
    subscriptions: Vec<Subscription>,
    interval: Duration,
    tx: UnboundedSender<ChangeEvent>,
}

impl WatchRoots {
    pub(super) fn new(
        roots: Vec<(SourceRoot, PathBuf)>,
        interval: Duration,
        tx: UnboundedSender<ChangeEvent>,
    ) -> Self {
        let subscriptions = roots
            .into_iter()
            .map(|(root, path)| Subscription {
                root,
                path,
                watcher: None,
            })
            .collect();
        Self {
            subscriptions,
            interval,
            tx,
        }
    }

    pub(super) fn attach_existing(&mut self) {
        for sub in &mut self.subscriptions {
            if !sub.path.exists() {
                crate::debug!("watch"; "{} root missing, waiting: {}", sub.root.name(), sub.path.display());
                continue;
            }
            match subscribe(sub, self.interval, &self.tx) {
                Ok(watcher) => sub.watcher = Some(watcher),
                Err(e) => crate::log!("watch"; "cannot watch {}: {}", sub.path.display(), e),
            }
        }
    }

    pub(super) fn maintain(&mut self) {
        for sub in &mut self.subscriptions {
            // Drop stale watchers for roots that no longer exist.
            if sub.watcher.is_some() && !sub.path.exists() {
                sub.watcher = None;
                crate::debug!("watch"; "root removed: {}", sub.path.display());
                continue;
            }

            if sub.watcher.is_some() || !sub.path.exists() {
                continue;
            }

            if let Ok(watcher) = subscribe(sub, self.interval, &self.tx) {
                sub.watcher = Some(watcher);
                crate::debug!("watch"; "re-attached watch: {}", sub.path.display());
            }
        }
    }

    pub(super) fn attached(&self) -> usize {
        self.subscriptions
            .iter()
            .filter(|sub| sub.watcher.is_some())
            .count()
    }
}

fn subscribe(
    sub: &Subscription,
    interval: Duration,
    tx: &UnboundedSender<ChangeEvent>,
) -> notify::Result<PollWatcher> {
    let root = sub.root;
    let path = sub.path.clone();
    let tx = tx.clone();
    let handler = move |res: notify::Result<notify::Event>| match res {
        Ok(event) => {
            for change in translate(&event, root, &path) {
                // Receiver gone: shutting down
                let _ = tx.send(change);
            }
        }
        // Unreadable directories, permission denied
        Err(e) => crate::debug!("watch"; "{}: {}", root.name(), e),
    };

    let config = Config::default().with_poll_interval(interval);
    let mut watcher = PollWatcher::new(handler, config)?;
    watcher.watch(&sub.path, RecursiveMode::Recursive)?;
    Ok(watcher)
}

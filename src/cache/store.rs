use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use jwalk::WalkDir;
use tokio::sync::OnceCell;

use super::{DeleteError, FileHandle, HandleState, ResolutionError};
use crate::utils::path::normalize_path;

type Slot = Arc<OnceCell<Arc<FileHandle>>>;

/// Path → handle cache. Share it as `Arc<FileCache>`.
#[derive(Default)]
pub struct FileCache {
    entries: DashMap<PathBuf, Slot>,
    /// Underlying stat resolutions performed
    resolutions: AtomicUsize,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached handle for `path`, resolving it on first use.
    ///
    /// A missing path resolves to a handle with `exists == false`. Any other
    /// stat failure evicts the slot so the next caller retries.
    pub async fn get(&self, path: &Path) -> Result<Arc<FileHandle>, ResolutionError> {
        let path = normalize_path(path);
        // Shard guard must drop before awaiting
        let slot = Arc::clone(self.entries.entry(path.clone()).or_default().value());

        let result = slot
            .get_or_try_init(|| async {
                let state = self.stat(&path).await?;
                Ok::<_, ResolutionError>(Arc::new(FileHandle::new(path.clone(), state)))
            })
            .await
            .cloned();

        if result.is_err() {
            self.entries
                .remove_if(&path, |_, current| Arc::ptr_eq(current, &slot));
        }
        result
    }

    /// Re-stat `path` and update its handle in place, resolving it if absent.
    pub async fn refresh(&self, path: &Path) -> Result<Arc<FileHandle>, ResolutionError> {
        let path = normalize_path(path);
        let Some(handle) = self.peek(&path) else {
            return self.get(&path).await;
        };

        match self.stat(&path).await {
            Ok(state) => {
                handle.update(state);
                Ok(handle)
            }
            Err(e) => {
                self.entries.remove(&path);
                Err(e)
            }
        }
    }

    /// Handles for every descendant of `root`, dotfiles skipped.
    ///
    /// Existing handles are refreshed in place. A missing root yields an
    /// empty list.
    pub async fn get_all(&self, root: &Path) -> Vec<Arc<FileHandle>> {
        let root = normalize_path(root);
        let walked = match tokio::task::spawn_blocking(move || walk(&root)).await {
            Ok(walked) => walked,
            Err(e) => {
                crate::log!("error"; "tree walk panicked: {}", e);
                return Vec::new();
            }
        };

        let mut handles = Vec::with_capacity(walked.len());
        for (path, state) in walked {
            self.resolutions.fetch_add(1, Ordering::Relaxed);
            if let Some(handle) = self.prime(&path, state) {
                handles.push(handle);
                continue;
            }
            // Resolution already in flight for this path; share it.
            match self.get(&path).await {
                Ok(handle) => handles.push(handle),
                Err(e) => crate::debug!("cache"; "{}", e),
            }
        }
        handles
    }

    /// Remove the filesystem entry behind `handle` (file or whole directory)
    /// and evict it, along with any cached descendants.
    ///
    /// Succeeds if the entry is already gone.
    pub async fn delete(&self, handle: &FileHandle) -> Result<(), DeleteError> {
        let path = handle.path();
        let removed = match tokio::fs::symlink_metadata(path).await {
            Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
            Ok(_) => tokio::fs::remove_file(path).await,
            Err(e) => Err(e),
        };

        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(DeleteError {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        handle.update(HandleState::MISSING);
        self.entries.retain(|key, _| !key.starts_with(path));
        Ok(())
    }

    /// Drop the handle for `path` and every cached descendant, without
    /// touching the filesystem.
    pub fn evict(&self, path: &Path) {
        let path = normalize_path(path);
        self.entries.retain(|key, _| !key.starts_with(&path));
    }

    /// Number of stat resolutions performed so far.
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Number of cached handles.
    pub fn handle_count(&self) -> usize {
        self.entries.len()
    }

    /// Already-resolved handle, without resolving.
    fn peek(&self, path: &Path) -> Option<Arc<FileHandle>> {
        self.entries.get(path).and_then(|slot| slot.get().cloned())
    }

    /// Install a state observed by a tree walk. Returns `None` if a
    /// resolution for `path` is still in flight.
    fn prime(&self, path: &Path, state: HandleState) -> Option<Arc<FileHandle>> {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(slot) => {
                let handle = slot.get().get()?;
                handle.update(state);
                Some(Arc::clone(handle))
            }
            Entry::Vacant(slot) => {
                let handle = Arc::new(FileHandle::new(path.to_path_buf(), state));
                slot.insert(Arc::new(OnceCell::new_with(Some(Arc::clone(&handle)))));
                Some(handle)
            }
        }
    }

    async fn stat(&self, path: &Path) -> Result<HandleState, ResolutionError> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(HandleState::from_metadata(&meta)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HandleState::MISSING),
            Err(source) => Err(ResolutionError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Blocking walk of `root`'s descendants with their metadata.
fn walk(root: &Path) -> Vec<(PathBuf, HandleState)> {
    WalkDir::new(root)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.depth > 0)
        .filter_map(|e| {
            let meta = e.metadata().ok()?;
            Some((e.path(), HandleState::from_metadata(&meta)))
        })
        .collect()
}

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::{WatchManager, root_path};
use crate::cache::FileCache;
use crate::config::{ProjectConfig, test_config_at};
use crate::core::{ChangeEvent, ChangeKind, SourceRoot};

const TIMEOUT: Duration = Duration::from_secs(5);

fn setup() -> (TempDir, ProjectConfig) {
    let dir = TempDir::new().unwrap();
    let config = test_config_at(dir.path(), "[watch]\npoll_interval_ms = 20");
    fs::create_dir_all(&config.paths.source).unwrap();
    (dir, config)
}

async fn next(manager: &mut WatchManager) -> ChangeEvent {
    tokio::time::timeout(TIMEOUT, manager.next())
        .await
        .expect("no change event before timeout")
        .expect("event channel closed")
}

#[test]
fn test_root_paths() {
    let (_dir, config) = setup();
    assert_eq!(root_path(&config, SourceRoot::Scripts), config.paths.source);
    assert_eq!(
        root_path(&config, SourceRoot::VendorClient),
        config.root.join("vendor/client")
    );
}

#[tokio::test]
async fn test_file_creation_is_reported() {
    let (_dir, config) = setup();
    let mut manager = WatchManager::new(&config, Arc::new(FileCache::new()));
    assert_eq!(manager.attached(), 1);

    let file = config.paths.source.join("a.ts");
    fs::write(&file, "export {}").unwrap();

    let event = next(&mut manager).await;
    assert_eq!(
        event,
        ChangeEvent::new(file, ChangeKind::Created, SourceRoot::Scripts)
    );
}

#[tokio::test]
async fn test_directory_creation_is_dropped() {
    let (_dir, config) = setup();
    let mut manager = WatchManager::new(&config, Arc::new(FileCache::new()));

    let lib = config.paths.source.join("lib");
    fs::create_dir_all(&lib).unwrap();
    fs::write(lib.join("b.ts"), "").unwrap();
    fs::write(config.paths.source.join(".hidden.ts"), "").unwrap();

    let event = next(&mut manager).await;
    assert_eq!(event.path, lib.join("b.ts"));
}

#[tokio::test]
async fn test_removal_evicts_cached_handle() {
    let (_dir, config) = setup();
    let file = config.paths.source.join("gone.ts");
    fs::write(&file, "").unwrap();
    let cache = Arc::new(FileCache::new());
    let mut manager = WatchManager::new(&config, Arc::clone(&cache));
    cache.get(&file).await.unwrap();
    assert_eq!(cache.handle_count(), 1);

    fs::remove_file(&file).unwrap();

    let event = next(&mut manager).await;
    assert_eq!(event.kind, ChangeKind::Removed);
    assert_eq!(event.path, file);
    // Removed paths leave the cache
    assert_eq!(cache.handle_count(), 0);
}

#[tokio::test]
async fn test_missing_root_is_attached_later() {
    let (_dir, config) = setup();
    let mut manager = WatchManager::new(&config, Arc::new(FileCache::new()));
    assert_eq!(manager.attached(), 1);

    fs::create_dir_all(&config.paths.stylesheets).unwrap();
    manager.maintain();
    assert_eq!(manager.attached(), 2);

    let sheet = config.paths.stylesheets.join("main.css");
    fs::write(&sheet, "body {}").unwrap();

    let event = next(&mut manager).await;
    assert_eq!(event.root, SourceRoot::Stylesheets);
    assert_eq!(event.path, sheet);
}

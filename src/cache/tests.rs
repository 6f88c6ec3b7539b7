use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use super::{FileCache, FileKind};
use crate::utils::path::normalize_path;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_resolution_collapses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.ts");
    fs::write(&path, "export {}").unwrap();

    let cache = Arc::new(FileCache::new());
    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..32 {
        let cache = Arc::clone(&cache);
        let path = path.clone();
        tasks.spawn(async move { cache.get(&path).await.unwrap() });
    }

    let mut handles = Vec::new();
    while let Some(handle) = tasks.join_next().await {
        handles.push(handle.unwrap());
    }

    assert_eq!(handles.len(), 32);
    assert_eq!(cache.resolutions(), 1);
    assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    assert!(handles[0].is_file());
    assert_eq!(cache.handle_count(), 1);
}

#[tokio::test]
async fn test_missing_path_resolves_as_absent() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new();

    let handle = cache.get(&dir.path().join("nope.js")).await.unwrap();
    assert!(!handle.exists());
    assert_eq!(handle.mtime(), None);
}

#[tokio::test]
async fn test_equivalent_paths_share_one_handle() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/a.js"), "").unwrap();
    let cache = FileCache::new();

    let a = cache.get(&dir.path().join("src/a.js")).await.unwrap();
    let b = cache.get(&dir.path().join("src/../src/a.js")).await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.path(), normalize_path(&dir.path().join("src/a.js")));
}

#[tokio::test]
async fn test_refresh_updates_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("late.css");
    let cache = FileCache::new();

    let before = cache.get(&path).await.unwrap();
    assert!(!before.exists());

    fs::write(&path, "body {}").unwrap();
    let after = cache.refresh(&path).await.unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert!(before.exists());
    assert!(before.mtime().is_some());
    assert_eq!(cache.resolutions(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolution_error_evicts_and_retries() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "").unwrap();
    let cache = FileCache::new();

    // A path below a regular file fails with ENOTDIR, not NotFound
    let bad = file.join("child.js");
    assert!(cache.get(&bad).await.is_err());
    assert_eq!(cache.handle_count(), 0);

    assert!(cache.get(&bad).await.is_err());
    assert_eq!(cache.resolutions(), 2);
}

#[tokio::test]
async fn test_delete_twice_succeeds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.js");
    fs::write(&path, "").unwrap();
    let cache = FileCache::new();

    let handle = cache.get(&path).await.unwrap();
    cache.delete(&handle).await.unwrap();
    assert!(!path.exists());
    assert!(!handle.exists());
    assert_eq!(cache.handle_count(), 0);

    cache.delete(&handle).await.unwrap();
}

#[tokio::test]
async fn test_delete_never_existing_path() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new();

    let handle = cache.get(&dir.path().join("ghost.js")).await.unwrap();
    cache.delete(&handle).await.unwrap();
    cache.delete(&handle).await.unwrap();
}

#[tokio::test]
async fn test_delete_directory_evicts_descendants() {
    let dir = TempDir::new().unwrap();
    let client = dir.path().join("build/client/alpha");
    fs::create_dir_all(&client).unwrap();
    fs::write(client.join("index.js"), "").unwrap();
    let cache = FileCache::new();

    let child = cache.get(&client.join("index.js")).await.unwrap();
    let handle = cache.get(&client).await.unwrap();
    assert_eq!(handle.kind(), FileKind::Dir);

    cache.delete(&handle).await.unwrap();
    assert!(!client.exists());
    assert_eq!(cache.handle_count(), 0);

    let again = cache.get(&client.join("index.js")).await.unwrap();
    assert!(!Arc::ptr_eq(&child, &again));
    assert!(!again.exists());
}

#[tokio::test]
async fn test_get_all_skips_dotfiles() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("src");
    fs::create_dir_all(root.join("client/alpha")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::write(root.join("client/alpha/index.ts"), "").unwrap();
    fs::write(root.join("logo.png"), "").unwrap();
    fs::write(root.join(".env"), "").unwrap();
    fs::write(root.join(".cache/x.js"), "").unwrap();
    let cache = FileCache::new();

    let existing = cache.get(&root.join("logo.png")).await.unwrap();
    let handles = cache.get_all(&root).await;

    let mut files: Vec<_> = handles
        .iter()
        .filter(|h| h.is_file())
        .map(|h| h.path().strip_prefix(normalize_path(&root)).unwrap().to_path_buf())
        .collect();
    files.sort();
    assert_eq!(
        files,
        [
            std::path::PathBuf::from("client/alpha/index.ts"),
            std::path::PathBuf::from("logo.png")
        ]
    );
    assert!(handles.iter().any(|h| Arc::ptr_eq(h, &existing)));
    assert_eq!(handles.iter().filter(|h| h.is_dir()).count(), 2);
}

#[tokio::test]
async fn test_get_all_missing_root() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new();
    assert!(cache.get_all(&dir.path().join("missing")).await.is_empty());
}

#[tokio::test]
async fn test_evict_drops_path_and_descendants() {
    let dir = TempDir::new().unwrap();
    let lib = dir.path().join("lib");
    fs::create_dir_all(&lib).unwrap();
    fs::write(lib.join("a.ts"), "").unwrap();
    fs::write(dir.path().join("b.ts"), "").unwrap();
    let cache = FileCache::new();

    cache.get(&lib).await.unwrap();
    cache.get(&lib.join("a.ts")).await.unwrap();
    let kept = cache.get(&dir.path().join("b.ts")).await.unwrap();
    assert_eq!(cache.handle_count(), 3);

    cache.evict(&lib);
    assert_eq!(cache.handle_count(), 1);
    assert!(Arc::ptr_eq(
        &kept,
        &cache.get(&dir.path().join("b.ts")).await.unwrap()
    ));
}

//! One-shot commands: `build`, `minify`, `clean`.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use super::common::check;
use crate::dispatch::Dispatcher;
use crate::logger::elapsed;
use crate::utils::plural::plural_count;

/// Build everything once.
pub async fn build(dispatcher: &Arc<Dispatcher>) -> Result<()> {
    let report = dispatcher.full_build().await;
    crate::log!(
        "build";
        "{} in {}",
        plural_count(report.outcomes.len(), "action"),
        elapsed(report.elapsed)
    );
    check(&report, "build")
}

/// Re-minify every client bundle.
pub async fn minify(dispatcher: &Arc<Dispatcher>) -> Result<()> {
    let report = dispatcher.minify_bundles().await;
    check(&report, "minify")
}

/// Delete the output tree and both public directories.
pub async fn clean(dispatcher: &Arc<Dispatcher>) -> Result<()> {
    let started = Instant::now();
    let config = dispatcher.config();
    let cache = dispatcher.cache();

    let mut removed = 0;
    for dir in [
        &config.paths.output,
        &config.paths.public_client,
        &config.paths.public_css,
    ] {
        let handle = cache.get(dir).await?;
        if !handle.exists() {
            continue;
        }
        cache.delete(&handle).await?;
        crate::debug!("clean"; "removed {}", config.root_relative(dir).display());
        removed += 1;
    }

    crate::log!(
        "clean";
        "{} in {}",
        plural_count(removed, "output"),
        elapsed(started.elapsed())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clean_removes_outputs_only() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");
        for rel in ["build/lib/a.js", "public/js/alpha.js", "src/lib/a.ts"] {
            let path = config.root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        let root = config.root.clone();
        let dispatcher = super::super::common::dispatcher(config);

        clean(&dispatcher).await.unwrap();

        assert!(!root.join("build").exists());
        assert!(!root.join("public/js").exists());
        assert!(root.join("public").is_dir());
        assert!(root.join("src/lib/a.ts").is_file());

        // Nothing left: still fine
        clean(&dispatcher).await.unwrap();
    }
}

//! Whole-tree passes: the full build and the minify pass.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use super::plan::{bundle_all, compile_all_stylesheets, output_path};
use super::{Action, ActionError, ActionOutcome, DispatchReport, Dispatcher, RebuildPlan, transform};
use crate::logger::{ProgressLine, elapsed};
use crate::utils::path::RelPath;
use crate::utils::plural::plural_count;

impl Dispatcher {
    /// Build everything once.
    ///
    /// 1. transpile or copy every source file (rayon)
    /// 2. bundle every discovered client (concurrent)
    /// 3. compile every top-level stylesheet (concurrent)
    pub async fn full_build(self: &Arc<Self>) -> DispatchReport {
        let started = Instant::now();
        let mut report = self.produce_all().await;

        // Outputs now exist on disk; resolve them in one walk.
        let primed = self.cache.get_all(&self.config.paths.output).await;
        crate::debug!(
            "cache";
            "primed {} output handle(s), {} cached, {} resolution(s)",
            primed.len(),
            self.cache.handle_count(),
            self.cache.resolutions()
        );

        let bundles = bundle_all(&self.config);
        let sheets = compile_all_stylesheets(&self.config);
        let progress = Arc::new(ProgressLine::new(&[
            ("bundle", bundles.len()),
            ("css", sheets.len()),
        ]));

        let plan = RebuildPlan {
            produce: Vec::new(),
            cascade: bundles,
        };
        report.merge(self.execute(plan, Some(Arc::clone(&progress))).await);

        let plan = RebuildPlan {
            produce: Vec::new(),
            cascade: sheets,
        };
        report.merge(self.execute(plan, Some(Arc::clone(&progress))).await);
        finish(progress);

        report.elapsed = started.elapsed();
        report
    }

    /// Transpile or copy every file under the source root.
    async fn produce_all(self: &Arc<Self>) -> DispatchReport {
        let started = Instant::now();
        let handles = self.cache.get_all(&self.config.paths.source).await;

        let actions: Vec<Action> = handles
            .iter()
            .filter(|handle| handle.is_file())
            .filter_map(|handle| {
                let rel = RelPath::under(handle.path(), &self.config.paths.source)?;
                let (dst, is_script) = output_path(&rel, &self.config);
                let src = handle.path().to_path_buf();
                Some(if is_script {
                    Action::TranspileFile { src, dst }
                } else {
                    Action::CopyFile { src, dst }
                })
            })
            .collect();

        let transpile = actions
            .iter()
            .filter(|a| matches!(a, Action::TranspileFile { .. }))
            .count();
        let progress = ProgressLine::new(&[
            ("transpile", transpile),
            ("copy", actions.len() - transpile),
        ]);

        let this = Arc::clone(self);
        let outcomes = tokio::task::spawn_blocking(move || {
            let outcomes: Vec<_> = actions
                .into_par_iter()
                .map(|action| this.run_blocking(action, Some(&progress)))
                .collect();
            progress.finish();
            outcomes
        })
        .await;

        let mut report = DispatchReport::default();
        match outcomes {
            Ok(outcomes) => report.outcomes = outcomes,
            Err(e) => crate::log!("error"; "source pass panicked: {}", e),
        }
        report.elapsed = started.elapsed();
        report
    }

    /// Replace every `*.min.js` in the public client directory with a fresh
    /// minified copy of each plain bundle.
    pub async fn minify_bundles(self: &Arc<Self>) -> DispatchReport {
        let started = Instant::now();
        let mut report = DispatchReport::default();
        let handles = self.cache.get_all(&self.config.paths.public_client).await;

        let (stale, bundles): (Vec<_>, Vec<_>) = handles
            .into_iter()
            .filter(|handle| handle.is_file() && is_bundle_file(handle.path()))
            .partition(|handle| is_minified(handle.path()));

        for handle in stale {
            let result = self.cache.delete(&handle).await.map_err(ActionError::from);
            if let Err(e) = &result {
                crate::log!("error"; "{}", super::error_chain(e));
            }
            report.outcomes.push(ActionOutcome {
                action: Action::DeleteArtifact(handle.path().to_path_buf()),
                elapsed: started.elapsed(),
                result,
            });
        }
        if !report.is_ok() {
            report.elapsed = started.elapsed();
            return report;
        }

        let actions: Vec<Action> = bundles
            .iter()
            .map(|handle| {
                let src = handle.path().to_path_buf();
                let dst = src.with_extension("min.js");
                Action::MinifyBundle { src, dst }
            })
            .collect();

        let this = Arc::clone(self);
        let outcomes = tokio::task::spawn_blocking(move || {
            actions
                .into_par_iter()
                .map(|action| this.run_blocking(action, None))
                .collect::<Vec<_>>()
        })
        .await;

        match outcomes {
            Ok(outcomes) => report.outcomes.extend(outcomes),
            Err(e) => crate::log!("error"; "minify pass panicked: {}", e),
        }
        for outcome in report.outcomes.iter().filter(|o| o.is_ok()) {
            if let Action::MinifyBundle { dst, .. } = &outcome.action {
                let _ = self.cache.refresh(dst).await;
            }
        }

        crate::log!(
            "minify";
            "{} in {}",
            plural_count(bundles.len(), "bundle"),
            elapsed(started.elapsed())
        );
        report.elapsed = started.elapsed();
        report
    }

    /// Transform on the current (blocking) thread, with the same logging as
    /// dispatched actions.
    fn run_blocking(&self, action: Action, progress: Option<&ProgressLine>) -> ActionOutcome {
        let started = Instant::now();
        let result = transform(self.toolchain.as_ref(), &self.config, &action);
        let outcome = ActionOutcome {
            action,
            elapsed: started.elapsed(),
            result,
        };
        self.log_outcome(&outcome, progress);
        outcome
    }
}

fn is_bundle_file(path: &std::path::Path) -> bool {
    path.extension().is_some_and(|ext| ext == "js")
}

fn is_minified(path: &std::path::Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".min.js"))
}

fn finish(progress: Arc<ProgressLine>) {
    if let Ok(progress) = Arc::try_unwrap(progress) {
        progress.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_minified_names() {
        assert!(is_minified(Path::new("public/js/alpha.min.js")));
        assert!(!is_minified(Path::new("public/js/alpha.js")));
        assert!(is_bundle_file(Path::new("public/js/alpha.min.js")));
        assert!(!is_bundle_file(Path::new("public/js/alpha.js.map")));
    }
}

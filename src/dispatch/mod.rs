//! Rebuild dispatcher.
//!
//! Turns each [`ChangeEvent`] into a [`RebuildPlan`] and executes it:
//!
//! ```text
//! ChangeEvent ─▶ plan() ─▶ produce (sequential) ─┬─ failed ─▶ cascade skipped
//!                                                └─ ok ─────▶ cascade (concurrent)
//! ```
//!
//! Every action yields an [`ActionOutcome`]; nothing raises. Server restarts
//! are serialized by the [`ServerController`], everything else in a cascade
//! runs concurrently.

mod build;
mod outcome;
mod plan;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use outcome::{ActionError, ActionOutcome, DispatchReport, error_chain};
pub use plan::{Action, RebuildPlan, plan};

use crate::cache::FileCache;
use crate::classify::client_entry;
use crate::config::ProjectConfig;
use crate::core::ChangeEvent;
use crate::logger::{ProgressLine, elapsed, status_error, status_success};
use crate::server::ServerController;
use crate::toolchain::Toolchain;

/// Executes rebuild plans. Share as `Arc<Dispatcher>`.
pub struct Dispatcher {
    config: Arc<ProjectConfig>,
    cache: Arc<FileCache>,
    toolchain: Arc<dyn Toolchain>,
    server: Arc<ServerController>,
}

impl Dispatcher {
    pub fn new(
        config: Arc<ProjectConfig>,
        cache: Arc<FileCache>,
        toolchain: Arc<dyn Toolchain>,
        server: Arc<ServerController>,
    ) -> Self {
        Self {
            config,
            cache,
            toolchain,
            server,
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<FileCache> {
        &self.cache
    }

    pub fn server(&self) -> &Arc<ServerController> {
        &self.server
    }

    /// Dispatch one change as an independent task.
    ///
    /// The result is reported on the watch status line. A panic inside the
    /// task is logged and never reaches the caller.
    pub fn spawn(self: &Arc<Self>, event: ChangeEvent) {
        let this = Arc::clone(self);
        let path = event.path.clone();
        let task = tokio::spawn(async move {
            let report = this.dispatch(&event).await;
            this.report_status(&event, &report);
        });

        tokio::spawn(async move {
            if let Err(e) = task.await
                && e.is_panic()
            {
                crate::log!("error"; "dispatch for {} panicked", path.display());
            }
        });
    }

    /// Plan and execute one change.
    pub async fn dispatch(self: &Arc<Self>, event: &ChangeEvent) -> DispatchReport {
        let plan = plan(event, &self.config);
        crate::debug!(
            "watch";
            "{} {} ({}) → {} action(s)",
            event.kind.label(),
            self.config.root_relative(&event.path).display(),
            event.root.name(),
            plan.len()
        );
        if plan.is_empty() {
            return DispatchReport::default();
        }
        self.execute(plan, None).await
    }

    /// Run `produce` in order, then the cascade concurrently.
    pub async fn execute(
        self: &Arc<Self>,
        plan: RebuildPlan,
        progress: Option<Arc<ProgressLine>>,
    ) -> DispatchReport {
        let started = Instant::now();
        let mut report = DispatchReport::default();

        for action in plan.produce {
            let outcome = self.run(action, progress.as_deref()).await;
            let failed = !outcome.is_ok();
            report.outcomes.push(outcome);
            if failed {
                break;
            }
        }

        if report.is_ok() {
            let outcomes = self.run_concurrent(plan.cascade, progress).await;
            report.outcomes.extend(outcomes);
        } else {
            report.skipped = plan.cascade;
        }

        report.elapsed = started.elapsed();
        report
    }

    /// Spawn every action as its own task and collect outcomes in order.
    async fn run_concurrent(
        self: &Arc<Self>,
        actions: Vec<Action>,
        progress: Option<Arc<ProgressLine>>,
    ) -> Vec<ActionOutcome> {
        let tasks: Vec<_> = actions
            .into_iter()
            .map(|action| {
                let this = Arc::clone(self);
                let progress = progress.clone();
                let spawned = action.clone();
                let task =
                    tokio::spawn(async move { this.run(spawned, progress.as_deref()).await });
                (action, task)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (action, task) in tasks {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => ActionOutcome {
                    action,
                    elapsed: Duration::ZERO,
                    result: Err(ActionError::Panicked(e.to_string())),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Execute and log one action.
    async fn run(&self, action: Action, progress: Option<&ProgressLine>) -> ActionOutcome {
        let started = Instant::now();
        let result = self.perform(&action).await;
        let outcome = ActionOutcome {
            action,
            elapsed: started.elapsed(),
            result,
        };
        self.log_outcome(&outcome, progress);
        outcome
    }

    async fn perform(&self, action: &Action) -> Result<(), ActionError> {
        match action {
            Action::TranspileFile { dst, .. }
            | Action::CopyFile { dst, .. }
            | Action::CompileStylesheet { dst, .. }
            | Action::MinifyBundle { dst, .. } => {
                self.transform_blocking(action.clone()).await?;
                self.cache.refresh(dst).await?;
                Ok(())
            }
            Action::BundleClient(name) => {
                let entry = self.cache.refresh(&client_entry(&self.config, name)).await?;
                if !entry.is_file() {
                    return Err(ActionError::MissingEntry(name.clone()));
                }
                self.transform_blocking(action.clone()).await?;
                self.cache.refresh(&bundle_output(&self.config, name)).await?;
                Ok(())
            }
            Action::RestartServer => {
                self.server.restart(&self.config.server_entry()).await?;
                Ok(())
            }
            Action::DeleteArtifact(path) => {
                let handle = self.cache.get(path).await?;
                self.cache.delete(&handle).await?;
                Ok(())
            }
        }
    }

    /// Run a transform on the blocking pool.
    async fn transform_blocking(&self, action: Action) -> Result<(), ActionError> {
        let toolchain = Arc::clone(&self.toolchain);
        let config = Arc::clone(&self.config);
        tokio::task::spawn_blocking(move || transform(toolchain.as_ref(), &config, &action))
            .await
            .map_err(|e| ActionError::Panicked(e.to_string()))?
    }

    /// With a progress line only failures print; otherwise successes go to
    /// the debug log and failures are left for the status line.
    fn log_outcome(&self, outcome: &ActionOutcome, progress: Option<&ProgressLine>) {
        let module = outcome.action.module();
        let identity = outcome.action.describe(&self.config);
        match (&outcome.result, progress) {
            (Ok(()), Some(progress)) => progress.inc(module),
            (Ok(()), None) => {
                crate::debug!(module; "{} in {}", identity, elapsed(outcome.elapsed));
            }
            (Err(e), Some(progress)) => {
                progress.inc(module);
                crate::log!("error"; "{}", error_chain(e));
            }
            (Err(e), None) => {
                crate::debug!("error"; "{} {}: {}", module, identity, error_chain(e));
            }
        }
    }

    /// One status block per dispatched change.
    fn report_status(&self, event: &ChangeEvent, report: &DispatchReport) {
        if report.outcomes.is_empty() {
            return;
        }
        let path = self.config.root_relative(&event.path);
        let actions = crate::utils::plural::plural_count(report.outcomes.len(), "action");
        if report.is_ok() {
            status_success(&format!(
                "{} {}: {} in {}",
                path.display(),
                event.kind.label(),
                actions,
                elapsed(report.elapsed)
            ));
        } else {
            let mut summary = format!(
                "{} {}: {} of {} failed",
                path.display(),
                event.kind.label(),
                report.failure_count(),
                actions
            );
            if !report.skipped.is_empty() {
                summary.push_str(&format!(", {} skipped", report.skipped.len()));
            }
            status_error(&summary, &report.failure_detail());
        }
    }
}

/// `<public_client>/<name>.js`
pub fn bundle_output(config: &ProjectConfig, name: &str) -> PathBuf {
    config.paths.public_client.join(format!("{name}.js"))
}

/// Call the toolchain for a transform action. Blocking.
fn transform(
    toolchain: &dyn Toolchain,
    config: &ProjectConfig,
    action: &Action,
) -> Result<(), ActionError> {
    match action {
        Action::TranspileFile { src, dst } => toolchain.transpile(src, dst)?,
        Action::CopyFile { src, dst } => toolchain.copy(src, dst)?,
        Action::CompileStylesheet { src, dst } => toolchain.compile_stylesheet(src, dst)?,
        Action::MinifyBundle { src, dst } => toolchain.minify(src, dst)?,
        Action::BundleClient(name) => {
            toolchain.bundle(&client_entry(config, name), &bundle_output(config, name))?;
        }
        Action::RestartServer | Action::DeleteArtifact(_) => {}
    }
    Ok(())
}

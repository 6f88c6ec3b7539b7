//! Rebuild planning: one change event → one [`RebuildPlan`].
//!
//! | Source root    | Change               | Produce            | Cascade                         |
//! |----------------|----------------------|--------------------|---------------------------------|
//! | scripts        | created / changed    | transpile or copy  | by classification of the output |
//! | scripts        | removed              | delete output      | none                            |
//! | stylesheets    | any                  | -                  | compile every top-level sheet   |
//! | templates      | any                  | -                  | restart                         |
//! | vendor client  | any                  | -                  | bundle every client             |
//! | vendor server  | any                  | -                  | restart                         |
//!
//! Output classification: `shared` bundles every client and restarts,
//! `client` bundles that client (if it has an entry), `server` restarts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{Classification, classify, client_entry, discover_clients};
use crate::config::ProjectConfig;
use crate::core::{ChangeEvent, SourceRoot};
use crate::utils::path::RelPath;

/// One unit of rebuild work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    TranspileFile { src: PathBuf, dst: PathBuf },
    CopyFile { src: PathBuf, dst: PathBuf },
    BundleClient(String),
    CompileStylesheet { src: PathBuf, dst: PathBuf },
    MinifyBundle { src: PathBuf, dst: PathBuf },
    RestartServer,
    DeleteArtifact(PathBuf),
}

impl Action {
    /// Logger module for this action's lines.
    pub fn module(&self) -> &'static str {
        match self {
            Self::TranspileFile { .. } => "transpile",
            Self::CopyFile { .. } => "copy",
            Self::BundleClient(_) => "bundle",
            Self::CompileStylesheet { .. } => "css",
            Self::MinifyBundle { .. } => "minify",
            Self::RestartServer => "server",
            Self::DeleteArtifact(_) => "delete",
        }
    }

    /// Short identity for log lines, paths relative to the project root.
    pub fn describe(&self, config: &ProjectConfig) -> String {
        let rel = |p: &Path| config.root_relative(p).display().to_string();
        match self {
            Self::TranspileFile { src, .. }
            | Self::CopyFile { src, .. }
            | Self::CompileStylesheet { src, .. }
            | Self::MinifyBundle { src, .. } => rel(src),
            Self::BundleClient(name) => name.clone(),
            Self::RestartServer => "restart".into(),
            Self::DeleteArtifact(path) => rel(path),
        }
    }
}

/// Ordered actions for one change.
///
/// `produce` writes or removes the direct output and runs first; if any of
/// it fails, `cascade` is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildPlan {
    pub produce: Vec<Action>,
    pub cascade: Vec<Action>,
}

impl RebuildPlan {
    pub fn is_empty(&self) -> bool {
        self.produce.is_empty() && self.cascade.is_empty()
    }

    pub fn len(&self) -> usize {
        self.produce.len() + self.cascade.len()
    }

    fn produce(mut self, action: Action) -> Self {
        self.produce.push(action);
        self
    }

    fn cascade(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        for action in actions {
            if !self.cascade.contains(&action) {
                self.cascade.push(action);
            }
        }
        self
    }
}

/// Plan the rebuild for one change event.
pub fn plan(event: &ChangeEvent, config: &ProjectConfig) -> RebuildPlan {
    match event.root {
        SourceRoot::Scripts => plan_script(event, config),
        SourceRoot::Stylesheets => plan_stylesheet(event, config),
        SourceRoot::Templates | SourceRoot::VendorServer => {
            RebuildPlan::default().cascade([Action::RestartServer])
        }
        SourceRoot::VendorClient => RebuildPlan::default().cascade(bundle_all(config)),
    }
}

fn plan_script(event: &ChangeEvent, config: &ProjectConfig) -> RebuildPlan {
    let Some(rel) = RelPath::under(&event.path, &config.paths.source) else {
        return RebuildPlan::default();
    };
    if rel.is_empty() || rel.is_hidden() {
        return RebuildPlan::default();
    }

    let (dst, is_script) = output_path(&rel, config);
    if event.is_removal() {
        return RebuildPlan::default().produce(Action::DeleteArtifact(dst));
    }

    let src = event.path.clone();
    let produce = if is_script {
        Action::TranspileFile {
            src,
            dst: dst.clone(),
        }
    } else {
        Action::CopyFile {
            src,
            dst: dst.clone(),
        }
    };
    RebuildPlan::default()
        .produce(produce)
        .cascade(cascade_for_output(&dst, config))
}

/// Compiled-output counterpart of a source path, and whether it is a script.
pub fn output_path(rel: &RelPath, config: &ProjectConfig) -> (PathBuf, bool) {
    let dst = rel.join_onto(&config.paths.output);
    match rel.extension() {
        Some(ext) if config.transpile.is_script(&ext) => (
            dst.with_extension(&config.transpile.output_extension),
            true,
        ),
        _ => (dst, false),
    }
}

/// Downstream actions for a written output file.
pub fn cascade_for_output(dst: &Path, config: &ProjectConfig) -> Vec<Action> {
    match classify(dst, config) {
        Classification::Shared => {
            let mut actions = bundle_all(config);
            actions.push(Action::RestartServer);
            actions
        }
        Classification::Client { name, entry: true } => vec![Action::BundleClient(name)],
        Classification::Client { name, entry: false } => {
            // No entry yet: nothing to bundle
            if client_entry(config, &name).is_file() {
                vec![Action::BundleClient(name)]
            } else {
                Vec::new()
            }
        }
        Classification::Server => vec![Action::RestartServer],
        _ => Vec::new(),
    }
}

fn plan_stylesheet(event: &ChangeEvent, config: &ProjectConfig) -> RebuildPlan {
    let Classification::Stylesheet { partial } = classify(&event.path, config) else {
        return RebuildPlan::default();
    };

    let mut plan = RebuildPlan::default();
    if event.is_removal()
        && !partial
        && is_top_level(&event.path, config)
        && let Some(dst) = stylesheet_output(&event.path, config)
    {
        plan = plan.cascade([Action::DeleteArtifact(dst)]);
    }
    plan.cascade(compile_all_stylesheets(config))
}

fn is_top_level(path: &Path, config: &ProjectConfig) -> bool {
    RelPath::under(path, &config.paths.stylesheets).is_some_and(|rel| rel.parts().len() == 1)
}

/// `<public_css>/<basename>.css`
pub fn stylesheet_output(src: &Path, config: &ProjectConfig) -> Option<PathBuf> {
    let stem = src.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".css");
    Some(config.paths.public_css.join(name))
}

/// Non-partial stylesheet files directly under the stylesheet root, sorted.
pub fn top_level_stylesheets(config: &ProjectConfig) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(&config.paths.stylesheets) else {
        return Vec::new();
    };

    let mut sheets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                classify(path, config),
                Classification::Stylesheet { partial: false }
            )
        })
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('.'))
        })
        .collect();
    sheets.sort();
    sheets
}

pub fn compile_all_stylesheets(config: &ProjectConfig) -> Vec<Action> {
    top_level_stylesheets(config)
        .into_iter()
        .filter_map(|src| {
            let dst = stylesheet_output(&src, config)?;
            Some(Action::CompileStylesheet { src, dst })
        })
        .collect()
}

pub fn bundle_all(config: &ProjectConfig) -> Vec<Action> {
    discover_clients(config)
        .into_iter()
        .map(Action::BundleClient)
        .collect()
}

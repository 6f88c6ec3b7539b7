//! Transform functions behind one seam.
//!
//! The dispatcher only sees [`Toolchain`]. [`ProjectToolchain`] runs the
//! configured command for a tool when one is set and falls back to the
//! built-in engine otherwise:
//!
//! | Tool       | Built-in                  | Default command |
//! |------------|---------------------------|-----------------|
//! | transpile  | oxc transformer           | -               |
//! | copy       | `fs::copy`                | -               |
//! | bundle     | none                      | esbuild         |
//! | minify     | oxc minifier, lightningcss| -               |
//! | stylesheet | lightningcss (`.css`)     | -               |
//!
//! Every transform creates the destination's parent directories. Calls are
//! blocking; async callers go through `spawn_blocking`.

mod command;
mod error;
mod minify;
mod stylesheet;
mod transpile;

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub use error::{ToolKind, TransformCause, TransformError};

use crate::config::ProjectConfig;

/// External transform collaborators.
pub trait Toolchain: Send + Sync {
    fn transpile(&self, src: &Path, dst: &Path) -> Result<(), TransformError>;
    fn copy(&self, src: &Path, dst: &Path) -> Result<(), TransformError>;
    fn bundle(&self, entry: &Path, dst: &Path) -> Result<(), TransformError>;
    fn minify(&self, src: &Path, dst: &Path) -> Result<(), TransformError>;
    fn compile_stylesheet(&self, src: &Path, dst: &Path) -> Result<(), TransformError>;
}

/// Toolchain configured from `kiln.toml`.
pub struct ProjectToolchain {
    config: Arc<ProjectConfig>,
}

impl ProjectToolchain {
    pub fn new(config: Arc<ProjectConfig>) -> Self {
        Self { config }
    }

    /// Run `command` if configured, otherwise `builtin(src, content)`.
    fn run(
        &self,
        kind: ToolKind,
        command: &[String],
        src: &Path,
        dst: &Path,
        builtin: impl FnOnce(&Path, &str) -> Result<String, TransformCause>,
    ) -> Result<(), TransformError> {
        let fail = |cause: TransformCause| TransformError::new(kind, src, cause);
        prepare(dst).map_err(|e| fail(e.into()))?;

        if !command.is_empty() {
            return command::run_tool(command, src, dst, &self.config.root)
                .map_err(|e| fail(TransformCause::Command(e)));
        }

        let content = fs::read_to_string(src).map_err(|e| fail(e.into()))?;
        let output = builtin(src, &content).map_err(fail)?;
        fs::write(dst, output).map_err(|e| fail(e.into()))
    }
}

impl Toolchain for ProjectToolchain {
    fn transpile(&self, src: &Path, dst: &Path) -> Result<(), TransformError> {
        self.run(
            ToolKind::Transpile,
            &self.config.transpile.command,
            src,
            dst,
            transpile::transpile,
        )
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<(), TransformError> {
        let fail = |e: std::io::Error| TransformError::new(ToolKind::Copy, src, e);
        prepare(dst).map_err(fail)?;
        fs::copy(src, dst).map_err(fail)?;
        Ok(())
    }

    fn bundle(&self, entry: &Path, dst: &Path) -> Result<(), TransformError> {
        self.run(
            ToolKind::Bundle,
            &self.config.bundle.command,
            entry,
            dst,
            |_, _| {
                Err(TransformCause::Unsupported(
                    "no built-in bundler; set [bundle] command".into(),
                ))
            },
        )
    }

    fn minify(&self, src: &Path, dst: &Path) -> Result<(), TransformError> {
        self.run(
            ToolKind::Minify,
            &self.config.minify.command,
            src,
            dst,
            minify::minify_by_ext,
        )
    }

    fn compile_stylesheet(&self, src: &Path, dst: &Path) -> Result<(), TransformError> {
        self.run(
            ToolKind::Stylesheet,
            &self.config.stylesheet.command,
            src,
            dst,
            stylesheet::compile,
        )
    }
}

/// Create the parent directory of an output path.
fn prepare(dst: &Path) -> std::io::Result<()> {
    match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Join parser/transformer errors into one message.
fn diagnostics<E: Display>(errors: &[E]) -> TransformCause {
    let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
    TransformCause::Diagnostics(lines.join("\n"))
}

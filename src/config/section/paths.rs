//! `[paths]` section configuration.
//!
//! Every path is relative to the project root in `kiln.toml` and absolute
//! after loading.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! source = "src"                # primary script source root
//! output = "build"              # compiled output, mirrors source
//! client = "client"             # client subtree inside output
//! server = "server"             # server subtree inside output
//! stylesheets = "styles"
//! templates = "views"
//! vendor_client = "vendor/client"
//! vendor_server = "vendor/server"
//! public_client = "public/js"
//! public_css = "public/css"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::normalize_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source, output and public directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source: PathBuf,
    pub output: PathBuf,

    /// Client subtree name inside `output`. Each subdirectory is one client.
    pub client: String,

    /// Server subtree name inside `output`.
    pub server: String,

    pub stylesheets: PathBuf,
    pub templates: PathBuf,
    pub vendor_client: PathBuf,
    pub vendor_server: PathBuf,
    pub public_client: PathBuf,
    pub public_css: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "src".into(),
            output: "build".into(),
            client: "client".into(),
            server: "server".into(),
            stylesheets: "styles".into(),
            templates: "views".into(),
            vendor_client: "vendor/client".into(),
            vendor_server: "vendor/server".into(),
            public_client: "public/js".into(),
            public_css: "public/css".into(),
        }
    }
}

impl PathsConfig {
    /// `<output>/<client>`
    pub fn client_root(&self) -> PathBuf {
        self.output.join(&self.client)
    }

    /// `<output>/<server>`
    pub fn server_root(&self) -> PathBuf {
        self.output.join(&self.server)
    }

    /// Resolve every directory against `root`.
    pub(crate) fn normalize(&mut self, root: &Path) {
        for dir in [
            &mut self.source,
            &mut self.output,
            &mut self.stylesheets,
            &mut self.templates,
            &mut self.vendor_client,
            &mut self.vendor_server,
            &mut self.public_client,
            &mut self.public_css,
        ] {
            *dir = normalize_path(&root.join(&*dir));
        }
    }

    /// Checks that need absolute paths, so run after `normalize`.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.source.is_dir() {
            diag.error_with_hint(
                FieldPath::new("paths.source"),
                format!("source directory `{}` does not exist", self.source.display()),
                "create it or point `source` at your script sources",
            );
        }

        // Outputs inside the source tree would be rebuilt as sources
        if self.source.starts_with(&self.output) || self.output.starts_with(&self.source) {
            diag.error(
                FieldPath::new("paths.output"),
                "output and source directories must not overlap",
            );
        }

        for (field, name) in [
            (FieldPath::new("paths.client"), &self.client),
            (FieldPath::new("paths.server"), &self.server),
        ] {
            if name.is_empty() || name.contains(['/', '\\']) {
                diag.error(field, "must be a single directory name");
            }
        }
    }
}

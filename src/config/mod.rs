//! Project configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── tools      # [transpile] [bundle] [minify] [stylesheet]
//! │   ├── server     # [server]
//! │   └── watch      # [watch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # ProjectConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BundleConfig, MinifyConfig, PathsConfig, ServerConfig, StylesheetConfig, TranspileConfig,
    WatchConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{log, utils::path::normalize_path};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub transpile: TranspileConfig,

    #[serde(default)]
    pub bundle: BundleConfig,

    #[serde(default)]
    pub minify: MinifyConfig,

    #[serde(default)]
    pub stylesheet: StylesheetConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl ProjectConfig {
    /// Find, parse, normalize and validate the config file.
    ///
    /// Searches upward from cwd for `config_name`. The project root is the
    /// config file's parent directory.
    pub fn load(config_name: &Path) -> Result<Self, ConfigError> {
        let config_path = find_config_file(config_name)
            .ok_or_else(|| ConfigError::NotFound(config_name.to_path_buf()))?;

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.config_path = normalize_path(&config_path);
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Resolve the root and every configured path against it.
    fn finalize(&mut self, root: &Path) {
        self.root = normalize_path(root);
        self.paths.normalize(&self.root);
        self.transpile.normalize();
        self.stylesheet.normalize();
    }

    /// Validate every section. Collects all errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(&mut diag);
        self.transpile.validate(&mut diag);
        self.bundle.validate(&mut diag);
        self.minify.validate(&mut diag);
        self.stylesheet.validate(&mut diag);
        self.server.validate(&mut diag);
        self.watch.validate(&mut diag);

        diag.print_hints();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Absolute path of the server entry file.
    pub fn server_entry(&self) -> PathBuf {
        self.paths.output.join(&self.server.entry)
    }

    /// Path relative to the project root, for log lines.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text. Panics on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// A normalized config rooted at `root`, without validation.
#[cfg(test)]
pub fn test_config_at(root: &Path, content: &str) -> ProjectConfig {
    let mut config = test_parse_config(content);
    config.config_path = root.join("kiln.toml");
    config.finalize(root);
    config
}

// ============================================================================
// tests
// ============================================================================

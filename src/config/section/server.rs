//! `[server]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [server]
//! command = ["node", "--enable-source-maps"]   # entry appended last
//! entry = "server/index.js"                    # relative to paths.output
//! env = { PORT = "3000" }
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Managed server process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub command: Vec<String>,

    /// Entry file, relative to the output root.
    pub entry: PathBuf,

    /// Extra environment for the server process.
    pub env: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: vec!["node".into()],
            entry: "server/index.js".into(),
            env: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field = FieldPath::new("server.command");
        match self.command.first() {
            None => diag.error(field, "must not be empty"),
            Some(program) if which::which(program).is_err() => {
                diag.hint(field, format!("`{program}` not found on PATH"));
            }
            Some(_) => {}
        }

        if self.entry.is_absolute() {
            diag.error(
                FieldPath::new("server.entry"),
                "must be relative to `paths.output`",
            );
        }
    }
}

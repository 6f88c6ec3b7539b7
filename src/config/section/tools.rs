//! Tool sections: `[transpile]`, `[bundle]`, `[minify]`, `[stylesheet]`.
//!
//! An empty `command` selects the built-in engine where one exists. A
//! configured command gets `$KILN_INPUT`, `$KILN_OUTPUT` and `$KILN_ROOT`
//! substituted in its arguments.
//!
//! # Example
//!
//! ```toml
//! [transpile]
//! extensions = ["js", "jsx", "mjs", "ts", "tsx"]
//! output_extension = "js"
//!
//! [bundle]
//! entry = "index"
//! command = ["esbuild", "$KILN_INPUT", "--bundle", "--outfile=$KILN_OUTPUT"]
//!
//! [stylesheet]
//! command = ["sass", "$KILN_INPUT", "$KILN_OUTPUT"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Package runners fetch their tool on demand, so a missing second word is
/// not an error.
const PACKAGE_RUNNERS: &[&str] = &["npx", "bunx", "pnpx", "yarn", "dlx"];

/// Hint when a command's program is not on PATH.
fn check_program(command: &[String], field: FieldPath, diag: &mut ConfigDiagnostics) {
    let Some(program) = command.first() else {
        return;
    };
    if which::which(program).is_ok() {
        return;
    }
    if PACKAGE_RUNNERS.contains(&program.as_str()) {
        diag.hint(field, format!("package runner `{program}` not found on PATH"));
    } else {
        diag.hint(field, format!("`{program}` not found on PATH"));
    }
}

fn lowercase_all(items: &mut [String]) {
    for item in items {
        *item = item.trim_start_matches('.').to_ascii_lowercase();
    }
}

// ============================================================================
// [transpile]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileConfig {
    /// Script extensions. Other source files are copied byte-for-byte.
    pub extensions: Vec<String>,
    /// Extension every transpiled script is written with.
    pub output_extension: String,
    pub command: Vec<String>,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            extensions: ["js", "jsx", "mjs", "ts", "tsx"].map(String::from).to_vec(),
            output_extension: "js".into(),
            command: Vec::new(),
        }
    }
}

impl TranspileConfig {
    /// Whether a (lowercased) extension is a script.
    pub fn is_script(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }

    pub(crate) fn normalize(&mut self) {
        lowercase_all(&mut self.extensions);
        self.output_extension = self
            .output_extension
            .trim_start_matches('.')
            .to_ascii_lowercase();
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output_extension.is_empty() {
            diag.error(
                FieldPath::new("transpile.output_extension"),
                "must not be empty",
            );
        }
        check_program(&self.command, FieldPath::new("transpile.command"), diag);
    }
}

// ============================================================================
// [bundle]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// File stem of each client's entry point.
    pub entry: String,
    pub command: Vec<String>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            entry: "index".into(),
            command: ["esbuild", "$KILN_INPUT", "--bundle", "--outfile=$KILN_OUTPUT"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl BundleConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field = FieldPath::new("bundle.command");
        if self.command.is_empty() {
            diag.error_with_hint(
                field,
                "must not be empty (there is no built-in bundler)",
                "e.g. [\"esbuild\", \"$KILN_INPUT\", \"--bundle\", \"--outfile=$KILN_OUTPUT\"]",
            );
            return;
        }
        if self.entry.is_empty() {
            diag.error(FieldPath::new("bundle.entry"), "must not be empty");
        }
        check_program(&self.command, field, diag);
    }
}

// ============================================================================
// [minify]
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    pub command: Vec<String>,
}

impl MinifyConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        check_program(&self.command, FieldPath::new("minify.command"), diag);
    }
}

// ============================================================================
// [stylesheet]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    pub extensions: Vec<String>,
    /// Files starting with this prefix are partials and never compile alone.
    pub partial_prefix: String,
    pub command: Vec<String>,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            extensions: ["css", "scss", "sass"].map(String::from).to_vec(),
            partial_prefix: "_".into(),
            command: Vec::new(),
        }
    }
}

impl StylesheetConfig {
    pub fn is_stylesheet(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }

    pub fn is_partial(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.partial_prefix)
    }

    pub(crate) fn normalize(&mut self) {
        lowercase_all(&mut self.extensions);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.partial_prefix.is_empty() {
            diag.error(
                FieldPath::new("stylesheet.partial_prefix"),
                "must not be empty (every file would be a partial)",
            );
        }
        let field = FieldPath::new("stylesheet.command");
        check_program(&self.command, field, diag);
        if self.command.is_empty() && self.extensions.iter().any(|e| e != "css") {
            diag.hint(
                field,
                "built-in compiler only handles `.css`; set a command for other extensions",
            );
        }
    }
}

//! Change classification.
//!
//! Pure functions mapping an absolute, normalized path to a
//! [`Classification`]. Rules run in order over separator-agnostic relative
//! paths; the first match wins.
//!
//! | # | Rule                                             | Result                 |
//! |---|--------------------------------------------------|------------------------|
//! | 1 | under stylesheet root, stylesheet extension      | `Stylesheet{partial}`  |
//! | 2 | under template root                              | `Template`             |
//! | 3 | `<output>/<client>/<name>/...`                   | `Client{name, entry}`  |
//! | 4 | under `<output>/<server>`                        | `Server`               |
//! | 5 | script under output root                         | `Shared`               |
//! |   | anything else                                    | `Other`                |
//!
//! Known clients come from [`discover_clients`], a directory listing of the
//! compiled client subtree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
pub use crate::core::Classification;
use crate::utils::path::RelPath;

type Rule = fn(&Path, &ProjectConfig) -> Option<Classification>;

const RULES: &[Rule] = &[stylesheet, template, client, server, output];

/// Classify a normalized absolute path.
///
/// Note: use `normalize_path()` on watcher paths before classification
pub fn classify(path: &Path, config: &ProjectConfig) -> Classification {
    RULES
        .iter()
        .find_map(|rule| rule(path, config))
        .unwrap_or(Classification::Other)
}

fn stylesheet(path: &Path, config: &ProjectConfig) -> Option<Classification> {
    let rel = RelPath::under(path, &config.paths.stylesheets)?;
    let ext = rel.extension()?;
    if !config.stylesheet.is_stylesheet(&ext) {
        return None;
    }
    let partial = config.stylesheet.is_partial(rel.file_name()?);
    Some(Classification::Stylesheet { partial })
}

fn template(path: &Path, config: &ProjectConfig) -> Option<Classification> {
    RelPath::under(path, &config.paths.templates).map(|_| Classification::Template)
}

fn client(path: &Path, config: &ProjectConfig) -> Option<Classification> {
    let rel = RelPath::under(path, &config.paths.client_root())?;
    // Files directly in the client subtree belong to no client
    let [name, rest @ ..] = rel.parts() else {
        return None;
    };
    if rest.is_empty() {
        return None;
    }
    let entry = matches!(rest, [file] if *file == entry_file_name(config));
    Some(Classification::Client {
        name: name.clone(),
        entry,
    })
}

fn server(path: &Path, config: &ProjectConfig) -> Option<Classification> {
    RelPath::under(path, &config.paths.server_root()).map(|_| Classification::Server)
}

fn output(path: &Path, config: &ProjectConfig) -> Option<Classification> {
    let rel = RelPath::under(path, &config.paths.output)?;
    let is_script = rel.extension().is_some_and(|ext| {
        ext == config.transpile.output_extension || config.transpile.is_script(&ext)
    });
    Some(if is_script {
        Classification::Shared
    } else {
        Classification::Other
    })
}

// =============================================================================
// Clients
// =============================================================================

/// `index.js` with the default config.
pub fn entry_file_name(config: &ProjectConfig) -> String {
    format!(
        "{}.{}",
        config.bundle.entry, config.transpile.output_extension
    )
}

/// Compiled entry point of a client.
pub fn client_entry(config: &ProjectConfig, name: &str) -> PathBuf {
    config
        .paths
        .client_root()
        .join(name)
        .join(entry_file_name(config))
}

/// Every directory directly under `<output>/<client>` that has an entry
/// point, sorted by name.
///
/// A missing client subtree yields no clients.
pub fn discover_clients(config: &ProjectConfig) -> Vec<String> {
    let root = config.paths.client_root();
    let entries = match fs::read_dir(&root) {
        Ok(entries) => entries,
        Err(e) => {
            crate::debug!("classify"; "no clients in {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut clients: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .filter(|name| client_entry(config, name).is_file())
        .collect();
    clients.sort();
    clients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ProjectConfig) {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");
        (dir, config)
    }

    fn at(config: &ProjectConfig, rel: &str) -> Classification {
        classify(&config.root.join(rel), config)
    }

    #[test]
    fn test_stylesheet_rules() {
        let (_dir, config) = setup();
        assert_eq!(
            at(&config, "styles/main.scss"),
            Classification::Stylesheet { partial: false }
        );
        assert_eq!(
            at(&config, "styles/_vars.scss"),
            Classification::Stylesheet { partial: true }
        );
        assert_eq!(
            at(&config, "styles/components/_button.SCSS"),
            Classification::Stylesheet { partial: true }
        );
        // Non-stylesheet files under the stylesheet root fall through
        assert_eq!(at(&config, "styles/logo.png"), Classification::Other);
    }

    #[test]
    fn test_template_rule() {
        let (_dir, config) = setup();
        assert_eq!(at(&config, "views/layout.html"), Classification::Template);
        assert_eq!(at(&config, "views/partials/nav.ejs"), Classification::Template);
    }

    #[test]
    fn test_client_rules() {
        let (_dir, config) = setup();
        assert_eq!(
            at(&config, "build/client/alpha/index.js"),
            Classification::Client {
                name: "alpha".into(),
                entry: true
            }
        );
        assert_eq!(
            at(&config, "build/client/alpha/widgets/index.js"),
            Classification::Client {
                name: "alpha".into(),
                entry: false
            }
        );
        assert_eq!(
            at(&config, "build/client/beta/util.js"),
            Classification::Client {
                name: "beta".into(),
                entry: false
            }
        );
        // Directly inside the client subtree: no client owns it
        assert_eq!(at(&config, "build/client/helpers.js"), Classification::Shared);
        assert_eq!(at(&config, "build/client/alpha"), Classification::Other);
    }

    #[test]
    fn test_server_and_shared_rules() {
        let (_dir, config) = setup();
        assert_eq!(at(&config, "build/server/index.js"), Classification::Server);
        assert_eq!(at(&config, "build/server/data.json"), Classification::Server);
        assert_eq!(at(&config, "build/lib/format.js"), Classification::Shared);
        assert_eq!(at(&config, "build/lib/data.json"), Classification::Other);
        assert_eq!(at(&config, "README.md"), Classification::Other);
        assert_eq!(at(&config, "src/lib/format.ts"), Classification::Other);
    }

    #[test]
    fn test_custom_layout() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(
            dir.path(),
            "[paths]\noutput = \"out\"\nclient = \"web\"\n[bundle]\nentry = \"main\"\n[transpile]\noutput_extension = \"mjs\"",
        );
        assert_eq!(
            at(&config, "out/web/shop/main.mjs"),
            Classification::Client {
                name: "shop".into(),
                entry: true
            }
        );
        assert_eq!(
            at(&config, "out/web/shop/index.mjs"),
            Classification::Client {
                name: "shop".into(),
                entry: false
            }
        );
    }

    #[test]
    fn test_discover_clients() {
        let (_dir, config) = setup();
        assert!(discover_clients(&config).is_empty());

        let client_root = config.paths.client_root();
        for name in ["gamma", "alpha"] {
            fs::create_dir_all(client_root.join(name)).unwrap();
            fs::write(client_root.join(name).join("index.js"), "").unwrap();
        }
        // No entry point
        fs::create_dir_all(client_root.join("beta")).unwrap();
        fs::write(client_root.join("beta/util.js"), "").unwrap();
        // Files directly in the subtree are not clients
        fs::write(client_root.join("shared.js"), "").unwrap();

        assert_eq!(discover_clients(&config), ["alpha", "gamma"]);
    }
}

//! Configuration section definitions.
//!
//! | Section        | Purpose                                        |
//! |----------------|------------------------------------------------|
//! | `[paths]`      | Source, output, public and vendor directories  |
//! | `[transpile]`  | Script transpiler                              |
//! | `[bundle]`     | Per-client bundler                             |
//! | `[minify]`     | Bundle minifier                                |
//! | `[stylesheet]` | Stylesheet compiler and partial prefix         |
//! | `[server]`     | Managed server process                         |
//! | `[watch]`      | Poll watcher settings                          |

mod paths;
mod server;
mod tools;
mod watch;

pub use paths::PathsConfig;
pub use server::ServerConfig;
pub use tools::{BundleConfig, MinifyConfig, StylesheetConfig, TranspileConfig};
pub use watch::WatchConfig;

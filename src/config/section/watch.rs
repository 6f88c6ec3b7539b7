//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! poll_interval_ms = 100
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Poll interval of every root's watcher.
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
        }
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.poll_interval_ms == 0 {
            diag.error(
                FieldPath::new("watch.poll_interval_ms"),
                "must be greater than 0",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::time::Duration;

    #[test]
    fn test_watch_config() {
        let config = test_parse_config("[watch]\npoll_interval_ms = 250");
        assert_eq!(config.watch.poll_interval(), Duration::from_millis(250));
        assert_eq!(test_parse_config("").watch.poll_interval_ms, 100);
    }
}

//! Per-action results.

use std::time::Duration;

use thiserror::Error;

use super::Action;
use crate::cache::{DeleteError, ResolutionError};
use crate::server::ServerError;
use crate::toolchain::TransformError;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("client `{0}` has no entry point")]
    MissingEntry(String),

    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Result of one executed action.
#[derive(Debug)]
pub struct ActionOutcome {
    pub action: Action,
    pub elapsed: Duration,
    pub result: Result<(), ActionError>,
}

impl ActionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of one executed plan.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<ActionOutcome>,
    /// Cascade actions not run because producing the output failed
    pub skipped: Vec<Action>,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(ActionOutcome::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn merge(&mut self, other: Self) {
        self.outcomes.extend(other.outcomes);
        self.skipped.extend(other.skipped);
        self.elapsed += other.elapsed;
    }

    /// Error chain of every failure, one per line.
    pub fn failure_detail(&self) -> String {
        self.failures()
            .filter_map(|o| o.result.as_ref().err())
            .map(|e| error_chain(e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `outer: cause: root cause`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::{ToolKind, TransformCause};

    #[test]
    fn test_error_chain_includes_cause() {
        let err = ActionError::from(TransformError::new(
            ToolKind::Transpile,
            "src/a.ts",
            TransformCause::Diagnostics("Unexpected token".into()),
        ));
        assert_eq!(
            error_chain(&err),
            "transpile failed: src/a.ts: Unexpected token"
        );
    }

    #[test]
    fn test_report_counts_failures() {
        let mut report = DispatchReport::default();
        report.outcomes.push(ActionOutcome {
            action: Action::RestartServer,
            elapsed: Duration::ZERO,
            result: Ok(()),
        });
        assert!(report.is_ok());

        let mut other = DispatchReport::default();
        other.outcomes.push(ActionOutcome {
            action: Action::BundleClient("beta".into()),
            elapsed: Duration::from_millis(3),
            result: Err(ActionError::MissingEntry("beta".into())),
        });
        report.merge(other);

        assert!(!report.is_ok());
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.failure_detail(), "client `beta` has no entry point");
    }
}

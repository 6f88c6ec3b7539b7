//! Utility modules shared across the orchestrator.

pub mod exec;
pub mod path;
pub mod plural;

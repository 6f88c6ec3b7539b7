//! Core types - pure abstractions shared across the codebase.

mod category;
mod event;
mod state;

pub use category::{Classification, SourceRoot};
pub use event::{ChangeEvent, ChangeKind};
pub use state::{is_shutdown, register_shutdown, setup_shutdown_handler};

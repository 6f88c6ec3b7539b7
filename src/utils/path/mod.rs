//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`)
//! - [`rel`]: Separator-agnostic relative paths (`RelPath`)

pub mod fs;
pub mod rel;

pub use fs::normalize_path;
pub use rel::RelPath;

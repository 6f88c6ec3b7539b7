//! File handle cache.
//!
//! Resolves paths to shared [`FileHandle`]s. Concurrent first resolutions
//! of one path collapse onto a single in-flight stat, so the cache never
//! holds two handle objects for the same canonical path.
//!
//! ```text
//! get(path) ──▶ normalize ──▶ slot (OnceCell) ──▶ stat once ──▶ Arc<FileHandle>
//!                                  ▲
//!                  concurrent callers wait here
//! ```

mod error;
mod handle;
mod store;

#[cfg(test)]
mod tests;

pub use error::{DeleteError, ResolutionError};
pub use handle::{FileHandle, FileKind, HandleState};
pub use store::FileCache;

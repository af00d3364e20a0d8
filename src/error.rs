//! clipwatch - Error types
//!
//! Every error here is recoverable: the watch loop logs it and keeps
//! polling on schedule

/// Watcher error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The clipboard could not be read this time around
    #[error("clipboard read failed: {0}")]
    Read(String),
}

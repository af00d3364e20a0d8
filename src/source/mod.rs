//! clipwatch - Clipboard source module
//!
//! The read primitive behind the watch loop. `ClipboardSource` is the
//! seam tests replace; `SystemClipboard` reads the real platform
//! clipboard through `arboard`

use async_trait::async_trait;

use crate::error::Error;

/// Asynchronous, side-effect-free read of the current clipboard text
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    async fn read_text(&self) -> Result<String, Error>;
}

/// Platform clipboard source backed by `arboard`
///
/// A fresh clipboard handle is opened per read so every poll sees the
/// latest contents; the blocking read runs off the async runtime.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardSource for SystemClipboard {
    async fn read_text(&self) -> Result<String, Error> {
        tokio::task::spawn_blocking(|| {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| Error::Read(e.to_string()))?;
            clipboard.get_text().map_err(|e| Error::Read(e.to_string()))
        })
        .await
        .map_err(|e| Error::Read(e.to_string()))?
    }
}

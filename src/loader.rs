//! Single-shot asynchronous file reads for uploads
//!
//! A read runs as a tokio task and hands its result back over a channel.
//! The UI thread drains that channel once per frame and feeds each file
//! into the session, so all state changes still happen on one thread.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Handle;

/// A file whose bytes have been read and decoded as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type LoadResult = std::result::Result<LoadedFile, LoadError>;

pub struct FileLoader {
    handle: Handle,
    result_tx: Sender<LoadResult>,
    result_rx: Receiver<LoadResult>,
    pending: usize,
}

impl FileLoader {
    pub fn new(handle: Handle) -> Self {
        let (result_tx, result_rx) = unbounded();
        Self {
            handle,
            result_tx,
            result_rx,
            pending: 0,
        }
    }

    /// Loader on the runtime of the calling context, if there is one
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Starts reading `path`; the result shows up in a later [`poll`](Self::poll)
    pub fn load(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let tx = self.result_tx.clone();
        self.pending += 1;

        log::debug!("reading {}", path.display());
        self.handle.spawn(async move {
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(LoadedFile {
                    name: file_name(&path),
                    content: decode_text(&bytes),
                }),
                Err(source) => {
                    log::warn!("failed to read {}: {}", path.display(), source);
                    Err(LoadError::Read {
                        path: path.display().to_string(),
                        source,
                    })
                }
            };
            // Receiver gone means the app is shutting down
            let _ = tx.send(result);
        });
    }

    /// Queues contents that are already in memory, such as a dropped file
    pub fn load_bytes(&mut self, name: impl Into<String>, bytes: &[u8]) {
        self.pending += 1;
        let _ = self.result_tx.send(Ok(LoadedFile {
            name: name.into(),
            content: decode_text(bytes),
        }));
    }

    /// Every read that has finished since the last call
    pub fn poll(&mut self) -> Vec<LoadResult> {
        let results: Vec<LoadResult> = self.result_rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(results.len());
        results
    }

    /// Blocks for the next finished read
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadResult> {
        let result = self.result_rx.recv_timeout(timeout).ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(result)
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// UTF-8 with replacement characters, leading byte-order mark removed
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string()
}

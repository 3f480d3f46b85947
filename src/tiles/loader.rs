//! Background tile downloads
//!
//! Each requested tile is fetched by a tokio task, decoded to RGBA off the
//! UI thread and handed back over a crossbeam channel. The caller drains
//! the channel once per frame, in the same way file uploads are collected.

use super::source::TileSource;
use crate::core::{config::TileConfig, geo::TileCoord};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

const MAX_ATTEMPTS: usize = 2;
const RETRY_DELAY: Duration = Duration::from_millis(250);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A decoded tile, row-major RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum TileError {
    #[error("tile request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("tile image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug)]
pub struct TileResult {
    pub coord: TileCoord,
    pub image: Result<TileImage, TileError>,
}

pub struct TileLoader {
    handle: Handle,
    client: reqwest::Client,
    source: Arc<dyn TileSource>,
    limit: Arc<Semaphore>,
    result_tx: Sender<TileResult>,
    result_rx: Receiver<TileResult>,
    pending: HashSet<TileCoord>,
    /// Tiles that failed every attempt; not requested again
    failed: HashSet<TileCoord>,
}

impl TileLoader {
    pub fn new(
        handle: Handle,
        source: Arc<dyn TileSource>,
        config: &TileConfig,
    ) -> Result<Self, TileError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let (result_tx, result_rx) = unbounded();

        Ok(Self {
            handle,
            client,
            source,
            limit: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            result_tx,
            result_rx,
            pending: HashSet::new(),
            failed: HashSet::new(),
        })
    }

    /// Starts downloading `coord` unless it is already on its way or has
    /// failed before. Returns whether a download was started.
    pub fn request(&mut self, coord: TileCoord) -> bool {
        if self.pending.contains(&coord) || self.failed.contains(&coord) {
            return false;
        }
        self.pending.insert(coord);

        let url = self.source.url(coord);
        let client = self.client.clone();
        let limit = Arc::clone(&self.limit);
        let tx = self.result_tx.clone();

        self.handle.spawn(async move {
            // Closed semaphore never happens; the loader owns it
            let _permit = limit.acquire_owned().await.ok();
            let image = fetch_with_retry(&client, &url, coord).await;
            let _ = tx.send(TileResult { coord, image });
        });
        true
    }

    /// Every download that finished since the last call
    pub fn poll(&mut self) -> Vec<TileResult> {
        let results: Vec<TileResult> = self.result_rx.try_iter().collect();
        for result in &results {
            self.pending.remove(&result.coord);
            if let Err(e) = &result.image {
                log::warn!("giving up on tile {:?}: {}", result.coord, e);
                self.failed.insert(result.coord);
            }
        }
        results
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Allows tiles that failed earlier to be requested again, e.g. after
    /// the network came back
    pub fn retry_failed(&mut self) {
        self.failed.clear();
    }
}

async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    coord: TileCoord,
) -> Result<TileImage, TileError> {
    let mut attempt = 1;
    loop {
        log::debug!("fetch tile {:?} attempt {}", coord, attempt);
        match fetch(client, url).await {
            Ok(image) => return Ok(image),
            Err(e) if attempt < MAX_ATTEMPTS => {
                log::debug!("tile {:?} attempt {} failed: {}", coord, attempt, e);
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<TileImage, TileError> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let decoded = tokio::task::spawn_blocking(move || decode_tile(&bytes)).await;
    match decoded {
        Ok(image) => image,
        // The decode task only stops early if it panicked
        Err(join) => Err(TileError::Decode(image::ImageError::IoError(
            std::io::Error::new(std::io::ErrorKind::Other, join.to_string()),
        ))),
    }
}

/// Decodes PNG/JPEG tile bytes into RGBA8 pixels
pub fn decode_tile(bytes: &[u8]) -> Result<TileImage, TileError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TileImage {
        size: [width as usize, height as usize],
        rgba: rgba.into_raw(),
    })
}

//! Background asset decoding.
//!
//! Asset decoding runs on a dedicated worker thread so that it never stalls frame processing.
//! Every request is tagged with a [`SelectionToken`]. Tokens increase monotonically, so the
//! consumer can tell whether a completion still belongs to the most recent selection and drop it
//! otherwise.

use std::{
    io,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use pawawwewism::Worker;

use crate::asset::{AssetId, AssetSource, LoadedAsset};
use crate::timer::Timer;

/// Identifies one asset selection. Later selections have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionToken(u64);

impl SelectionToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The outcome of a load request.
#[derive(Debug)]
pub struct LoadCompletion {
    pub token: SelectionToken,
    pub asset: AssetId,
    pub result: anyhow::Result<LoadedAsset>,
}

struct LoadRequest {
    token: SelectionToken,
    asset: AssetId,
}

/// Decodes assets on a background thread.
pub struct AssetLoader {
    worker: Worker<LoadRequest>,
    completions: Receiver<LoadCompletion>,
    latest: Arc<AtomicU64>,
}

impl AssetLoader {
    /// Spawns the loader thread.
    pub fn spawn<S: AssetSource>(source: S) -> Result<Self, io::Error> {
        let (sender, completions) = crossbeam_channel::unbounded();
        let latest = Arc::new(AtomicU64::new(0));
        let worker = load_worker(source, sender, latest.clone())?;
        Ok(Self {
            worker,
            completions,
            latest,
        })
    }

    /// Starts loading `asset` and returns the token identifying this selection.
    ///
    /// The returned token supersedes all tokens handed out before. Requests that are superseded
    /// before the loader thread gets to them are skipped without producing a completion.
    pub fn request(&mut self, asset: AssetId) -> SelectionToken {
        let token = SelectionToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        log::debug!("requesting asset '{}' ({:?})", asset, token);
        self.worker.send(LoadRequest { token, asset });
        token
    }

    /// Returns the token of the most recent request, if any.
    pub fn latest(&self) -> Option<SelectionToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            raw => Some(SelectionToken(raw)),
        }
    }

    /// Returns all completions that are available without blocking.
    pub fn poll(&self) -> Vec<LoadCompletion> {
        self.completions.try_iter().collect()
    }

    /// Blocks until the next completion arrives or `timeout` expires.
    pub fn wait(&self, timeout: Duration) -> Option<LoadCompletion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                log::error!("asset loader thread has exited");
                None
            }
        }
    }
}

fn load_worker<S: AssetSource>(
    source: S,
    completions: Sender<LoadCompletion>,
    latest: Arc<AtomicU64>,
) -> Result<Worker<LoadRequest>, io::Error> {
    let t_decode = Timer::new("decode");

    Worker::builder()
        .name("asset loader")
        .spawn(move |LoadRequest { token, asset }| {
            if token.raw() < latest.load(Ordering::SeqCst) {
                log::debug!("skipping superseded request for '{}'", asset);
                return;
            }

            let result = t_decode.time(|| {
                source
                    .load(&asset)
                    .and_then(|image| LoadedAsset::new(asset.clone(), image))
            });
            match &result {
                Ok(loaded) => log::debug!("loaded {:?} ({})", loaded, t_decode),
                Err(e) => log::warn!("failed to load '{}': {:#}", asset, e),
            }

            // The receiver is gone when the loader is being dropped.
            completions
                .send(LoadCompletion {
                    token,
                    asset,
                    result,
                })
                .ok();
        })
}

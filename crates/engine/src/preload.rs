use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use image::DynamicImage;
use log::warn;

use crate::cache::PageCache;
use crate::fetch::AssetSource;

type Completion = (usize, anyhow::Result<DynamicImage>);

/// Background fetcher. Each requested slot gets its own fetch-and-decode
/// thread; completions come back over a channel and are drained on the UI
/// thread. A failed fetch is recorded in the cache (and logged) but never
/// touches its siblings or the navigation path; warming the cache is
/// strictly best-effort.
pub struct Preloader {
    source: Arc<dyn AssetSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: HashSet<usize>,
}

impl Preloader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            tx,
            rx,
            in_flight: HashSet::new(),
        }
    }

    pub fn in_flight(&self, slot: usize) -> bool {
        self.in_flight.contains(&slot)
    }

    /// Kick off a fetch for `slot` unless one is already running.
    pub fn request(&mut self, slot: usize, url: String) {
        if !self.in_flight.insert(slot) {
            return;
        }
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = source.fetch(&url);
            // The receiver is gone on teardown; nothing left to do then.
            let _ = tx.send((slot, result));
        });
    }

    /// Move finished fetches into the cache. Returns true if anything
    /// arrived, so the caller knows to redraw.
    pub fn drain_into(&mut self, cache: &mut PageCache) -> bool {
        let mut changed = false;
        while let Ok((slot, result)) = self.rx.try_recv() {
            self.in_flight.remove(&slot);
            match result {
                Ok(image) => cache.insert_ready(slot, image),
                Err(err) => {
                    warn!("fetch for slot {slot} failed: {err:#}");
                    cache.insert_failed(slot, format!("{err:#}"));
                }
            }
            changed = true;
        }
        changed
    }
}

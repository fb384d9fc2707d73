use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;

/// Terminal state of one slot's fetch. A `Failed` entry is what the viewer
/// renders as the per-slot error placeholder; it is evicted as soon as
/// navigation leaves the slot, so returning retries the load.
#[derive(Debug, Clone)]
pub enum SlotImage {
    Ready(Arc<DynamicImage>),
    Failed(String),
}

/// Slot-keyed cache of decoded scans, bounded by distance from the
/// current slot rather than by count; the catalogue is linear and the
/// viewer only ever looks a few slots around its position.
#[derive(Debug, Default)]
pub struct PageCache {
    entries: HashMap<usize, SlotImage>,
    keep_radius: usize,
}

impl PageCache {
    pub fn new(keep_radius: usize) -> Self {
        Self {
            entries: HashMap::new(),
            keep_radius,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&SlotImage> {
        self.entries.get(&slot)
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.entries.contains_key(&slot)
    }

    pub fn insert_ready(&mut self, slot: usize, image: DynamicImage) {
        self.entries.insert(slot, SlotImage::Ready(Arc::new(image)));
    }

    pub fn insert_failed(&mut self, slot: usize, error: String) {
        self.entries.insert(slot, SlotImage::Failed(error));
    }

    /// Called after every committed slot change: drop entries outside the
    /// keep window, and drop failure markers for every slot except the one
    /// being shown (leaving a slot is what re-arms its retry).
    pub fn retain_near(&mut self, current: usize) {
        let keep_radius = self.keep_radius;
        self.entries.retain(|&slot, image| match image {
            SlotImage::Failed(_) => slot == current,
            SlotImage::Ready(_) => slot.abs_diff(current) <= keep_radius,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

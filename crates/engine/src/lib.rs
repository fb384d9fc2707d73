//! Asset fetching and caching for Varak. Scans are fetched over HTTP,
//! decoded off the UI thread, and parked in a bounded per-slot cache.

mod cache;
mod fetch;
mod preload;

pub use cache::{PageCache, SlotImage};
pub use fetch::{AssetSource, HttpAssetSource};
pub use preload::Preloader;

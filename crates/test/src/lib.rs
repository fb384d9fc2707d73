//! Test helpers and fixtures.

use std::sync::Arc;

use image::DynamicImage;
use varak_core::{FlipSpeed, PageAtlas, Settings, Theme};
use varak_engine::AssetSource;

pub fn make_settings(zoom: f32) -> Settings {
    Settings {
        theme: Theme::Light,
        flip_speed: FlipSpeed::Normal,
        zoom,
        autoplay_enabled: false,
        autoplay_interval_ms: 5_000,
    }
}

/// Synthetic catalogue of `slots` sequentially named scans.
pub fn make_atlas(slots: usize) -> PageAtlas {
    let assets = (0..slots).map(|slot| format!("scan-{slot:03}.jpg")).collect();
    PageAtlas::new("http://scans.invalid", assets, "scan-missing.jpg")
}

/// Asset source that decodes nothing: every fetch yields a one-pixel image,
/// except URLs containing `fail`, which error.
#[derive(Debug, Default)]
pub struct StubSource;

impl StubSource {
    pub fn shared() -> Arc<dyn AssetSource> {
        Arc::new(Self)
    }
}

impl AssetSource for StubSource {
    fn fetch(&self, url: &str) -> anyhow::Result<DynamicImage> {
        if url.contains("fail") {
            anyhow::bail!("stubbed failure for {url}");
        }
        Ok(DynamicImage::ImageRgba8(image::RgbaImage::new(1, 1)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use varak_application::{FlipDirection, Navigator, ViewerStore, candidates};
    use varak_engine::{PageCache, Preloader, SlotImage};
    use varak_storage::Storage;

    use super::*;

    fn drain_until(preloader: &mut Preloader, cache: &mut PageCache, want: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while cache.len() < want {
            preloader.drain_into(cache);
            assert!(Instant::now() < deadline, "preloader stalled");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn builds_settings() {
        let settings = make_settings(1.5);
        assert_eq!(settings.zoom, 1.5);
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn synthetic_atlas_shape() {
        let atlas = make_atlas(348);
        assert_eq!(atlas.total_slots(), 348);
        assert_eq!(atlas.total_pages(), 696);
        assert_eq!(atlas.asset_url(0), "http://scans.invalid/scan-000.jpg");
    }

    // The full viewing session: restore, jump to the end, flip back, with
    // the preloader warming neighbors and the store tracking the position.
    #[test]
    fn end_to_end_session_on_synthetic_catalogue() {
        let atlas = make_atlas(348);
        let storage = Storage::open_in_memory().unwrap();
        let mut navigator = Navigator::new(atlas.total_slots());
        navigator.restore(storage.load_slot().unwrap());
        assert_eq!(navigator.current_slot(), 0);

        let mut cache = PageCache::new(4);
        let mut preloader = Preloader::new(StubSource::shared());

        let flip = Duration::from_millis(800);
        let start = Instant::now();
        assert!(navigator.last(start, flip));
        assert!(navigator.is_flipping());
        // A second request during the transition is dropped.
        assert!(!navigator.flip(FlipDirection::Prev, start, flip));

        let committed = navigator.tick(start + flip).unwrap();
        assert_eq!(committed, 347);
        storage.save_slot(committed).unwrap();
        assert_eq!(storage.load_slot().unwrap(), 347);
        assert!(!navigator.can_go_next());

        preloader.request(committed, atlas.asset_url(committed));
        for slot in candidates(committed, atlas.total_slots()) {
            preloader.request(slot, atlas.asset_url(slot));
        }
        drain_until(&mut preloader, &mut cache, 3);
        assert!(matches!(cache.get(347), Some(SlotImage::Ready(_))));
        assert!(cache.contains(346));
        assert!(cache.contains(345));

        let later = start + flip + Duration::from_secs(1);
        assert!(navigator.flip(FlipDirection::Prev, later, flip));
        assert_eq!(navigator.tick(later + flip), Some(346));
    }

    #[test]
    fn failed_fetch_is_recorded_not_fatal() {
        let atlas = PageAtlas::new(
            "http://scans.invalid",
            vec!["ok.jpg".to_string(), "fail.jpg".to_string()],
            "ok.jpg",
        );
        let mut cache = PageCache::new(4);
        let mut preloader = Preloader::new(StubSource::shared());
        preloader.request(0, atlas.asset_url(0));
        preloader.request(1, atlas.asset_url(1));
        drain_until(&mut preloader, &mut cache, 2);
        assert!(matches!(cache.get(0), Some(SlotImage::Ready(_))));
        assert!(matches!(cache.get(1), Some(SlotImage::Failed(_))));
    }
}

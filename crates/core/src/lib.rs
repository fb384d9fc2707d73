//! Core domain types for Varak.

mod atlas;
mod bookmark;
mod section;
mod settings;

pub use atlas::{PageAtlas, PageRange};
pub use bookmark::Bookmark;
pub use section::{Section, SectionIndex};
pub use settings::{FlipSpeed, Settings, Theme, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current_page: u32,
    pub total_pages: u32,
}

impl Progress {
    pub fn percent(&self) -> f32 {
        if self.total_pages == 0 {
            0.0
        } else {
            (self.current_page as f32 / self.total_pages as f32) * 100.0
        }
    }
}

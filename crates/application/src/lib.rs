//! Viewer logic for Varak: navigation state machine, autoplay driver,
//! preload planning, and bookmark toggling. Everything here is pure over
//! `varak-core` types; time comes in as arguments and persistence goes out
//! through the [`ViewerStore`] trait.

mod autoplay;
mod bookmarks;
mod navigator;
mod preload;
mod store;

pub use autoplay::Autoplay;
pub use bookmarks::{BookmarkToggle, find_for_page, is_bookmarked, toggle};
pub use navigator::{FlipDirection, Navigator};
pub use preload::{PRELOAD_RADIUS, candidates};
pub use store::ViewerStore;

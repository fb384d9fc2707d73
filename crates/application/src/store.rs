use varak_core::{Bookmark, Settings};

/// Durable key-value collaborator for viewer state.
///
/// Reads happen once at startup and substitute defaults for missing or
/// malformed data; writes follow every committed mutation and are
/// best-effort from the caller's point of view (a failed write is logged
/// and the session carries on with its in-memory state).
pub trait ViewerStore {
    fn load_slot(&self) -> anyhow::Result<usize>;
    fn save_slot(&self, slot: usize) -> anyhow::Result<()>;

    fn load_settings(&self) -> anyhow::Result<Settings>;
    fn save_settings(&self, settings: &Settings) -> anyhow::Result<()>;

    /// Bookmarks in creation order.
    fn load_bookmarks(&self) -> anyhow::Result<Vec<Bookmark>>;
    fn add_bookmark(&self, bookmark: &Bookmark) -> anyhow::Result<()>;
    fn remove_bookmark(&self, id: &str) -> anyhow::Result<()>;
}

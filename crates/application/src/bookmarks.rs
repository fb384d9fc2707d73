use uuid::Uuid;
use varak_core::Bookmark;

/// Outcome of a bookmark toggle, carrying the affected bookmark so the
/// caller can mirror the change into storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added(Bookmark),
    Removed(Bookmark),
}

pub fn is_bookmarked(bookmarks: &[Bookmark], page_number: u32) -> bool {
    bookmarks
        .iter()
        .any(|bookmark| bookmark.page_number == page_number)
}

pub fn find_for_page(bookmarks: &[Bookmark], page_number: u32) -> Option<&Bookmark> {
    bookmarks
        .iter()
        .find(|bookmark| bookmark.page_number == page_number)
}

/// Add a bookmark for `page_number`, or remove the first existing one.
/// One-per-page is enforced here, at the operation level; the list itself
/// tolerates duplicates (e.g. from older data).
pub fn toggle(
    bookmarks: &mut Vec<Bookmark>,
    page_number: u32,
    section_name: &str,
    created_at: i64,
) -> BookmarkToggle {
    if let Some(pos) = bookmarks
        .iter()
        .position(|bookmark| bookmark.page_number == page_number)
    {
        return BookmarkToggle::Removed(bookmarks.remove(pos));
    }

    let bookmark = Bookmark {
        id: Uuid::new_v4().to_string(),
        page_number,
        section_name: section_name.to_string(),
        note: None,
        created_at,
    };
    bookmarks.push(bookmark.clone());
    BookmarkToggle::Added(bookmark)
}

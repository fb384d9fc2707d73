use serde::{Deserialize, Serialize};

/// A user-created page marker. `section_name` is the containing section's
/// name at creation time, kept verbatim so the label survives later table
/// edits. Uniqueness per page is a toggle-level rule, not a storage rule;
/// the type itself allows duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub page_number: u32,
    pub section_name: String,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: i64,
}

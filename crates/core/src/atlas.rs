//! Slot/page/asset bookkeeping for a scanned codex.
//!
//! The catalogue is a dense list of image slots; each slot is one scan that
//! usually shows the verso of one leaf next to the recto of the following
//! leaf. The leaf numbering in the source material is irregular (missing
//! leaves, single-sided scans at both ends), so the slot index is the only
//! contiguous coordinate space. Everything else is derived from it.

/// Logical pages covered by one slot, 1-based inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone)]
pub struct PageAtlas {
    base_url: String,
    assets: Vec<String>,
    fallback: String,
}

impl PageAtlas {
    pub fn new(
        base_url: impl Into<String>,
        assets: Vec<String>,
        fallback: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            assets,
            fallback: fallback.into(),
        }
    }

    pub fn total_slots(&self) -> usize {
        self.assets.len()
    }

    /// Nominal page count. The true count is irregular at the boundaries
    /// (single-sided scans); two pages per slot is the accepted
    /// approximation used everywhere downstream.
    pub fn total_pages(&self) -> u32 {
        (self.assets.len() as u32) * 2
    }

    /// Asset filename for a slot. Out-of-range slots degrade to the
    /// fallback asset rather than erroring, so the viewer never holds a
    /// broken reference.
    pub fn asset_id(&self, slot: usize) -> &str {
        self.assets
            .get(slot)
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }

    pub fn asset_url(&self, slot: usize) -> String {
        format!("{}/{}", self.base_url, self.asset_id(slot))
    }

    /// Pages shown by a slot. Slot 0 is the cover composite and counts as
    /// pages {1,2}; every later slot `i` covers {2i, 2i+1}. The slot-0
    /// offset is baked into the catalogue numbering and section tables, so
    /// it is preserved exactly.
    pub fn page_range(&self, slot: usize) -> PageRange {
        if slot == 0 {
            return PageRange { start: 1, end: 2 };
        }
        let start = (slot as u32) * 2;
        PageRange {
            start,
            end: start + 1,
        }
    }

    /// Inverse of `page_range` in the two-pages-per-slot model. Performs no
    /// bounds check; callers clamp or reject out-of-range results.
    pub fn slot_for_page(&self, page: u32) -> usize {
        (page.saturating_sub(1) / 2) as usize
    }

    /// The Şevki Efendi mushaf facsimile (TSMK M.R. 4).
    ///
    /// The table mirrors the published scan set entry by entry. Most scans
    /// pair leaf N verso with leaf N+1 recto, but the set opens with a
    /// cover composite, leaves 15/16 and 102/103 are missing, leaf 105's
    /// verso was not scanned, and the set closes with the bare verso of
    /// leaf 346. None of this is derivable from arithmetic, hence the
    /// explicit entries around each break.
    pub fn sevki_mushaf() -> Self {
        let mut assets = Vec::with_capacity(341);
        assets.push(COVER_ASSET.to_string());
        assets.push("SevkiMushaf_TSMK_MR4_1b2a2.jpg".to_string());
        push_leaf_pairs(&mut assets, 3, 14);
        // Leaves 15 and 16 are lost; the catalogue resumes at 17b.
        push_leaf_pairs(&mut assets, 17, 101);
        assets.push("SevkiMushaf_TSMK_MR4_104b105a.jpg".to_string());
        assets.push("SevkiMushaf_TSMK_MR4_106b107a.jpg".to_string());
        push_leaf_pairs(&mut assets, 107, 345);
        assets.push("SevkiMushaf_TSMK_MR4_346b.jpg".to_string());
        Self::new(ASSET_HOST, assets, COVER_ASSET)
    }
}

const ASSET_HOST: &str =
    "https://media.githubusercontent.com/media/ahmetyusakusdil/Images/refs/heads/main";
const COVER_ASSET: &str = "SevkiMushaf_TSMK_MR4_Kab1a2.jpg";

fn push_leaf_pairs(assets: &mut Vec<String>, first_leaf: u32, last_leaf: u32) {
    for leaf in first_leaf..=last_leaf {
        assets.push(format!("SevkiMushaf_TSMK_MR4_{}b{}a.jpg", leaf, leaf + 1));
    }
}

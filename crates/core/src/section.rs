//! Named subdivisions of the codex, used for the index panel and for
//! labeling bookmarks.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub no: u32,
    pub name: String,
    pub start_page: u32,
}

#[derive(Debug, Clone)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

impl SectionIndex {
    pub fn new(mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|section| section.start_page);
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Last section starting at or before `page`. A linear scan is fine
    /// here; the table has a few dozen entries and is read at keypress
    /// frequency, not per frame.
    pub fn section_for_page(&self, page: u32) -> Option<&Section> {
        self.sections
            .iter()
            .take_while(|section| section.start_page <= page)
            .last()
    }

    /// The thirty-part division of the Şevki mushaf, by starting page of
    /// each cüz in the facsimile's own pagination.
    pub fn sevki_mushaf() -> Self {
        let sections = SEVKI_CUZ_START_PAGES
            .iter()
            .enumerate()
            .map(|(idx, &start_page)| Section {
                no: idx as u32 + 1,
                name: format!("{}. Cüz", idx + 1),
                start_page,
            })
            .collect();
        Self::new(sections)
    }
}

/// Starting pages of the thirty ajzāʾ in this manuscript's pagination.
const SEVKI_CUZ_START_PAGES: [u32; 30] = [
    1, 24, 46, 68, 92, 114, 138, 160, 184, 206, 230, 252, 276, 298, 322, 344, 368, 390, 414, 436,
    460, 482, 506, 528, 552, 574, 598, 620, 642, 664,
];

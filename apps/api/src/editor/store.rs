use crate::editor::section::{SectionId, Sections};

/// Committed content for every section of the document.
///
/// The store is mutated through exactly three paths: `replace_all` on
/// ingestion, and `commit` on an explicit save or a successful
/// enhancement. Keystrokes never reach it; they live in the draft buffer.
#[derive(Debug, Clone, Default)]
pub struct SectionStore {
    sections: Sections,
}

impl SectionStore {
    /// Atomically replaces every section's committed value.
    ///
    /// `Sections` is total by construction, so a partial ingest result
    /// cannot leave a section absent.
    pub fn replace_all(&mut self, sections: Sections) {
        self.sections = sections;
    }

    /// Replaces exactly one section's committed value.
    pub fn commit(&mut self, id: SectionId, text: String) {
        self.sections.set(id, text);
    }

    pub fn read(&self, id: SectionId) -> &str {
        self.sections.get(id)
    }

    pub fn read_all(&self) -> &Sections {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_replace_all_leaves_no_prior_content_behind() {
        let mut store = SectionStore::default();
        store.commit(SectionId::Summary, "old summary".to_string());
        store.commit(SectionId::Skills, "old skills".to_string());

        let mut incoming = BTreeMap::new();
        incoming.insert(SectionId::Experience, "Worked at A".to_string());
        store.replace_all(Sections::from(incoming));

        assert_eq!(store.read(SectionId::Experience), "Worked at A");
        assert_eq!(store.read(SectionId::Summary), "", "prior summary must not survive");
        assert_eq!(store.read(SectionId::Skills), "", "prior skills must not survive");
    }

    #[test]
    fn test_commit_touches_only_the_named_section() {
        let mut store = SectionStore::default();
        store.commit(SectionId::Education, "BSc".to_string());
        store.commit(SectionId::Summary, "Engineer".to_string());

        assert_eq!(store.read(SectionId::Education), "BSc");
        assert_eq!(store.read(SectionId::Summary), "Engineer");
        assert_eq!(store.read(SectionId::Projects), "");
    }
}

use crate::editor::section::SectionId;
use crate::editor::store::SectionStore;

/// The in-progress text for the one active section.
///
/// There is no multi-buffer memory: switching the active section reloads
/// the buffer from the store and the previous draft is gone. That is a
/// deliberate navigation semantic, not an accident.
#[derive(Debug, Clone)]
pub struct DraftBuffer {
    active: SectionId,
    text: String,
}

impl DraftBuffer {
    pub fn new(store: &SectionStore) -> Self {
        let active = SectionId::Summary;
        DraftBuffer {
            active,
            text: store.read(active).to_owned(),
        }
    }

    pub fn active(&self) -> SectionId {
        self.active
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Makes `id` the active section and loads its committed value,
    /// discarding whatever was in the buffer.
    pub fn set_active(&mut self, id: SectionId, store: &SectionStore) {
        self.active = id;
        self.text = store.read(id).to_owned();
    }

    /// Replaces the buffer content verbatim. No validation, no limit.
    pub fn edit(&mut self, text: String) {
        self.text = text;
    }

    /// Resets the buffer to the active section's committed value.
    pub fn discard(&mut self, store: &SectionStore) {
        self.text = store.read(self.active).to_owned();
    }

    /// Derived on every call, never cached: the buffer differs from the
    /// active section's committed value.
    pub fn is_dirty(&self, store: &SectionStore) -> bool {
        self.text != store.read(self.active)
    }

    /// Word count of the draft, a pure derived view.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_tracks_buffer_against_committed_value() {
        let mut store = SectionStore::default();
        store.commit(SectionId::Summary, "Engineer".to_string());
        let mut draft = DraftBuffer::new(&store);

        assert!(!draft.is_dirty(&store));
        draft.edit("Engineer at X".to_string());
        assert!(draft.is_dirty(&store));
        draft.edit("Engineer".to_string());
        assert!(!draft.is_dirty(&store), "editing back to committed text is clean");
    }

    #[test]
    fn test_discard_restores_committed_value() {
        let mut store = SectionStore::default();
        store.commit(SectionId::Summary, "Engineer".to_string());
        let mut draft = DraftBuffer::new(&store);

        draft.edit("half-finished thou".to_string());
        draft.discard(&store);
        assert_eq!(draft.text(), "Engineer");
        assert!(!draft.is_dirty(&store));
    }

    #[test]
    fn test_set_active_loads_the_new_sections_text() {
        let mut store = SectionStore::default();
        store.commit(SectionId::Experience, "Worked at A".to_string());
        let mut draft = DraftBuffer::new(&store);

        draft.edit("unsaved summary".to_string());
        draft.set_active(SectionId::Experience, &store);

        assert_eq!(draft.active(), SectionId::Experience);
        assert_eq!(draft.text(), "Worked at A");
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        let store = SectionStore::default();
        let mut draft = DraftBuffer::new(&store);

        draft.edit("  built   things\nfast  ".to_string());
        assert_eq!(draft.word_count(), 3);

        draft.edit("   ".to_string());
        assert_eq!(draft.word_count(), 0);
    }
}

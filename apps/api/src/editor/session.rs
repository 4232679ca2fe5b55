use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::editor::draft::DraftBuffer;
use crate::editor::notification::Notification;
use crate::editor::section::{SectionId, Sections};
use crate::editor::store::SectionStore;

/// Observed state of the active section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Buffer equals the committed value.
    Clean,
    /// Buffer differs from the committed value; save and enhance enabled.
    Dirty,
    /// An enhancement call is in flight; enhance and save-via-enhance are
    /// locked out until it resolves.
    Enhancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Buffer already matches the committed value; nothing was written.
    NothingToSave,
}

/// Why `begin_enhance` refused to start a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhanceRejected {
    /// One enhancement per session at a time; the second call is dropped,
    /// not queued.
    InFlight,
    /// The buffer matches the committed value, there is nothing to rewrite.
    NothingToEnhance,
}

/// The captured inputs of an in-flight enhancement call.
///
/// The caller awaits the gateway while holding this ticket (and not the
/// session), then resolves it with `complete_enhance` or `fail_enhance`.
/// Resolution routes by the captured section id, never by whichever
/// section happens to be active when the response arrives.
#[derive(Debug)]
pub struct EnhanceTicket {
    pub section: SectionId,
    pub text: String,
}

/// One user's editing session: the committed store, the single draft
/// buffer, the enhancement in-flight flag, and the pending notification.
///
/// All methods are synchronous transitions. Gateway I/O happens outside,
/// in the session layer, so the state here can never be observed
/// mid-mutation.
#[derive(Debug)]
pub struct EditorSession {
    store: SectionStore,
    draft: DraftBuffer,
    enhancing: bool,
    notification: Option<Notification>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A fresh session: empty document, `summary` active.
    pub fn new() -> Self {
        let store = SectionStore::default();
        let draft = DraftBuffer::new(&store);
        EditorSession {
            store,
            draft,
            enhancing: false,
            notification: None,
        }
    }

    pub fn active_section(&self) -> SectionId {
        self.draft.active()
    }

    pub fn draft_text(&self) -> &str {
        self.draft.text()
    }

    pub fn document(&self) -> &Sections {
        self.store.read_all()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.is_dirty(&self.store)
    }

    pub fn is_enhancing(&self) -> bool {
        self.enhancing
    }

    pub fn word_count(&self) -> usize {
        self.draft.word_count()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.enhancing {
            SessionPhase::Enhancing
        } else if self.is_dirty() {
            SessionPhase::Dirty
        } else {
            SessionPhase::Clean
        }
    }

    /// Returns the pending notification, dropping it first if it has
    /// already expired.
    pub fn notification(&mut self) -> Option<&Notification> {
        let now = Utc::now();
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired_at(now))
        {
            self.notification = None;
        }
        self.notification.as_ref()
    }

    fn notify(&mut self, notification: Notification) {
        // A new notification preempts an unexpired one.
        self.notification = Some(notification);
    }

    /// Bulk-replaces the document after a successful upload and reseeds
    /// the draft from the active section's new committed value.
    pub fn apply_ingest(&mut self, sections: Sections) {
        self.store.replace_all(sections);
        self.draft.discard(&self.store);
        info!(active = %self.draft.active(), "document ingested, draft reseeded");
    }

    /// A failed upload leaves the document untouched; the user is told.
    pub fn ingest_failed(&mut self, message: &str) {
        self.notify(Notification::failure(format!("Upload failed: {message}")));
    }

    /// Keystrokes land in the buffer only; the store never sees them.
    pub fn edit_active_section(&mut self, text: String) {
        self.draft.edit(text);
    }

    /// Navigation: unconditionally discards the previous draft and loads
    /// the new section's committed value.
    pub fn switch_active_section(&mut self, id: SectionId) {
        if self.is_dirty() {
            debug!(from = %self.draft.active(), to = %id, "discarding unsaved draft on switch");
        }
        self.draft.set_active(id, &self.store);
    }

    /// Explicit cancel: reset the buffer to the committed value.
    pub fn discard_draft(&mut self) {
        self.draft.discard(&self.store);
    }

    /// Commits the buffer into the store. A clean buffer is a no-op and
    /// is reported as such rather than rewritten.
    pub fn save_active_section(&mut self) -> SaveOutcome {
        if !self.is_dirty() {
            return SaveOutcome::NothingToSave;
        }
        let id = self.draft.active();
        self.store.commit(id, self.draft.text().to_owned());
        info!(section = %id, "section saved");
        SaveOutcome::Saved
    }

    /// Starts an enhancement: captures the inputs and raises the
    /// in-flight flag. Rejected when already enhancing or when there is
    /// nothing to enhance; a rejection changes no state.
    pub fn begin_enhance(&mut self) -> Result<EnhanceTicket, EnhanceRejected> {
        if self.enhancing {
            return Err(EnhanceRejected::InFlight);
        }
        if !self.is_dirty() {
            return Err(EnhanceRejected::NothingToEnhance);
        }
        self.enhancing = true;
        let section = self.draft.active();
        debug!(section = %section, "enhancement started");
        Ok(EnhanceTicket {
            section,
            text: self.draft.text().to_owned(),
        })
    }

    /// A successful enhancement commits the rewrite under the captured id
    /// and, iff that section is still active, moves the buffer to the
    /// same text so the section lands Clean. A stale result after a
    /// switch is still committed; it just does not touch the buffer.
    pub fn complete_enhance(&mut self, ticket: EnhanceTicket, result: String) {
        self.store.commit(ticket.section, result.clone());
        if self.draft.active() == ticket.section {
            self.draft.edit(result);
        }
        self.enhancing = false;
        info!(section = %ticket.section, "enhancement applied");
        self.notify(Notification::success("Enhanced successfully!"));
    }

    /// A failed enhancement changes nothing except the flag and the
    /// notification. Clearing the flag is unconditional on both paths.
    pub fn fail_enhance(&mut self, _ticket: EnhanceTicket, message: &str) {
        self.enhancing = false;
        self.notify(Notification::failure(format!("Enhance failed: {message}")));
    }

    /// Persistence reads only committed values; an unsaved draft is not
    /// part of what gets persisted, and nothing local changes on either
    /// outcome.
    pub fn persist_succeeded(&mut self, filename: &str) {
        self.notify(Notification::success(format!("Resume saved to {filename}")));
    }

    pub fn persist_failed(&mut self, message: &str) {
        self.notify(Notification::failure(format!("Save failed: {message}")));
    }

    /// The export artifact: committed values only, trimmed, with
    /// sections that trim to empty dropped entirely.
    pub fn export_document(&self) -> Value {
        let mut out = Map::new();
        for (id, text) in self.store.read_all().iter() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.insert(id.as_str().to_owned(), Value::String(trimmed.to_owned()));
            }
        }
        Value::Object(out)
    }
}

//! The section-editing core: committed content, the in-progress draft,
//! and the state machine that keeps them consistent across asynchronous
//! enhancement and persistence calls.
//!
//! Nothing in this module performs I/O. Gateway calls are awaited by the
//! session layer with an `EnhanceTicket` capturing the inputs, so the
//! state here is only ever mutated through named transitions.

pub mod draft;
pub mod notification;
pub mod section;
pub mod session;
pub mod store;

pub use draft::DraftBuffer;
pub use notification::{Notification, NotificationKind};
pub use section::{SectionId, Sections};
pub use session::{EditorSession, EnhanceRejected, EnhanceTicket, SaveOutcome, SessionPhase};
pub use store::SectionStore;

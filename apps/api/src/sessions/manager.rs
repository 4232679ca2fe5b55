use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::editor::EditorSession;

/// Registry of live editing sessions.
///
/// Each session sits behind its own `Mutex`, which serializes all state
/// transitions for that session onto one logical thread. Gateway calls
/// are awaited with the session lock released; only the captured ticket
/// crosses the await.
#[derive(Clone, Default)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<EditorSession>>>>>,
}

impl SessionManager {
    pub async fn create(&self) -> (Uuid, Arc<Mutex<EditorSession>>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(EditorSession::new()));
        self.inner.write().await.insert(id, session.clone());
        info!(session = %id, "session created");
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<EditorSession>>> {
        self.inner.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_created_session_is_retrievable() {
        let manager = SessionManager::default();
        let (id, _) = manager.create().await;

        let session = manager.get(id).await.expect("session must exist");
        assert!(!session.lock().await.is_dirty());
    }

    #[tokio::test]
    async fn test_unknown_id_yields_none() {
        let manager = SessionManager::default();
        assert!(manager.get(Uuid::new_v4()).await.is_none());
    }
}

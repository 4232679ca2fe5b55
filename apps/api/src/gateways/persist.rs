use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::editor::Sections;
use crate::gateways::{PersistAck, PersistError, PersistenceGateway};

/// Writes the full committed document as pretty-printed JSON into the
/// saves directory, one file per persist call.
pub struct JsonFilePersister {
    dir: PathBuf,
}

impl JsonFilePersister {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFilePersister { dir: dir.into() }
    }
}

#[async_trait]
impl PersistenceGateway for JsonFilePersister {
    async fn persist(&self, sections: &Sections) -> Result<PersistAck, PersistError> {
        let json = serde_json::to_string_pretty(sections)?;

        let id = Uuid::new_v4().simple().to_string();
        let filename = format!("resume_{}.json", &id[..6]);
        let path = self.dir.join(&filename);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, json).await?;

        info!(path = %path.display(), "resume persisted");
        Ok(PersistAck {
            filename: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::SectionId;

    #[tokio::test]
    async fn test_persist_writes_the_full_document() {
        let dir = tempfile::tempdir().unwrap();
        let persister = JsonFilePersister::new(dir.path());

        let mut sections = Sections::default();
        sections.set(SectionId::Summary, "Engineer".to_string());

        let ack = persister.persist(&sections).await.unwrap();
        assert!(ack.filename.ends_with(".json"));

        let written = std::fs::read_to_string(&ack.filename).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["summary"], "Engineer");
        // Empty sections are persisted too: persist is the raw document,
        // filtering belongs to export.
        assert_eq!(parsed["skills"], "");
    }

    #[tokio::test]
    async fn test_each_persist_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let persister = JsonFilePersister::new(dir.path());
        let sections = Sections::default();

        let a = persister.persist(&sections).await.unwrap();
        let b = persister.persist(&sections).await.unwrap();
        assert_ne!(a.filename, b.filename);
    }
}

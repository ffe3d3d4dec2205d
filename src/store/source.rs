//! Storage backends that turn an index location into a door record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::StoreError;
use crate::door::Door;

/// Loads door records from wherever they are stored.
#[async_trait]
pub trait DoorSource: Send + Sync {
    /// Load and parse the door stored at `location`.
    async fn load(&self, door_code: &str, location: &Path) -> Result<Door, StoreError>;
}

/// Door source reading JSON files relative to the knowledge root.
#[derive(Debug, Clone)]
pub struct FsDoorSource {
    root: PathBuf,
}

impl FsDoorSource {
    /// Create a source rooted at the knowledge base directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The knowledge root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DoorSource for FsDoorSource {
    async fn load(&self, door_code: &str, location: &Path) -> Result<Door, StoreError> {
        let path = self.root.join(location);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path));
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };

        let door: Door =
            serde_json::from_str(&content).map_err(|e| StoreError::Parse { path, source: e })?;
        tracing::debug!(door_code, declared = %door.door_code, "Read door file");
        Ok(door)
    }
}

//! In-memory door source for embedding hosts and tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{DoorSource, StoreError};
use crate::door::Door;

/// Door source holding records in a map keyed by location.
#[derive(Debug, Clone, Default)]
pub struct MemoryDoorSource {
    doors: HashMap<PathBuf, Door>,
}

impl MemoryDoorSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a door at a location.
    pub fn insert(&mut self, location: impl Into<PathBuf>, door: Door) {
        self.doors.insert(location.into(), door);
    }

    /// Number of stored doors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doors.len()
    }

    /// Check if the source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }
}

#[async_trait]
impl DoorSource for MemoryDoorSource {
    async fn load(&self, _door_code: &str, location: &Path) -> Result<Door, StoreError> {
        self.doors
            .get(location)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(location.to_path_buf()))
    }
}

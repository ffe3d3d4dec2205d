//! Knowledge store error types.

use std::path::PathBuf;

/// Errors raised while materializing a door record.
///
/// These never escape the store: `KnowledgeStore::get` logs them and
/// reports the door as absent.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Record file does not exist.
    #[error("Door file not found: {0}")]
    NotFound(PathBuf),

    /// Record file could not be read.
    #[error("Failed to read door file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Record file is not a valid door document.
    #[error("Failed to parse door file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound(PathBuf::from("/kb/CONTEXTS/E01PERM.json"));
        assert_eq!(err.to_string(), "Door file not found: /kb/CONTEXTS/E01PERM.json");
    }

    #[test]
    fn test_io_display() {
        let err = StoreError::Io {
            path: PathBuf::from("door.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to read door file door.json: denied");
    }
}

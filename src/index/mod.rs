//! Index files under `<knowledge_root>/INDEXES`.
//!
//! Each file is optional. A missing file yields an empty table so a partial
//! knowledge base still resolves whatever it can; a malformed file is an error.

mod error;
mod tables;

pub use error::*;
pub use tables::*;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Directory holding the index files, relative to the knowledge root.
pub const INDEXES_DIR: &str = "INDEXES";
/// Identifier index file name.
pub const HASH_TABLE_FILE: &str = "HASH_TABLE.json";
/// Semantic index file name.
pub const SEMANTIC_MAP_FILE: &str = "SEMANTIC_MAP.json";
/// Query pattern table file name.
pub const NLP_PATTERNS_FILE: &str = "NLP_PATTERNS.json";
/// Error signature table file name.
pub const ERROR_MATCHER_FILE: &str = "ERROR_MATCHER.json";
/// Dependency graph and chain table file name.
pub const PREREQUISITES_FILE: &str = "PREREQUISITES.json";

#[derive(Debug, Default, Deserialize)]
struct MappingsFile {
    #[serde(default)]
    mappings: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryPatternsFile {
    #[serde(default)]
    query_patterns: IndexMap<String, QueryPattern>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPatternsFile {
    #[serde(default)]
    error_patterns: IndexMap<String, ErrorSignature>,
}

#[derive(Debug, Default, Deserialize)]
struct DependencyEntry {
    #[serde(default)]
    prerequisites: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PrerequisitesFile {
    #[serde(default)]
    dependency_graph: IndexMap<String, DependencyEntry>,
    #[serde(default)]
    loading_chains: IndexMap<String, LoadingChain>,
}

/// All read-only lookup tables for one resolution session.
#[derive(Debug, Clone, Default)]
pub struct Indexes {
    /// Door code to record location.
    pub identifiers: IdentifierIndex,
    /// Semantic path or alias to door code.
    pub semantic: SemanticIndex,
    /// Free-text patterns.
    pub query_patterns: QueryPatternTable,
    /// Priority-ordered error signatures.
    pub error_signatures: ErrorSignatureTable,
    /// Prerequisite adjacency projection.
    pub dependencies: DependencyGraph,
    /// Named loading chains.
    pub chains: ChainTable,
}

impl Indexes {
    /// Create an empty set of indexes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path to the index directory for a knowledge root.
    #[must_use]
    pub fn dir(root: &Path) -> PathBuf {
        root.join(INDEXES_DIR)
    }

    /// Load every index file under `root`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError` if an index file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, IndexError> {
        let dir = Self::dir(root);
        let mut indexes = Self::new();

        let hash_table: MappingsFile = read_table(&dir.join(HASH_TABLE_FILE))?;
        for (code, location) in &hash_table.mappings {
            indexes.identifiers.insert(code, location);
        }

        let semantic_map: MappingsFile = read_table(&dir.join(SEMANTIC_MAP_FILE))?;
        for (key, code) in &semantic_map.mappings {
            indexes.semantic.insert(key, code);
        }

        let patterns: QueryPatternsFile = read_table(&dir.join(NLP_PATTERNS_FILE))?;
        for (name, pattern) in patterns.query_patterns {
            indexes.query_patterns.insert(name, pattern);
        }

        let errors: ErrorPatternsFile = read_table(&dir.join(ERROR_MATCHER_FILE))?;
        for (name, entry) in errors.error_patterns {
            indexes.error_signatures.insert(name, entry);
        }

        let prerequisites: PrerequisitesFile = read_table(&dir.join(PREREQUISITES_FILE))?;
        for (code, entry) in &prerequisites.dependency_graph {
            indexes.dependencies.insert(code, &entry.prerequisites);
        }
        for (name, chain) in prerequisites.loading_chains {
            indexes.chains.insert(name, chain);
        }

        tracing::info!(
            root = %root.display(),
            doors = indexes.identifiers.len(),
            semantic = indexes.semantic.len(),
            patterns = indexes.query_patterns.len(),
            error_signatures = indexes.error_signatures.len(),
            chains = indexes.chains.len(),
            "Loaded knowledge indexes"
        );

        Ok(indexes)
    }
}

fn read_table<T: DeserializeOwned + Default>(path: &Path) -> Result<T, IndexError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Index file not found, using empty table");
            return Ok(T::default());
        }
        Err(e) => {
            return Err(IndexError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    serde_json::from_str(&content).map_err(|e| IndexError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

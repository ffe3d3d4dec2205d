//! Lookup tables consulted by the resolver.
//!
//! Every table keeps declaration order: error signatures are priority
//! ordered and equal-confidence keyword candidates keep table order.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::door::normalize_code;

/// Door code to storage location, relative to the knowledge root.
#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    entries: IndexMap<String, PathBuf>,
}

impl IdentifierIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a door location. Later inserts for the same code replace earlier ones.
    pub fn insert(&mut self, door_code: &str, location: impl Into<PathBuf>) {
        self.entries.insert(normalize_code(door_code), location.into());
    }

    /// Location of a door, if indexed.
    #[must_use]
    pub fn location(&self, door_code: &str) -> Option<&Path> {
        self.entries
            .get(&normalize_code(door_code))
            .map(PathBuf::as_path)
    }

    /// Check if a door code is indexed.
    #[must_use]
    pub fn contains(&self, door_code: &str) -> bool {
        self.entries.contains_key(&normalize_code(door_code))
    }

    /// All indexed door codes, in declaration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of indexed doors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Semantic path or alias to door code. Many-to-one.
#[derive(Debug, Clone, Default)]
pub struct SemanticIndex {
    entries: IndexMap<String, String>,
}

impl SemanticIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a semantic path or alias to a door code.
    pub fn insert(&mut self, key: &str, door_code: &str) {
        self.entries
            .insert(normalize_code(key), normalize_code(door_code));
    }

    /// Door code mapped from a path or alias (case-insensitive).
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize_code(key)).map(String::as_str)
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A free-text pattern: weighted keyword sets pointing at target doors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryPattern {
    /// Primary terms, weighted double.
    #[serde(default)]
    pub keywords: IndexSet<String>,
    /// Secondary terms, weighted single.
    #[serde(default)]
    pub contexts: IndexSet<String>,
    /// Doors this pattern points at, in order.
    #[serde(default, rename = "door_codes")]
    pub targets: Vec<String>,
}

impl QueryPattern {
    /// Build a pattern from string slices.
    #[must_use]
    pub fn new(keywords: &[&str], contexts: &[&str], targets: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            contexts: contexts.iter().map(|c| c.to_lowercase()).collect(),
            targets: targets.iter().map(|t| normalize_code(t)).collect(),
        }
    }

    /// Lower-case terms and normalize targets after deserialization.
    fn normalized(self) -> Self {
        Self {
            keywords: self.keywords.iter().map(|k| k.to_lowercase()).collect(),
            contexts: self.contexts.iter().map(|c| c.to_lowercase()).collect(),
            targets: self.targets.iter().map(|t| normalize_code(t)).collect(),
        }
    }
}

/// Named free-text patterns.
#[derive(Debug, Clone, Default)]
pub struct QueryPatternTable {
    patterns: IndexMap<String, QueryPattern>,
}

impl QueryPatternTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named pattern.
    pub fn insert(&mut self, name: impl Into<String>, pattern: QueryPattern) {
        self.patterns.insert(name.into(), pattern.normalized());
    }

    /// Patterns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryPattern)> {
        self.patterns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Substring signatures that identify an error and the door that explains it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorSignature {
    /// Substrings matched case-insensitively against error text.
    #[serde(default)]
    pub signatures: Vec<String>,
    /// Door explaining the error.
    pub door_code: String,
    /// Confidence reported on match.
    #[serde(default)]
    pub confidence: f64,
}

impl ErrorSignature {
    /// Build a signature entry.
    #[must_use]
    pub fn new(signatures: &[&str], door_code: &str, confidence: f64) -> Self {
        Self {
            signatures: signatures.iter().map(|s| (*s).to_string()).collect(),
            door_code: door_code.to_string(),
            confidence,
        }
    }

    fn normalized(self) -> Self {
        Self {
            signatures: self.signatures.iter().map(|s| s.to_lowercase()).collect(),
            door_code: normalize_code(&self.door_code),
            confidence: self.confidence.clamp(0.0, 1.0),
        }
    }
}

/// Priority-ordered error signatures.
#[derive(Debug, Clone, Default)]
pub struct ErrorSignatureTable {
    entries: IndexMap<String, ErrorSignature>,
}

impl ErrorSignatureTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named entry. Insertion order is match priority.
    pub fn insert(&mut self, name: impl Into<String>, entry: ErrorSignature) {
        self.entries.insert(name.into(), entry.normalized());
    }

    /// Entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorSignature)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Adjacency projection of declared prerequisites.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the ordered prerequisites of a door.
    pub fn insert(&mut self, door_code: &str, prerequisites: &[String]) {
        self.edges.insert(
            normalize_code(door_code),
            prerequisites.iter().map(|p| normalize_code(p)).collect(),
        );
    }

    /// Declared prerequisites, if the graph has an entry for the door.
    #[must_use]
    pub fn prerequisites(&self, door_code: &str) -> Option<&[String]> {
        self.edges
            .get(&normalize_code(door_code))
            .map(Vec::as_slice)
    }

    /// Number of doors with declared edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// A pre-declared ordered bundle of doors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoadingChain {
    /// Doors in load order.
    #[serde(default)]
    pub doors: Vec<String>,
    /// Human-readable purpose of the chain.
    #[serde(default)]
    pub description: String,
    /// Estimated cost of loading the chain.
    #[serde(default)]
    pub estimated_load_time_ms: u64,
}

/// Named loading chains.
#[derive(Debug, Clone, Default)]
pub struct ChainTable {
    chains: IndexMap<String, LoadingChain>,
}

impl ChainTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a chain.
    pub fn insert(&mut self, name: impl Into<String>, chain: LoadingChain) {
        self.chains.insert(name.into(), chain);
    }

    /// Look up a chain by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LoadingChain> {
        self.chains.get(name)
    }

    /// Chain names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// Number of chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

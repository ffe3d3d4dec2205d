//! Result envelopes returned by the resolver.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::door::Door;

/// Strategy that produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// Exact door code lookup.
    HashCodeLookup,
    /// Exact semantic path lookup.
    SemanticPathResolution,
    /// Exact alias lookup in the semantic index.
    AliasResolution,
    /// Keyword/context pattern scoring.
    NaturalLanguageQuery,
    /// Approximate similarity against door codes.
    FuzzyMatching,
    /// External semantic search collaborator.
    SemanticSearch,
    /// Error signature table.
    ErrorPatternMatching,
    /// Nothing matched.
    NoMatch,
}

impl ResolutionMethod {
    /// Wire name of the method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HashCodeLookup => "hash_code_lookup",
            Self::SemanticPathResolution => "semantic_path_resolution",
            Self::AliasResolution => "alias_resolution",
            Self::NaturalLanguageQuery => "natural_language_query",
            Self::FuzzyMatching => "fuzzy_matching",
            Self::SemanticSearch => "semantic_search",
            Self::ErrorPatternMatching => "error_pattern_matching",
            Self::NoMatch => "no_match",
        }
    }
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runner-up door for an ambiguous free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub door_code: String,
    pub confidence: f64,
    /// Summary of the alternative door.
    pub summary: String,
}

/// Outcome of resolving one query.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// The raw query or error text.
    pub query: String,
    pub method: ResolutionMethod,
    pub door_code: Option<String>,
    pub door: Option<Arc<Door>>,
    /// Prerequisite closure of the door, pre-order, when expansion was requested.
    pub prerequisites: Vec<Arc<Door>>,
    /// Confidence in `[0, 1]`; `0.0` when nothing matched.
    pub confidence: f64,
    /// At most `max_alternatives` runner-ups (free-text only).
    pub alternatives: Vec<Alternative>,
}

impl Resolution {
    /// Empty result for a query nothing matched.
    #[must_use]
    pub fn no_match(query: &str) -> Self {
        Self {
            query: query.to_string(),
            method: ResolutionMethod::NoMatch,
            door_code: None,
            door: None,
            prerequisites: Vec::new(),
            confidence: 0.0,
            alternatives: Vec::new(),
        }
    }

    /// Check if a door was resolved.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.door.is_some()
    }
}

/// Outcome of loading a named chain.
#[derive(Debug, Clone, Serialize)]
pub struct ChainLoad {
    pub chain_name: String,
    pub found: bool,
    pub description: String,
    /// Number of doors actually materialized.
    pub total_doors: usize,
    pub estimated_load_time_ms: u64,
    /// Materialized doors in declared order.
    pub doors: Vec<Arc<Door>>,
}

impl ChainLoad {
    /// Result for an undeclared chain.
    #[must_use]
    pub fn not_found(chain_name: &str) -> Self {
        Self {
            chain_name: chain_name.to_string(),
            found: false,
            description: String::new(),
            total_doors: 0,
            estimated_load_time_ms: 0,
            doors: Vec::new(),
        }
    }
}

/// One row of a door listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorListing {
    pub short_code: String,
    pub door_code: String,
    /// First line of the door summary.
    pub summary: String,
}

//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::matching::{DEFAULT_FALLBACK_FLOOR, DEFAULT_SIMILARITY_FLOOR};

/// Environment variable overriding the default knowledge root.
pub const ROOT_ENV_VAR: &str = "KEYMASTER_ROOT";

/// Configuration for a resolution session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeymasterConfig {
    /// Directory holding `INDEXES/` and the door files.
    pub knowledge_root: PathBuf,
    /// Expand prerequisites of resolved doors by default.
    pub expand_prerequisites: bool,
    /// Matching thresholds and switches.
    pub matching: MatchingConfig,
}

impl Default for KeymasterConfig {
    fn default() -> Self {
        Self {
            knowledge_root: default_knowledge_root(),
            expand_prerequisites: true,
            matching: MatchingConfig::default(),
        }
    }
}

/// Thresholds used by the resolution cascade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchingConfig {
    /// Similarity floor for the resolver's fuzzy fallback.
    pub fuzzy_fallback_floor: f64,
    /// Similarity floor for general-purpose fuzzy matching.
    pub similarity_floor: f64,
    /// Maximum alternatives reported for free-text matches.
    pub max_alternatives: usize,
    /// Try the semantic index as an alias table for any query.
    pub alias_lookup: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_fallback_floor: DEFAULT_FALLBACK_FLOOR,
            similarity_floor: DEFAULT_SIMILARITY_FLOOR,
            max_alternatives: 3,
            alias_lookup: true,
        }
    }
}

/// Default knowledge root: `$KEYMASTER_ROOT`, else `~/.keymaster/knowledge`.
#[must_use]
pub fn default_knowledge_root() -> PathBuf {
    if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(root);
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".keymaster").join("knowledge")
}

//! Query shape classification.
//!
//! Decides which exact-lookup strategies are syntactically eligible for a
//! query. Classification never implies the lookup will succeed.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Compact code: 3-10 alphanumerics, optionally followed by letters or `#`.
static HASH_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{3,10}[A-Z#]*$").expect("valid hash code regex"));

/// Dotted path of at least two uppercase/underscore segments.
static SEMANTIC_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z_]+\.[A-Z_]+(\.[A-Z_]+)*$").expect("valid semantic path regex")
});

/// Syntactic shape of a raw query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryShape {
    /// Looks like a door code (e.g., `800WINMCP`).
    HashLike,
    /// Looks like a semantic path (e.g., `TOOLS.WINDOWS_MCP.FILE_OPERATIONS`).
    SemanticPathLike,
    /// Anything else.
    FreeText,
}

impl QueryShape {
    /// Classify a query. The query is upper-cased before testing.
    #[must_use]
    pub fn classify(query: &str) -> Self {
        let upper = query.to_uppercase();
        if HASH_CODE.is_match(&upper) {
            Self::HashLike
        } else if SEMANTIC_PATH.is_match(&upper) {
            Self::SemanticPathLike
        } else {
            Self::FreeText
        }
    }
}

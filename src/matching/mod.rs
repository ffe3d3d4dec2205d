//! Query classification and the local matching strategies.
//!
//! All matchers are pure and synchronous: they only read the index tables.

mod classify;
mod keyword;
mod signature;
mod similarity;

pub use classify::*;
pub use keyword::*;
pub use signature::*;
pub use similarity::*;

use serde::{Deserialize, Serialize};

/// A door code proposed by a matcher, with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Proposed door code.
    pub door_code: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Candidate {
    /// Create a candidate.
    #[must_use]
    pub fn new(door_code: impl Into<String>, confidence: f64) -> Self {
        Self {
            door_code: door_code.into(),
            confidence,
        }
    }
}

/// Stable sort by descending confidence.
pub(crate) fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

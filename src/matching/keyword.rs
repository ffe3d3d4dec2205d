//! Keyword/context overlap scoring for free-text queries.

use std::collections::HashSet;

use super::{sort_candidates, Candidate};
use crate::index::{QueryPattern, QueryPatternTable};

/// Weight of a keyword hit relative to a context hit.
const KEYWORD_WEIGHT: usize = 2;

/// Score a free-text query against every pattern in the table.
///
/// Each pattern with at least one hit contributes one candidate per target
/// door. Candidates are sorted by descending confidence; ties keep table order.
#[must_use]
pub fn score_query(table: &QueryPatternTable, query: &str) -> Vec<Candidate> {
    let lowered = query.to_lowercase();
    let words: HashSet<&str> = lowered.split_whitespace().collect();

    let mut candidates = Vec::new();
    for (name, pattern) in table.iter() {
        let Some(confidence) = pattern_score(pattern, &words) else {
            continue;
        };
        tracing::trace!(pattern = name, confidence, "Query pattern hit");
        candidates.extend(
            pattern
                .targets
                .iter()
                .map(|target| Candidate::new(target.clone(), confidence)),
        );
    }

    sort_candidates(&mut candidates);
    candidates
}

/// Weighted overlap of the query words with one pattern.
///
/// Returns `None` when nothing overlaps or the pattern has no terms.
#[allow(clippy::cast_precision_loss)]
fn pattern_score(pattern: &QueryPattern, words: &HashSet<&str>) -> Option<f64> {
    let keyword_hits = pattern
        .keywords
        .iter()
        .filter(|k| words.contains(k.as_str()))
        .count();
    let context_hits = pattern
        .contexts
        .iter()
        .filter(|c| words.contains(c.as_str()))
        .count();

    let numerator = KEYWORD_WEIGHT * keyword_hits + context_hits;
    let denominator = KEYWORD_WEIGHT * pattern.keywords.len() + pattern.contexts.len();
    if numerator == 0 || denominator == 0 {
        return None;
    }

    Some(numerator as f64 / denominator as f64)
}

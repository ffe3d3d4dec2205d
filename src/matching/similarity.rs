//! Approximate string similarity against known door codes.
//!
//! The ratio is `2 * M / (|a| + |b|)`, where `M` counts the characters in
//! the matching blocks found by repeatedly taking the longest common
//! substring and recursing on both sides of it.

use std::collections::HashMap;

use super::{sort_candidates, Candidate};

/// Default similarity floor for general-purpose fuzzy matching.
pub const DEFAULT_SIMILARITY_FLOOR: f64 = 0.6;

/// Similarity floor used by the resolver's last-resort fallback.
pub const DEFAULT_FALLBACK_FLOOR: f64 = 0.5;

/// Matching-blocks similarity ratio in `[0, 1]`, case-insensitive.
///
/// Two empty strings are identical.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * matching_characters(&a, &b)) as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        positions.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &positions, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // Length of the block ending at b[j] for the previous row of a.
    let mut run_ending: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for &j in positions.get(c).map_or(&[][..], Vec::as_slice) {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }
            let size = j
                .checked_sub(1)
                .and_then(|prev| run_ending.get(&prev))
                .copied()
                .unwrap_or(0)
                + 1;
            next.insert(j, size);
            if size > best_size {
                best_i = i + 1 - size;
                best_j = j + 1 - size;
                best_size = size;
            }
        }
        run_ending = next;
    }

    (best_i, best_j, best_size)
}

/// Match a query against candidate strings, keeping those at or above `floor`.
///
/// Results are sorted by descending similarity; ties keep input order.
#[must_use]
pub fn fuzzy_match<'a, I>(query: &str, candidates: I, floor: f64) -> Vec<Candidate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut matches: Vec<Candidate> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let ratio = similarity(query, candidate);
            (ratio >= floor).then(|| Candidate::new(candidate, ratio))
        })
        .collect();

    sort_candidates(&mut matches);
    matches
}

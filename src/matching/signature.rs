//! Error message to door matching.

use super::Candidate;
use crate::index::ErrorSignatureTable;

/// Find the door for an error message.
///
/// Scans the table in priority order and returns the first entry with any
/// signature contained in the lower-cased error text. Entries are not scored
/// against each other.
#[must_use]
pub fn match_error(table: &ErrorSignatureTable, error_text: &str) -> Option<Candidate> {
    let lowered = error_text.to_lowercase();

    table.iter().find_map(|(name, entry)| {
        let signature = entry
            .signatures
            .iter()
            .find(|signature| lowered.contains(signature.as_str()))?;
        tracing::debug!(pattern = name, signature = %signature, door_code = %entry.door_code, "Error signature matched");
        Some(Candidate::new(entry.door_code.clone(), entry.confidence))
    })
}

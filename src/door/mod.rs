//! Door records and their rendered views.

mod render;
mod schema;

pub use render::*;
pub use schema::*;

/// Normalize a door code for consistent lookup.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

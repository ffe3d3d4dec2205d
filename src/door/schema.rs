//! Door record definitions.
//!
//! Mirrors the door JSON files stored under the knowledge root. Only the
//! fields the resolver reads are typed; onboarding, resources and metadata
//! stay dynamic documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dynamic JSON document used for payload fields the resolver does not own.
pub type Document = Map<String, Value>;

/// A single retrievable knowledge unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Door {
    /// Unique door code (e.g., "800WINMCP").
    pub door_code: String,

    /// Dotted hierarchical label (e.g., "TOOLS.WINDOWS_MCP.FILE_OPERATIONS").
    #[serde(default)]
    pub semantic_path: String,

    /// Alternative names for this door. Not unique across doors.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// The content bundle.
    #[serde(default)]
    pub context_bundle: ContextBundle,
}

/// Content carried by a door.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContextBundle {
    /// Short natural-language description.
    #[serde(default)]
    pub summary: String,

    /// Door codes that should be loaded before this one, in order.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Related but not required door codes.
    #[serde(default)]
    pub related_doors: Vec<String>,

    /// Quick start text, common patterns, known errors.
    #[serde(default)]
    pub onboarding: Document,

    /// Documentation and code references.
    #[serde(default)]
    pub resources: Document,

    /// Tags, category, confidence, timestamps.
    #[serde(default)]
    pub metadata: Document,
}

impl Door {
    /// Create a door with only the identifying fields set.
    #[must_use]
    pub fn new(door_code: impl Into<String>, semantic_path: impl Into<String>) -> Self {
        Self {
            door_code: door_code.into(),
            semantic_path: semantic_path.into(),
            aliases: Vec::new(),
            context_bundle: ContextBundle::default(),
        }
    }

    /// Get the short code (e.g., "D05" from "D05SILENT_INSTALL").
    ///
    /// The short code is the leading prefix up to and including the first
    /// run of digits.
    #[must_use]
    pub fn short_code(&self) -> &str {
        let code = self.door_code.as_str();
        let mut end = 0;
        let mut found_digit = false;

        for (i, c) in code.char_indices() {
            if c.is_ascii_digit() {
                found_digit = true;
                end = i + c.len_utf8();
            } else if found_digit {
                break;
            } else {
                end = i + c.len_utf8();
            }
        }

        &code[..end]
    }

    /// Get the category from metadata, or infer it from the door code prefix.
    #[must_use]
    pub fn category(&self) -> &str {
        if let Some(category) = self
            .context_bundle
            .metadata
            .get("category")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
        {
            return category;
        }

        let code = self.door_code.trim_start();
        match code.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('S') => "SECURITY",
            Some('W') => "WORKFLOWS",
            Some('R') => "ARCHITECTURE",
            Some('T' | 'D') => "TOOLS",
            Some('A') => "AGENTS",
            Some('P') => "PROJECTS",
            Some('E') => "ERRORS",
            _ if code.starts_with("000") => "PROJECTS",
            _ => "UNKNOWN",
        }
    }

    /// Quick start text from the onboarding block.
    #[must_use]
    pub fn quick_start(&self) -> &str {
        self.context_bundle
            .onboarding
            .get("quick_start")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Common patterns listed in the onboarding block.
    #[must_use]
    pub fn common_patterns(&self) -> Vec<&str> {
        string_list(&self.context_bundle.onboarding, "common_patterns")
    }

    /// Search tags from metadata.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        string_list(&self.context_bundle.metadata, "tags")
    }

    /// First line of the summary, for list views.
    #[must_use]
    pub fn headline(&self) -> &str {
        self.context_bundle.summary.lines().next().unwrap_or_default()
    }
}

fn string_list<'a>(doc: &'a Document, key: &str) -> Vec<&'a str> {
    doc.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

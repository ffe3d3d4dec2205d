//! Onboarding summary rendering.

use std::fmt::Write;

use super::Door;

/// Render the quick-start onboarding summary for a door as markdown.
#[must_use]
pub fn onboarding_summary(door: &Door) -> String {
    let bundle = &door.context_bundle;
    let mut out = String::new();

    let _ = write!(out, "# {} - {}\n\n", door.door_code, door.semantic_path);
    let _ = write!(out, "{}\n\n", bundle.summary);
    let _ = write!(out, "## Quick Start\n{}\n\n", door.quick_start());

    if !bundle.prerequisites.is_empty() {
        out.push_str("## Prerequisites\n");
        for prereq in &bundle.prerequisites {
            let _ = writeln!(out, "- {prereq}");
        }
        out.push('\n');
    }

    let patterns = door.common_patterns();
    if !patterns.is_empty() {
        out.push_str("## Common Patterns\n");
        for pattern in patterns {
            let _ = writeln!(out, "- {pattern}");
        }
        out.push('\n');
    }

    out
}

/// Text returned when a summary is requested for an unknown door.
#[must_use]
pub fn not_found(door_code: &str) -> String {
    format!("Door {door_code} not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_sections() {
        let json = r#"{
            "door_code": "A01DC",
            "semantic_path": "AGENTS.DC.COORDINATION",
            "context_bundle": {
                "summary": "Desktop Claude coordination",
                "prerequisites": ["800WINMCP"],
                "onboarding": {
                    "quick_start": "Start the bridge",
                    "common_patterns": ["handoff via inbox"]
                }
            }
        }"#;
        let door: Door = serde_json::from_str(json).unwrap();
        let summary = onboarding_summary(&door);

        assert!(summary.starts_with("# A01DC - AGENTS.DC.COORDINATION\n\n"));
        assert!(summary.contains("Desktop Claude coordination"));
        assert!(summary.contains("## Quick Start\nStart the bridge"));
        assert!(summary.contains("## Prerequisites\n- 800WINMCP\n"));
        assert!(summary.contains("## Common Patterns\n- handoff via inbox\n"));
    }

    #[test]
    fn test_summary_omits_empty_lists() {
        let door = Door::new("E01PERM", "ERRORS.PERMISSIONS.WINDOWS");
        let summary = onboarding_summary(&door);

        assert!(summary.contains("## Quick Start"));
        assert!(!summary.contains("## Prerequisites"));
        assert!(!summary.contains("## Common Patterns"));
    }

    #[test]
    fn test_not_found_text() {
        assert_eq!(not_found("ZZZ999"), "Door ZZZ999 not found");
    }
}

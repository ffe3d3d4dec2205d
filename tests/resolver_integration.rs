//! Integration tests for the resolution cascade over an on-disk knowledge base.

mod common;

use std::sync::Arc;

use keymaster::resolver::ResolutionMethod;

#[tokio::test]
async fn test_hash_code_lookup_with_prerequisites() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let resolution = resolver.resolve("800WINMCP", true).await;

    assert_eq!(resolution.method, ResolutionMethod::HashCodeLookup);
    assert!((resolution.confidence - 1.0).abs() < f64::EPSILON);
    let prereqs: Vec<_> = resolution
        .prerequisites
        .iter()
        .map(|d| d.door_code.as_str())
        .collect();
    assert!(prereqs.contains(&"810AHK"));
    assert!(prereqs.contains(&"820PWSH"));
}

#[tokio::test]
async fn test_semantic_path_resolution() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let resolution = resolver
        .resolve("TOOLS.WINDOWS_MCP.FILE_OPERATIONS", true)
        .await;

    assert_eq!(resolution.method, ResolutionMethod::SemanticPathResolution);
    assert_eq!(resolution.door_code.as_deref(), Some("800WINMCP"));
    assert!((resolution.confidence - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_natural_language_query() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let resolution = resolver.resolve("how to write files on windows", true).await;

    assert_eq!(resolution.method, ResolutionMethod::NaturalLanguageQuery);
    assert_eq!(resolution.door_code.as_deref(), Some("800WINMCP"));
    assert!(resolution.confidence > 0.0);
}

#[tokio::test]
async fn test_ambiguous_query_reports_alternatives() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let resolution = resolver.resolve("agent coordination", false).await;

    assert_eq!(resolution.door_code.as_deref(), Some("A01DC"));
    assert_eq!(resolution.alternatives.len(), 1);
    assert_eq!(resolution.alternatives[0].door_code, "A02CC");
    assert_eq!(resolution.alternatives[0].summary, "A02CC summary");
    assert!((0.0..=1.0).contains(&resolution.confidence));
}

#[tokio::test]
async fn test_error_signature_match() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let hit = resolver
        .match_error("PermissionError: [WinError 5] Access is denied")
        .unwrap();
    assert_eq!(hit.door_code, "E01PERM");
    assert!((hit.confidence - 0.9).abs() < f64::EPSILON);

    let resolution = resolver
        .resolve_error("UnicodeDecodeError: 'utf-8' codec can't decode", true)
        .await;
    assert_eq!(resolution.method, ResolutionMethod::ErrorPatternMatching);
    assert_eq!(resolution.door_code.as_deref(), Some("E02ENCODE"));
}

#[tokio::test]
async fn test_invalid_hash_code_is_no_match() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let resolution = resolver.resolve("INVALID999", true).await;

    assert_eq!(resolution.method, ResolutionMethod::NoMatch);
    assert!(resolution.door_code.is_none());
    assert!(resolution.confidence.abs() < f64::EPSILON);
    assert!(resolution.alternatives.is_empty());
}

#[tokio::test]
async fn test_indexed_but_missing_door_is_absent() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    assert!(resolver.store().get("P09GONE").await.is_none());
    let resolution = resolver.resolve("P09GONE", false).await;
    assert_ne!(resolution.door_code.as_deref(), Some("P09GONE"));
}

#[tokio::test]
async fn test_load_chain_in_declared_order() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let chain = resolver.load_chain("basic_file_operations").await;

    assert!(chain.found);
    let codes: Vec<_> = chain.doors.iter().map(|d| d.door_code.as_str()).collect();
    assert_eq!(codes, vec!["800WINMCP", "E01PERM", "E02ENCODE"]);
    assert_eq!(chain.total_doors, 3);
    assert_eq!(chain.estimated_load_time_ms, 150);

    let broken = resolver.load_chain("broken_chain").await;
    assert!(broken.found);
    assert_eq!(broken.total_doors, 1);

    assert!(!resolver.load_chain("no_such_chain").await.found);
}

#[tokio::test]
async fn test_mutual_prerequisites_terminate() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let prereqs = resolver.load_prerequisites("A01DC").await;

    let codes: Vec<_> = prereqs.iter().map(|d| d.door_code.as_str()).collect();
    assert_eq!(codes, vec!["A02CC"]);
}

#[tokio::test]
async fn test_store_returns_identical_records() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let first = resolver.store().get("E01PERM").await.unwrap();
    let second = resolver.store().get("e01perm").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(resolver.store().stats().loads, 1);
}

#[tokio::test]
async fn test_onboarding_summary_and_listing() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let summary = resolver.onboarding_summary("800WINMCP").await;
    assert!(summary.contains("# 800WINMCP - TOOLS.WINDOWS_MCP.FILE_OPERATIONS"));
    assert!(summary.contains("## Quick Start\nStart with 800WINMCP"));
    assert!(summary.contains("- 810AHK"));
    assert!(summary.contains("- 800WINMCP pattern"));

    assert_eq!(
        resolver.onboarding_summary("NOPE").await,
        "Door NOPE not found"
    );

    let errors = resolver.list_doors(Some("errors"), 10).await;
    let codes: Vec<_> = errors.iter().map(|d| d.door_code.as_str()).collect();
    assert_eq!(codes, vec!["E01PERM", "E02ENCODE"]);
}

#[tokio::test]
async fn test_resolution_serializes_method_names() {
    let kb = common::knowledge_base();
    let resolver = common::resolver(kb.path());

    let resolution = resolver.resolve("winmcp_files", false).await;
    let json = serde_json::to_value(&resolution).unwrap();

    assert_eq!(json["method"], "alias_resolution");
    assert_eq!(json["door_code"], "800WINMCP");
    assert_eq!(json["door"]["semantic_path"], "TOOLS.WINDOWS_MCP.FILE_OPERATIONS");
}

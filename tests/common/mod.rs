//! On-disk knowledge base fixture shared by integration tests.

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use keymaster::config::KeymasterConfig;
use keymaster::resolver::Resolver;

fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn write_door(root: &Path, category: &str, code: &str, path: &str, prereqs: &[&str]) -> String {
    let location = format!("CONTEXTS/{category}/{code}.json");
    write_json(
        &root.join(&location),
        &json!({
            "door_code": code,
            "semantic_path": path,
            "aliases": [],
            "context_bundle": {
                "summary": format!("{code} summary"),
                "prerequisites": prereqs,
                "related_doors": [],
                "onboarding": {
                    "quick_start": format!("Start with {code}"),
                    "common_patterns": [format!("{code} pattern")],
                    "known_errors": []
                },
                "metadata": {"category": category, "tags": [], "confidence": 1.0}
            }
        }),
    );
    location
}

/// Build a knowledge base in a temporary directory.
pub fn knowledge_base() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();

    let doors = [
        ("TOOLS", "800WINMCP", "TOOLS.WINDOWS_MCP.FILE_OPERATIONS", &["810AHK", "820PWSH"][..]),
        ("TOOLS", "810AHK", "TOOLS.AUTOHOTKEY.BASICS", &[][..]),
        ("TOOLS", "820PWSH", "TOOLS.POWERSHELL.BASICS", &[][..]),
        ("AGENTS", "A01DC", "AGENTS.DC.COORDINATION", &["A02CC"][..]),
        ("AGENTS", "A02CC", "AGENTS.CC.COORDINATION", &["A01DC"][..]),
        ("ERRORS", "E01PERM", "ERRORS.PERMISSIONS.WINDOWS", &[][..]),
        ("ERRORS", "E02ENCODE", "ERRORS.ENCODING.UTF8", &[][..]),
    ];

    let mut hash_table = serde_json::Map::new();
    let mut semantic_map = serde_json::Map::new();
    for (category, code, path, prereqs) in doors {
        let location = write_door(root, category, code, path, prereqs);
        hash_table.insert(code.to_string(), json!(location));
        semantic_map.insert(path.to_string(), json!(code));
    }
    semantic_map.insert("winmcp_files".to_string(), json!("800WINMCP"));
    // Indexed but never written to disk.
    hash_table.insert("P09GONE".to_string(), json!("CONTEXTS/PROJECTS/P09GONE.json"));

    let indexes = root.join("INDEXES");
    write_json(&indexes.join("HASH_TABLE.json"), &json!({ "mappings": hash_table }));
    write_json(&indexes.join("SEMANTIC_MAP.json"), &json!({ "mappings": semantic_map }));
    write_json(
        &indexes.join("NLP_PATTERNS.json"),
        &json!({"query_patterns": {
            "file_operations": {
                "keywords": ["write", "files"],
                "contexts": ["windows"],
                "door_codes": ["800WINMCP"]
            },
            "agent_coordination": {
                "keywords": ["agent", "coordination"],
                "contexts": ["desktop", "claude"],
                "door_codes": ["A01DC", "A02CC"]
            }
        }}),
    );
    write_json(
        &indexes.join("ERROR_MATCHER.json"),
        &json!({"error_patterns": {
            "permission_denied": {
                "signatures": ["access is denied", "permission denied", "winerror 5"],
                "door_code": "E01PERM",
                "confidence": 0.9
            },
            "encoding": {
                "signatures": ["codec can't decode", "unicodedecodeerror"],
                "door_code": "E02ENCODE",
                "confidence": 0.85
            }
        }}),
    );
    write_json(
        &indexes.join("PREREQUISITES.json"),
        &json!({
            "dependency_graph": {
                "800WINMCP": {"prerequisites": ["810AHK", "820PWSH"]}
            },
            "loading_chains": {
                "basic_file_operations": {
                    "doors": ["800WINMCP", "E01PERM", "E02ENCODE"],
                    "description": "Windows file operations with common errors",
                    "estimated_load_time_ms": 150
                },
                "broken_chain": {
                    "doors": ["P09GONE", "E01PERM"],
                    "description": "References a missing door",
                    "estimated_load_time_ms": 10
                }
            }
        }),
    );

    temp
}

/// Open a resolver over a fixture knowledge base.
pub fn resolver(root: &Path) -> Resolver {
    let config = KeymasterConfig {
        knowledge_root: root.to_path_buf(),
        ..Default::default()
    };
    Resolver::open(&config).unwrap()
}

//! Prerequisite closure expansion.
//!
//! Walks declared prerequisites depth-first with an explicit stack. The
//! visited set is shared across the whole walk: a door reached through one
//! branch is not expanded again through another, and cycles terminate.

use std::collections::HashSet;
use std::sync::Arc;

use crate::door::{normalize_code, Door};
use crate::index::DependencyGraph;
use crate::store::KnowledgeStore;

/// Expands doors into their ordered prerequisite closure.
#[derive(Debug, Clone, Copy)]
pub struct PrerequisiteWalker<'a> {
    store: &'a KnowledgeStore,
    graph: &'a DependencyGraph,
}

impl<'a> PrerequisiteWalker<'a> {
    /// Create a walker over a store and dependency graph.
    #[must_use]
    pub fn new(store: &'a KnowledgeStore, graph: &'a DependencyGraph) -> Self {
        Self { store, graph }
    }

    /// Declared prerequisites of a door.
    ///
    /// The dependency graph wins when it has an entry; otherwise the door's
    /// own `prerequisites` list is used.
    #[must_use]
    pub fn prerequisites_of(&self, door_code: &str, door: Option<&Door>) -> Vec<String> {
        if let Some(prereqs) = self.graph.prerequisites(door_code) {
            return prereqs.to_vec();
        }
        door.map(|d| {
            d.context_bundle
                .prerequisites
                .iter()
                .map(|p| normalize_code(p))
                .collect()
        })
        .unwrap_or_default()
    }

    /// Expand `root` into its prerequisite closure.
    ///
    /// Output is pre-order: each door precedes its own prerequisites and
    /// siblings are visited in declared order. `root` is marked visited and
    /// never appears in the output. Prerequisites the store cannot
    /// materialize are skipped.
    pub async fn expand(
        &self,
        root: &str,
        root_door: Option<&Door>,
        visited: &mut HashSet<String>,
    ) -> Vec<Arc<Door>> {
        let root = normalize_code(root);
        let mut loaded = Vec::new();
        let mut stack = vec![self.prerequisites_of(&root, root_door).into_iter()];
        visited.insert(root);

        while let Some(frame) = stack.last_mut() {
            let Some(code) = frame.next() else {
                stack.pop();
                continue;
            };
            if visited.contains(&code) {
                continue;
            }

            let Some(door) = self.store.get(&code).await else {
                tracing::debug!(door_code = %code, "Skipping missing prerequisite");
                continue;
            };

            let children = self.prerequisites_of(&code, Some(&door));
            visited.insert(code);
            loaded.push(door);
            stack.push(children.into_iter());
        }

        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IdentifierIndex;
    use crate::store::MemoryDoorSource;

    fn door(code: &str, prereqs: &[&str]) -> Door {
        let mut door = Door::new(code, "");
        door.context_bundle.prerequisites = prereqs.iter().map(|p| (*p).to_string()).collect();
        door
    }

    fn store(doors: Vec<Door>) -> KnowledgeStore {
        let mut identifiers = IdentifierIndex::new();
        let mut source = MemoryDoorSource::new();
        for door in doors {
            let location = format!("{}.json", door.door_code);
            identifiers.insert(&door.door_code, &location);
            source.insert(&location, door);
        }
        KnowledgeStore::new(identifiers, Arc::new(source))
    }

    fn codes(doors: &[Arc<Door>]) -> Vec<&str> {
        doors.iter().map(|d| d.door_code.as_str()).collect()
    }

    async fn expand(store: &KnowledgeStore, graph: &DependencyGraph, root: &str) -> Vec<Arc<Door>> {
        let walker = PrerequisiteWalker::new(store, graph);
        let root_door = store.get(root).await;
        walker
            .expand(root, root_door.as_deref(), &mut HashSet::new())
            .await
    }

    #[tokio::test]
    async fn test_pre_order_flattening() {
        let store = store(vec![
            door("ROOT1", &["A01", "B01"]),
            door("A01", &["A02"]),
            door("A02", &[]),
            door("B01", &["B02"]),
            door("B02", &[]),
        ]);
        let graph = DependencyGraph::new();

        let loaded = expand(&store, &graph, "ROOT1").await;
        assert_eq!(codes(&loaded), vec!["A01", "A02", "B01", "B02"]);
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let store = store(vec![
            door("AAA1", &["BBB1"]),
            door("BBB1", &["AAA1", "CCC1"]),
            door("CCC1", &["BBB1"]),
        ]);
        let graph = DependencyGraph::new();

        let loaded = expand(&store, &graph, "AAA1").await;
        assert_eq!(codes(&loaded), vec!["BBB1", "CCC1"]);
    }

    #[tokio::test]
    async fn test_self_reference_terminates() {
        let store = store(vec![door("SELF1", &["SELF1"])]);
        let graph = DependencyGraph::new();

        assert!(expand(&store, &graph, "SELF1").await.is_empty());
    }

    #[tokio::test]
    async fn test_shared_prerequisite_expanded_once() {
        // Both branches need SHARED; the first path to reach it wins.
        let store = store(vec![
            door("ROOT1", &["LEFT1", "RIGHT1"]),
            door("LEFT1", &["SHARED1"]),
            door("RIGHT1", &["SHARED1"]),
            door("SHARED1", &["LEAF1"]),
            door("LEAF1", &[]),
        ]);
        let graph = DependencyGraph::new();

        let loaded = expand(&store, &graph, "ROOT1").await;
        assert_eq!(codes(&loaded), vec!["LEFT1", "SHARED1", "LEAF1", "RIGHT1"]);
    }

    #[tokio::test]
    async fn test_missing_prerequisites_skipped() {
        let store = store(vec![
            door("ROOT1", &["GONE1", "HERE1"]),
            door("HERE1", &[]),
        ]);
        let graph = DependencyGraph::new();

        let loaded = expand(&store, &graph, "ROOT1").await;
        assert_eq!(codes(&loaded), vec!["HERE1"]);
    }

    #[tokio::test]
    async fn test_graph_overrides_record() {
        let store = store(vec![
            door("ROOT1", &["A01"]),
            door("A01", &[]),
            door("B01", &[]),
        ]);
        let mut graph = DependencyGraph::new();
        graph.insert("ROOT1", &["B01".to_string()]);

        let loaded = expand(&store, &graph, "ROOT1").await;
        assert_eq!(codes(&loaded), vec!["B01"]);
    }

    #[tokio::test]
    async fn test_record_prerequisites_are_normalized() {
        let store = store(vec![
            door("ROOT1", &[" a01 "]),
            door("A01", &[]),
        ]);
        let graph = DependencyGraph::new();

        let loaded = expand(&store, &graph, "root1").await;
        assert_eq!(codes(&loaded), vec!["A01"]);
    }

    #[tokio::test]
    async fn test_visited_set_is_shared_with_caller() {
        let store = store(vec![
            door("ROOT1", &["A01", "B01"]),
            door("A01", &[]),
            door("B01", &[]),
        ]);
        let graph = DependencyGraph::new();
        let walker = PrerequisiteWalker::new(&store, &graph);

        let mut visited: HashSet<String> = ["A01".to_string()].into_iter().collect();
        let loaded = walker.expand("ROOT1", None, &mut visited).await;

        // No root door and no graph entry: nothing to expand.
        assert!(loaded.is_empty());
        assert!(visited.contains("ROOT1"));

        let root = store.get("ROOT1").await;
        let loaded = walker.expand("ROOT1", root.as_deref(), &mut visited).await;
        assert_eq!(codes(&loaded), vec!["B01"]);
    }
}

//! Resolution engine.
//!
//! Turns a query into one door by trying strategies in a fixed order and
//! stopping at the first that yields a door the store can materialize:
//! 1. Exact door code (hash-like queries only)
//! 2. Exact semantic path (path-like queries only)
//! 3. Exact alias (when enabled)
//! 4. Keyword/context pattern scoring
//! 5. Fuzzy similarity against door codes
//! 6. External semantic search (when configured)

mod prerequisites;
mod search;
mod types;

pub use prerequisites::*;
pub use search::*;
pub use types::*;

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{KeymasterConfig, MatchingConfig};
use crate::door::{self, normalize_code, Door};
use crate::index::{
    ChainTable, DependencyGraph, ErrorSignatureTable, IndexError, Indexes, QueryPatternTable,
    SemanticIndex,
};
use crate::matching::{self, Candidate, QueryShape};
use crate::store::{DoorSource, FsDoorSource, KnowledgeStore};

/// A door chosen by one strategy of the cascade.
struct Hit {
    method: ResolutionMethod,
    door_code: String,
    door: Arc<Door>,
    confidence: f64,
    alternatives: Vec<Alternative>,
}

impl Hit {
    fn exact(method: ResolutionMethod, door_code: String, door: Arc<Door>) -> Self {
        Self {
            method,
            door_code,
            door,
            confidence: 1.0,
            alternatives: Vec::new(),
        }
    }
}

/// Resolves queries against one knowledge base.
pub struct Resolver {
    store: Arc<KnowledgeStore>,
    semantic: SemanticIndex,
    query_patterns: QueryPatternTable,
    error_signatures: ErrorSignatureTable,
    dependencies: DependencyGraph,
    chains: ChainTable,
    matching: MatchingConfig,
    search: Option<Arc<dyn SemanticSearch>>,
}

impl Resolver {
    /// Create a resolver from loaded indexes and a door source.
    #[must_use]
    pub fn new(indexes: Indexes, source: Arc<dyn DoorSource>, matching: MatchingConfig) -> Self {
        let Indexes {
            identifiers,
            semantic,
            query_patterns,
            error_signatures,
            dependencies,
            chains,
        } = indexes;

        Self {
            store: Arc::new(KnowledgeStore::new(identifiers, source)),
            semantic,
            query_patterns,
            error_signatures,
            dependencies,
            chains,
            matching,
            search: None,
        }
    }

    /// Open the knowledge base at `config.knowledge_root`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError` if an index file exists but cannot be read or parsed.
    pub fn open(config: &KeymasterConfig) -> Result<Self, IndexError> {
        let indexes = Indexes::load(&config.knowledge_root)?;
        let source = Arc::new(FsDoorSource::new(&config.knowledge_root));
        Ok(Self::new(indexes, source, config.matching.clone()))
    }

    /// Attach an external semantic search backend.
    #[must_use]
    pub fn with_semantic_search(mut self, search: Arc<dyn SemanticSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// The door store backing this resolver.
    #[must_use]
    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    /// Matching configuration in effect.
    #[must_use]
    pub fn matching(&self) -> &MatchingConfig {
        &self.matching
    }

    /// Resolve a query to a single door.
    ///
    /// Never fails: a query nothing matches yields `ResolutionMethod::NoMatch`.
    pub async fn resolve(&self, query: &str, expand_prerequisites: bool) -> Resolution {
        let shape = QueryShape::classify(query);
        tracing::debug!(query, ?shape, "Resolving query");

        let Some(hit) = self.cascade(query, shape).await else {
            tracing::info!(query, "No door matched");
            return Resolution::no_match(query);
        };

        tracing::info!(
            query,
            method = %hit.method,
            door_code = %hit.door_code,
            confidence = hit.confidence,
            "Resolved door"
        );
        self.finish(query, hit, expand_prerequisites).await
    }

    /// Resolve an error message through the error signature table.
    pub async fn resolve_error(&self, error_text: &str, expand_prerequisites: bool) -> Resolution {
        let Some(candidate) = self.match_error(error_text) else {
            tracing::debug!("No error signature matched");
            return Resolution::no_match(error_text);
        };
        let Some(door) = self.store.get(&candidate.door_code).await else {
            tracing::debug!(door_code = %candidate.door_code, "Error door not loadable");
            return Resolution::no_match(error_text);
        };

        let hit = Hit {
            method: ResolutionMethod::ErrorPatternMatching,
            door_code: normalize_code(&candidate.door_code),
            door,
            confidence: candidate.confidence,
            alternatives: Vec::new(),
        };
        self.finish(error_text, hit, expand_prerequisites).await
    }

    /// Match error text to `(door_code, confidence)`; first table entry wins.
    #[must_use]
    pub fn match_error(&self, error_text: &str) -> Option<Candidate> {
        matching::match_error(&self.error_signatures, error_text)
    }

    /// Fuzzy-match a query against all door codes at the general similarity floor.
    #[must_use]
    pub fn similar_codes(&self, query: &str) -> Vec<Candidate> {
        matching::fuzzy_match(
            query,
            self.store.identifiers().codes(),
            self.matching.similarity_floor,
        )
    }

    /// Load the prerequisite closure of a door.
    pub async fn load_prerequisites(&self, door_code: &str) -> Vec<Arc<Door>> {
        let root = self.store.get(door_code).await;
        self.walker()
            .expand(door_code, root.as_deref(), &mut HashSet::new())
            .await
    }

    /// Load a named chain of doors in declared order, without prerequisites.
    pub async fn load_chain(&self, chain_name: &str) -> ChainLoad {
        let Some(chain) = self.chains.get(chain_name) else {
            tracing::debug!(chain_name, "Chain not declared");
            return ChainLoad::not_found(chain_name);
        };

        let mut doors = Vec::with_capacity(chain.doors.len());
        for code in &chain.doors {
            if let Some(door) = self.store.get(code).await {
                doors.push(door);
            }
        }

        ChainLoad {
            chain_name: chain_name.to_string(),
            found: true,
            description: chain.description.clone(),
            total_doors: doors.len(),
            estimated_load_time_ms: chain.estimated_load_time_ms,
            doors,
        }
    }

    /// Names of the declared chains.
    pub fn chain_names(&self) -> impl Iterator<Item = &str> {
        self.chains.names()
    }

    /// Render the onboarding summary of a door, or a not-found notice.
    pub async fn onboarding_summary(&self, door_code: &str) -> String {
        match self.store.get(door_code).await {
            Some(door) => door::onboarding_summary(&door),
            None => door::not_found(door_code),
        }
    }

    /// List indexed doors, optionally filtered by category, sorted by short code.
    pub async fn list_doors(&self, category: Option<&str>, limit: usize) -> Vec<DoorListing> {
        let mut listings = Vec::new();
        for code in self.store.identifiers().codes() {
            let Some(door) = self.store.get(code).await else {
                continue;
            };
            if category.is_some_and(|c| !door.category().eq_ignore_ascii_case(c)) {
                continue;
            }
            listings.push(DoorListing {
                short_code: door.short_code().to_string(),
                door_code: code.to_string(),
                summary: door.headline().to_string(),
            });
        }

        listings.sort_by(|a, b| a.short_code.cmp(&b.short_code));
        listings.truncate(limit);
        listings
    }

    fn walker(&self) -> PrerequisiteWalker<'_> {
        PrerequisiteWalker::new(&self.store, &self.dependencies)
    }

    async fn finish(&self, query: &str, hit: Hit, expand_prerequisites: bool) -> Resolution {
        let prerequisites = if expand_prerequisites {
            self.walker()
                .expand(&hit.door_code, Some(hit.door.as_ref()), &mut HashSet::new())
                .await
        } else {
            Vec::new()
        };

        Resolution {
            query: query.to_string(),
            method: hit.method,
            door_code: Some(hit.door_code),
            door: Some(hit.door),
            prerequisites,
            confidence: hit.confidence,
            alternatives: hit.alternatives,
        }
    }

    async fn cascade(&self, query: &str, shape: QueryShape) -> Option<Hit> {
        if shape == QueryShape::HashLike {
            if let Some(hit) = self.by_hash_code(query).await {
                return Some(hit);
            }
        }
        if shape == QueryShape::SemanticPathLike {
            if let Some(hit) = self
                .by_semantic_key(query, ResolutionMethod::SemanticPathResolution)
                .await
            {
                return Some(hit);
            }
        } else if self.matching.alias_lookup {
            if let Some(hit) = self
                .by_semantic_key(query, ResolutionMethod::AliasResolution)
                .await
            {
                return Some(hit);
            }
        }
        if let Some(hit) = self.by_query_patterns(query).await {
            return Some(hit);
        }
        if let Some(hit) = self.by_similarity(query).await {
            return Some(hit);
        }
        self.by_semantic_search(query).await
    }

    async fn by_hash_code(&self, query: &str) -> Option<Hit> {
        let code = query.to_uppercase();
        let door = self.store.get(&code).await?;
        Some(Hit::exact(ResolutionMethod::HashCodeLookup, normalize_code(&code), door))
    }

    async fn by_semantic_key(&self, query: &str, method: ResolutionMethod) -> Option<Hit> {
        let code = self.semantic.lookup(query)?.to_string();
        let door = self.store.get(&code).await?;
        Some(Hit::exact(method, code, door))
    }

    async fn by_query_patterns(&self, query: &str) -> Option<Hit> {
        let candidates = matching::score_query(&self.query_patterns, query);
        let (top, rest) = candidates.split_first()?;
        let door = self.store.get(&top.door_code).await?;

        let mut seen: HashSet<&str> = HashSet::from([top.door_code.as_str()]);
        let runners_up: Vec<&Candidate> = rest
            .iter()
            .filter(|c| seen.insert(c.door_code.as_str()))
            .take(self.matching.max_alternatives)
            .collect();

        let mut alternatives = Vec::with_capacity(runners_up.len());
        for candidate in runners_up {
            if let Some(alt) = self.store.get(&candidate.door_code).await {
                alternatives.push(Alternative {
                    door_code: candidate.door_code.clone(),
                    confidence: candidate.confidence,
                    summary: alt.context_bundle.summary.clone(),
                });
            }
        }

        Some(Hit {
            method: ResolutionMethod::NaturalLanguageQuery,
            door_code: top.door_code.clone(),
            door,
            confidence: top.confidence,
            alternatives,
        })
    }

    async fn by_similarity(&self, query: &str) -> Option<Hit> {
        let candidates = matching::fuzzy_match(
            query,
            self.store.identifiers().codes(),
            self.matching.fuzzy_fallback_floor,
        );
        self.first_loadable(candidates, ResolutionMethod::FuzzyMatching)
            .await
    }

    async fn by_semantic_search(&self, query: &str) -> Option<Hit> {
        let search = self.search.as_ref()?;
        let limit = self.matching.max_alternatives + 1;
        match search.search(query, limit).await {
            Ok(candidates) => {
                self.first_loadable(candidates, ResolutionMethod::SemanticSearch)
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Semantic search failed");
                None
            }
        }
    }

    async fn first_loadable(
        &self,
        candidates: Vec<Candidate>,
        method: ResolutionMethod,
    ) -> Option<Hit> {
        for candidate in candidates {
            if let Some(door) = self.store.get(&candidate.door_code).await {
                return Some(Hit {
                    method,
                    door_code: normalize_code(&candidate.door_code),
                    door,
                    confidence: candidate.confidence.clamp(0.0, 1.0),
                    alternatives: Vec::new(),
                });
            }
        }
        None
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("store", &self.store)
            .field("patterns", &self.query_patterns.len())
            .field("error_signatures", &self.error_signatures.len())
            .field("chains", &self.chains.len())
            .field("matching", &self.matching)
            .field("semantic_search", &self.search.is_some())
            .finish_non_exhaustive()
    }
}

//! In-memory SKOS concept store with label matching and relation queries.

use std::io::BufReader;
use std::path::Path;

use oxigraph::io::GraphFormat;
use oxigraph::model::{GraphNameRef, NamedNode, NamedNodeRef, Subject, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use tracing::{debug, info, warn};

use semagent_shared::{ConceptMatch, Relation, RelationKind, Result, SemagentError};

/// `skos:prefLabel` predicate IRI.
const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";

/// Read-only SKOS taxonomy, loaded once at process start.
pub struct TaxonomyStore {
    store: Store,
}

impl TaxonomyStore {
    /// Load a Turtle taxonomy file into a fresh in-memory store.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| SemagentError::io(path, e))?;

        let store = Store::new().map_err(|e| SemagentError::Taxonomy(e.to_string()))?;
        store
            .load_graph(
                BufReader::new(file),
                GraphFormat::Turtle,
                GraphNameRef::DefaultGraph,
                None,
            )
            .map_err(|e| {
                SemagentError::Taxonomy(format!("failed to parse {}: {e}", path.display()))
            })?;

        let loaded = Self { store };
        info!(
            path = %path.display(),
            concepts = loaded.concept_count(),
            "taxonomy loaded"
        );
        Ok(loaded)
    }

    /// Build a store from an in-memory Turtle document.
    pub fn from_turtle(turtle: &str) -> Result<Self> {
        let store = Store::new().map_err(|e| SemagentError::Taxonomy(e.to_string()))?;
        store
            .load_graph(
                turtle.as_bytes(),
                GraphFormat::Turtle,
                GraphNameRef::DefaultGraph,
                None,
            )
            .map_err(|e| SemagentError::Taxonomy(format!("failed to parse turtle: {e}")))?;

        Ok(Self { store })
    }

    /// Number of `skos:prefLabel` statements in the store.
    pub fn concept_count(&self) -> usize {
        let Ok(pred) = NamedNodeRef::new(SKOS_PREF_LABEL) else {
            return 0;
        };
        self.store
            .quads_for_pattern(None, Some(pred), None, None)
            .filter(|q| q.is_ok())
            .count()
    }

    /// Find the first concept whose `skos:prefLabel` appears as a
    /// case-insensitive substring of the question.
    ///
    /// First match wins in store iteration order. No tokenization,
    /// no stemming, no scoring.
    pub fn match_concept(&self, question: &str) -> Option<ConceptMatch> {
        let question_lower = question.to_lowercase();
        let pred = NamedNodeRef::new(SKOS_PREF_LABEL).ok()?;

        for quad in self.store.quads_for_pattern(None, Some(pred), None, None) {
            let quad = match quad {
                Ok(quad) => quad,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable label quad");
                    continue;
                }
            };

            let Term::Literal(label) = &quad.object else {
                continue;
            };
            let Subject::NamedNode(concept) = &quad.subject else {
                continue;
            };

            if question_lower.contains(&label.value().to_lowercase()) {
                debug!(uri = concept.as_str(), label = label.value(), "concept matched");
                return Some(ConceptMatch {
                    uri: concept.as_str().to_string(),
                    label: label.value().to_string(),
                });
            }
        }

        None
    }

    /// Query broader / narrower / related concepts of `uri`.
    ///
    /// Returns an empty list when the concept has no relations; query
    /// failures surface as [`SemagentError::Query`] so the caller can
    /// render an inline error instead of aborting.
    pub fn related_concepts(&self, uri: &str) -> Result<Vec<Relation>> {
        // Validate before interpolating into the query text.
        let node = NamedNode::new(uri)
            .map_err(|e| SemagentError::Query(format!("invalid concept URI {uri}: {e}")))?;

        let query = format!(
            r#"
            PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
            SELECT ?tipo ?concept WHERE {{
                {{ <{node}> skos:broader ?concept  BIND("broader" AS ?tipo) }}
                UNION
                {{ <{node}> skos:narrower ?concept BIND("narrower" AS ?tipo) }}
                UNION
                {{ <{node}> skos:related ?concept  BIND("related" AS ?tipo) }}
            }}
            "#,
            node = node.as_str()
        );

        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| SemagentError::Query(e.to_string()))?;

        let QueryResults::Solutions(solutions) = results else {
            return Err(SemagentError::Query("expected SELECT solutions".into()));
        };

        let mut relations = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| SemagentError::Query(e.to_string()))?;

            let kind = match solution.get("tipo") {
                Some(Term::Literal(lit)) => lit.value().to_string(),
                other => {
                    return Err(SemagentError::Query(format!(
                        "missing ?tipo binding: {other:?}"
                    )));
                }
            };
            let concept = match solution.get("concept") {
                Some(Term::NamedNode(node)) => node.as_str().to_string(),
                other => {
                    return Err(SemagentError::Query(format!(
                        "missing ?concept binding: {other:?}"
                    )));
                }
            };

            match RelationKind::parse(&kind) {
                Some(kind) => relations.push(Relation { kind, concept }),
                None => warn!(tipo = %kind, "unexpected relation binding"),
            }
        }

        Ok(relations)
    }

    /// Direct `skos:narrower` children of `uri`, used by the
    /// reasoning shortcut.
    pub fn narrower_of(&self, uri: &str) -> Result<Vec<String>> {
        let node = NamedNode::new(uri)
            .map_err(|e| SemagentError::Query(format!("invalid concept URI {uri}: {e}")))?;

        let query = format!(
            r#"
            PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
            SELECT ?child WHERE {{
                <{node}> skos:narrower ?child .
            }}
            "#,
            node = node.as_str()
        );

        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| SemagentError::Query(e.to_string()))?;

        let QueryResults::Solutions(solutions) = results else {
            return Err(SemagentError::Query("expected SELECT solutions".into()));
        };

        let mut children = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| SemagentError::Query(e.to_string()))?;
            if let Some(Term::NamedNode(child)) = solution.get("child") {
                children.push(child.as_str().to_string());
            }
        }

        Ok(children)
    }

    /// Placeholder for sales inference over the graph. Intentionally
    /// returns no results; the prompt still renders the section.
    pub fn inferred_sales(&self, _uri: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

//! Core domain types for the Semagent answer pipeline.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RelationKind / Relation
// ---------------------------------------------------------------------------

/// The SKOS relation kinds the agent walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Broader,
    Narrower,
    Related,
}

impl RelationKind {
    /// Name as bound by the relation SPARQL query and rendered in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Broader => "broader",
            Self::Narrower => "narrower",
            Self::Related => "related",
        }
    }

    /// Parse a SPARQL binding value back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "broader" => Some(Self::Broader),
            "narrower" => Some(Self::Narrower),
            "related" => Some(Self::Related),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed edge from a matched concept to a related concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation kind (broader / narrower / related).
    pub kind: RelationKind,
    /// URI of the related concept.
    pub concept: String,
}

// ---------------------------------------------------------------------------
// ConceptMatch
// ---------------------------------------------------------------------------

/// A concept recognized inside a question by label containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptMatch {
    /// URI of the matched concept.
    pub uri: String,
    /// The `skos:prefLabel` that matched.
    pub label: String,
}

// ---------------------------------------------------------------------------
// RetrievedSnippet
// ---------------------------------------------------------------------------

/// A fragment of document text returned by the search service.
///
/// Hits are deserialized leniently: only `content` matters to the
/// pipeline, the rest is carried for logging/traceability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    /// The text fragment used as prompt context.
    #[serde(default)]
    pub content: String,

    /// Originating document identifier, when the index provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Search relevance score, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_kind_roundtrip() {
        for kind in [
            RelationKind::Broader,
            RelationKind::Narrower,
            RelationKind::Related,
        ] {
            assert_eq!(RelationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RelationKind::parse("sibling"), None);
    }

    #[test]
    fn relation_serializes_lowercase() {
        let rel = Relation {
            kind: RelationKind::Narrower,
            concept: "https://contoso.com/vendas/Notebooks".into(),
        };
        let json = serde_json::to_string(&rel).expect("serialize");
        assert!(json.contains(r#""kind":"narrower""#));
    }

    #[test]
    fn snippet_deserializes_leniently() {
        // Only `content` is expected; unknown fields are ignored and
        // missing optional metadata defaults.
        let json = r#"{"content":"trecho do PDF","@search.action":"upload"}"#;
        let snippet: RetrievedSnippet = serde_json::from_str(json).expect("deserialize");
        assert_eq!(snippet.content, "trecho do PDF");
        assert!(snippet.source.is_none());
        assert!(snippet.score.is_none());
    }

    #[test]
    fn snippet_missing_content_defaults_empty() {
        let snippet: RetrievedSnippet = serde_json::from_str("{}").expect("deserialize");
        assert!(snippet.content.is_empty());
    }
}

//! End-to-end answer pipeline: question → concept + context → prompt → completion.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use semagent_shared::{CompletionModel, Result, SnippetSource};
use semagent_taxonomy::TaxonomyStore;

use crate::{prompt, reasoning};

/// Upper bound on snippets concatenated into the prompt context.
pub const MAX_CONTEXT_SNIPPETS: usize = 3;

/// Fixed generation cap sent to the completion service.
pub const MAX_COMPLETION_TOKENS: u32 = 800;

/// The question-answering agent.
///
/// Holds explicitly injected service handles so the pipeline can be
/// exercised with stubs; there are no ambient globals.
pub struct Agent {
    taxonomy: Arc<TaxonomyStore>,
    search: Arc<dyn SnippetSource>,
    completion: Arc<dyn CompletionModel>,
}

/// Pre-rendered concept-side prompt sections.
struct ConceptSections {
    concept: String,
    relations: String,
    sales: String,
}

impl Agent {
    pub fn new(
        taxonomy: Arc<TaxonomyStore>,
        search: Arc<dyn SnippetSource>,
        completion: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            taxonomy,
            search,
            completion,
        }
    }

    /// The loaded concept store (read-only).
    pub fn taxonomy(&self) -> &TaxonomyStore {
        &self.taxonomy
    }

    /// Answer a free-text question.
    ///
    /// Flow: reasoning shortcut → concept matching + relation resolution
    /// and context retrieval (independent) → prompt assembly → completion.
    /// Taxonomy and search failures degrade to inline text; a completion
    /// failure is propagated to the caller.
    #[instrument(skip_all, fields(question_len = question.len()))]
    pub async fn answer(&self, question: &str) -> Result<String> {
        // Special case: explicit reasoning questions bypass the whole
        // pipeline, including search and completion.
        if reasoning::is_reasoning_question(question) {
            info!("reasoning trigger word detected, using demo branch");
            return reasoning::reasoning_answer(&self.taxonomy);
        }

        let (sections, snippets) = tokio::join!(
            async { self.concept_sections(question) },
            self.search.fetch(question, MAX_CONTEXT_SNIPPETS),
        );

        let context = match snippets {
            Ok(snippets) => prompt::context_section(&snippets, MAX_CONTEXT_SNIPPETS),
            Err(e) => {
                warn!(error = %e, "context retrieval failed, degrading to fallback");
                prompt::SEARCH_UNAVAILABLE.to_string()
            }
        };

        let composed = prompt::build_prompt(
            question,
            &sections.concept,
            &sections.relations,
            &sections.sales,
            &context,
        );

        let answer = self
            .completion
            .complete(&composed, MAX_COMPLETION_TOKENS)
            .await?;

        info!(answer_len = answer.len(), "answer generated");
        Ok(answer)
    }

    /// Match a concept and render the concept/relations/sales sections,
    /// degrading each failed lookup to an inline error string.
    fn concept_sections(&self, question: &str) -> ConceptSections {
        let Some(matched) = self.taxonomy.match_concept(question) else {
            return ConceptSections {
                concept: prompt::NO_CONCEPT.to_string(),
                relations: prompt::NOT_APPLICABLE.to_string(),
                sales: prompt::NOT_APPLICABLE.to_string(),
            };
        };

        let relations = match self.taxonomy.related_concepts(&matched.uri) {
            Ok(relations) => prompt::relations_section(&relations),
            Err(e) => {
                warn!(uri = %matched.uri, error = %e, "relation query failed");
                prompt::relations_error(&e)
            }
        };

        let sales = match self.taxonomy.inferred_sales(&matched.uri) {
            Ok(sales) => prompt::sales_section(&sales),
            Err(e) => {
                warn!(uri = %matched.uri, error = %e, "sales query failed");
                prompt::sales_error(&e)
            }
        };

        ConceptSections {
            concept: prompt::concept_section(&matched),
            relations,
            sales,
        }
    }
}

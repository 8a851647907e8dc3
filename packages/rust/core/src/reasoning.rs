//! Hardcoded reasoning demo branch.
//!
//! Questions containing one of the trigger words skip the whole pipeline
//! and return a canned explanation listing the narrower children of one
//! fixed concept. This is a literal special case from the product demo,
//! deliberately not a general inference engine.

use semagent_taxonomy::TaxonomyStore;

use semagent_shared::Result;

/// Words that route a question into the reasoning branch.
pub const TRIGGER_WORDS: [&str; 3] = ["inferiu", "inferidas", "reasoning"];

/// The one concept the demo explanation is built from.
pub const REASONING_CONCEPT: &str = "https://contoso.com/vendas/Categoria_Produtos";

/// True when the question contains any trigger word (case-insensitive).
pub fn is_reasoning_question(question: &str) -> bool {
    let question_lower = question.to_lowercase();
    TRIGGER_WORDS.iter().any(|w| question_lower.contains(w))
}

/// Build the canned reasoning explanation from the store.
pub fn reasoning_answer(taxonomy: &TaxonomyStore) -> Result<String> {
    let children = taxonomy.narrower_of(REASONING_CONCEPT)?;

    let lista = children
        .iter()
        .map(|uri| format!("- `{uri}`"))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "\
### 🧠 Conceitos inferidos automaticamente pelo Reasoner (OWL-RL)

O reasoner inferiu que a categoria **Produtos** possui:

{lista}

As inferências vêm das relações SKOS (narrower/broader).
"
    ))
}

//! Prompt assembly.
//!
//! Pure string formatting: inputs are interpolated as-is into fixed
//! Portuguese section headers. The section wording is part of the
//! product surface (answers quote it back), so it stays stable.

use semagent_shared::{ConceptMatch, Relation, RetrievedSnippet};

/// Rendered when no `skos:prefLabel` matched the question.
pub const NO_CONCEPT: &str = "❌ Nenhum conceito SKOS encontrado.";

/// Rendered in the relation/sales sections when there was no concept.
pub const NOT_APPLICABLE: &str = "—";

/// Rendered when the matched concept has no relations.
pub const NO_RELATIONS: &str = "Nenhum conceito relacionado encontrado.";

/// Rendered when sales inference produced nothing.
pub const NO_SALES: &str = "Nenhuma venda inferida.";

/// Rendered when the search returned zero usable snippets.
pub const NO_SNIPPETS: &str = "Nenhum trecho relevante encontrado.";

/// Fixed fallback when the search service itself is unreachable.
pub const SEARCH_UNAVAILABLE: &str = "Não foi possível buscar trechos no índice de busca.";

/// Format the concept-match status line.
pub fn concept_section(matched: &ConceptMatch) -> String {
    format!("✔ Conceito encontrado: `{}`", matched.uri)
}

/// Format the relation list as bullets, or the "none" placeholder.
pub fn relations_section(relations: &[Relation]) -> String {
    if relations.is_empty() {
        return NO_RELATIONS.to_string();
    }
    relations
        .iter()
        .map(|r| format!("- `{}` → `{}`", r.kind, r.concept))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inline error string for a failed relation query.
pub fn relations_error(error: &impl std::fmt::Display) -> String {
    format!("⚠ Erro ao consultar relacionados: {error}")
}

/// Format inferred sales as bullets, or the "none" placeholder.
pub fn sales_section(sales: &[String]) -> String {
    if sales.is_empty() {
        return NO_SALES.to_string();
    }
    sales
        .iter()
        .map(|s| format!("- Produto {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inline error string for a failed sales query.
pub fn sales_error(error: &impl std::fmt::Display) -> String {
    format!("⚠ Erro: {error}")
}

/// Concatenate the content of at most `max` snippets, newline-separated.
/// Zero usable snippets render the "none" placeholder.
pub fn context_section(snippets: &[RetrievedSnippet], max: usize) -> String {
    let joined = snippets
        .iter()
        .take(max)
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if joined.trim().is_empty() {
        NO_SNIPPETS.to_string()
    } else {
        joined
    }
}

/// Compose the final prompt from the pre-rendered sections.
pub fn build_prompt(
    question: &str,
    concept_info: &str,
    relations_info: &str,
    sales_info: &str,
    context_info: &str,
) -> String {
    format!(
        "\
Você é um agente semântico com SKOS/OWL + Reasoning + RAG.

### Pergunta:
{question}

## 🔎 1. Conceito SKOS identificado
{concept_info}

## 🧭 2. Conceitos relacionados (broader / narrower / related)
{relations_info}

## 📊 3. Vendas inferidas
{sales_info}

## 📘 4. Contexto do PDF
{context_info}

Explique de forma clara, estruturada e estratégica.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use semagent_shared::RelationKind;

    fn snippet(content: &str) -> RetrievedSnippet {
        RetrievedSnippet {
            content: content.into(),
            ..Default::default()
        }
    }

    #[test]
    fn concept_section_quotes_uri() {
        let matched = ConceptMatch {
            uri: "https://contoso.com/vendas/Notebooks".into(),
            label: "Notebooks".into(),
        };
        assert_eq!(
            concept_section(&matched),
            "✔ Conceito encontrado: `https://contoso.com/vendas/Notebooks`"
        );
    }

    #[test]
    fn relations_render_as_typed_bullets() {
        let relations = vec![
            Relation {
                kind: RelationKind::Narrower,
                concept: "https://contoso.com/vendas/Notebooks".into(),
            },
            Relation {
                kind: RelationKind::Related,
                concept: "https://contoso.com/vendas/Acessorios".into(),
            },
        ];
        let section = relations_section(&relations);
        assert!(section.contains("- `narrower` → `https://contoso.com/vendas/Notebooks`"));
        assert!(section.contains("- `related` → `https://contoso.com/vendas/Acessorios`"));
    }

    #[test]
    fn empty_relations_render_placeholder() {
        assert_eq!(relations_section(&[]), NO_RELATIONS);
    }

    #[test]
    fn empty_sales_render_placeholder() {
        assert_eq!(sales_section(&[]), NO_SALES);
    }

    #[test]
    fn context_concatenates_at_most_max_snippets() {
        let snippets: Vec<_> = (1..=5).map(|i| snippet(&format!("trecho {i}"))).collect();
        let section = context_section(&snippets, 3);
        assert_eq!(section, "trecho 1\ntrecho 2\ntrecho 3");
    }

    #[test]
    fn zero_snippets_render_placeholder() {
        assert_eq!(context_section(&[], 3), NO_SNIPPETS);
    }

    #[test]
    fn whitespace_only_snippets_render_placeholder() {
        let snippets = vec![snippet(""), snippet("  ")];
        assert_eq!(context_section(&snippets, 3), NO_SNIPPETS);
    }

    #[test]
    fn prompt_has_all_sections_in_order() {
        let prompt = build_prompt(
            "o que é Categoria_Produtos",
            "✔ Conceito encontrado: `x`",
            NO_RELATIONS,
            NO_SALES,
            "trecho",
        );

        let concept_pos = prompt.find("## 🔎 1. Conceito SKOS identificado").unwrap();
        let relations_pos = prompt
            .find("## 🧭 2. Conceitos relacionados (broader / narrower / related)")
            .unwrap();
        let sales_pos = prompt.find("## 📊 3. Vendas inferidas").unwrap();
        let context_pos = prompt.find("## 📘 4. Contexto do PDF").unwrap();

        assert!(concept_pos < relations_pos);
        assert!(relations_pos < sales_pos);
        assert!(sales_pos < context_pos);
        assert!(prompt.contains("### Pergunta:\no que é Categoria_Produtos"));
    }
}

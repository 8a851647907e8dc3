//! Service seams for the answer pipeline.
//!
//! The pipeline only sees these traits; concrete clients live in the
//! `semagent-search` and `semagent-completion` crates and tests inject
//! stubs. Keeps the pipeline free of ambient globals.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RetrievedSnippet;

/// A document-search backend that returns context snippets for a query.
#[async_trait]
pub trait SnippetSource: Send + Sync {
    /// Run a keyword search and return up to `top` hits in rank order.
    async fn fetch(&self, query: &str, top: usize) -> Result<Vec<RetrievedSnippet>>;
}

/// A text-completion backend.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send a single-turn prompt and return the generated text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

//! Shared types, error model, and configuration for Semagent.
//!
//! This crate is the foundation depended on by all other Semagent crates.
//! It provides:
//! - [`SemagentError`] — the unified error type
//! - Domain types ([`ConceptMatch`], [`Relation`], [`RetrievedSnippet`])
//! - Configuration ([`AppConfig`], config loading and validation)

pub mod backend;
pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CompletionConfig, CompletionSettings, SearchConfig, SearchSettings, ServerConfig,
    TaxonomyConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use backend::{CompletionModel, SnippetSource};
pub use error::{Result, SemagentError};
pub use types::{ConceptMatch, Relation, RelationKind, RetrievedSnippet};

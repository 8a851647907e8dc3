//! Core answer pipeline for Semagent.
//!
//! Ties concept matching, relation resolution, context retrieval, and
//! the completion call into the end-to-end [`Agent::answer`] flow.

pub mod agent;
pub mod prompt;
pub mod reasoning;

pub use agent::{Agent, MAX_COMPLETION_TOKENS, MAX_CONTEXT_SNIPPETS};

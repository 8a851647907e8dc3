//! SKOS concept store backed by an in-memory RDF graph.
//!
//! This crate provides:
//! - [`TaxonomyStore`] — loads a Turtle taxonomy once at startup
//! - Concept matching by `skos:prefLabel` containment
//! - Relation resolution (broader / narrower / related) via SPARQL

pub mod store;

pub use store::TaxonomyStore;

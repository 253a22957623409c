//! Ontology primitives and the read-only graph contract.
//!
//! Value objects, vocabulary terms and the parsed class-expression model live
//! here, independent from how a schema is assembled out of them. The
//! [`repositories::TripleStore`] trait is the only way the resolver reads the
//! graph.

pub mod entities;
pub mod loader;
pub mod repositories;
pub mod service;
pub mod value_objects;
pub mod vocab;

pub use entities::{Cardinality, ClassExpression, Restriction};
pub use repositories::TripleStore;
pub use service::SchemaService;
pub use value_objects::{Iri, IriError, Language};

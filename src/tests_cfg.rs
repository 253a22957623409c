//! Shared helpers for unit tests.

use oxrdf::{Graph, NamedNode};
use oxrdfio::RdfFormat;

use crate::ontology::{loader, value_objects::Iri};

pub const EX: &str = "https://example.org/";

const PREFIXES: &str = r#"
@prefix ex: <https://example.org/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix obo: <http://purl.obolibrary.org/obo/> .
"#;

/// Parses a Turtle body with the common prefixes already declared.
pub fn graph(body: &str) -> Graph {
    let document = format!("{PREFIXES}\n{body}");
    loader::load_slice(document.as_bytes(), RdfFormat::Turtle).expect("valid turtle fixture")
}

pub fn node(local: &str) -> NamedNode {
    NamedNode::new(format!("{EX}{local}")).expect("valid iri")
}

pub fn iri(local: &str) -> Iri {
    Iri::from(node(local))
}

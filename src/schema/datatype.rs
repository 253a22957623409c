//! Datatype property resolution.

use std::collections::{BTreeMap, BTreeSet};

use oxrdf::Term;
use tracing::{debug, warn};

use crate::ontology::{
    repositories::{resource, TripleStore},
    value_objects::Iri,
    vocab::{owl, rdfs, STANDARD_PREFIXES},
};

use super::expression::flatten;

/// What a datatype property's range says about its values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatatypeFacets {
    /// Plain range; every named datatype it mentions. Empty when the
    /// property declares no range.
    Type(Vec<Iri>),
    /// Facets from `owl:withRestrictions`, keyed by qualified name.
    Restricted(BTreeMap<String, String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatatypeMatch {
    pub property: Iri,
    pub facets: DatatypeFacets,
}

/// Namespace prefixes used to shorten facet predicate names.
#[derive(Clone, Debug)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl PrefixMap {
    /// The standard RDF, RDFS, OWL and XSD prefixes plus `extra`; an extra
    /// entry with a standard prefix replaces the standard namespace.
    #[must_use]
    pub fn new(extra: &BTreeMap<String, String>) -> Self {
        let mut merged: BTreeMap<String, String> = STANDARD_PREFIXES
            .iter()
            .map(|(prefix, namespace)| ((*prefix).to_owned(), (*namespace).to_owned()))
            .collect();
        merged.extend(extra.iter().map(|(p, ns)| (p.clone(), ns.clone())));
        Self {
            entries: merged.into_iter().collect(),
        }
    }

    /// `prefix:local` for the longest matching namespace, or the full IRI.
    #[must_use]
    pub fn qualify(&self, iri: &str) -> String {
        self.entries
            .iter()
            .filter(|(_, namespace)| iri.len() > namespace.len() && iri.starts_with(namespace.as_str()))
            .max_by_key(|(_, namespace)| namespace.len())
            .map_or_else(
                || iri.to_owned(),
                |(prefix, namespace)| format!("{prefix}:{}", &iri[namespace.len()..]),
            )
    }
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

/// Datatype properties whose domain contains `class`.
///
/// Properties are scanned in IRI order. With `recursive`, named superclasses
/// of `class` are climbed as well (at most `max_depth` levels) and their
/// properties appended; a property reachable along several paths is
/// reported once.
pub fn resolve_properties<S: TripleStore + ?Sized>(
    store: &S,
    class: &Iri,
    recursive: bool,
    max_depth: usize,
    prefixes: &PrefixMap,
) -> Vec<DatatypeMatch> {
    let mut walk = DomainWalk {
        store,
        properties: store.instances_of(owl::DATATYPE_PROPERTY),
        prefixes,
        recursive,
        max_depth,
        visited: BTreeSet::new(),
        seen: BTreeSet::new(),
        found: Vec::new(),
    };
    walk.visit(class, 0);
    walk.found
}

/// State of one upward scan for datatype properties.
struct DomainWalk<'a, S: ?Sized> {
    store: &'a S,
    properties: Vec<Iri>,
    prefixes: &'a PrefixMap,
    recursive: bool,
    max_depth: usize,
    visited: BTreeSet<Iri>,
    seen: BTreeSet<Iri>,
    found: Vec<DatatypeMatch>,
}

impl<S: TripleStore + ?Sized> DomainWalk<'_, S> {
    fn visit(&mut self, class: &Iri, depth: usize) {
        if !self.visited.insert(class.clone()) {
            return;
        }
        for property in &self.properties {
            if self.seen.contains(property) || !in_domain(self.store, property, class) {
                continue;
            }
            self.seen.insert(property.clone());
            self.found.push(DatatypeMatch {
                property: property.clone(),
                facets: facets_of(self.store, property, self.prefixes),
            });
        }

        if !self.recursive {
            return;
        }
        if depth + 1 >= self.max_depth {
            warn!(class = %class, depth, "datatype_walk_depth_limit");
            return;
        }
        for superclass in self.store.objects(class.as_node().into(), rdfs::SUB_CLASS_OF) {
            if let Term::NamedNode(superclass) = superclass {
                self.visit(&Iri::from(superclass), depth + 1);
            }
        }
    }
}

/// A named domain must equal `class`; an anonymous one must mention it.
fn in_domain<S: TripleStore + ?Sized>(store: &S, property: &Iri, class: &Iri) -> bool {
    store
        .objects(property.as_node().into(), rdfs::DOMAIN)
        .iter()
        .any(|domain| match domain {
            Term::NamedNode(named) => named.as_str() == class.as_str(),
            Term::BlankNode(_) => flatten(store, domain.as_ref())
                .is_some_and(|expression| expression.named_operands().contains(&class)),
            _ => false,
        })
}

fn facets_of<S: TripleStore + ?Sized>(
    store: &S,
    property: &Iri,
    prefixes: &PrefixMap,
) -> DatatypeFacets {
    let Some(range) = store.value_of(property.as_node().into(), rdfs::RANGE) else {
        debug!(property = %property, "datatype_property_without_range");
        return DatatypeFacets::Type(Vec::new());
    };

    if let Some(list) = resource(&range).and_then(|node| store.value_of(node, owl::WITH_RESTRICTIONS))
    {
        let mut facets = BTreeMap::new();
        for member in store.collection(list.as_ref()) {
            let Some(member) = resource(&member) else {
                continue;
            };
            for triple in store.triples(Some(member), None, None) {
                facets.insert(prefixes.qualify(triple.predicate.as_str()), term_text(&triple.object));
            }
        }
        return DatatypeFacets::Restricted(facets);
    }

    let types = match &range {
        Term::NamedNode(named) => vec![Iri::from(named.as_ref())],
        _ => flatten(store, range.as_ref())
            .map(|expression| expression.named_operands().into_iter().cloned().collect())
            .unwrap_or_default(),
    };
    DatatypeFacets::Type(types)
}

fn term_text(term: &Term) -> String {
    match term {
        Term::Literal(literal) => literal.value().to_owned(),
        Term::NamedNode(named) => named.as_str().to_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{resolve_properties, DatatypeFacets, PrefixMap};
    use crate::ontology::vocab::xsd;
    use crate::tests_cfg::{graph, iri};

    const FIXTURE: &str = r#"
        ex:Agent a owl:Class .
        ex:Person a owl:Class ; rdfs:subClassOf ex:Agent .
        ex:Place a owl:Class .
        ex:name a owl:DatatypeProperty ;
            rdfs:domain ex:Agent ;
            rdfs:range xsd:string .
        ex:nickname a owl:DatatypeProperty ;
            rdfs:domain ex:Person ;
            rdfs:range [
                a rdfs:Datatype ;
                owl:onDatatype xsd:string ;
                owl:withRestrictions ( [ xsd:maxLength 255 ] )
            ] .
        ex:code a owl:DatatypeProperty ;
            rdfs:domain [ owl:unionOf ( ex:Person ex:Place ) ] ;
            rdfs:range [ owl:unionOf ( xsd:integer xsd:string ) ] .
        ex:note a owl:DatatypeProperty ; rdfs:domain ex:Place .
    "#;

    #[test]
    fn facet_restrictions_are_keyed_by_qualified_name() {
        let store = graph(FIXTURE);
        let found = resolve_properties(&store, &iri("Person"), false, 32, &PrefixMap::default());
        let nickname = found
            .iter()
            .find(|m| m.property == iri("nickname"))
            .expect("nickname resolved");
        assert_eq!(
            nickname.facets,
            DatatypeFacets::Restricted(BTreeMap::from([(
                "xsd:maxLength".to_owned(),
                "255".to_owned()
            )]))
        );
    }

    #[test]
    fn plain_range_falls_back_to_type() {
        let store = graph(FIXTURE);
        let found = resolve_properties(&store, &iri("Agent"), false, 32, &PrefixMap::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].facets, DatatypeFacets::Type(vec![xsd::STRING.into()]));
    }

    #[test]
    fn union_domain_matches_each_member() {
        let store = graph(FIXTURE);
        let place = resolve_properties(&store, &iri("Place"), false, 32, &PrefixMap::default());
        let properties: Vec<_> = place.iter().map(|m| m.property.clone()).collect();
        assert_eq!(properties, vec![iri("code"), iri("note")]);
        assert_eq!(place[1].facets, DatatypeFacets::Type(Vec::new()));
        match &place[0].facets {
            DatatypeFacets::Type(types) => assert_eq!(types.len(), 2),
            other => panic!("unexpected facets {other:?}"),
        }
    }

    #[test]
    fn recursive_mode_includes_inherited_properties() {
        let store = graph(FIXTURE);
        let direct = resolve_properties(&store, &iri("Person"), false, 32, &PrefixMap::default());
        let inherited = resolve_properties(&store, &iri("Person"), true, 32, &PrefixMap::default());
        assert_eq!(direct.len(), 2);
        assert_eq!(inherited.len(), 3);
        assert_eq!(inherited[2].property, iri("name"));
    }

    #[test]
    fn recursive_mode_stops_at_the_depth_limit() {
        let store = graph(FIXTURE);
        let found = resolve_properties(&store, &iri("Person"), true, 1, &PrefixMap::default());
        let properties: Vec<_> = found.iter().map(|m| m.property.clone()).collect();
        assert_eq!(properties, vec![iri("code"), iri("nickname")]);
    }

    #[test]
    fn restriction_fillers_in_a_domain_do_not_match() {
        let store = graph(
            r#"
            ex:Person a owl:Class .
            ex:age a owl:DatatypeProperty ;
                rdfs:domain [ owl:intersectionOf (
                    ex:Agent
                    [ a owl:Restriction ; owl:onProperty ex:knows ; owl:someValuesFrom ex:Person ]
                ) ] .
            "#,
        );
        assert!(resolve_properties(&store, &iri("Person"), false, 32, &PrefixMap::default()).is_empty());
        let agent = resolve_properties(&store, &iri("Agent"), false, 32, &PrefixMap::default());
        assert_eq!(agent.len(), 1);
    }

    #[test]
    fn recursive_mode_survives_cycles() {
        let store = graph(
            r#"
            ex:A rdfs:subClassOf ex:B .
            ex:B rdfs:subClassOf ex:A .
            ex:p a owl:DatatypeProperty ; rdfs:domain ex:B .
            "#,
        );
        let found = resolve_properties(&store, &iri("A"), true, 32, &PrefixMap::default());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn prefixes_prefer_the_longest_namespace() {
        let extra = BTreeMap::from([
            ("ex".to_owned(), "https://example.org/".to_owned()),
            ("deep".to_owned(), "https://example.org/deep/".to_owned()),
        ]);
        let prefixes = PrefixMap::new(&extra);
        assert_eq!(prefixes.qualify("https://example.org/deep/x"), "deep:x");
        assert_eq!(prefixes.qualify("https://example.org/y"), "ex:y");
        assert_eq!(prefixes.qualify("urn:other"), "urn:other");
    }
}

use std::collections::HashSet;

use oxrdf::{
    Graph, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef, Triple, TripleRef,
};

use super::value_objects::Iri;
use super::vocab::rdf;

/// Read-only triple lookup contract consumed by the resolver.
///
/// Implementors make no ordering promise. Callers that need reproducible
/// output use the sorted helpers ([`TripleStore::objects`],
/// [`TripleStore::subjects`]) rather than raw [`TripleStore::triples`].
pub trait TripleStore {
    /// Pattern-matched lookup; `None` in any position is a wildcard.
    fn triples(
        &self,
        subject: Option<NamedOrBlankNodeRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> Vec<Triple>;

    /// Returns whether at least one triple matches the pattern.
    fn has(
        &self,
        subject: NamedOrBlankNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
        object: Option<TermRef<'_>>,
    ) -> bool {
        !self
            .triples(Some(subject), Some(predicate), object)
            .is_empty()
    }

    /// Objects of `(subject, predicate, ?)` in lexical order.
    fn objects(&self, subject: NamedOrBlankNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        let mut objects: Vec<Term> = self
            .triples(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|triple| triple.object)
            .collect();
        objects.sort_by_cached_key(ToString::to_string);
        objects.dedup();
        objects
    }

    /// Subjects of `(?, predicate, object)` in lexical order.
    fn subjects(&self, predicate: NamedNodeRef<'_>, object: TermRef<'_>) -> Vec<NamedOrBlankNode> {
        let mut subjects: Vec<NamedOrBlankNode> = self
            .triples(None, Some(predicate), Some(object))
            .into_iter()
            .map(|triple| triple.subject)
            .collect();
        subjects.sort_by_cached_key(ToString::to_string);
        subjects.dedup();
        subjects
    }

    /// First value of a functional property.
    fn value_of(&self, subject: NamedOrBlankNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Option<Term> {
        self.objects(subject, predicate).into_iter().next()
    }

    /// Named subjects typed as `class`, in lexical order.
    fn instances_of(&self, class: NamedNodeRef<'_>) -> Vec<Iri> {
        self.subjects(rdf::TYPE, class.into())
            .into_iter()
            .filter_map(|subject| match subject {
                NamedOrBlankNode::NamedNode(node) => Some(Iri::from(node)),
                _ => None,
            })
            .collect()
    }

    /// Members of an RDF collection (`rdf:first` / `rdf:rest` chain) in list
    /// order. A broken or cyclic chain ends the walk.
    fn collection(&self, head: TermRef<'_>) -> Vec<Term> {
        let mut members = Vec::new();
        let mut visited = HashSet::new();
        let mut current = head.into_owned();
        while let Some(node) = resource(&current) {
            if node == NamedOrBlankNodeRef::from(rdf::NIL) || !visited.insert(node.into_owned()) {
                break;
            }
            if let Some(member) = self.value_of(node, rdf::FIRST) {
                members.push(member);
            }
            let Some(next) = self.value_of(node, rdf::REST) else {
                break;
            };
            current = next;
        }
        members
    }
}

impl TripleStore for Graph {
    fn triples(
        &self,
        subject: Option<NamedOrBlankNodeRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> Vec<Triple> {
        let keep = |triple: &TripleRef<'_>| matches_pattern(*triple, subject, predicate, object);
        match (subject, predicate, object) {
            (Some(subject), _, _) => self
                .triples_for_subject(subject)
                .filter(keep)
                .map(TripleRef::into_owned)
                .collect(),
            (None, _, Some(object)) => self
                .triples_for_object(object)
                .filter(keep)
                .map(TripleRef::into_owned)
                .collect(),
            (None, Some(predicate), None) => self
                .triples_for_predicate(predicate)
                .map(TripleRef::into_owned)
                .collect(),
            (None, None, None) => self.iter().map(TripleRef::into_owned).collect(),
        }
    }
}

fn matches_pattern(
    triple: TripleRef<'_>,
    subject: Option<NamedOrBlankNodeRef<'_>>,
    predicate: Option<NamedNodeRef<'_>>,
    object: Option<TermRef<'_>>,
) -> bool {
    subject.map_or(true, |subject| triple.subject == subject)
        && predicate.map_or(true, |predicate| triple.predicate == predicate)
        && object.map_or(true, |object| triple.object == object)
}

/// Views a term as a triple subject; literals have no outgoing edges.
#[must_use]
pub fn resource(term: &Term) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        Term::NamedNode(node) => Some(node.as_ref().into()),
        Term::BlankNode(node) => Some(node.as_ref().into()),
        _ => None,
    }
}

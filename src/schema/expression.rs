//! Restriction parsing and boolean-expression flattening.
//!
//! Anonymous class expressions are read from the store exactly once and
//! turned into [`ClassExpression`] / [`Restriction`] values; nothing later in
//! the pipeline inspects blank nodes again.

use oxrdf::{NamedOrBlankNodeRef, Term, TermRef};
use tracing::{debug, warn};

use crate::ontology::{
    entities::{Cardinality, ClassExpression, Restriction},
    repositories::{resource, TripleStore},
    value_objects::Iri,
    vocab::owl,
};

/// Nesting limit for anonymous expressions; guards against cyclic blank
/// node structures.
const MAX_EXPRESSION_DEPTH: usize = 64;

/// Flattens a class expression node.
///
/// Named nodes are atomic. Anonymous nodes are read as intersection, union
/// or embedded restriction, in that order. Literals and unrecognised shapes
/// yield `None`.
pub fn flatten<S: TripleStore + ?Sized>(store: &S, node: TermRef<'_>) -> Option<ClassExpression> {
    flatten_at(store, node, 0)
}

/// Flattens every member of an RDF collection, dropping unrecognised ones.
pub fn flatten_members<S: TripleStore + ?Sized>(
    store: &S,
    list: TermRef<'_>,
) -> Vec<ClassExpression> {
    members_at(store, list, 0)
}

fn flatten_at<S: TripleStore + ?Sized>(
    store: &S,
    node: TermRef<'_>,
    depth: usize,
) -> Option<ClassExpression> {
    if depth > MAX_EXPRESSION_DEPTH {
        warn!(node = %node, "class_expression_too_deep");
        return None;
    }
    let anonymous = match node {
        TermRef::NamedNode(named) => return Some(ClassExpression::Atomic(Iri::from(named))),
        TermRef::BlankNode(blank) => NamedOrBlankNodeRef::from(blank),
        _ => return None,
    };

    if let Some(list) = store.value_of(anonymous, owl::INTERSECTION_OF) {
        return Some(ClassExpression::Intersection(members_at(
            store,
            list.as_ref(),
            depth + 1,
        )));
    }
    if let Some(list) = store.value_of(anonymous, owl::UNION_OF) {
        return Some(ClassExpression::Union(members_at(
            store,
            list.as_ref(),
            depth + 1,
        )));
    }
    if let Some(Term::NamedNode(property)) = store.value_of(anonymous, owl::ON_PROPERTY) {
        let target = store
            .value_of(anonymous, owl::ALL_VALUES_FROM)
            .or_else(|| store.value_of(anonymous, owl::SOME_VALUES_FROM))
            .and_then(|range| flatten_at(store, range.as_ref(), depth + 1))
            .map(Box::new);
        return Some(ClassExpression::PropertyRestriction {
            property: Iri::from(property),
            target,
        });
    }

    debug!(node = %node, "class_expression_unrecognised");
    None
}

fn members_at<S: TripleStore + ?Sized>(
    store: &S,
    list: TermRef<'_>,
    depth: usize,
) -> Vec<ClassExpression> {
    store
        .collection(list)
        .iter()
        .filter_map(|member| flatten_at(store, member.as_ref(), depth))
        .collect()
}

/// Parses an `owl:Restriction` node.
///
/// The target is read from `onClass`, `someValuesFrom` or `allValuesFrom`, in
/// that order. An anonymous intersection target becomes one target per
/// operand; an anonymous union target short-circuits to
/// [`Cardinality::Union`] without looking at numeric cardinalities. Returns
/// `None` for nodes without an `owl:onProperty`.
pub fn parse_restriction<S: TripleStore + ?Sized>(
    store: &S,
    node: NamedOrBlankNodeRef<'_>,
) -> Option<Restriction> {
    let Some(Term::NamedNode(property)) = store.value_of(node, owl::ON_PROPERTY) else {
        debug!(node = %node, "restriction_without_property");
        return None;
    };
    let property = Iri::from(property);

    let raw_target = [owl::ON_CLASS, owl::SOME_VALUES_FROM, owl::ALL_VALUES_FROM]
        .into_iter()
        .find_map(|predicate| store.value_of(node, predicate));

    let targets = match raw_target {
        None => Vec::new(),
        Some(Term::BlankNode(blank)) => {
            let anonymous = NamedOrBlankNodeRef::from(blank.as_ref());
            if let Some(list) = store.value_of(anonymous, owl::INTERSECTION_OF) {
                flatten_members(store, list.as_ref())
            } else if let Some(list) = store.value_of(anonymous, owl::UNION_OF) {
                return Some(Restriction {
                    property,
                    targets: flatten_members(store, list.as_ref()),
                    cardinality: Some(Cardinality::Union),
                });
            } else {
                flatten(store, blank.as_ref().into()).into_iter().collect()
            }
        }
        Some(target) => flatten(store, target.as_ref()).into_iter().collect(),
    };

    Some(Restriction {
        property,
        targets,
        cardinality: cardinality_of(store, node),
    })
}

/// Restrictions directly or inside an intersection of an anonymous
/// `rdfs:subClassOf` target. Named superclasses yield nothing here.
pub fn restrictions_in<S: TripleStore + ?Sized>(store: &S, target: &Term) -> Vec<Restriction> {
    let Term::BlankNode(blank) = target else {
        return Vec::new();
    };
    let anonymous = NamedOrBlankNodeRef::from(blank.as_ref());
    let Some(list) = store.value_of(anonymous, owl::INTERSECTION_OF) else {
        return parse_restriction(store, anonymous).into_iter().collect();
    };
    let members = store.collection(list.as_ref());
    members
        .iter()
        .filter_map(|member| match member {
            Term::BlankNode(_) => resource(member),
            _ => None,
        })
        .filter(|member| store.has(*member, owl::ON_PROPERTY, None))
        .filter_map(|member| parse_restriction(store, member))
        .collect()
}

fn cardinality_of<S: TripleStore + ?Sized>(
    store: &S,
    node: NamedOrBlankNodeRef<'_>,
) -> Option<Cardinality> {
    let numeric: [(_, _, fn(u32) -> Cardinality); 3] = [
        (
            owl::MIN_QUALIFIED_CARDINALITY,
            owl::MIN_CARDINALITY,
            Cardinality::Min,
        ),
        (
            owl::MAX_QUALIFIED_CARDINALITY,
            owl::MAX_CARDINALITY,
            Cardinality::Max,
        ),
        (
            owl::QUALIFIED_CARDINALITY,
            owl::CARDINALITY,
            Cardinality::Exactly,
        ),
    ];
    for (qualified, plain, kind) in numeric {
        let Some(value) = store
            .value_of(node, qualified)
            .or_else(|| store.value_of(node, plain))
        else {
            continue;
        };
        match count(&value) {
            Some(n) => return Some(kind(n)),
            None => warn!(node = %node, value = %value, "non_numeric_cardinality"),
        }
    }

    if store.has(node, owl::SOME_VALUES_FROM, None) {
        Some(Cardinality::Some)
    } else if store.has(node, owl::ALL_VALUES_FROM, None) {
        Some(Cardinality::Only)
    } else {
        None
    }
}

/// Non-negative integer literal; counts past `u32::MAX` saturate.
fn count(term: &Term) -> Option<u32> {
    let Term::Literal(literal) = term else {
        return None;
    };
    let value = literal.value().trim();
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or_else(|_| {
        warn!(value, "cardinality_saturated");
        u32::MAX
    }))
}

use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

use serde::{Serialize, Serializer};

use super::value_objects::Iri;

/// Normalized OWL class expression.
///
/// Produced once per graph node by the flattener and never re-inspected
/// against the store afterwards.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClassExpression {
    /// A named class.
    Atomic(Iri),
    /// `owl:intersectionOf` over the listed operands.
    Intersection(Vec<ClassExpression>),
    /// `owl:unionOf` over the listed operands.
    Union(Vec<ClassExpression>),
    /// A restriction embedded as an operand; `target` is the
    /// `allValuesFrom` (or else `someValuesFrom`) range when one is declared.
    PropertyRestriction {
        property: Iri,
        target: Option<Box<ClassExpression>>,
    },
}

impl ClassExpression {
    /// Returns the class identifier when the expression is a plain named class.
    #[must_use]
    pub fn as_atomic(&self) -> Option<&Iri> {
        match self {
            Self::Atomic(id) => Some(id),
            _ => None,
        }
    }

    /// Named classes reachable through intersection and union operands,
    /// depth first. Classes inside embedded restrictions are not operands
    /// and are skipped.
    #[must_use]
    pub fn named_operands(&self) -> Vec<&Iri> {
        let mut named = Vec::new();
        self.collect_operands(&mut named);
        named
    }

    fn collect_operands<'a>(&'a self, named: &mut Vec<&'a Iri>) {
        match self {
            Self::Atomic(id) => named.push(id),
            Self::Intersection(operands) | Self::Union(operands) => {
                for operand in operands {
                    operand.collect_operands(named);
                }
            }
            Self::PropertyRestriction { .. } => {}
        }
    }
}

/// Cardinality policy of a restriction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cardinality {
    Min(u32),
    Max(u32),
    Exactly(u32),
    /// `owl:someValuesFrom` without a numeric bound.
    Some,
    /// `owl:allValuesFrom` without a numeric bound.
    Only,
    /// The target was a union; numeric cardinality is not inspected.
    Union,
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min(n) => write!(f, "min {n}"),
            Self::Max(n) => write!(f, "max {n}"),
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::Some => f.write_str("some"),
            Self::Only => f.write_str("only"),
            Self::Union => f.write_str("union"),
        }
    }
}

impl Serialize for Cardinality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A parsed `owl:Restriction` node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Restriction {
    pub property: Iri,
    pub targets: Vec<ClassExpression>,
    /// `None` when no cardinality shape was recognised.
    pub cardinality: Option<Cardinality>,
}

impl Restriction {
    #[must_use]
    pub fn is_exactly_one(&self) -> bool {
        self.cardinality == Some(Cardinality::Exactly(1))
    }
}

/// Property, then cardinality, then targets. Blank node labels play no part,
/// so the order is stable across loads of one document.
impl Ord for Restriction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.property
            .cmp(&other.property)
            .then_with(|| self.cardinality.cmp(&other.cardinality))
            .then_with(|| self.targets.cmp(&other.targets))
    }
}

impl PartialOrd for Restriction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

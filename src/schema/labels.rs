//! Label and description indices for one language.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use oxrdf::Term;
use tracing::warn;

use crate::ontology::{
    entities::ClassExpression,
    repositories::TripleStore,
    value_objects::{Iri, Language},
    vocab::{owl, rdf, rdfs, OBO_DEFINITION},
};

/// Identifier to display label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelIndex {
    labels: BTreeMap<Iri, String>,
}

impl LabelIndex {
    #[must_use]
    pub fn get(&self, id: &Iri) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Label of `id`, or its IRI text when no label was resolved.
    #[must_use]
    pub fn label_for(&self, id: &Iri) -> String {
        self.get(id)
            .map_or_else(|| id.as_str().to_owned(), ToOwned::to_owned)
    }

    /// Display text of a class expression: the label of a named class, or the
    /// operands joined by `" - "` for composite expressions.
    #[must_use]
    pub fn render(&self, expression: &ClassExpression) -> String {
        match expression {
            ClassExpression::Atomic(id) => self.label_for(id),
            ClassExpression::Intersection(operands) | ClassExpression::Union(operands) => operands
                .iter()
                .map(|operand| self.render(operand))
                .collect::<Vec<_>>()
                .join(" - "),
            ClassExpression::PropertyRestriction { property, target } => match target {
                Some(target) => format!("{} {}", self.label_for(property), self.render(target)),
                None => self.label_for(property),
            },
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Iri, String> {
        self.labels.iter()
    }
}

/// Two entities sharing one label in the requested language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelCollision {
    pub label: String,
    /// Entity the label resolves to after indexing.
    pub kept: Iri,
    pub replaced: Iri,
}

/// Label to identifier; on duplicate labels the lexically later IRI wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReverseLabelIndex {
    ids: BTreeMap<String, Iri>,
    collisions: Vec<LabelCollision>,
}

impl ReverseLabelIndex {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Iri> {
        self.ids.get(label)
    }

    /// Ambiguous labels found while indexing.
    #[must_use]
    pub fn collisions(&self) -> &[LabelCollision] {
        &self.collisions
    }

    fn insert(&mut self, label: &str, id: &Iri) {
        if let Some(previous) = self.ids.insert(label.to_owned(), id.clone()) {
            if previous != *id {
                warn!(label, kept = %id, replaced = %previous, "ambiguous_label");
                self.collisions.push(LabelCollision {
                    label: label.to_owned(),
                    kept: id.clone(),
                    replaced: previous,
                });
            }
        }
    }
}

/// Identifier to definition text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DescriptionIndex {
    descriptions: BTreeMap<Iri, String>,
}

impl DescriptionIndex {
    #[must_use]
    pub fn get(&self, id: &Iri) -> Option<&str> {
        self.descriptions.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Iri, String> {
        self.descriptions.iter()
    }
}

/// The three indices built for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels {
    pub labels: LabelIndex,
    pub reverse: ReverseLabelIndex,
    pub descriptions: DescriptionIndex,
}

/// Indexes labels and definitions of every class, object property and
/// datatype property.
///
/// Entities are visited in IRI order so the reverse index is reproducible.
pub fn resolve_labels<S: TripleStore + ?Sized>(store: &S, language: Language) -> Labels {
    let entities: BTreeSet<Iri> = [owl::CLASS, owl::OBJECT_PROPERTY, owl::DATATYPE_PROPERTY]
        .into_iter()
        .flat_map(|kind| store.instances_of(kind))
        .collect();

    let mut resolved = Labels::default();
    for entity in entities {
        if let Some(label) = entity_label(store, &entity, language) {
            resolved.reverse.insert(&label, &entity);
            resolved.labels.labels.insert(entity.clone(), label);
        }
        if let Some(definition) = definition(store, &entity) {
            resolved.descriptions.descriptions.insert(entity, definition);
        }
    }
    resolved
}

/// Preferred `rdfs:label` of any entity: first in `language`, else first in
/// any language. Candidates are taken in lexical order and empty labels are
/// ignored.
pub fn entity_label<S: TripleStore + ?Sized>(
    store: &S,
    entity: &Iri,
    language: Language,
) -> Option<String> {
    let candidates: Vec<(Option<String>, String)> = store
        .objects(entity.as_node().into(), rdfs::LABEL)
        .into_iter()
        .filter_map(|term| match term {
            Term::Literal(literal) if !literal.value().trim().is_empty() => Some((
                literal.language().map(str::to_owned),
                literal.value().to_owned(),
            )),
            _ => None,
        })
        .collect();

    candidates
        .iter()
        .find(|(tag, _)| tag.as_deref().is_some_and(|tag| language.matches(tag)))
        .or_else(|| candidates.first())
        .map(|(_, value)| value.clone())
}

/// Label of `entity`, or its IRI text.
pub fn entity_label_or_iri<S: TripleStore + ?Sized>(
    store: &S,
    entity: &Iri,
    language: Language,
) -> String {
    entity_label(store, entity, language).unwrap_or_else(|| entity.as_str().to_owned())
}

fn definition<S: TripleStore + ?Sized>(store: &S, entity: &Iri) -> Option<String> {
    [OBO_DEFINITION, rdfs::COMMENT].into_iter().find_map(|predicate| {
        store
            .objects(entity.as_node().into(), predicate)
            .into_iter()
            .find_map(|term| match term {
                Term::Literal(literal) => Some(literal.value().to_owned()),
                _ => None,
            })
    })
}

/// Whether `entity` is declared with `rdf:type`; used to tell unknown
/// request classes from known ones.
pub fn is_declared<S: TripleStore + ?Sized>(store: &S, entity: &Iri) -> bool {
    store.has(entity.as_node().into(), rdf::TYPE, None)
}

#[cfg(test)]
mod tests {
    use super::{entity_label_or_iri, resolve_labels};
    use crate::ontology::{entities::ClassExpression, value_objects::Language};
    use crate::tests_cfg::{graph, iri};

    const FIXTURE: &str = r#"
        ex:Meeting a owl:Class ;
            rdfs:label "reunião"@pt , "meeting"@en-US ;
            obo:IAO_0000115 "A scheduled gathering." ;
            rdfs:comment "ignored when a definition exists" .
        ex:Place a owl:Class ;
            rdfs:label "local" ;
            rdfs:comment "Where it happens." .
        ex:Bare a owl:Class .
        ex:hasPlace a owl:ObjectProperty ; rdfs:label "has place"@en .
        ex:title a owl:DatatypeProperty ; rdfs:label "título"@pt .
    "#;

    #[test]
    fn prefers_requested_language_by_prefix() {
        let labels = resolve_labels(&graph(FIXTURE), Language::En);
        assert_eq!(labels.labels.get(&iri("Meeting")), Some("meeting"));
        let labels = resolve_labels(&graph(FIXTURE), Language::Pt);
        assert_eq!(labels.labels.get(&iri("Meeting")), Some("reunião"));
    }

    #[test]
    fn falls_back_to_any_language_then_iri() {
        let store = graph(FIXTURE);
        let labels = resolve_labels(&store, Language::En);
        assert_eq!(labels.labels.get(&iri("Place")), Some("local"));
        assert_eq!(labels.labels.get(&iri("title")), Some("título"));
        assert_eq!(labels.labels.get(&iri("Bare")), None);
        assert_eq!(labels.labels.label_for(&iri("Bare")), iri("Bare").as_str());
        assert_eq!(
            entity_label_or_iri(&store, &iri("Bare"), Language::En),
            iri("Bare").as_str()
        );
    }

    #[test]
    fn label_lookup_is_total_and_never_empty() {
        let store = graph(
            r#"
            ex:Blank a owl:Class ; rdfs:label "   " .
            ex:Named a owl:Class ; rdfs:label "named"@pt .
            "#,
        );
        let labels = resolve_labels(&store, Language::En);
        for id in [iri("Blank"), iri("Named"), iri("Unknown")] {
            assert!(!labels.labels.label_for(&id).is_empty());
        }
        assert_eq!(labels.labels.get(&iri("Blank")), None);
    }

    #[test]
    fn definitions_prefer_formal_annotation() {
        let labels = resolve_labels(&graph(FIXTURE), Language::En);
        assert_eq!(
            labels.descriptions.get(&iri("Meeting")),
            Some("A scheduled gathering.")
        );
        assert_eq!(
            labels.descriptions.get(&iri("Place")),
            Some("Where it happens.")
        );
        assert_eq!(labels.descriptions.get(&iri("Bare")), None);
    }

    #[test]
    fn reverse_index_is_deterministic_and_reports_collisions() {
        let store = graph(
            r#"
            ex:B a owl:Class ; rdfs:label "shared" .
            ex:A a owl:Class ; rdfs:label "shared" .
            ex:C a owl:Class ; rdfs:label "unique" .
            "#,
        );
        let labels = resolve_labels(&store, Language::En);
        assert_eq!(labels.reverse.get("shared"), Some(&iri("B")));
        assert_eq!(labels.reverse.get("unique"), Some(&iri("C")));
        let collisions = labels.reverse.collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].kept, iri("B"));
        assert_eq!(collisions[0].replaced, iri("A"));
    }

    #[test]
    fn renders_composite_expressions() {
        let labels = resolve_labels(&graph(FIXTURE), Language::En);
        let expression = ClassExpression::Union(vec![
            ClassExpression::Atomic(iri("Meeting")),
            ClassExpression::Atomic(iri("Bare")),
        ]);
        assert_eq!(
            labels.labels.render(&expression),
            format!("meeting - {}", iri("Bare"))
        );
        let nested = ClassExpression::PropertyRestriction {
            property: iri("hasPlace"),
            target: Some(Box::new(ClassExpression::Atomic(iri("Place")))),
        };
        assert_eq!(labels.labels.render(&nested), "has place local");
    }
}

//! Classes rendered as selection widgets and their options.

use std::collections::BTreeMap;

use oxrdf::Term;
use tracing::debug;

use crate::ontology::{
    repositories::TripleStore,
    value_objects::{Iri, Language},
    vocab::rdfs,
};

use super::{descriptor::SelectOption, expression::flatten, labels::entity_label_or_iri};

/// Selectable class to its instances, each with a display label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectableOptions {
    options: BTreeMap<Iri, Vec<SelectOption>>,
}

impl SelectableOptions {
    #[must_use]
    pub fn get(&self, class: &Iri) -> Option<&[SelectOption]> {
        self.options.get(class).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, class: &Iri) -> bool {
        self.options.contains_key(class)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Builds the registry from the domain of `selectable_property`.
///
/// Every class in that domain (union and intersection domains included)
/// is selectable, even with no instances. Instances are listed in IRI order.
pub fn build_registry<S: TripleStore + ?Sized>(
    store: &S,
    selectable_property: Option<&Iri>,
    language: Language,
) -> SelectableOptions {
    let Some(property) = selectable_property else {
        return SelectableOptions::default();
    };

    let mut registry = SelectableOptions::default();
    for domain in store.objects(property.as_node().into(), rdfs::DOMAIN) {
        let classes: Vec<Iri> = match &domain {
            Term::NamedNode(named) => vec![Iri::from(named.as_ref())],
            _ => flatten(store, domain.as_ref())
                .map(|expression| expression.named_operands().into_iter().cloned().collect())
                .unwrap_or_default(),
        };
        for class in classes {
            let options = store
                .instances_of(class.as_node())
                .into_iter()
                .map(|instance| SelectOption {
                    label: entity_label_or_iri(store, &instance, language),
                    id: instance,
                })
                .collect::<Vec<_>>();
            debug!(class = %class, options = options.len(), "selectable_class_indexed");
            registry.options.insert(class, options);
        }
    }
    registry
}

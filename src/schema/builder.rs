//! Schema builder.
//!
//! Collects the restrictions a class inherits, then decides for every
//! restriction target which kind of field it becomes:
//!
//! 1. `exactly 1` targets become a single typed input, the datatype guessed
//!    from the target label;
//! 2. targets with qualifying first-level subclasses become a subclass
//!    choice;
//! 3. targets with datatype properties become one field per property;
//! 4. anything else becomes an `under_construction` placeholder.
//!
//! Descriptions and select options are attached afterwards, keyed by the
//! target class.

use std::collections::BTreeSet;

use oxrdf::{NamedOrBlankNode, Term};
use tracing::{debug, info, warn};

use crate::{
    config::SchemaSettings,
    ontology::{
        entities::{ClassExpression, Restriction},
        repositories::TripleStore,
        value_objects::{Iri, Language},
        vocab::rdfs,
    },
};

use super::{
    datatype::{resolve_properties, DatatypeFacets, DatatypeMatch, PrefixMap},
    descriptor::{
        DatatypeProperty, FieldDescriptor, FieldShape, FieldStatus, RestrictionSummary,
        SubclassInfo,
    },
    expression::restrictions_in,
    inference::infer_datatype,
    labels::{resolve_labels, Labels},
    selectable::{build_registry, SelectableOptions},
};

/// Resolves `class` into form fields for `language`.
///
/// A class unknown to the store has no restrictions and yields an empty
/// list.
pub fn build_schema<S: TripleStore + ?Sized>(
    store: &S,
    class: &Iri,
    language: Language,
    settings: &SchemaSettings,
) -> Vec<FieldDescriptor> {
    SchemaBuilder::new(store, settings, language).build(class)
}

/// Named direct subclasses of `class`, in IRI order.
pub fn direct_subclasses<S: TripleStore + ?Sized>(store: &S, class: &Iri) -> Vec<Iri> {
    store
        .subjects(rdfs::SUB_CLASS_OF, class.as_node().into())
        .into_iter()
        .filter_map(|subject| match subject {
            NamedOrBlankNode::NamedNode(node) => Some(Iri::from(node)),
            _ => None,
        })
        .collect()
}

/// Per-request state: the indices are built once per call and dropped with
/// the builder.
pub struct SchemaBuilder<'a, S: ?Sized> {
    store: &'a S,
    settings: &'a SchemaSettings,
    language: Language,
    labels: Labels,
    options: SelectableOptions,
    prefixes: PrefixMap,
}

impl<'a, S: TripleStore + ?Sized> SchemaBuilder<'a, S> {
    pub fn new(store: &'a S, settings: &'a SchemaSettings, language: Language) -> Self {
        Self {
            store,
            settings,
            language,
            labels: resolve_labels(store, language),
            options: build_registry(store, settings.selectable_property.as_ref(), language),
            prefixes: PrefixMap::new(&settings.prefixes),
        }
    }

    pub fn build(&self, class: &Iri) -> Vec<FieldDescriptor> {
        let restrictions = self.collect_restrictions(class);
        let mut fields = Vec::new();
        for restriction in &restrictions {
            for target in &restriction.targets {
                self.resolve_target(restriction, target, &mut fields);
            }
        }
        for field in &mut fields {
            self.annotate(field);
        }
        info!(
            class = %class,
            language = %self.language,
            restrictions = restrictions.len(),
            fields = fields.len(),
            "schema_built"
        );
        fields
    }

    /// Restrictions declared on `class` and its named ancestors, ancestors
    /// first.
    ///
    /// The walk stops at configured boundary classes and at
    /// `settings.max_depth`. Each class contributes once, so cyclic or
    /// diamond-shaped hierarchies terminate without duplicates.
    pub fn collect_restrictions(&self, class: &Iri) -> Vec<Restriction> {
        let mut restrictions = Vec::new();
        let mut visited = BTreeSet::new();
        self.walk_up(class, 0, &mut visited, &mut restrictions);
        restrictions
    }

    fn walk_up(
        &self,
        class: &Iri,
        depth: usize,
        visited: &mut BTreeSet<Iri>,
        restrictions: &mut Vec<Restriction>,
    ) {
        if self.settings.is_boundary(class) {
            debug!(class = %class, "restriction_walk_boundary");
            return;
        }
        if depth >= self.settings.max_depth {
            warn!(class = %class, depth, "restriction_walk_depth_limit");
            return;
        }
        if !visited.insert(class.clone()) {
            return;
        }
        debug!(class = %class, depth, "restriction_walk_enter");

        let mut local = Vec::new();
        for superclass in self
            .store
            .objects(class.as_node().into(), rdfs::SUB_CLASS_OF)
        {
            match &superclass {
                Term::NamedNode(named) => {
                    self.walk_up(&Iri::from(named.as_ref()), depth + 1, visited, restrictions);
                }
                anonymous => local.extend(restrictions_in(self.store, anonymous)),
            }
        }
        local.sort();
        restrictions.extend(local);
    }

    fn resolve_target(
        &self,
        restriction: &Restriction,
        target: &ClassExpression,
        fields: &mut Vec<FieldDescriptor>,
    ) {
        let related_class_id = target.as_atomic().cloned();
        let related_class = self.labels.labels.render(target);
        let field = |shape| FieldDescriptor {
            property: restriction.property.clone(),
            label: self.labels.labels.label_for(&restriction.property),
            related_class: related_class.clone(),
            related_class_id: related_class_id.clone(),
            cardinality: restriction.cardinality,
            shape,
            description: None,
            options: None,
        };

        if restriction.is_exactly_one() {
            let datatype = infer_datatype(
                self.settings.keywords_for(self.language),
                &related_class,
                &self.settings.default_datatype,
            );
            fields.push(field(FieldShape::DataType {
                data_property: None,
                data_type: vec![datatype],
            }));
            return;
        }

        let Some(class) = &related_class_id else {
            debug!(property = %restriction.property, target = %related_class, "composite_target_placeholder");
            fields.push(field(under_construction()));
            return;
        };

        let subclasses = self.subclasses(class);
        if !subclasses.is_empty() {
            fields.push(field(FieldShape::Subclasses { subclasses }));
            return;
        }

        let properties = resolve_properties(
            self.store,
            class,
            self.settings.inherit_domains,
            self.settings.max_depth,
            &self.prefixes,
        );
        if properties.is_empty() {
            fields.push(field(under_construction()));
            return;
        }
        for DatatypeMatch { property, facets } in properties {
            let shape = match facets {
                DatatypeFacets::Type(types) => FieldShape::DataType {
                    data_property: Some(property),
                    data_type: self.or_default(types),
                },
                DatatypeFacets::Restricted(facet_restrictions) => FieldShape::Facets {
                    data_property: property,
                    facet_restrictions,
                },
            };
            fields.push(field(shape));
        }
    }

    /// First-level subclasses that carry a datatype property of their own
    /// or a restriction with a recognised cardinality.
    fn subclasses(&self, class: &Iri) -> Vec<SubclassInfo> {
        direct_subclasses(self.store, class)
            .into_iter()
            .filter_map(|subclass| {
                let data_properties: Vec<DatatypeProperty> = resolve_properties(
                    self.store,
                    &subclass,
                    false,
                    self.settings.max_depth,
                    &self.prefixes,
                )
                .into_iter()
                .map(|found| self.datatype_property(found))
                .collect();

                let mut declared: Vec<Restriction> = self
                    .store
                    .objects(subclass.as_node().into(), rdfs::SUB_CLASS_OF)
                    .iter()
                    .flat_map(|target| restrictions_in(self.store, target))
                    .collect();
                declared.sort();
                let restrictions: Vec<RestrictionSummary> = declared
                    .into_iter()
                    .filter_map(|restriction| {
                        let cardinality = restriction.cardinality?;
                        Some(RestrictionSummary {
                            label: self.labels.labels.label_for(&restriction.property),
                            related_classes: restriction
                                .targets
                                .iter()
                                .map(|target| self.labels.labels.render(target))
                                .collect(),
                            property: restriction.property,
                            cardinality,
                        })
                    })
                    .collect();

                if data_properties.is_empty() && restrictions.is_empty() {
                    return None;
                }
                Some(SubclassInfo {
                    label: self.labels.labels.label_for(&subclass),
                    id: subclass,
                    data_properties,
                    restrictions,
                })
            })
            .collect()
    }

    fn datatype_property(&self, found: DatatypeMatch) -> DatatypeProperty {
        let (data_type, facet_restrictions) = match found.facets {
            DatatypeFacets::Type(types) => (self.or_default(types), Default::default()),
            DatatypeFacets::Restricted(facets) => (vec![self.settings.default_datatype.clone()], facets),
        };
        DatatypeProperty {
            label: self.labels.labels.label_for(&found.property),
            property: found.property,
            data_type,
            facet_restrictions,
        }
    }

    fn or_default(&self, types: Vec<Iri>) -> Vec<Iri> {
        if types.is_empty() {
            vec![self.settings.default_datatype.clone()]
        } else {
            types
        }
    }

    fn annotate(&self, field: &mut FieldDescriptor) {
        let Some(class) = &field.related_class_id else {
            return;
        };
        field.description = self
            .labels
            .descriptions
            .get(class)
            .map(ToOwned::to_owned);
        field.options = self.options.get(class).map(<[_]>::to_vec);
    }
}

fn under_construction() -> FieldShape {
    FieldShape::UnderConstruction {
        status: FieldStatus::UnderConstruction,
    }
}

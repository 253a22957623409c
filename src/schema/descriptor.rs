//! Output records consumed by the form renderer.
//!
//! Field names serialise in camelCase and absent optionals are omitted, so a
//! descriptor list is ready to be sent as a JSON array.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ontology::{entities::Cardinality, value_objects::Iri};

/// One form field resolved from a restriction target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub property: Iri,
    pub label: String,
    pub related_class: String,
    /// Absent for composite targets.
    #[serde(rename = "relatedClassUri", skip_serializing_if = "Option::is_none")]
    pub related_class_id: Option<Iri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    #[serde(flatten)]
    pub shape: FieldShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

/// The single populated variant of a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldShape {
    #[serde(rename_all = "camelCase")]
    DataType {
        #[serde(skip_serializing_if = "Option::is_none")]
        data_property: Option<Iri>,
        data_type: Vec<Iri>,
    },
    #[serde(rename_all = "camelCase")]
    Facets {
        data_property: Iri,
        facet_restrictions: BTreeMap<String, String>,
    },
    Subclasses { subclasses: Vec<SubclassInfo> },
    UnderConstruction { status: FieldStatus },
}

impl FieldShape {
    #[must_use]
    pub fn is_under_construction(&self) -> bool {
        matches!(self, Self::UnderConstruction { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    UnderConstruction,
}

/// A first-level subclass offered in place of its parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubclassInfo {
    #[serde(rename = "uri")]
    pub id: Iri,
    pub label: String,
    pub data_properties: Vec<DatatypeProperty>,
    pub restrictions: Vec<RestrictionSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatatypeProperty {
    pub property: Iri,
    pub label: String,
    pub data_type: Vec<Iri>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facet_restrictions: BTreeMap<String, String>,
}

/// A cardinality-bearing restriction of a subclass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionSummary {
    pub property: Iri,
    pub label: String,
    pub related_classes: Vec<String>,
    pub cardinality: Cardinality,
}

/// An instance of a selectable class.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SelectOption {
    #[serde(rename = "uri")]
    pub id: Iri,
    pub label: String,
}

/// A direct subclass with its display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubclassEntry {
    #[serde(rename = "uri")]
    pub id: Iri,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::{FieldDescriptor, FieldShape, FieldStatus, SelectOption};
    use crate::ontology::{entities::Cardinality, vocab::xsd};
    use crate::tests_cfg::iri;

    fn field(shape: FieldShape) -> FieldDescriptor {
        FieldDescriptor {
            property: iri("hasDate"),
            label: "has date".into(),
            related_class: "meeting date".into(),
            related_class_id: Some(iri("MeetingDate")),
            cardinality: Some(Cardinality::Exactly(1)),
            shape,
            description: None,
            options: None,
        }
    }

    #[test]
    fn datatype_field_serialises_flat() {
        let value = serde_json::to_value(field(FieldShape::DataType {
            data_property: None,
            data_type: vec![xsd::DATE.into()],
        }))
        .expect("serialise");
        assert_eq!(
            value,
            json!({
                "property": iri("hasDate").as_str(),
                "label": "has date",
                "relatedClass": "meeting date",
                "relatedClassUri": iri("MeetingDate").as_str(),
                "cardinality": "exactly 1",
                "dataType": [xsd::DATE.as_str()],
            })
        );
    }

    #[test]
    fn placeholder_carries_only_status() {
        let mut placeholder = field(FieldShape::UnderConstruction {
            status: FieldStatus::UnderConstruction,
        });
        placeholder.cardinality = None;
        placeholder.related_class_id = None;
        placeholder.options = Some(vec![SelectOption {
            id: iri("a"),
            label: "A".into(),
        }]);
        let value = serde_json::to_value(placeholder).expect("serialise");
        assert_eq!(value["status"], "under_construction");
        assert_eq!(value["options"], json!([{ "uri": iri("a").as_str(), "label": "A" }]));
        for absent in ["dataType", "subclasses", "facetRestrictions", "relatedClassUri", "cardinality"] {
            assert!(value.get(absent).is_none(), "{absent} should be omitted");
        }
    }

    #[test]
    fn facet_field_names_its_property() {
        let value = serde_json::to_value(field(FieldShape::Facets {
            data_property: iri("nickname"),
            facet_restrictions: BTreeMap::from([("xsd:maxLength".into(), "255".into())]),
        }))
        .expect("serialise");
        assert_eq!(value["dataProperty"], iri("nickname").as_str());
        assert_eq!(value["facetRestrictions"]["xsd:maxLength"], "255");
        assert!(value.get("dataType").is_none());
    }
}

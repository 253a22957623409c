use std::{path::Path, sync::Arc};

use oxrdf::Graph;
use tracing::{debug, info};

use crate::{
    config::{Config, SchemaSettings},
    ontology::{
        loader,
        value_objects::{Iri, Language},
    },
    schema::{
        builder::{build_schema, direct_subclasses},
        descriptor::{FieldDescriptor, SubclassEntry},
        labels::{entity_label_or_iri, is_declared, resolve_labels, Labels},
    },
    Error, Result,
};

/// Request-level entry point over one loaded ontology.
///
/// The graph is loaded once and shared read-only; every call builds its own
/// indices, so clones of the service may serve requests concurrently.
#[derive(Clone)]
pub struct SchemaService {
    graph: Arc<Graph>,
    settings: Arc<SchemaSettings>,
}

impl SchemaService {
    #[must_use]
    pub fn new(graph: Graph, settings: SchemaSettings) -> Self {
        Self {
            graph: Arc::new(graph),
            settings: Arc::new(settings),
        }
    }

    /// Loads the ontology at `path` and applies the schema settings of
    /// `config`.
    ///
    /// # Errors
    ///
    /// Fails when the ontology cannot be read or parsed.
    pub fn from_config(path: &Path, config: &Config) -> Result<Self> {
        let graph = loader::load_path(path)?;
        info!(
            boundaries = config.schema.boundaries.len(),
            max_depth = config.schema.max_depth,
            inherit_domains = config.schema.inherit_domains,
            "schema_service_ready"
        );
        Ok(Self::new(graph, config.schema.clone()))
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub fn settings(&self) -> &SchemaSettings {
        &self.settings
    }

    /// Form fields for `class`; empty when the class is unknown.
    #[must_use]
    pub fn build_schema(&self, class: &Iri, language: Language) -> Vec<FieldDescriptor> {
        build_schema(self.graph.as_ref(), class, language, &self.settings)
    }

    /// Named direct subclasses of `class` with their labels.
    #[must_use]
    pub fn list_subclasses(&self, class: &Iri, language: Language) -> Vec<SubclassEntry> {
        direct_subclasses(self.graph.as_ref(), class)
            .into_iter()
            .map(|id| SubclassEntry {
                label: entity_label_or_iri(self.graph.as_ref(), &id, language),
                id,
            })
            .collect()
    }

    /// Turns a class reference into an IRI.
    ///
    /// A declared IRI is taken as is, then labels in `language` are tried,
    /// then any well-formed IRI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownClass`] when `reference` is neither a known
    /// label nor a valid IRI.
    pub fn resolve_class(&self, reference: &str, language: Language) -> Result<Iri> {
        let reference = reference.trim();
        let parsed = Iri::new(reference).ok();
        if let Some(iri) = parsed.as_ref().filter(|iri| is_declared(self.graph.as_ref(), iri)) {
            return Ok(iri.clone());
        }
        let labels = resolve_labels(self.graph.as_ref(), language);
        if let Some(iri) = labels.reverse.get(reference) {
            debug!(label = reference, class = %iri, "class_resolved_by_label");
            return Ok(iri.clone());
        }
        parsed.ok_or_else(|| Error::UnknownClass(reference.to_owned()))
    }

    /// Languages labels can be requested in.
    #[must_use]
    pub fn languages(&self) -> &'static [Language] {
        &Language::ALL
    }

    /// Label and description indices for `language`.
    #[must_use]
    pub fn labels(&self, language: Language) -> Labels {
        resolve_labels(self.graph.as_ref(), language)
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaService;
    use crate::config::SchemaSettings;
    use crate::ontology::value_objects::Language;
    use crate::tests_cfg::{graph, iri};
    use crate::Error;

    fn service() -> SchemaService {
        SchemaService::new(
            graph(
                r#"
                ex:Meeting a owl:Class ; rdfs:label "reunião"@pt , "meeting"@en .
                ex:Room a owl:Class ; rdfs:subClassOf ex:Place ; rdfs:label "sala"@pt .
                ex:Hall a owl:Class ; rdfs:subClassOf ex:Place .
                ex:Place a owl:Class .
                "#,
            ),
            SchemaSettings::default(),
        )
    }

    #[test]
    fn resolves_classes_by_iri_or_label() {
        let service = service();
        assert_eq!(
            service
                .resolve_class(iri("Meeting").as_str(), Language::En)
                .expect("by iri"),
            iri("Meeting")
        );
        assert_eq!(
            service.resolve_class("reunião", Language::Pt).expect("by label"),
            iri("Meeting")
        );
        assert_eq!(
            service.resolve_class(" meeting ", Language::En).expect("trimmed label"),
            iri("Meeting")
        );
        assert_eq!(
            service
                .resolve_class(iri("Elsewhere").as_str(), Language::En)
                .expect("undeclared iri"),
            iri("Elsewhere")
        );
        assert!(matches!(
            service.resolve_class("no such class", Language::En),
            Err(Error::UnknownClass(_))
        ));
    }

    #[test]
    fn lists_labeled_subclasses() {
        let subclasses = service().list_subclasses(&iri("Place"), Language::Pt);
        let pairs: Vec<(String, String)> = subclasses
            .into_iter()
            .map(|entry| (entry.id.to_string(), entry.label))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (iri("Hall").to_string(), iri("Hall").to_string()),
                (iri("Room").to_string(), "sala".to_owned()),
            ]
        );
    }

    #[test]
    fn exposes_the_supported_languages() {
        assert_eq!(service().languages(), &[Language::Pt, Language::En]);
    }

    #[test]
    fn clones_share_the_graph() {
        let service = service();
        let clone = service.clone();
        assert!(std::ptr::eq(service.graph(), clone.graph()));
        assert_eq!(clone.labels(Language::En).labels.get(&iri("Meeting")), Some("meeting"));
    }
}

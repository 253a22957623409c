//! Resolver configuration.
//!
//! Configuration is read from a YAML document. Every key is optional; a
//! missing key takes the default shown below.
//!
//! ```yaml
//! logger:
//!   enable: true
//!   level: info
//!   format: compact
//! schema:
//!   boundaries:
//!     - http://www.semanticweb.org/ontologias/SESAI/ontoAldeias_00000557
//!   max_depth: 32
//!   selectable_property: http://www.semanticweb.org/ontologias/SESAI/ontoAldeias_00000613
//!   inherit_domains: false
//!   default_datatype: http://www.w3.org/2001/XMLSchema#string
//!   prefixes:
//!     sesai: http://www.semanticweb.org/ontologias/SESAI/
//!   keywords:
//!     en:
//!       - contains: time
//!         datatype: http://www.w3.org/2001/XMLSchema#time
//! ```

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    ontology::{
        value_objects::{Iri, Language},
        vocab::xsd,
    },
    schema::inference::{default_keywords, KeywordRule},
    Error, Result,
};

const SESAI_BOUNDARY: &str = "http://www.semanticweb.org/ontologias/SESAI/ontoAldeias_00000557";
const SESAI_SELECTABLE: &str = "http://www.semanticweb.org/ontologias/SESAI/ontoAldeias_00000613";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logger: LoggerSettings,
    pub schema: SchemaSettings,
}

impl Config {
    /// Reads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid configuration.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or values that do not validate.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.schema.validate()?;
        Ok(config)
    }
}

/// Logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub enable: bool,
    /// Default level directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enable: true,
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Settings consumed by the schema resolver.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Classes where the upward restriction walk stops.
    pub boundaries: Vec<Iri>,
    /// Hard limit for every upward walk, whatever the boundaries say.
    pub max_depth: usize,
    /// Datatype property whose domain marks classes rendered as selects.
    pub selectable_property: Option<Iri>,
    /// Resolve datatype properties declared on superclasses of a target too.
    pub inherit_domains: bool,
    pub default_datatype: Iri,
    /// Extra namespace prefixes for facet names.
    pub prefixes: BTreeMap<String, String>,
    /// Exactly-one datatype guesses, per language.
    pub keywords: BTreeMap<Language, Vec<KeywordRule>>,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            boundaries: Iri::new(SESAI_BOUNDARY).into_iter().collect(),
            max_depth: 32,
            selectable_property: Iri::new(SESAI_SELECTABLE).ok(),
            inherit_domains: false,
            default_datatype: Iri::from(xsd::STRING),
            prefixes: BTreeMap::new(),
            keywords: default_keywords(),
        }
    }
}

impl SchemaSettings {
    /// Keyword rules for `language`; empty when the table has none.
    #[must_use]
    pub fn keywords_for(&self, language: Language) -> &[KeywordRule] {
        self.keywords
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn is_boundary(&self, class: &Iri) -> bool {
        self.boundaries.contains(class)
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::Config("schema.max_depth must be at least 1".into()));
        }
        if let Some((prefix, _)) = self
            .prefixes
            .iter()
            .find(|(prefix, namespace)| prefix.is_empty() || namespace.is_empty())
        {
            return Err(Error::Config(format!(
                "schema.prefixes entry `{prefix}` needs both a prefix and a namespace"
            )));
        }
        Ok(())
    }
}

//! Resolves OWL class restrictions into language-localized form field
//! descriptors.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ontoform::{config::Config, ontology::Language, SchemaService};
//!
//! let service = SchemaService::from_config(Path::new("ontology.owl"), &Config::default())?;
//! let class = service.resolve_class("reunião", Language::Pt)?;
//! let fields = service.build_schema(&class, Language::Pt);
//! println!("{}", serde_json::to_string_pretty(&fields)?);
//! # Ok::<(), ontoform::Error>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod logger;
pub mod ontology;
pub mod schema;

#[cfg(test)]
pub(crate) mod tests_cfg;

pub use errors::{Error, Result};
pub use ontology::SchemaService;

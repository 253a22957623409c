//! Crate-wide error type.
//!
//! Missing labels, ranges or restrictions are never errors: the resolver
//! always has a fallback for absent data. The variants here cover the outer
//! surface only (loading the ontology, reading configuration, validating a
//! request).

use std::path::PathBuf;

use crate::ontology::value_objects::IriError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading an input file failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The ontology document could not be deserialised.
    #[error("failed to parse ontology `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported ontology format: {0}")]
    UnsupportedFormat(String),

    /// Requested language is not part of the supported set.
    #[error("unsupported language `{0}`")]
    UnsupportedLanguage(String),

    #[error(transparent)]
    InvalidIri(#[from] IriError),

    /// A class reference matched neither an IRI nor a known label.
    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

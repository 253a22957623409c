//! Ontology document loading.
//!
//! The resolver only ever sees an immutable [`Graph`]; this module is the
//! seam where a serialized ontology becomes one. Any syntax error is fatal
//! and surfaces before a schema request can run.

use std::path::Path;

use oxrdf::{Graph, Triple};
use oxrdfio::{RdfFormat, RdfParser};
use tracing::info;

use crate::{Error, Result};

const IN_MEMORY: &str = "<memory>";

/// Picks a parser from the file extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] when the extension is unknown.
pub fn format_for_path(path: &Path) -> Result<RdfFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "owl" | "rdf" | "xml" => Ok(RdfFormat::RdfXml),
        "ttl" => Ok(RdfFormat::Turtle),
        "nt" => Ok(RdfFormat::NTriples),
        other => RdfFormat::from_extension(other)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string())),
    }
}

/// Loads an ontology file into an in-memory graph.
///
/// # Errors
///
/// Fails when the file cannot be read, its format is unknown, or it does not
/// parse.
pub fn load_path(path: &Path) -> Result<Graph> {
    let format = format_for_path(path)?;
    let data = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse(&data, format, path)?;
    info!(path = %path.display(), triples = graph.len(), "ontology_loaded");
    Ok(graph)
}

/// Loads an ontology from an in-memory document.
///
/// # Errors
///
/// Fails when the document does not parse.
pub fn load_slice(data: &[u8], format: RdfFormat) -> Result<Graph> {
    parse(data, format, Path::new(IN_MEMORY))
}

fn parse(data: &[u8], format: RdfFormat, origin: &Path) -> Result<Graph> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(format).for_slice(data) {
        let quad = quad.map_err(|err| Error::Parse {
            path: origin.to_path_buf(),
            message: err.to_string(),
        })?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(graph)
}

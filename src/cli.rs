//! Command line interface.
//!
//! ```sh
//! ontoform schema --ontology onto.owl --class "reunião" --language pt
//! ontoform subclasses --ontology onto.owl --class https://example.org/Place
//! ontoform labels --ontology onto.owl --language en
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

use crate::{config::Config, logger, ontology::Language, Result, SchemaService};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the form fields of a class
    Schema {
        #[command(flatten)]
        source: Source,
        /// Class IRI or label
        #[arg(long)]
        class: String,
    },
    /// List the direct subclasses of a class
    Subclasses {
        #[command(flatten)]
        source: Source,
        /// Class IRI or label
        #[arg(long)]
        class: String,
    },
    /// Print labels and descriptions of every class and property
    Labels {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Args)]
struct Source {
    /// Ontology document (.owl, .rdf, .xml, .ttl, .nt)
    #[arg(short, long)]
    ontology: PathBuf,
    #[arg(short, long, default_value_t = Language::Pt)]
    language: Language,
}

/// Runs the command line and prints the result as JSON on stdout.
///
/// # Errors
///
/// Fails when configuration or ontology cannot be loaded or a class reference
/// does not resolve.
pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    logger::init(&config.logger);

    let output = match cli.command {
        Commands::Schema { source, class } => {
            let service = SchemaService::from_config(&source.ontology, &config)?;
            let class = service.resolve_class(&class, source.language)?;
            serde_json::to_value(service.build_schema(&class, source.language))?
        }
        Commands::Subclasses { source, class } => {
            let service = SchemaService::from_config(&source.ontology, &config)?;
            let class = service.resolve_class(&class, source.language)?;
            serde_json::to_value(service.list_subclasses(&class, source.language))?
        }
        Commands::Labels { source } => {
            let service = SchemaService::from_config(&source.ontology, &config)?;
            labels_document(&service, source.language)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn labels_document(service: &SchemaService, language: Language) -> Value {
    let indices = service.labels(language);
    let labels: serde_json::Map<String, Value> = indices
        .labels
        .iter()
        .map(|(id, label)| (id.to_string(), Value::from(label.as_str())))
        .collect();
    let descriptions: serde_json::Map<String, Value> = indices
        .descriptions
        .iter()
        .map(|(id, text)| (id.to_string(), Value::from(text.as_str())))
        .collect();
    let collisions: Vec<Value> = indices
        .reverse
        .collisions()
        .iter()
        .map(|collision| {
            json!({
                "label": collision.label,
                "kept": collision.kept,
                "replaced": collision.replaced,
            })
        })
        .collect();
    json!({
        "language": language,
        "labels": labels,
        "descriptions": descriptions,
        "collisions": collisions,
    })
}

//! dataobj - Extract data-object metadata from annotated firmware sources
//!
//! This tool scans a firmware source file for data-object declarations
//! annotated with inline `/*{ ... }*/` JSON blocks, resolves symbolic IDs
//! against a header of `#define` constants, and writes one canonical JSON
//! document describing every exposed object.

use anyhow::{bail, Context, Result};
use clap::Parser;
use dataobj_core::{
    extract_file_with_config, ExtractorConfig, SymbolTable, UnitDefault, DEFAULT_GROUP_MARKER,
};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Extract data-object metadata from annotated firmware sources
#[derive(Parser, Debug)]
#[command(name = "dataobj")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Source file containing annotated data-object declarations
    #[arg(short, long)]
    source: PathBuf,

    /// Header file supplying #define constants for symbolic IDs
    #[arg(short = 'H', long)]
    header: Option<PathBuf>,

    /// Output path for the generated JSON document
    #[arg(short, long, default_value = dataobj_core::DEFAULT_OUTPUT_FILENAME)]
    output: PathBuf,

    /// Marker identifying group declaration lines
    #[arg(long, default_value = DEFAULT_GROUP_MARKER)]
    group_marker: String,

    /// Default missing units to null instead of deriving them from object names
    #[arg(long)]
    no_derive_units: bool,

    /// Dry run - print the document to stdout instead of writing the file
    #[arg(long)]
    dry_run: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    run(&cli)
}

/// Run the extraction pipeline: symbols, extraction, normalization, output
fn run(cli: &Cli) -> Result<()> {
    if !cli.source.exists() {
        bail!("Source file does not exist: {}", cli.source.display());
    }
    if !cli.source.is_file() {
        bail!("Source path is not a file: {}", cli.source.display());
    }

    let symbols = match &cli.header {
        Some(header) => {
            let table = SymbolTable::from_file(header)
                .with_context(|| format!("Failed to read header: {}", header.display()))?;
            info!("Loaded {} symbols from {}", table.len(), header.display());
            table
        }
        None => {
            debug!("No header supplied, starting with an empty symbol table");
            SymbolTable::new()
        }
    };

    let unit_default = if cli.no_derive_units {
        UnitDefault::Null
    } else {
        UnitDefault::DeriveFromName
    };
    let config = ExtractorConfig::new()
        .group_marker(cli.group_marker.clone())
        .unit_default(unit_default);

    let document = extract_file_with_config(&cli.source, &symbols, config)
        .with_context(|| format!("Failed to extract from {}", cli.source.display()))?;

    info!("Extracted {} data objects", document.object_count());

    if cli.dry_run {
        print!("{}", dataobj_core::to_json_string(&document));
        return Ok(());
    }

    dataobj_core::write_json_file(&document, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("Saved file under: {}", cli.output.display());
    Ok(())
}

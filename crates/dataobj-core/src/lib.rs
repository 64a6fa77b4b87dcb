//! # dataobj-core
//!
//! A library for extracting data-object metadata from annotated firmware sources.
//!
//! Firmware exposing runtime variables through an introspection protocol
//! annotates each exposed "data object" with an inline JSON comment block
//! directly above its declaration. This crate provides the core functionality
//! for:
//!
//! - Building a symbol table from macro-style ID definitions in a header
//! - Scanning a source file for group markers, object declarations and
//!   `/*{ ... }*/` metadata blocks
//! - Normalizing the extracted objects (`unit`/`min`/`max` defaulting, unit
//!   derivation from naming conventions) and emitting a canonical JSON
//!   document
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`symbols`]: Symbolic-constant resolution for data-object IDs
//! - [`extractor`]: Line scanner and object extraction
//! - [`document`]: Output document model, normalization and JSON writing
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use dataobj_core::{Extractor, SymbolTable};
//! use std::fs;
//!
//! let header = fs::read_to_string("src/data_objects.h")?;
//! let source = fs::read_to_string("src/data_objects.cpp")?;
//!
//! let symbols = SymbolTable::parse(&header);
//! let document = Extractor::new().extract(&source, &symbols)?;
//!
//! println!("{}", dataobj_core::to_json_string(&document));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod document;
pub mod error;
pub mod extractor;
pub mod symbols;

// Re-export primary types for convenience
pub use document::{to_json_string, write_json_file, DataObject, Document, Entry, UnitDefault};
pub use error::{Error, Result};
pub use extractor::{
    extract_file, extract_file_with_config, Extractor, ExtractorConfig, DEFAULT_GROUP_MARKER,
};
pub use symbols::{SymbolTable, DEFAULT_DEFINE_MARKER};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default output filename, matching the schema version the document conforms to
pub const DEFAULT_OUTPUT_FILENAME: &str = "info.json";

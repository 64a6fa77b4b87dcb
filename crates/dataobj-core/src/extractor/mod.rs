//! Source scanning module for extracting annotated data objects.
//!
//! This module scans a firmware source file line by line for data-object
//! declarations annotated with inline JSON metadata blocks:
//!
//! ```c
//! TS_GROUP(ID_DEVICE, "Device", TS_NO_CALLBACK, ID_ROOT),
//!
//! /*{
//!     "title": { "en": "Internal Temperature" }
//! }*/
//! TS_ITEM_FLOAT(0x36, "rInt_degC", &dev_stat.internal_temp, 1,
//!     ID_DEVICE, TS_ANY_R, SUBSET_LIVE),
//! ```
//!
//! ## Algorithm Overview
//!
//! 1. Scan for group markers and opening `/*{` lines
//! 2. Accumulate the raw text of the JSON block until the closing `}*/`
//! 3. Treat the next content line as the object's declaration and slice out
//!    its name and ID literal
//! 4. Resolve the ID (bare hex, or a symbol via the [`SymbolTable`]), parse
//!    the accumulated JSON and insert the object into the output document
//!
//! The scanner position is an explicit [`ScanState`] value threaded through a
//! single loop, so no buffer state can leak from one block into the next. Any
//! failure while closing out a block is fatal and reports the line span from
//! the opening marker to the line being processed.

mod line;

use std::path::Path;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::document::{DataObject, Document, UnitDefault};
use crate::error::{Error, Result};
use crate::symbols::{parse_hex, SymbolTable};

/// Line that opens an inline JSON metadata block
const BLOCK_OPEN: &str = "/*{";

/// Line that closes an inline JSON metadata block
const BLOCK_CLOSE: &str = "}*/";

/// Default marker identifying a group declaration line
pub const DEFAULT_GROUP_MARKER: &str = "TS_GROUP";

/// Configuration for the extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Marker identifying group declaration lines
    pub group_marker: String,
    /// How missing `unit` fields are defaulted during normalization
    pub unit_default: UnitDefault,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            group_marker: DEFAULT_GROUP_MARKER.to_string(),
            unit_default: UnitDefault::default(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a new extractor config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the group declaration marker
    pub fn group_marker(mut self, marker: impl Into<String>) -> Self {
        self.group_marker = marker.into();
        self
    }

    /// Sets the unit-defaulting mode
    pub fn unit_default(mut self, unit_default: UnitDefault) -> Self {
        self.unit_default = unit_default;
        self
    }
}

/// Scanner position, carried explicitly through the scanning loop
#[derive(Debug)]
enum ScanState {
    /// Between blocks, looking for markers
    Scanning,
    /// Inside a `/*{ ... }*/` block, accumulating raw JSON text
    CapturingJson {
        /// Line of the opening marker, kept for diagnostics
        start_line: usize,
        /// Accumulated JSON text, seeded with `{`
        json: String,
    },
    /// Block closed; the next content line is the object's declaration
    NamePending {
        /// Line of the opening marker
        start_line: usize,
        /// Complete JSON text including the closing `}`
        json: String,
    },
}

/// Primary extractor for annotated data-object declarations
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates a new extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extracts all annotated data objects from `source`, resolving symbolic
    /// IDs through `symbols`, and returns the normalized output document.
    pub fn extract(&self, source: &str, symbols: &SymbolTable) -> Result<Document> {
        let mut document = Document::new();
        let mut current_group: Option<String> = None;
        let mut seen_ids = std::collections::HashSet::new();
        let mut state = ScanState::Scanning;
        let mut last_line = 0;

        for (num, text) in source.lines().enumerate() {
            let num = num + 1;
            last_line = num;

            state = match state {
                ScanState::CapturingJson {
                    start_line,
                    mut json,
                } => {
                    if line::is_marker(text, BLOCK_CLOSE) {
                        json.push('}');
                        trace!("Closed JSON block at line {}", num);
                        ScanState::NamePending { start_line, json }
                    } else {
                        json.push_str(text);
                        json.push('\n');
                        ScanState::CapturingJson { start_line, json }
                    }
                }

                ScanState::Scanning => {
                    if text.trim().is_empty() {
                        ScanState::Scanning
                    } else if text.contains(&self.config.group_marker) {
                        current_group = Some(self.open_group(&mut document, text, num)?);
                        ScanState::Scanning
                    } else if line::is_marker(text, BLOCK_OPEN) {
                        trace!("Opened JSON block at line {}", num);
                        ScanState::CapturingJson {
                            start_line: num,
                            json: String::from("{"),
                        }
                    } else {
                        // ordinary source line, nothing to do
                        ScanState::Scanning
                    }
                }

                ScanState::NamePending { start_line, json } => {
                    if text.trim().is_empty() {
                        ScanState::NamePending { start_line, json }
                    } else if text.contains(&self.config.group_marker) {
                        current_group = Some(self.open_group(&mut document, text, num)?);
                        ScanState::NamePending { start_line, json }
                    } else {
                        let (name, object) =
                            self.build_object(text, start_line, num, &json, symbols)?;

                        if !seen_ids.insert(object.id) {
                            warn!(
                                "Duplicate data object ID {:#x} at line {} ({})",
                                object.id, num, name
                            );
                        }

                        match &current_group {
                            Some(group) => {
                                document.insert_grouped_object(group, name, object);
                            }
                            None => document.insert_root_object(name, object),
                        }
                        ScanState::Scanning
                    }
                }
            };
        }

        match state {
            ScanState::Scanning => {}
            ScanState::CapturingJson { start_line, .. } => {
                return Err(Error::UnterminatedBlock { start_line });
            }
            ScanState::NamePending { start_line, .. } => {
                return Err(Error::MissingDeclaration {
                    start_line,
                    end_line: last_line,
                });
            }
        }

        document.normalize(self.config.unit_default);
        debug!(
            "Extraction complete: {} objects in {} top-level entries",
            document.object_count(),
            document.entries().count()
        );
        Ok(document)
    }

    /// Handles a group declaration line; returns the new group's name
    fn open_group(&self, document: &mut Document, text: &str, num: usize) -> Result<String> {
        let name = line::name_token(text)
            .ok_or_else(|| Error::group_declaration(num, text.trim()))?
            .to_string();
        trace!("Entering group '{}' at line {}", name, num);
        document.open_group(name.clone());
        Ok(name)
    }

    /// Builds a data object from its declaration line and accumulated JSON
    fn build_object(
        &self,
        text: &str,
        start_line: usize,
        end_line: usize,
        json: &str,
        symbols: &SymbolTable,
    ) -> Result<(String, DataObject)> {
        let name = line::name_token(text).ok_or_else(|| {
            Error::object_declaration(
                start_line,
                end_line,
                format!("missing name token in '{}'", text.trim()),
            )
        })?;
        let literal = line::id_literal(text).ok_or_else(|| {
            Error::object_declaration(
                start_line,
                end_line,
                format!("missing ID literal in '{}'", text.trim()),
            )
        })?;

        // Bare hex literals keep their source spelling as idx; symbols are
        // resolved through the table and rendered back as hex.
        let (id, idx) = match parse_hex(literal) {
            Some(id) => (id, literal.to_string()),
            None => {
                let id = symbols
                    .resolve(literal)
                    .ok_or_else(|| Error::unresolved_symbol(literal, start_line, end_line))?;
                (id, format!("{id:#x}"))
            }
        };

        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::json_block(start_line, end_line, e))?;
        let Value::Object(fields) = value else {
            return Err(Error::JsonBlockNotObject {
                start_line,
                end_line,
            });
        };

        trace!("Extracted object '{}' with ID {:#x}", name, id);
        Ok((name.to_string(), DataObject::new(id, idx, fields)))
    }
}

/// Extracts data objects from a source file with default configuration
///
/// This is a convenience function that reads the file and extracts from it.
pub fn extract_file(path: impl AsRef<Path>, symbols: &SymbolTable) -> Result<Document> {
    extract_file_with_config(path, symbols, ExtractorConfig::default())
}

/// Extracts data objects from a source file with custom configuration
pub fn extract_file_with_config(
    path: impl AsRef<Path>,
    symbols: &SymbolTable,
    config: ExtractorConfig,
) -> Result<Document> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    Extractor::with_config(config).extract(&source, symbols)
}

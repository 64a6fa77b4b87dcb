//! Symbolic-constant resolution for data-object IDs.
//!
//! Firmware headers assign every group and most objects a numeric ID through
//! macro-style definitions:
//!
//! ```c
//! #define ID_DEVICE   0x01
//! #define ID_BATTERY  0x02
//! ```
//!
//! This module scans such a header once and builds a read-only [`SymbolTable`]
//! mapping symbol name to numeric ID. Declarations in the source file may then
//! reference either a bare hex literal (`0x40`) or one of these symbols
//! (`ID_BATTERY`); the extractor resolves the latter through the table.
//!
//! Lines that do not match the `<marker> <name> <hex>` shape are skipped
//! silently. The scan is pure: include guards, function-like macros and
//! non-numeric aliases simply never enter the table.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Default definition marker recognized in header lines
pub const DEFAULT_DEFINE_MARKER: &str = "#define";

/// Read-only mapping from symbol name to numeric ID.
///
/// Built once per run from a header file, consulted by the extractor when an
/// object's ID literal is not a bare hex number.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<String, u32>,
}

impl SymbolTable {
    /// Creates an empty table (used when no header file is supplied)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table by scanning header text with the default `#define` marker
    pub fn parse(header: &str) -> Self {
        Self::parse_with_marker(header, DEFAULT_DEFINE_MARKER)
    }

    /// Builds a table by scanning header text for lines containing `marker`.
    ///
    /// Matching lines are split on whitespace; the second token is the symbol
    /// name and the third is parsed as a base-16 integer (with or without a
    /// `0x` prefix). Anything else is skipped without error.
    pub fn parse_with_marker(header: &str, marker: &str) -> Self {
        let mut entries = HashMap::new();

        for (num, line) in header.lines().enumerate() {
            if !line.contains(marker) {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let (Some(_), Some(name), Some(value)) =
                (tokens.next(), tokens.next(), tokens.next())
            else {
                continue;
            };

            let Some(id) = parse_hex(value) else {
                trace!("Skipping non-numeric definition at line {}: {}", num + 1, name);
                continue;
            };

            trace!("Resolved symbol {} -> {:#x}", name, id);
            entries.insert(name.to_string(), id);
        }

        debug!("Symbol table built: {} entries", entries.len());
        Self { entries }
    }

    /// Reads a header file and builds a table from it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let header = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Ok(Self::parse(&header))
    }

    /// Looks up a symbol, returning its numeric ID if defined.
    ///
    /// A miss is not an error here; the caller decides whether an unresolved
    /// symbol is fatal.
    pub fn resolve(&self, symbol: &str) -> Option<u32> {
        self.entries.get(symbol).copied()
    }

    /// Number of symbols in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no symbols
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a base-16 integer token, accepting an optional `0x`/`0X` prefix
pub(crate) fn parse_hex(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).ok()
}

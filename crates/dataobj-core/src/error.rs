//! Error types for the dataobj-core library.
//!
//! This module provides comprehensive error handling using the `thiserror` crate,
//! with detailed error variants for different failure modes.
//!
//! Extraction errors carry the 1-based line range of the annotation block that
//! was being processed, so a failed build step points straight at the offending
//! lines in the firmware source.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dataobj operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all dataobj operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The text accumulated between `/*{` and `}*/` is not valid JSON
    #[error("invalid JSON in metadata block between lines {start_line} and {end_line}: {source}")]
    JsonBlock {
        /// Line of the opening `/*{` marker
        start_line: usize,
        /// Line being processed when the block was parsed
        end_line: usize,
        /// Underlying JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// The metadata block parsed as JSON but not as a JSON object
    #[error("metadata block between lines {start_line} and {end_line} is not a JSON object")]
    JsonBlockNotObject {
        /// Line of the opening `/*{` marker
        start_line: usize,
        /// Line being processed when the block was parsed
        end_line: usize,
    },

    /// An ID literal is neither a hex number nor a known symbol
    #[error(
        "unresolved symbol '{symbol}' in declaration between lines {start_line} and {end_line}"
    )]
    UnresolvedSymbol {
        /// The symbol that was not found in the identifier table
        symbol: String,
        /// Line of the opening `/*{` marker
        start_line: usize,
        /// Line of the declaration that referenced the symbol
        end_line: usize,
    },

    /// A group declaration line could not be parsed
    #[error("malformed group declaration at line {line}: '{text}'")]
    GroupDeclaration {
        /// Line number of the group declaration
        line: usize,
        /// The offending line text
        text: String,
    },

    /// An object declaration line could not be parsed
    #[error("malformed object declaration between lines {start_line} and {end_line}: {reason}")]
    ObjectDeclaration {
        /// Line of the opening `/*{` marker
        start_line: usize,
        /// Line of the declaration
        end_line: usize,
        /// What was missing or malformed
        reason: String,
    },

    /// Input ended while still inside a `/*{ ... }*/` block
    #[error("unterminated metadata block starting at line {start_line}")]
    UnterminatedBlock {
        /// Line of the opening `/*{` marker
        start_line: usize,
    },

    /// A closed metadata block was never followed by an object declaration
    #[error("metadata block between lines {start_line} and {end_line} has no object declaration")]
    MissingDeclaration {
        /// Line of the opening `/*{` marker
        start_line: usize,
        /// Last line of the input
        end_line: usize,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JSON block error
    pub fn json_block(start_line: usize, end_line: usize, source: serde_json::Error) -> Self {
        Self::JsonBlock {
            start_line,
            end_line,
            source,
        }
    }

    /// Creates a new unresolved symbol error
    pub fn unresolved_symbol(
        symbol: impl Into<String>,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self::UnresolvedSymbol {
            symbol: symbol.into(),
            start_line,
            end_line,
        }
    }

    /// Creates a new group declaration error
    pub fn group_declaration(line: usize, text: impl Into<String>) -> Self {
        Self::GroupDeclaration {
            line,
            text: text.into(),
        }
    }

    /// Creates a new object declaration error
    pub fn object_declaration(
        start_line: usize,
        end_line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::ObjectDeclaration {
            start_line,
            end_line,
            reason: reason.into(),
        }
    }

    /// Returns the 1-based line range of source text this error refers to,
    /// if the error is tied to a location in the input.
    pub fn line_span(&self) -> Option<RangeInclusive<usize>> {
        match self {
            Self::JsonBlock {
                start_line,
                end_line,
                ..
            }
            | Self::JsonBlockNotObject {
                start_line,
                end_line,
            }
            | Self::UnresolvedSymbol {
                start_line,
                end_line,
                ..
            }
            | Self::ObjectDeclaration {
                start_line,
                end_line,
                ..
            }
            | Self::MissingDeclaration {
                start_line,
                end_line,
            } => Some(*start_line..=*end_line),
            Self::GroupDeclaration { line, .. } => Some(*line..=*line),
            Self::UnterminatedBlock { start_line } => Some(*start_line..=*start_line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unresolved_symbol("ID_MISSING", 12, 18);
        assert!(err.to_string().contains("ID_MISSING"));
        assert!(err.to_string().contains("lines 12 and 18"));
    }

    #[test]
    fn test_line_span() {
        let err = Error::json_block(
            3,
            7,
            serde_json::from_str::<serde_json::Value>("{,}").unwrap_err(),
        );
        assert_eq!(err.line_span(), Some(3..=7));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::file_read("/tmp/x", io).line_span(), None);
    }
}

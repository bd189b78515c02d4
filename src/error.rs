//! Error handling for fixwidth
//!
//! This module defines the error type shared by the layout model, the registry,
//! the importer and the table sink. Each variant carries enough context (layout,
//! field, row, line) for a user to fix either the layout definition or the
//! source file.
//!
//! The module uses thiserror to minimize boilerplate code and create
//! a consistent error handling approach throughout the codebase.

use thiserror::Error;

use crate::layout::DataType;

/// FixwidthError represents all possible errors that can occur in fixwidth
///
/// Three of the variants are data-correctness failures surfaced by an import:
/// - `LayoutNotFound` is raised before the source is touched
/// - `Decode` is raised on the first line that is not valid in the declared encoding
/// - `Coercion` is raised for a slice that cannot be converted to its field's type
///
/// None of them are retried internally.
#[derive(Error, Debug)]
pub enum FixwidthError {
    /// Error during file system operations (reading layout or data files)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while writing delimited output
    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error while reading or writing a JSON layout file
    #[error("JSON layout error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error while reading a TOML layout file
    #[error("TOML layout error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Error when a layout name was never registered
    #[error("Layout '{0}' not found")]
    LayoutNotFound(String),

    /// Error for a layout or field definition that fails validation
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Error for an encoding label that encoding_rs does not know
    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),

    /// Error when source bytes are not valid in the declared encoding
    #[error("Cannot decode line {line} as {encoding} (layout '{layout}')")]
    Decode {
        layout: String,
        /// Canonical name of the declared encoding
        encoding: String,
        /// 1-based physical line number, header lines included
        line: usize,
    },

    /// Error when a field's raw text cannot be converted to its declared type
    #[error(
        "Cannot convert {raw:?} to {dtype} for field '{field}' at row {row} (layout '{layout}')"
    )]
    Coercion {
        layout: String,
        field: String,
        /// 0-based data row index, header lines excluded
        row: usize,
        raw: String,
        dtype: DataType,
    },

    /// Error when a referenced table doesn't exist in a sink
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Error for a row whose width doesn't match its table
    #[error("Row has {actual} columns, but table '{table}' has {expected} columns")]
    RowWidth {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Error for invalid [table=]file specifications
    #[error("Invalid file specification: {0}")]
    InvalidFileSpec(String),
}

/// Result type alias for operations that can produce a FixwidthError
pub type FixwidthResult<T> = std::result::Result<T, FixwidthError>;

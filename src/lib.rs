//! fixwidth library crate
//!
//! Converts fixed-width (column-offset) flat files into typed in-memory tables
//! using reusable, named layout definitions. The library provides:
//!
//! - Validated layout and field definitions with a closed set of data types
//! - A layout registry that can be filled from code or from JSON/TOML files
//! - Strict, incremental decoding in any encoding_rs encoding
//! - An importer that slices lines by character offsets and coerces each field
//! - A table sink interface with an in-memory create-or-replace implementation
//!
//! ```
//! use fixwidth::importer::FixedWidthImporter;
//! use fixwidth::layout::{DataType, FieldDefinition, LayoutDefinition};
//! use fixwidth::table::Value;
//!
//! # fn main() -> fixwidth::error::FixwidthResult<()> {
//! let layout = LayoutDefinition::new(vec![
//!     FieldDefinition::new("id", 0, 5, DataType::Int)?,
//!     FieldDefinition::new("name", 5, 10, DataType::Str)?,
//!     FieldDefinition::new("value", 15, 8, DataType::Float)?,
//! ])?;
//!
//! let mut importer = FixedWidthImporter::new();
//! importer.register_layout("people", layout);
//!
//! let data = "00001John      123.45\n";
//! let table = importer.import_reader(data.as_bytes(), "people", None)?;
//! assert_eq!(table.rows()[0][0], Value::Integer(1));
//! assert_eq!(table.rows()[0][1], Value::from("John      "));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod importer;
pub mod layout;
pub mod logging;
pub mod registry;
pub mod source;
pub mod table;

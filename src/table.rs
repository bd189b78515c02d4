//! Table module for fixwidth
//!
//! This module provides the in-memory table an import produces:
//!
//! - Typed cell values coerced from fixed-width slices
//! - Row-major storage with a column name to index mapping
//! - Delimited output for printing imported tables

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{FixwidthError, FixwidthResult};

/// Represents a value in a table cell
///
/// Each non-null variant is produced by one layout data type. `Null` marks a
/// missing value: a blank numeric slice, or a cell replaced after a coercion
/// failure in null-fill mode.
#[derive(Debug, Clone)]
pub enum Value {
    /// Represents a NULL or missing value
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string, padding preserved
    String(String),
    /// Boolean value (true/false)
    Boolean(bool),
}

impl Value {
    /// Whether this is the missing value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload as `f64`, integers included
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Implementation of equality comparison for Value
///
/// Integers and floats compare numerically with each other. Other type
/// combinations are considered not equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) => *a as f64 == *b,
            (Value::Float(a), Value::Integer(b)) => *a == *b as f64,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(float) => write!(f, "{}", float),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Represents a row in a table
pub type Row = Vec<Value>;

/// Represents an in-memory table
#[derive(Debug, Clone)]
pub struct Table {
    /// Name of the table
    name: String,

    /// Column names
    columns: Vec<String>,

    /// Map of column names to their indices
    column_map: HashMap<String, usize>,

    /// Rows of data
    rows: Vec<Row>,

    /// Source file path, if the importer opened the file itself
    source_file: Option<PathBuf>,
}

impl Table {
    /// Create a new table with the given name and columns
    pub fn new(name: &str, columns: Vec<String>, source_file: Option<PathBuf>) -> Self {
        let column_map = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Table {
            name: name.to_string(),
            columns,
            column_map,
            rows: Vec::new(),
            source_file,
        }
    }

    /// Get the columns of the table
    ///
    /// Column names keep the order they were created with, which for an
    /// imported table is the layout's field order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the column count
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the rows of the table
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the name of the table
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the table, e.g. when handing it to a sink under another name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the row count
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Add a row to the table
    ///
    /// # Arguments
    /// * `row` - Vector of values to add as a new row
    ///
    /// # Returns
    /// * `Ok(())` if the row was successfully added
    /// * `Err` if the row doesn't match the table schema
    pub fn add_row(&mut self, row: Row) -> FixwidthResult<()> {
        if row.len() != self.columns.len() {
            return Err(FixwidthError::RowWidth {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    /// Get the source file path
    ///
    /// # Returns
    /// * `Some(PathBuf)` when the table was imported from a path
    /// * `None` when it was imported from a caller-supplied reader
    pub fn source_file(&self) -> Option<&PathBuf> {
        self.source_file.as_ref()
    }

    /// Get the index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_map.get(name).copied()
    }

    /// Get the values of one column, top to bottom
    ///
    /// # Returns
    /// * `Some(Vec<&Value>)` if the column exists
    /// * `None` if no column with that name exists
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Write the table as CSV with a header line
    ///
    /// `Null` cells are written as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> FixwidthResult<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

        csv_writer.write_record(&self.columns)?;

        for row in &self.rows {
            let record: Vec<String> = row
                .iter()
                .map(|value| match value {
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Print the table to stdout in comma-delimited format
    pub fn print_to_stdout(&self) -> FixwidthResult<()> {
        let stdout = std::io::stdout();
        self.write_csv(stdout.lock())
    }
}

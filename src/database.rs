//! Table sink module for fixwidth
//!
//! Imported tables are usually handed on to a storage or query engine. This
//! module defines the `TableSink` interface for that hand-off and `Database`,
//! an in-memory sink that owns tables by name.
//!
//! Creating a table always replaces any table of the same name: the old table
//! is dropped first and nothing is merged.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{FixwidthError, FixwidthResult};
use crate::table::Table;

/// Summary of a table held by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: usize,
}

impl TableInfo {
    fn of(name: &str, table: &Table) -> Self {
        TableInfo {
            name: name.to_string(),
            columns: table.columns().to_vec(),
            row_count: table.row_count(),
        }
    }
}

/// Destination for imported tables
///
/// Implementors create or replace a named relation from a table.
pub trait TableSink {
    /// Drop any relation called `name`, then create it from `table`
    ///
    /// # Returns
    /// * `FixwidthResult<TableInfo>` - Name, columns and row count of the new relation
    fn create_table(&mut self, name: &str, table: Table) -> FixwidthResult<TableInfo>;
}

/// In-memory sink that owns all tables by name
#[derive(Debug, Default)]
pub struct Database {
    /// Collection of tables by name
    tables: HashMap<String, Table>,
}

impl Database {
    /// Create a new empty database
    pub fn new() -> Self {
        Database {
            tables: HashMap::new(),
        }
    }

    /// Get a reference to a table
    ///
    /// # Returns
    /// * `Ok(&Table)` if the table exists
    /// * `Err(TableNotFound)` if the table doesn't exist
    pub fn get_table(&self, name: &str) -> FixwidthResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| FixwidthError::TableNotFound(name.to_string()))
    }

    /// Describe a table
    pub fn table_info(&self, name: &str) -> FixwidthResult<TableInfo> {
        Ok(TableInfo::of(name, self.get_table(name)?))
    }

    /// Check if a table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Remove a table from the database
    ///
    /// # Returns
    /// * `Ok(Table)` - The removed table
    /// * `Err(TableNotFound)` if the table doesn't exist
    pub fn drop_table(&mut self, name: &str) -> FixwidthResult<Table> {
        self.tables
            .remove(name)
            .ok_or_else(|| FixwidthError::TableNotFound(name.to_string()))
    }

    /// Names of all tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get number of tables in the database
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl TableSink for Database {
    fn create_table(&mut self, name: &str, mut table: Table) -> FixwidthResult<TableInfo> {
        if self.tables.remove(name).is_some() {
            debug!(table = name, "dropped existing table");
        }

        table.set_name(name);
        let info = TableInfo::of(name, &table);
        self.tables.insert(name.to_string(), table);
        debug!(table = name, rows = info.row_count, "created table");
        Ok(info)
    }
}

fn invalid_chars() -> &'static Regex {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    INVALID.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"))
}

/// Derive a table name from a file name
///
/// The extension is dropped, every character outside `[A-Za-z0-9_]` becomes
/// `_`, a `table_` prefix is added unless the name starts with a letter, and
/// the result is lowercased.
pub fn sanitize_table_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = invalid_chars().replace_all(&stem, "_").into_owned();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.insert_str(0, "table_");
    }
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn table(rows: usize) -> Table {
        let mut table = Table::new("t", vec!["n".to_string()], None);
        for i in 0..rows {
            table.add_row(vec![Value::Integer(i as i64)]).unwrap();
        }
        table
    }

    #[test]
    fn test_create_replaces_existing() {
        let mut db = Database::new();
        db.create_table("numbers", table(3)).unwrap();
        let info = db.create_table("numbers", table(1)).unwrap();

        assert_eq!(info.row_count, 1);
        assert_eq!(db.table_count(), 1);
        assert_eq!(db.get_table("numbers").unwrap().row_count(), 1);
        assert_eq!(db.get_table("numbers").unwrap().name(), "numbers");
    }

    #[test]
    fn test_table_info_and_drop() {
        let mut db = Database::new();
        db.create_table("b", table(2)).unwrap();
        db.create_table("a", table(0)).unwrap();
        assert_eq!(db.table_names(), vec!["a", "b"]);

        let info = db.table_info("b").unwrap();
        assert_eq!(info.columns, vec!["n"]);
        assert_eq!(info.row_count, 2);

        db.drop_table("b").unwrap();
        assert!(!db.has_table("b"));
        assert!(matches!(
            db.table_info("b"),
            Err(FixwidthError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_sanitize_table_name() {
        assert_eq!(sanitize_table_name("Sales Report-2024.txt"), "sales_report_2024");
        assert_eq!(sanitize_table_name("2024_data.dat"), "table_2024_data");
        assert_eq!(sanitize_table_name("data/accounts.fw"), "accounts");
        assert_eq!(sanitize_table_name("_hidden.txt"), "table__hidden");
    }
}

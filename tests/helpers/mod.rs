//! Test helpers for fixwidth integration tests
//!
//! Fixture files, layouts and a fixed-width renderer shared by the test
//! targets in this directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fixwidth::layout::{DataType, FieldDefinition, LayoutDefinition};
use tempfile::TempDir;

/// Create a temporary directory that is removed when dropped
pub fn create_temp_dir() -> Result<TempDir, Box<dyn std::error::Error>> {
    Ok(TempDir::new()?)
}

/// Write `contents` to `dir/name` and return the path
pub fn write_file(
    dir: &Path,
    name: &str,
    contents: &[u8],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Path of a checked-in fixture under tests/data
pub fn data_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// `{id:[0,5)->int, name:[5,15)->str, value:[15,23)->float}`
pub fn people_layout() -> LayoutDefinition {
    people_layout_with(0)
}

pub fn people_layout_with(skip_rows: usize) -> LayoutDefinition {
    LayoutDefinition::with_options(
        vec![
            FieldDefinition::new("id", 0, 5, DataType::Int).unwrap(),
            FieldDefinition::new("name", 5, 10, DataType::Str).unwrap(),
            FieldDefinition::new("value", 15, 8, DataType::Float).unwrap(),
        ],
        "utf-8",
        skip_rows,
    )
    .unwrap()
}

pub const PEOPLE: &str = "00001John      123.45\n\
                          00002Alice     234.56\n\
                          00003Bob       345.67\n";

/// Render rows of raw field text as fixed-width lines
///
/// Each value is right-padded with spaces (or cut) to its field's length and
/// written at its field's offset; gaps are filled with spaces.
pub fn render_fixed_width(layout: &LayoutDefinition, rows: &[Vec<String>]) -> String {
    let width = layout.record_width();
    let mut out = String::new();

    for row in rows {
        let mut line: Vec<char> = vec![' '; width];
        for (field, value) in layout.fields().iter().zip(row) {
            let padded = format!("{:<width$}", value, width = field.length());
            for (i, c) in padded.chars().take(field.length()).enumerate() {
                line[field.start() + i] = c;
            }
        }
        out.extend(line);
        out.push('\n');
    }

    out
}

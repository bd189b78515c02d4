//! CLI argument parsing module for fixwidth
//!
//! This module handles parsing command-line arguments using the clap crate.
//! It defines the command-line interface structure and behavior for the
//! application: which layout file to load, which layout to apply, which files
//! to import and how to treat values that fail to convert.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::database::sanitize_table_name;
use crate::error::{FixwidthError, FixwidthResult};

/// Command-line arguments for fixwidth
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Import fixed-width text files using named layouts and print them as CSV"
)]
pub struct FixwidthArgs {
    /// Layout file to load (.json or .toml)
    ///
    /// The file maps layout names to layouts. Every layout in it is validated
    /// before anything is imported.
    #[clap(short = 'L', long, help = "Layout file (.json or .toml)")]
    pub layouts: PathBuf,

    /// Name of the layout to apply to every input file
    #[clap(
        short,
        long,
        required_unless_present = "list",
        help = "Name of the layout to apply"
    )]
    pub layout: Option<String>,

    /// Input files to import - format: [table_name=]file_path
    ///
    /// If no table name is given it is derived from the file name: extension
    /// dropped, other characters replaced by underscores, lowercased.
    /// Example: txns=data/TRANSACTIONS.TXT or just data/accounts.dat
    #[clap(
        required_unless_present = "list",
        help = "Input files to import as [table_name=]file_path"
    )]
    pub files: Vec<String>,

    /// Read at most this many data rows from each file
    #[clap(short = 'n', long, help = "Maximum data rows per file")]
    pub max_rows: Option<usize>,

    /// Replace values that fail to convert with empty cells instead of failing
    ///
    /// Each replaced value is reported as a warning with its row and field.
    #[clap(long, help = "Store NULL for values that fail to convert")]
    pub null_on_error: bool,

    /// Ignore data lines that are empty
    #[clap(long, help = "Ignore empty data lines")]
    pub skip_blank_lines: bool,

    /// Print the names of the layouts in the layout file and exit
    #[clap(long, help = "List layout names and exit")]
    pub list: bool,

    /// Enable verbose diagnostic output
    ///
    /// Raises the log level to debug. RUST_LOG overrides it.
    #[clap(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Parse command-line arguments into the FixwidthArgs structure
pub fn parse_args() -> Result<FixwidthArgs> {
    Ok(FixwidthArgs::parse())
}

/// Split a file specification into table name and file path
///
/// Handles two formats:
/// 1. `table_name=file_path` - Explicit table name and file path
/// 2. `file_path` - Table name derived from the file name
///
/// # Returns
/// * `Ok((String, PathBuf))` - Tuple of (table_name, file_path)
/// * `Err(InvalidFileSpec)` - For an empty table name or a path without a file name
pub fn parse_file_spec(file_spec: &str) -> FixwidthResult<(String, PathBuf)> {
    if let Some((table_name, file_path)) = file_spec.split_once('=') {
        if table_name.is_empty() || file_path.is_empty() {
            return Err(FixwidthError::InvalidFileSpec(file_spec.to_string()));
        }
        Ok((table_name.to_string(), PathBuf::from(file_path)))
    } else {
        let path = PathBuf::from(file_spec);
        let file_name = path
            .file_name()
            .ok_or_else(|| FixwidthError::InvalidFileSpec(file_spec.to_string()))?
            .to_string_lossy()
            .into_owned();

        Ok((sanitize_table_name(&file_name), path))
    }
}

/// Split every file specification, rejecting two that name the same table
///
/// Storing a table replaces any table of the same name, so a repeated name
/// would silently lose the earlier file's rows.
pub fn parse_file_specs(file_specs: &[String]) -> FixwidthResult<Vec<(String, PathBuf)>> {
    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(file_specs.len());

    for file_spec in file_specs {
        let (table_name, path) = parse_file_spec(file_spec)?;
        if !seen.insert(table_name.clone()) {
            return Err(FixwidthError::InvalidFileSpec(format!(
                "{file_spec}: table '{table_name}' is already used by another file"
            )));
        }
        parsed.push((table_name, path));
    }

    Ok(parsed)
}

//! fixwidth - import fixed-width text files with named layouts
//!
//! Loads a layout file, imports each input file with the chosen layout into an
//! in-memory database and prints every imported table to stdout as CSV.
//!
//! # Program Flow
//!
//! 1. Parse command-line arguments and set up logging
//! 2. Load the layout file into a registry
//! 3. Import each input file into a table and store it in the database
//! 4. Print the tables to stdout in input order

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use fixwidth::cli;
use fixwidth::config::AppConfig;
use fixwidth::database::{Database, TableSink};
use fixwidth::importer::FixedWidthImporter;
use fixwidth::logging;
use fixwidth::registry::LayoutRegistry;

fn main() -> Result<()> {
    let args = cli::parse_args()?;
    let config = AppConfig::from_args(&args);
    logging::init(config.verbose());
    debug!("Arguments: {args:?}");

    let mut registry = LayoutRegistry::new();
    let loaded = registry.load_file(config.layout_file()).with_context(|| {
        format!(
            "Failed to load layout file: {}",
            config.layout_file().display()
        )
    })?;
    info!("Loaded {loaded} layouts from {}", config.layout_file().display());

    if args.list {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let layout_name = config
        .layout_name()
        .ok_or_else(|| anyhow!("No layout selected: use --layout"))?;

    let file_specs = cli::parse_file_specs(&args.files)?;

    let importer = FixedWidthImporter::with_registry(registry);
    let mut database = Database::new();
    let mut imported = Vec::with_capacity(file_specs.len());

    for (table_name, path) in file_specs {
        let report = importer
            .import_file_with(&path, layout_name, config.import_options())
            .with_context(|| format!("Failed to import file: {}", path.display()))?;

        if !report.is_clean() {
            warn!(
                "{} values in '{}' could not be converted and were left empty",
                report.diagnostics.len(),
                path.display()
            );
        }

        let table_info = database
            .create_table(&table_name, report.into_table())
            .with_context(|| format!("Failed to store table: {table_name}"))?;
        info!(
            "Table '{}' created: {} rows x {} columns",
            table_info.name,
            table_info.row_count,
            table_info.columns.len()
        );
        imported.push(table_name);
    }

    for (i, table_name) in imported.iter().enumerate() {
        if i > 0 {
            println!();
        }
        database
            .get_table(table_name)?
            .print_to_stdout()
            .with_context(|| format!("Failed to print table: {table_name}"))?;
    }

    Ok(())
}

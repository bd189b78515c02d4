//! Configuration module for fixwidth
//!
//! This module provides a centralized configuration structure for the binary.
//! It is built once from the parsed command line and passed to the parts of the
//! program that need it, rather than consulting global state.

use std::path::{Path, PathBuf};

use crate::cli::FixwidthArgs;
use crate::importer::{CoercionPolicy, ImportOptions};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Whether to show verbose output
    verbose: bool,

    /// Layout file to load into the registry
    layout_file: PathBuf,

    /// Layout applied to every input; absent only when listing layouts
    layout_name: Option<String>,

    /// Options passed to every import
    import_options: ImportOptions,
}

impl AppConfig {
    /// Create a new application configuration
    ///
    /// # Arguments
    /// * `verbose` - Whether to show verbose output
    /// * `layout_file` - Path of the JSON or TOML layout file
    /// * `layout_name` - Layout to apply to every input
    /// * `import_options` - Row cap, coercion policy and blank-line handling
    pub fn new(
        verbose: bool,
        layout_file: PathBuf,
        layout_name: Option<String>,
        import_options: ImportOptions,
    ) -> Self {
        Self {
            verbose,
            layout_file,
            layout_name,
            import_options,
        }
    }

    /// Build the configuration from parsed arguments
    pub fn from_args(args: &FixwidthArgs) -> Self {
        let policy = if args.null_on_error {
            CoercionPolicy::NullFill
        } else {
            CoercionPolicy::Abort
        };

        Self::new(
            args.verbose,
            args.layouts.clone(),
            args.layout.clone(),
            ImportOptions::new()
                .max_rows(args.max_rows)
                .on_error(policy)
                .skip_blank_lines(args.skip_blank_lines),
        )
    }

    /// Get the verbose flag
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Get the layout file path
    pub fn layout_file(&self) -> &Path {
        &self.layout_file
    }

    /// Get the layout name
    pub fn layout_name(&self) -> Option<&str> {
        self.layout_name.as_deref()
    }

    /// Get the import options
    pub fn import_options(&self) -> &ImportOptions {
        &self.import_options
    }
}

//! Layout registry for fixwidth
//!
//! This module provides the catalog of named layouts that the importer resolves
//! layout names against. A registry is an ordinary value owned by whoever needs
//! it, so several importers with different catalogs can coexist.
//!
//! Mutation takes `&mut self` and there is no internal locking; a registry
//! shared between threads must be wrapped in a lock by the caller.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{FixwidthError, FixwidthResult};
use crate::layout::LayoutDefinition;

/// Catalog of layouts by name
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: HashMap<String, LayoutDefinition>,
}

impl LayoutRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        LayoutRegistry {
            layouts: HashMap::new(),
        }
    }

    /// Store a layout under `name`
    ///
    /// An existing layout with the same name is replaced; last write wins.
    pub fn register_layout(&mut self, name: &str, layout: LayoutDefinition) {
        if self.layouts.insert(name.to_string(), layout).is_some() {
            debug!(layout = name, "replaced existing layout");
        } else {
            debug!(layout = name, "registered layout");
        }
    }

    /// Look up a layout by name
    ///
    /// # Returns
    /// * `Ok(&LayoutDefinition)` if the layout is registered
    /// * `Err(LayoutNotFound)` otherwise
    pub fn get(&self, name: &str) -> FixwidthResult<&LayoutDefinition> {
        self.layouts
            .get(name)
            .ok_or_else(|| FixwidthError::LayoutNotFound(name.to_string()))
    }

    /// Check if a layout is registered
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Remove a layout, returning it
    pub fn remove(&mut self, name: &str) -> FixwidthResult<LayoutDefinition> {
        self.layouts
            .remove(name)
            .ok_or_else(|| FixwidthError::LayoutNotFound(name.to_string()))
    }

    /// Registered layout names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.layouts.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Register every layout from a layout file
    ///
    /// The file's top level maps layout names to layouts. The format is chosen
    /// by extension: `.json` or `.toml`. Every layout is validated before any
    /// of them is registered, so a bad file leaves the registry untouched.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of layouts registered
    /// * `Err` - If the file can't be read, parsed or validated
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> FixwidthResult<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let layouts = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => parse_json(&text)?,
            Some("toml") => parse_toml(&text)?,
            _ => {
                return Err(FixwidthError::InvalidLayout(format!(
                    "unsupported layout file '{}': expected .json or .toml",
                    path.display()
                )))
            }
        };

        let count = layouts.len();
        for (name, layout) in layouts {
            self.register_layout(&name, layout);
        }
        debug!(path = %path.display(), count, "loaded layout file");
        Ok(count)
    }

    /// Register every layout from JSON text
    pub fn load_json_str(&mut self, text: &str) -> FixwidthResult<usize> {
        let layouts = parse_json(text)?;
        let count = layouts.len();
        for (name, layout) in layouts {
            self.register_layout(&name, layout);
        }
        Ok(count)
    }

    /// Render the registry as a JSON layout file, layouts sorted by name
    pub fn to_json(&self) -> FixwidthResult<String> {
        let sorted: BTreeMap<&String, &LayoutDefinition> = self.layouts.iter().collect();
        Ok(serde_json::to_string_pretty(&sorted)?)
    }
}

fn parse_json(text: &str) -> FixwidthResult<BTreeMap<String, LayoutDefinition>> {
    Ok(serde_json::from_str(text)?)
}

fn parse_toml(text: &str) -> FixwidthResult<BTreeMap<String, LayoutDefinition>> {
    Ok(toml::from_str(text)?)
}

use std::path::{Path, PathBuf};

use bookbot_core::catalog::Catalog;
use bookbot_core::config::{AppConfig, LoadOptions};

use crate::commands::{CommandResult, EXIT_CATALOG, EXIT_CONFIG};

/// Validates a catalog and prints its classifier and table summary.
///
/// With no explicit path the configured `catalog.path` is checked, falling
/// back to the embedded catalog.
pub fn run(path: Option<&Path>) -> CommandResult {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => match configured_path() {
            Ok(path) => path,
            Err(result) => return result,
        },
    };

    let source = path
        .as_deref()
        .map_or_else(|| "<embedded>".to_string(), |path| path.display().to_string());
    let catalog = match Catalog::load(path.as_deref()) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("catalog", "catalog_invalid", error.to_string(), EXIT_CATALOG);
        }
    };

    let summary = catalog.summary();
    let entries: usize = summary.tables.values().sum();
    let message = format!(
        "catalog {source} is valid: {} classifiers, {entries} entries",
        summary.classifiers.len()
    );

    CommandResult::success_with("catalog", message, serde_json::to_value(&summary).ok())
}

fn configured_path() -> Result<Option<PathBuf>, CommandResult> {
    AppConfig::load(LoadOptions::default()).map(|config| config.catalog.path).map_err(|error| {
        CommandResult::failure("catalog", "config_validation", error.to_string(), EXIT_CONFIG)
    })
}

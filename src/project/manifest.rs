//! Composer manifest editing.
//!
//! Rewrites composer.json with a PSR-4 autoload map derived from the
//! migrated tree. Unrelated keys are preserved in their original order.

use std::path::{Component, Path};

use indexmap::IndexSet;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::config::MigrationConfig;
use super::error::MigrationResult;
use super::file_io::{read_latin1, write_latin1};
use super::source_file::SourceFile;

/// Update `composer.json` under `base` with a PSR-4 autoload section.
/// A missing manifest is skipped, not an error.
pub fn update_manifest(
    base: &Path,
    files: &[SourceFile],
    config: &MigrationConfig,
) -> MigrationResult<()> {
    let manifest_path = base.join("composer.json");
    if !manifest_path.is_file() {
        debug!("no composer.json found, skipping manifest update");
        return Ok(());
    }

    let contents = read_latin1(&manifest_path)?;
    let mut composer: Map<String, Value> = serde_json::from_str(&contents)?;

    let mut psr4 = Map::new();
    for dir in top_level_dirs(files) {
        psr4.insert(
            format!("{}\\{dir}\\", config.root_namespace),
            Value::String(format!("{dir}/")),
        );
    }
    composer.insert("autoload".to_string(), json!({ "psr-4": psr4 }));
    composer.insert("require".to_string(), json!({ "php": ">=8.0" }));

    let rendered = serde_json::to_string_pretty(&composer)?;
    write_latin1(&manifest_path, &rendered)
}

fn top_level_dirs(files: &[SourceFile]) -> IndexSet<String> {
    files
        .iter()
        .filter_map(|file| match file.path.components().next() {
            Some(Component::Normal(first)) if file.path.components().count() > 1 => {
                Some(first.to_string_lossy().into_owned())
            }
            _ => None,
        })
        .collect()
}

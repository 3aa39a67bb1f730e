//! Source discovery.
//!
//! Walks the migration base path and collects every source file as a
//! [`SourceFile`], path relative to the base. The listing is sorted so the
//! symbol index sees files in a stable order regardless of filesystem
//! iteration order.

use std::path::Path;

use tracing::trace;
use walkdir::WalkDir;

use super::config::MigrationConfig;
use super::error::{MigrationError, MigrationResult};
use super::file_io::read_latin1;
use super::source_file::SourceFile;

/// Collect all source files under `base`, honoring the config's extension
/// and exclusion filters.
pub fn discover_sources(
    base: &Path,
    config: &MigrationConfig,
) -> MigrationResult<Vec<SourceFile>> {
    if !base.is_dir() {
        return Err(MigrationError::InvalidBasePath(base.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(base).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(base)
            .unwrap_or(entry.path())
            .to_path_buf();
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if config.is_excluded(&relative_str) {
            trace!(path = %relative_str, "excluded from discovery");
            continue;
        }
        let Some(ext) = relative.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !config.is_source_extension(ext) {
            continue;
        }
        let contents = read_latin1(entry.path())?;
        files.push(SourceFile::new(relative, contents));
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

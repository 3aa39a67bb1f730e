//! Canonical-casing renames.
//!
//! PSR-4 demands PascalCase directory and file names that match the declared
//! types. Folders are renamed top-down on disk before discovery; files are
//! renamed afterwards, with the matching declarations and call sites in every
//! file rewritten to the new name.

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::base::pascal_case;

use super::config::MigrationConfig;
use super::error::{MigrationError, MigrationResult};
use super::source_file::SourceFile;

/// Rename every directory under `base` to its PascalCase form, parents
/// before children.
pub fn rename_folders(base: &Path, config: &MigrationConfig) -> MigrationResult<()> {
    rename_folders_in(base, base, config)
}

fn rename_folders_in(base: &Path, dir: &Path, config: &MigrationConfig) -> MigrationResult<()> {
    // Materialize the listing first: renaming entries while the read_dir
    // iterator is live leaves sibling visibility unspecified on POSIX.
    let mut subdirs = Vec::new();
    let entries = fs::read_dir(dir).map_err(|source| MigrationError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| MigrationError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_dir() {
            subdirs.push(entry.path());
        }
    }

    for path in subdirs {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let relative = path
            .strip_prefix(base)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        if config.is_excluded(&relative) {
            continue;
        }
        let cased = pascal_case(&name);
        let target = if cased != name {
            let target = dir.join(&cased);
            debug!(from = %name, to = %cased, "renaming folder");
            fs::rename(&path, &target).map_err(|source| MigrationError::Rename {
                from: path.clone(),
                to: target.clone(),
                source,
            })?;
            target
        } else {
            path
        };
        rename_folders_in(base, &target, config)?;
    }
    Ok(())
}

/// Rename source files whose stem is not PascalCase, both on disk and in
/// the in-memory listing, and rewrite declarations and call sites of the
/// old name across every loaded file.
pub fn rename_files(base: &Path, files: &mut [SourceFile]) -> MigrationResult<()> {
    let mut substitutions: Vec<(Regex, String)> = Vec::new();

    for file in files.iter_mut() {
        let old_name = file.type_name.to_string();
        let new_name = pascal_case(&old_name);
        if new_name == old_name {
            continue;
        }

        let old_path = file.path.clone();
        let new_path = old_path.with_file_name(format!(
            "{new_name}.{}",
            old_path.extension().and_then(|e| e.to_str()).unwrap_or("")
        ));
        debug!(from = %old_path.display(), to = %new_path.display(), "renaming file");
        fs::rename(base.join(&old_path), base.join(&new_path)).map_err(|source| {
            MigrationError::Rename {
                from: base.join(&old_path),
                to: base.join(&new_path),
                source,
            }
        })?;
        file.set_path(new_path);

        let escaped = regex::escape(&old_name);
        substitutions.extend(rename_rules(&escaped, &new_name));
    }

    for file in files.iter_mut() {
        for (search, replace) in &substitutions {
            file.contents = search.replace_all(&file.contents, replace.as_str()).into_owned();
        }
    }
    Ok(())
}

fn rename_rules(escaped_old: &str, new_name: &str) -> Vec<(Regex, String)> {
    [
        (
            format!(r"(class)(\s+)({escaped_old})\b"),
            format!("${{1}} {new_name}"),
        ),
        (
            format!(r"(extends|implements)(\s+)({escaped_old})\b"),
            format!("${{1}} {new_name}"),
        ),
        (
            format!(r"new(\s+)({escaped_old})(\s*)(\((.*)?\))?(\s*);"),
            format!("new {new_name}${{4}};"),
        ),
        (
            format!(r"({escaped_old})(\s*)::(\s*)"),
            format!("{new_name}::"),
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, replace)| Regex::new(&pattern).ok().map(|re| (re, replace)))
    .collect()
}

/// Apply the configured global unqualification: `\Name` becomes `Name`, so
/// the generated `use` declarations take over resolution.
pub fn general_replaces(files: &mut [SourceFile], config: &MigrationConfig) {
    for file in files.iter_mut() {
        for name in &config.unqualify_globals {
            let qualified = format!("\\{name}");
            if file.contents.contains(&qualified) {
                file.contents = file.contents.replace(&qualified, name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rename_folders_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("core/db_layer")).unwrap();
        rename_folders(dir.path(), &MigrationConfig::default()).unwrap();
        assert!(dir.path().join("Core/DbLayer").is_dir());
    }

    #[test]
    fn test_rename_folders_every_sibling_renamed() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["api_v1", "db_layer", "front_end", "old_admin", "view_parts"] {
            std::fs::create_dir_all(dir.path().join(name).join("sub_dir")).unwrap();
        }
        rename_folders(dir.path(), &MigrationConfig::default()).unwrap();
        for name in ["ApiV1", "DbLayer", "FrontEnd", "OldAdmin", "ViewParts"] {
            assert!(
                dir.path().join(name).join("SubDir").is_dir(),
                "{name}/SubDir missing after rename"
            );
        }
    }

    #[test]
    fn test_rename_files_rewrites_declarations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("db_adapter.php"),
            "<?php class db_adapter {}",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("Service.php"),
            "<?php class Service extends db_adapter { function f() { db_adapter::connect(); } }",
        )
        .unwrap();

        let mut files = vec![
            SourceFile::new(
                PathBuf::from("db_adapter.php"),
                "<?php class db_adapter {}".to_string(),
            ),
            SourceFile::new(
                PathBuf::from("Service.php"),
                "<?php class Service extends db_adapter { function f() { db_adapter::connect(); } }"
                    .to_string(),
            ),
        ];
        rename_files(dir.path(), &mut files).unwrap();

        assert!(dir.path().join("DbAdapter.php").is_file());
        assert_eq!(files[0].type_name, "DbAdapter");
        assert!(files[0].contents.contains("class DbAdapter"));
        assert!(files[1].contents.contains("extends DbAdapter"));
        assert!(files[1].contents.contains("DbAdapter::connect"));
    }

    #[test]
    fn test_general_replaces_unqualifies_globals() {
        let mut files = vec![SourceFile::new(
            PathBuf::from("A.php"),
            "<?php throw new \\Exception('x');".to_string(),
        )];
        general_replaces(&mut files, &MigrationConfig::default());
        assert_eq!(files[0].contents, "<?php throw new Exception('x');");
    }
}

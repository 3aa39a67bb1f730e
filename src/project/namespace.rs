//! Namespace assignment.
//!
//! After the rename phase every path component is PascalCase, so the
//! namespace is simply the root prefix plus one segment per directory
//! component of the file's relative path.

use super::config::MigrationConfig;
use super::source_file::SourceFile;

/// Assign a namespace to every file from its directory path.
pub fn assign_namespaces(files: &mut [SourceFile], config: &MigrationConfig) {
    for file in files.iter_mut() {
        let mut namespace = config.root_namespace.clone();
        if let Some(dir) = file.path.parent() {
            for component in dir.components() {
                let segment = component.as_os_str().to_string_lossy();
                if segment.is_empty() || segment == "." {
                    continue;
                }
                namespace.push('\\');
                namespace.push_str(&segment);
            }
        }
        file.namespace = namespace;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_namespace_follows_directories() {
        let mut files = vec![SourceFile::new(
            PathBuf::from("Core/Db/Adapter.php"),
            String::new(),
        )];
        assign_namespaces(&mut files, &MigrationConfig::with_root_namespace("Shop"));
        assert_eq!(files[0].namespace, "Shop\\Core\\Db");
        assert_eq!(files[0].fully_qualified_name(), "Shop\\Core\\Db\\Adapter");
    }

    #[test]
    fn test_top_level_file_gets_root_namespace() {
        let mut files = vec![SourceFile::new(PathBuf::from("Kernel.php"), String::new())];
        assign_namespaces(&mut files, &MigrationConfig::default());
        assert_eq!(files[0].namespace, "App");
    }
}

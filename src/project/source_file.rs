//! Source file records: one translatable unit of the migration.

use std::path::{Path, PathBuf};

use smol_str::SmolStr;

/// One source file moving through the pipeline.
///
/// Created at discovery; `namespace` is assigned after renaming;
/// `import_set` is populated exactly once by the semantic core and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Location relative to the migration base path. Changes under rename.
    pub path: PathBuf,
    /// Bare name the file's primary declared type is expected to have,
    /// derived from the file stem. Tracks `path` across renames.
    pub type_name: SmolStr,
    /// Assigned namespace, one segment per directory component.
    pub namespace: String,
    /// Raw text, mutated by substitution passes.
    pub contents: String,
    /// Fully-qualified names to declare as imports; computed by the
    /// semantic core, empty before resolution.
    pub import_set: Vec<String>,
}

impl SourceFile {
    pub fn new(path: PathBuf, contents: String) -> Self {
        let type_name = type_name_of(&path);
        Self {
            path,
            type_name,
            namespace: String::new(),
            contents,
            import_set: Vec::new(),
        }
    }

    /// The file's own fully-qualified name (`namespace \ type_name`).
    pub fn fully_qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.type_name.to_string()
        } else {
            format!("{}\\{}", self.namespace, self.type_name)
        }
    }

    /// Update the path after a rename, keeping `type_name` in sync.
    pub fn set_path(&mut self, path: PathBuf) {
        self.type_name = type_name_of(&path);
        self.path = path;
    }

    /// `.php` files get a namespace declaration; templates do not.
    pub fn is_template(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("phtml"))
    }
}

fn type_name_of(path: &Path) -> SmolStr {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(SmolStr::new)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_from_stem() {
        let file = SourceFile::new(PathBuf::from("Core/Db/Adapter.php"), String::new());
        assert_eq!(file.type_name, "Adapter");
        assert!(!file.is_template());
    }

    #[test]
    fn test_fully_qualified_name() {
        let mut file = SourceFile::new(PathBuf::from("Core/Db/Adapter.php"), String::new());
        file.namespace = "App\\Core\\Db".to_string();
        assert_eq!(file.fully_qualified_name(), "App\\Core\\Db\\Adapter");
    }

    #[test]
    fn test_set_path_updates_type_name() {
        let mut file = SourceFile::new(PathBuf::from("core/db_adapter.php"), String::new());
        assert_eq!(file.type_name, "db_adapter");
        file.set_path(PathBuf::from("core/DbAdapter.php"));
        assert_eq!(file.type_name, "DbAdapter");
    }
}

//! Migration orchestrator.
//!
//! Runs the phases in a fixed order. The symbol index is built only after
//! every rename and namespace assignment has settled, so each file's
//! fully-qualified name is final before any lookup happens. Per-file
//! extraction and resolution are independent once the index exists and run
//! in parallel.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::parser::parse_php;
use crate::semantic::{Resolver, SymbolIndex, build_import_set, extract_references};
use crate::syntax::declared_type_names;

use super::config::MigrationConfig;
use super::discovery::discover_sources;
use super::error::MigrationResult;
use super::manifest::update_manifest;
use super::namespace::assign_namespaces;
use super::persist::persist_files;
use super::rename::{general_replaces, rename_files, rename_folders};
use super::source_file::SourceFile;

/// One migration run over a legacy tree.
pub struct Migration {
    base: PathBuf,
    config: MigrationConfig,
    files: Vec<SourceFile>,
}

/// Summary of a completed run, serializable for tooling that wraps the
/// library.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MigrationReport {
    /// Files discovered and rewritten.
    pub files_migrated: usize,
    /// Total `use` declarations generated across all files.
    pub imports_generated: usize,
    /// Files whose parse recovered from at least one syntax error.
    pub files_with_parse_errors: usize,
}

impl Migration {
    pub fn new(base: impl Into<PathBuf>, config: MigrationConfig) -> Self {
        Self {
            base: base.into(),
            config,
            files: Vec::new(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Run the full pipeline and persist the migrated tree.
    pub fn run(&mut self) -> MigrationResult<MigrationReport> {
        debug!(base = %self.base.display(), "renaming folders");
        rename_folders(&self.base, &self.config)?;

        debug!("discovering sources");
        self.files = discover_sources(&self.base, &self.config)?;
        debug!(count = self.files.len(), "sources loaded");

        debug!("renaming files");
        rename_files(&self.base, &mut self.files)?;

        debug!("applying general replaces");
        general_replaces(&mut self.files, &self.config);

        debug!("assigning namespaces");
        assign_namespaces(&mut self.files, &self.config);

        debug!("generating imports");
        let report = self.generate_imports();

        if self.config.update_manifest {
            debug!("updating composer manifest");
            update_manifest(&self.base, &self.files, &self.config)?;
        }

        debug!("persisting files");
        persist_files(&self.base, &self.files)?;

        Ok(report)
    }

    /// Build the symbol index, then resolve each file's imports in parallel.
    ///
    /// This phase is a barrier: the index snapshots every file's final name
    /// and namespace, so no rename may happen after this point.
    fn generate_imports(&mut self) -> MigrationReport {
        let index = SymbolIndex::build(&self.files);
        debug!(symbols = index.len(), "symbol index built");
        let resolver = Resolver::new(&index);

        let parse_error_files: usize = self
            .files
            .par_iter_mut()
            .map(|file| {
                let parse = parse_php(&file.contents);
                if parse.has_errors() {
                    warn!(
                        path = %file.path.display(),
                        errors = parse.errors.len(),
                        "recovered from syntax errors"
                    );
                }
                let candidates = extract_references(&parse.root);
                let declared = declared_type_names(&parse.root);
                let resolved = resolver.resolve(&candidates, file, &declared);
                file.import_set = build_import_set(resolved);
                usize::from(parse.has_errors())
            })
            .sum();

        MigrationReport {
            files_migrated: self.files.len(),
            imports_generated: self.files.iter().map(|f| f.import_set.len()).sum(),
            files_with_parse_errors: parse_error_files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_imports_resolves_known_types() {
        let mut migration = Migration::new("unused", MigrationConfig::default());
        migration.files = vec![
            {
                let mut f = SourceFile::new(
                    PathBuf::from("Core/Base.php"),
                    "<?php class Base {}".to_string(),
                );
                f.namespace = "App\\Core".to_string();
                f
            },
            {
                let mut f = SourceFile::new(
                    PathBuf::from("Http/Service.php"),
                    "<?php class Service extends Base { function f() { return new Unknown(); } }"
                        .to_string(),
                );
                f.namespace = "App\\Http".to_string();
                f
            },
        ];

        let report = migration.generate_imports();
        assert_eq!(report.files_migrated, 2);
        assert_eq!(
            migration.files[1].import_set,
            vec!["App\\Core\\Base".to_string(), "Unknown".to_string()]
        );
        assert!(migration.files[0].import_set.is_empty());
    }

    #[test]
    fn test_existing_root_qualified_use_satisfies_reference() {
        let mut migration = Migration::new("unused", MigrationConfig::default());
        migration.files = vec![{
            let mut f = SourceFile::new(
                PathBuf::from("App/Job.php"),
                "<?php\nuse \\Vendor\\Queue;\nclass Job { function f(Queue $q) {} }".to_string(),
            );
            f.namespace = "App".to_string();
            f
        }];

        migration.generate_imports();
        // `Queue` is satisfied by the existing import, nothing new emitted
        assert!(migration.files[0].import_set.is_empty());
    }
}

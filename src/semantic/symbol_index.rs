//! Project-wide symbol index: bare type name → fully-qualified name.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::project::SourceFile;

/// Immutable snapshot mapping each bare type name to its fully-qualified
/// name.
///
/// Built strictly after every file has its final name and namespace; a
/// rename afterwards makes the snapshot stale and requires a rebuild (the
/// index is a value, never mutated in place). Duplicate bare names resolve
/// **first-registered-wins**, with registration order following the file
/// registry, so the winner is deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    entries: IndexMap<SmolStr, String>,
}

impl SymbolIndex {
    /// Build the index from the finalized file registry.
    pub fn build(files: &[SourceFile]) -> Self {
        let mut entries: IndexMap<SmolStr, String> = IndexMap::with_capacity(files.len());
        for file in files {
            if let Some(existing) = entries.get(&file.type_name) {
                debug!(
                    type_name = %file.type_name,
                    kept = %existing,
                    ignored = %file.fully_qualified_name(),
                    "duplicate bare type name in index, keeping first"
                );
                continue;
            }
            entries.insert(file.type_name.clone(), file.fully_qualified_name());
        }
        Self { entries }
    }

    /// Look up the fully-qualified name for a bare type name.
    pub fn lookup(&self, bare_name: &str) -> Option<&str> {
        self.entries.get(bare_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

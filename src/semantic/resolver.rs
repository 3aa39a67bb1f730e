//! Reference resolver: turns raw extracted candidates into the
//! fully-qualified names one file must import.

use indexmap::IndexSet;
use regex::Regex;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use super::extractor::TypeRef;
use super::symbol_index::SymbolIndex;
use crate::project::SourceFile;

/// Resolver borrows the immutable symbol index; all per-file filtering and
/// lookup logic lives here, keeping [`SymbolIndex`] a pure data structure.
pub struct Resolver<'a> {
    index: &'a SymbolIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a SymbolIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &SymbolIndex {
        self.index
    }

    /// Resolve one file's candidates into fully-qualified names.
    ///
    /// Stages, applied to the deduplicated candidate set:
    /// 1. drop empty candidates and duplicates (first-occurrence order kept)
    /// 2. drop the file's own type name
    /// 3. drop names already imported in the file's original text
    /// 4. drop names declared locally in the same file
    /// 5. index lookup; unknown names pass through as presumed globals
    ///
    /// Never fails: an empty candidate list yields an empty result.
    pub fn resolve(
        &self,
        candidates: &[TypeRef],
        file: &SourceFile,
        declared: &FxHashSet<SmolStr>,
    ) -> Vec<String> {
        let mut unique: IndexSet<&str> = IndexSet::new();
        for candidate in candidates {
            if !candidate.name.is_empty() {
                unique.insert(candidate.name.as_str());
            }
        }

        let mut resolved = Vec::with_capacity(unique.len());
        for name in unique {
            if name == file.type_name {
                trace!(%name, "dropped self-reference");
                continue;
            }
            if is_already_imported(&file.contents, name) {
                trace!(%name, "dropped: already imported in source");
                continue;
            }
            if declared.contains(name) {
                trace!(%name, "dropped: shadowed by local declaration");
                continue;
            }
            match self.index.lookup(name) {
                Some(fqn) => {
                    trace!(%name, %fqn, "resolved via index");
                    resolved.push(fqn.to_string());
                }
                None => {
                    // Presumed global or built-in type; never an error
                    trace!(%name, "no index entry, passing through");
                    resolved.push(name.to_string());
                }
            }
        }
        resolved
    }
}

/// Textual check against the raw source for an existing `use` declaration
/// targeting exactly this bare name, either as the final segment or via an
/// `as` alias.
fn is_already_imported(contents: &str, bare_name: &str) -> bool {
    let escaped = regex::escape(bare_name);
    let pattern = format!(
        r"use\s+\\?(?:[A-Za-z_\x80-\xff][\w\x80-\xff]*\\)*{escaped}\s*;|use\s+[^;]*\s+as\s+{escaped}\s*;"
    );
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(contents),
        // An unbuildable pattern means the name itself is pathological;
        // treat it as not imported rather than failing the file
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_imported_final_segment() {
        let src = "<?php\nuse Core\\Logging\\Logger;\n";
        assert!(is_already_imported(src, "Logger"));
        assert!(!is_already_imported(src, "Logging"));
        assert!(!is_already_imported(src, "Logg"));
    }

    #[test]
    fn test_already_imported_leading_backslash() {
        let src = "<?php\nuse \\Exception;\n";
        assert!(is_already_imported(src, "Exception"));
    }

    #[test]
    fn test_already_imported_alias() {
        let src = "<?php\nuse Core\\Logging\\Logger as Log;\n";
        assert!(is_already_imported(src, "Log"));
        // The alias rebinds the name: bare `Logger` is not satisfied
        assert!(!is_already_imported(src, "Logger"));
    }

    #[test]
    fn test_not_imported() {
        assert!(!is_already_imported("<?php\n$x = 1;\n", "Logger"));
    }
}

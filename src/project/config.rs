//! Migration configuration.

use regex::Regex;

/// Settings for one migration run.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Namespace prefix every assigned namespace starts with.
    pub root_namespace: String,
    /// File extensions treated as source files (lowercase, no dot).
    pub extensions: Vec<String>,
    /// Paths matching any of these patterns are skipped entirely.
    pub exclude: Vec<Regex>,
    /// Bare names whose root-qualified uses (`\Name`) are rewritten to the
    /// unqualified form before import generation, so the generated `use`
    /// declarations take over.
    pub unqualify_globals: Vec<String>,
    /// Rewrite composer.json with a PSR-4 autoload map when present.
    pub update_manifest: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            root_namespace: "App".to_string(),
            extensions: vec!["php".to_string(), "phtml".to_string()],
            exclude: vec![Regex::new(r"\.git").expect("static pattern")],
            unqualify_globals: vec!["Exception".to_string()],
            update_manifest: true,
        }
    }
}

impl MigrationConfig {
    pub fn with_root_namespace(root: impl Into<String>) -> Self {
        Self {
            root_namespace: root.into(),
            ..Self::default()
        }
    }

    pub fn is_source_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(path))
    }
}

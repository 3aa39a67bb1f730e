//! Import set builder: final order-preserving deduplication.

use indexmap::IndexSet;

/// Deduplicate resolved fully-qualified names into the final import list.
///
/// Pure deduplication, no resolution logic: first occurrence wins the
/// position, and the resulting order is preserved verbatim into output.
/// An empty input yields an empty list.
pub fn build_import_set<I>(resolved: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let set: IndexSet<String> = resolved.into_iter().collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicates_preserving_order() {
        let resolved = vec![
            "App\\Helper".to_string(),
            "Core\\Base".to_string(),
            "App\\Helper".to_string(),
        ];
        assert_eq!(
            build_import_set(resolved),
            vec!["App\\Helper".to_string(), "Core\\Base".to_string()]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(build_import_set(Vec::new()).is_empty());
    }
}

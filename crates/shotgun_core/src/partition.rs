use std::collections::BTreeSet;

/// Crawl recursion cutoff. Subtrees rooted below this depth are delegated
/// as single opaque directory work items instead of being enumerated.
pub const MAX_DEPTH: u32 = 6;

/// Directory keys carry a trailing separator marker; leaf keys do not.
pub fn is_directory_key(key: &str) -> bool {
    key.ends_with('/')
}

/// The partition of one subtree's key space into directory prefixes and
/// stray file keys. Both sets are keyed by path, so duplicate discoveries
/// across sibling branches collapse naturally on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionResult {
    pub directories: BTreeSet<String>,
    pub files: BTreeSet<String>,
}

impl PartitionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a child subtree's partition into this one by set union.
    pub fn merge(&mut self, other: PartitionResult) {
        self.directories.extend(other.directories);
        self.files.extend(other.files);
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_unions_both_sets_and_collapses_duplicates() {
        let mut left = PartitionResult::new();
        left.directories.insert("a/b/".to_string());
        left.files.insert("a/x.txt".to_string());

        let mut right = PartitionResult::new();
        right.directories.insert("a/b/".to_string());
        right.directories.insert("a/c/".to_string());
        right.files.insert("a/y.txt".to_string());

        left.merge(right);

        assert_eq!(left.len(), 4);
        assert!(left.directories.contains("a/b/"));
        assert!(left.directories.contains("a/c/"));
        assert!(left.files.contains("a/x.txt"));
        assert!(left.files.contains("a/y.txt"));
    }

    #[test]
    fn empty_partition_reports_empty() {
        assert!(PartitionResult::new().is_empty());
    }

    #[test]
    fn directory_keys_end_with_separator() {
        assert!(is_directory_key("a/b/"));
        assert!(!is_directory_key("a/b/x.txt"));
        assert!(!is_directory_key("top.txt"));
    }
}

//! Per-run deduplication of accepted submissions.

use std::collections::HashMap;
use std::fmt;

/// Identifies one stored solution: a problem solved in a given language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub title: String,
    pub language: String,
}

impl DedupKey {
    #[must_use]
    pub fn new(title: &str, language: &str) -> Self {
        Self {
            title: title.to_owned(),
            language: language.to_owned(),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.language)
    }
}

/// The dedup keys handled during one run, with the problem id each was
/// first seen under.
///
/// A key is inserted at most once; the first insertion wins.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashMap<DedupKey, String>,
}

impl VisitedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` with `problem_id`. Returns `false` if the key was
    /// already present, in which case nothing changes.
    pub fn insert(&mut self, key: DedupKey, problem_id: &str) -> bool {
        if self.seen.contains_key(&key) {
            return false;
        }
        self.seen.insert(key, problem_id.to_owned());
        true
    }

    /// The problem id recorded for `key`, if it was seen this run.
    #[must_use]
    pub fn problem_id(&self, key: &DedupKey) -> Option<&str> {
        self.seen.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_wins() {
        let mut visited = VisitedSet::new();
        let key = DedupKey::new("Two Sum", "Go");

        assert!(visited.insert(key.clone(), "1"));
        assert!(!visited.insert(key.clone(), "9999"));

        assert_eq!(visited.problem_id(&key), Some("1"));
    }

    #[test]
    fn language_is_part_of_the_key() {
        let mut visited = VisitedSet::new();

        assert!(visited.insert(DedupKey::new("Two Sum", "Go"), "1"));
        assert!(visited.insert(DedupKey::new("Two Sum", "Rust"), "1"));
    }

    #[test]
    fn keys_do_not_collide_across_the_boundary() {
        let mut visited = VisitedSet::new();

        assert!(visited.insert(DedupKey::new("ab", "c"), "1"));
        assert_eq!(visited.problem_id(&DedupKey::new("a", "bc")), None);
    }

    #[test]
    fn key_displays_title_and_language() {
        assert_eq!(DedupKey::new("Two Sum", "Go").to_string(), "Two Sum (Go)");
    }
}

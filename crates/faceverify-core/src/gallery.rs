//! Ordered, read-only association of enrolled identities to their models.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    #[error("duplicate gallery key: {0}")]
    DuplicateKey(String),
}

/// Enrolled models keyed by identity.
///
/// Built once from `(key, model)` pairs; keys are unique and iteration
/// follows insertion order. There is no way to mutate it afterwards.
#[derive(Debug, Clone)]
pub struct Gallery<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Gallery<K, V>
where
    K: Eq + Hash + Debug,
{
    /// Collect `entries`, failing on the first repeated key.
    pub fn from_entries<I>(entries: I) -> Result<Self, GalleryError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        let mut seen = HashSet::with_capacity(entries.len());
        for (key, _) in &entries {
            if !seen.insert(key) {
                return Err(GalleryError::DuplicateKey(format!("{key:?}")));
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V> Gallery<K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub(crate) fn entries(&self) -> &[(K, V)] {
        &self.entries
    }
}

impl<K, V> Default for Gallery<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let gallery = Gallery::from_entries([("s3", 3), ("s1", 1), ("s2", 2)]).unwrap();
        let keys: Vec<_> = gallery.keys().copied().collect();
        assert_eq!(keys, vec!["s3", "s1", "s2"]);
        assert_eq!(gallery.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let gallery = Gallery::from_entries([("s1", 10), ("s2", 20)]).unwrap();
        assert_eq!(gallery.get(&"s2"), Some(&20));
        assert_eq!(gallery.get(&"s9"), None);
        assert!(gallery.contains_key(&"s1"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = Gallery::from_entries([(1u32, 'a'), (2, 'b'), (1, 'c')]).unwrap_err();
        assert_eq!(err, GalleryError::DuplicateKey("1".into()));
    }

    #[test]
    fn test_empty() {
        let gallery: Gallery<String, f64> = Gallery::from_entries(Vec::new()).unwrap();
        assert!(gallery.is_empty());
        assert_eq!(gallery.iter().count(), 0);
    }
}

use std::collections::HashMap;
use std::hash::Hash;

/// Occurrence counter that remembers first-seen order.
///
/// `top(n)` sorts by count descending with a stable sort, so equal counts
/// keep first-seen order.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Distinct keys seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[(K, usize)] {
        &self.entries
    }

    pub fn top(&self, n: usize) -> Vec<(K, usize)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

impl<K: Eq + Hash + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_in_first_seen_order() {
        let tally: Tally<&str> = ["b", "a", "b", "c"].into_iter().collect();
        assert_eq!(tally.entries(), &[("b", 2), ("a", 1), ("c", 1)]);
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn test_top_is_stable_for_ties() {
        let tally: Tally<&str> = ["x", "y", "z", "y", "z", "w"].into_iter().collect();
        assert_eq!(tally.top(10), vec![("y", 2), ("z", 2), ("x", 1), ("w", 1)]);
        assert_eq!(tally.top(1), vec![("y", 2)]);
    }

    #[test]
    fn test_empty() {
        let tally: Tally<String> = Tally::new();
        assert!(tally.is_empty());
        assert!(tally.top(5).is_empty());
    }
}

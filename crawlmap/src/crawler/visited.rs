//! Visited set: the atomic dedup gate in front of the frontier.
//!
//! A fixed-bucket hash table with chaining. Each bucket is its own mutex,
//! so two workers only contend when their addresses hash to the same
//! bucket. [`VisitedSet::try_add`] is the single serialization point that
//! prevents an address from being fetched twice: for any number of
//! concurrent calls with the same address, exactly one observes `true`.
//! Entries are never removed for the lifetime of a crawl run.

use std::hash::{DefaultHasher, Hash, Hasher};

use parking_lot::Mutex;

use crate::utils::Address;

const BUCKETS: usize = 1024;

pub(crate) struct VisitedSet {
    buckets: Vec<Mutex<Vec<String>>>,
}

impl VisitedSet {
    pub(crate) fn new() -> Self {
        Self::with_buckets(BUCKETS)
    }

    pub(crate) fn with_buckets(buckets: usize) -> Self {
        Self {
            buckets: (0..buckets.max(1)).map(|_| Mutex::new(Vec::new())).collect(),
        }
    }

    /// Atomic check-and-insert. Returns `true` only for the call that first
    /// admits the address; `false` for every later call with the same
    /// address, concurrent callers included.
    pub(crate) fn try_add(&self, address: &Address) -> bool {
        let key = address.as_str();
        let mut chain = self.buckets[self.bucket_of(key)].lock();

        if chain.iter().any(|entry| entry == key) {
            return false;
        }
        chain.push(key.to_owned());
        true
    }

    /// Total number of addresses ever admitted.
    pub(crate) fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.lock().len()).sum()
    }

    fn bucket_of(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn test_visited_first_add_wins() {
        let visited = VisitedSet::new();
        assert!(visited.try_add(&addr("http://a/")));
        assert!(!visited.try_add(&addr("http://a/")));
        assert!(visited.try_add(&addr("http://b/")));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_visited_normalized_forms_collide() {
        let visited = VisitedSet::new();
        assert!(visited.try_add(&addr("http://a")));
        assert!(!visited.try_add(&addr("http://a:80/")));
    }

    #[test]
    fn test_visited_collisions_do_not_lose_entries() {
        // One bucket forces every insert through the same chain.
        let visited = VisitedSet::with_buckets(1);
        for i in 0..50 {
            assert!(visited.try_add(&addr(&format!("http://host/{}", i))));
        }
        assert_eq!(visited.len(), 50);
        assert!(!visited.try_add(&addr("http://host/0")));
    }

    #[test]
    fn test_visited_concurrent_try_add_exactly_one_true() {
        let visited = Arc::new(VisitedSet::new());
        let address = Arc::new(addr("http://contended.example/"));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let visited = visited.clone();
            let address = address.clone();
            handles.push(std::thread::spawn(move || visited.try_add(&address)));
        }

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let admitted = results.iter().filter(|added| **added).count();
        assert_eq!(admitted, 1);
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_visited_gate_count_matches_distinct_addresses() {
        let visited = Arc::new(VisitedSet::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let visited = visited.clone();
            handles.push(std::thread::spawn(move || {
                let mut admitted = 0usize;
                // Every worker races over the same 20 addresses.
                for i in 0..20 {
                    if visited.try_add(&addr(&format!("http://host/{}", i))) {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 20);
        assert_eq!(visited.len(), 20);
    }
}

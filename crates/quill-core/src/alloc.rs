//! Hash collections used throughout quill.
//!
//! Keys here are small integers and vertex index pairs, where AHash is
//! considerably faster than SipHash.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

/// Type alias for the standard HashMap with AHash for better performance.
pub type AHashMap<K, V> = ahash::AHashMap<K, V>;

/// Type alias for the standard HashSet with AHash for better performance.
pub type AHashSet<T> = ahash::AHashSet<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_pair_keys() {
        let mut map = HashMap::new();
        map.insert((1u32, 2u32), 7u32);
        assert_eq!(map.get(&(1, 2)), Some(&7));
        assert_eq!(map.get(&(2, 1)), None);
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(42);
        assert!(set.contains(&42));
    }
}

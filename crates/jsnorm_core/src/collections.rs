//! Hash collection aliases used throughout the normalizer.
//!
//! Scopes need insertion-ordered name sets so that synthesized declarations
//! come out in first-occurrence order; everything else uses plain Fx maps.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

pub use rustc_hash::{FxHashMap, FxHashSet};

/// Insertion-ordered map with Fx hashing.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Insertion-ordered set with Fx hashing.
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_map_preserves_insertion_order() {
        let mut map: FxIndexMap<&str, u32> = FxIndexMap::default();
        map.insert("zeta", 0);
        map.insert("alpha", 1);
        map.insert("mid", 2);
        map.insert("alpha", 3);

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha"), Some(&3));
    }

    #[test]
    fn test_index_set_dedups() {
        let mut set: FxIndexSet<u32> = FxIndexSet::default();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.insert(1));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 1]);
    }
}

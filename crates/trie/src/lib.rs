//! Compressed tries (radix trees) over string keys.
//!
//! [`TrieSet`] and [`TrieMap`] store strings in a trie whose chains of
//! single-child nodes are collapsed into multi-character edges. Both
//! containers keep the trie minimal across mutations, iterate in
//! lexicographic order (forward and reverse), answer bound queries, and
//! expose regex-filtered views that prune mismatching subtrees during
//! traversal.
//!
//! Iterators carry an explicit stack of child-set positions instead of the
//! nodes carrying parent pointers; see the `iter` module internals.

pub mod map;
pub mod set;

mod filter;
mod iter;
mod node;

pub use filter::PatternError;
pub use iter::Cursor;
pub use map::TrieMap;
pub use set::TrieSet;

#[cfg(test)]
mod test {
    use super::{TrieMap, TrieSet};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_membership() {
        let mut set = TrieSet::new();
        assert!(set.insert("lorem"));
        assert!(set.insert("loremipsum"));
        assert!(!set.insert("lorem"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("lorem"));
        assert!(set.contains("loremipsum"));
        assert!(!set.contains("lor"));
        assert!(!set.contains("loremdolor"));
        set.assert_structurally_minimal();
    }

    #[test]
    fn test_empty_key() {
        let mut set = TrieSet::new();
        assert!(set.insert(""));
        assert!(set.contains(""));
        let keys: Vec<String> = set.iter().collect();
        assert_eq!(keys, vec![String::new()]);
        assert!(set.remove(""));
        assert!(set.is_empty());
    }

    #[test]
    fn test_map_round_trip() {
        let mut map = TrieMap::new();
        assert_eq!(map.insert("lorem", 1), None);
        assert_eq!(map.insert("ipsum", 2), None);
        assert_eq!(map.insert("lorem", 3), Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("lorem"), Some(&3));
        assert_eq!(map.remove("lorem"), Some(3));
        assert_eq!(map.get("lorem"), None);
        map.assert_structurally_minimal();
    }

    #[test]
    fn test_map_try_insert() {
        let mut map = TrieMap::new();
        assert!(map.try_insert("lorem", 1));
        assert!(!map.try_insert("lorem", 2));
        assert_eq!(map.get("lorem"), Some(&1));
    }

    #[test]
    fn test_multibyte_keys() {
        let mut set = TrieSet::new();
        // "é" and "è" share their first UTF-8 byte, so the split point
        // falls inside a character.
        set.insert("é");
        set.insert("è");
        set.insert("éclair");
        assert!(set.contains("é"));
        assert!(set.contains("è"));
        assert!(set.contains("éclair"));
        assert!(!set.contains("écl"));
        let keys: Vec<String> = set.iter().collect();
        assert_eq!(keys, vec!["è".to_owned(), "é".to_owned(), "éclair".to_owned()]);
        set.assert_structurally_minimal();
    }
}

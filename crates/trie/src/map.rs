use fingerprint::{Fingerprint, State};

use crate::filter::{FilterMode, RawFiltered, RawFilteredIter};
use crate::iter::{bound_frames, find_frames, Cursor, Forward, RawIter, Reverse};
use crate::node::{self, Node, NodeSet};
use crate::PatternError;

/// An ordered map from strings to arbitrary values implemented as a
/// compressed trie (radix tree).
///
/// The map counterpart of [`TrieSet`](crate::TrieSet); see its notes on
/// iterator cost and filtered views.
#[derive(Clone, Debug)]
pub struct TrieMap<V> {
    roots: NodeSet<Option<V>>,
    size: usize,
}

impl<V> TrieMap<V> {
    pub fn new() -> Self {
        Self {
            roots: node::new_roots(),
            size: 0,
        }
    }

    fn root(&self) -> &Node<Option<V>> {
        self.roots.get_index(0).expect("root entry").1
    }

    fn root_mut(&mut self) -> &mut Node<Option<V>> {
        self.roots.get_index_mut(0).expect("root entry").1
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        self.root_mut().clear();
        self.size = 0;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.root().contains(key.as_bytes())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.root().find_node(key.as_bytes())?.label.as_ref()
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.root_mut().find_node_mut(key.as_bytes())?.label.as_mut()
    }

    /// Inserts or overwrites, returning the previous value if any.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let node = self.root_mut().insert_path(key.as_bytes());
        let previous = node.label.replace(value);
        if previous.is_none() {
            self.size += 1;
        }
        previous
    }

    /// Inserts only if `key` is absent; returns whether the insertion
    /// happened. A preexisting mapping is left untouched and `value` is
    /// dropped.
    pub fn try_insert(&mut self, key: &str, value: V) -> bool {
        let node = self.root_mut().insert_path(key.as_bytes());
        if node.label.is_some() {
            false
        } else {
            node.label = Some(value);
            self.size += 1;
            true
        }
    }

    /// Returns the value for `key`, inserting `make()` first if absent.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let size = &mut self.size;
        let node = self
            .roots
            .get_index_mut(0)
            .expect("root entry")
            .1
            .insert_path(key.as_bytes());
        node.label.get_or_insert_with(|| {
            *size += 1;
            make()
        })
    }

    /// Removes `key`, returning its value. The trie is recompacted on the
    /// way out.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.root_mut().remove_key(key.as_bytes());
        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            raw: RawIter::begin(&self.roots),
        }
    }

    pub fn iter_rev(&self) -> RevIter<'_, V> {
        RevIter {
            raw: RawIter::begin(&self.roots),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// An iterator positioned at `key`, or the end iterator if absent.
    pub fn find(&self, key: &str) -> Iter<'_, V> {
        Iter {
            raw: find_frames(&self.roots, key.as_bytes()),
        }
    }

    /// An iterator positioned at the first key `>= key`.
    pub fn lower_bound(&self, key: &str) -> Iter<'_, V> {
        Iter {
            raw: bound_frames(&self.roots, key.as_bytes(), false),
        }
    }

    /// An iterator positioned at the first key `> key`.
    pub fn upper_bound(&self, key: &str) -> Iter<'_, V> {
        Iter {
            raw: bound_frames(&self.roots, key.as_bytes(), true),
        }
    }

    pub fn equal_range(&self, key: &str) -> (Iter<'_, V>, Iter<'_, V>) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// A view of the entries whose key matches `pattern` in full. See
    /// [`TrieSet::filter`](crate::TrieSet::filter).
    pub fn filter(&self, pattern: &str) -> Result<FilteredView<'_, V>, PatternError> {
        Ok(FilteredView {
            raw: RawFiltered::new(&self.roots, pattern, FilterMode::Full)?,
        })
    }

    /// A view of the entries whose key has a prefix matching `pattern`.
    /// See [`TrieSet::filter_prefix`](crate::TrieSet::filter_prefix).
    pub fn filter_prefix(&self, pattern: &str) -> Result<FilteredView<'_, V>, PatternError> {
        Ok(FilteredView {
            raw: RawFiltered::new(&self.roots, pattern, FilterMode::Prefix)?,
        })
    }

    /// Removes the entry under `cursor` and returns the cursor of its
    /// in-order successor, or `None` when the removed entry was the last.
    /// Same staleness contract as [`TrieSet::remove_at`](crate::TrieSet::remove_at).
    pub fn remove_at(&mut self, cursor: Cursor) -> Option<Cursor> {
        let key = node::key_at_path(&self.roots, &cursor.path);
        let removed = self.root_mut().remove_key(&key);
        debug_assert!(removed.is_some(), "cursor does not point at a terminal");
        if removed.is_some() {
            self.size -= 1;
        }
        let successor = bound_frames(&self.roots, &key, false);
        if successor.is_end() {
            None
        } else {
            Some(Cursor {
                path: successor.path(),
            })
        }
    }

    /// Like [`remove_at`](TrieMap::remove_at) without computing the
    /// successor.
    pub fn remove_at_fast(&mut self, cursor: Cursor) {
        let key = node::key_at_path(&self.roots, &cursor.path);
        let removed = self.root_mut().remove_key(&key);
        debug_assert!(removed.is_some(), "cursor does not point at a terminal");
        if removed.is_some() {
            self.size -= 1;
        }
    }

    #[doc(hidden)]
    pub fn assert_structurally_minimal(&self) {
        node::check_invariants(self.root(), true);
    }
}

impl<V> Default for TrieMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for TrieMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.roots == other.roots
    }
}

impl<V: Eq> Eq for TrieMap<V> {}

impl<V: Fingerprint> Fingerprint for TrieMap<V> {
    fn combine(&self, state: &mut State) {
        self.roots.combine(state);
    }
}

/// Fail-fast lookup: panics if the key is absent.
impl<V> std::ops::Index<&str> for TrieMap<V> {
    type Output = V;

    fn index(&self, key: &str) -> &V {
        self.get(key).expect("TrieMap: key not found")
    }
}

impl<S: AsRef<str>, V> FromIterator<(S, V)> for TrieMap<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<S: AsRef<str>, V> Extend<(S, V)> for TrieMap<V> {
    fn extend<I: IntoIterator<Item = (S, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<'a, V> IntoIterator for &'a TrieMap<V> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over `(key, &value)` entries in ascending key order.
#[derive(Clone, PartialEq, Eq)]
pub struct Iter<'a, V> {
    raw: RawIter<'a, Option<V>, Forward>,
}

impl<'a, V> Iter<'a, V> {
    pub fn is_end(&self) -> bool {
        self.raw.is_end()
    }

    pub fn key(&self) -> Option<String> {
        if self.raw.is_end() {
            None
        } else {
            Some(self.raw.key_string())
        }
    }

    pub fn value(&self) -> Option<&'a V> {
        self.raw.current_node().and_then(|node| node.label.as_ref())
    }

    pub fn cursor(&self) -> Option<Cursor> {
        if self.raw.is_end() {
            None
        } else {
            Some(Cursor {
                path: self.raw.path(),
            })
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.value()?;
        let key = self.raw.key_string();
        self.raw.advance();
        Some((key, value))
    }
}

/// Reverse iterator over `(key, &value)` entries in descending key order.
#[derive(Clone, PartialEq, Eq)]
pub struct RevIter<'a, V> {
    raw: RawIter<'a, Option<V>, Reverse>,
}

impl<'a, V> Iterator for RevIter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.raw.is_end() {
            return None;
        }
        let value = self.raw.current_node().and_then(|node| node.label.as_ref())?;
        let key = self.raw.key_string();
        self.raw.advance();
        Some((key, value))
    }
}

/// A regex-filtered view of a [`TrieMap`].
pub struct FilteredView<'t, V> {
    raw: RawFiltered<'t, Option<V>>,
}

impl<'t, V> FilteredView<'t, V> {
    pub fn iter(&self) -> FilteredIter<'_, V> {
        FilteredIter {
            raw: self.raw.iter(),
        }
    }

    pub fn iter_rev(&self) -> FilteredRevIter<'_, V> {
        FilteredRevIter {
            raw: self.raw.iter_rev(),
        }
    }
}

impl<'a, 't, V> IntoIterator for &'a FilteredView<'t, V> {
    type Item = (String, &'a V);
    type IntoIter = FilteredIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct FilteredIter<'a, V> {
    raw: RawFilteredIter<'a, Option<V>, Forward>,
}

impl<'a, V> Iterator for FilteredIter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.raw.is_end() {
            return None;
        }
        let value = self.raw.current_node().and_then(|node| node.label.as_ref())?;
        let key = self.raw.key_string();
        self.raw.advance();
        Some((key, value))
    }
}

pub struct FilteredRevIter<'a, V> {
    raw: RawFilteredIter<'a, Option<V>, Reverse>,
}

impl<'a, V> Iterator for FilteredRevIter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.raw.is_end() {
            return None;
        }
        let value = self.raw.current_node().and_then(|node| node.label.as_ref())?;
        let key = self.raw.key_string();
        self.raw.advance();
        Some((key, value))
    }
}

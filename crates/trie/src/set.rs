use fingerprint::{Fingerprint, State};

use crate::filter::{FilterMode, RawFiltered, RawFilteredIter};
use crate::iter::{bound_frames, find_frames, Cursor, Forward, RawIter, Reverse};
use crate::node::{self, Node, NodeSet};
use crate::PatternError;

/// A set of strings implemented as a compressed trie (radix tree).
///
/// Notable differences from `BTreeSet<String>`:
///
///  * Iterators keep a stack of positions, so their space is linear in the
///    length of the stored string: cheap to move, relatively expensive to
///    clone.
///  * Iterators are monodirectional; a separate reverse iterator is
///    provided by [`iter_rev`](TrieSet::iter_rev).
///  * [`filter`](TrieSet::filter) and
///    [`filter_prefix`](TrieSet::filter_prefix) provide views of the set
///    filtered by a regular expression, pruning mismatching subtrees
///    instead of scanning every element.
#[derive(Clone, Debug)]
pub struct TrieSet {
    // A one-element child set holding the root under the empty fragment,
    // so that every traversal point is uniformly a child-set position.
    roots: NodeSet<bool>,
    size: usize,
}

impl TrieSet {
    pub fn new() -> Self {
        Self {
            roots: node::new_roots(),
            size: 0,
        }
    }

    fn root(&self) -> &Node<bool> {
        self.roots.get_index(0).expect("root entry").1
    }

    fn root_mut(&mut self) -> &mut Node<bool> {
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

    pub fn contains(&self, key: &str) -> bool {
        self.root().contains(key.as_bytes())
    }

    /// Inserts `key`; returns whether it was newly added.
    pub fn insert(&mut self, key: &str) -> bool {
        let node = self.root_mut().insert_path(key.as_bytes());
        let inserted = !node.label;
        node.label = true;
        if inserted {
            self.size += 1;
        }
        inserted
    }

    /// Removes `key`; returns whether it was present. The trie is
    /// recompacted on the way out: emptied nodes are erased and
    /// single-child non-terminals merged into their child.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.root_mut().remove_key(key.as_bytes());
        if removed {
            self.size -= 1;
        }
        removed
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            raw: RawIter::begin(&self.roots),
        }
    }

    pub fn iter_rev(&self) -> RevIter<'_> {
        RevIter {
            raw: RawIter::begin(&self.roots),
        }
    }

    /// An iterator positioned at `key`, or the end iterator if absent.
    pub fn find(&self, key: &str) -> Iter<'_> {
        Iter {
            raw: find_frames(&self.roots, key.as_bytes()),
        }
    }

    /// An iterator positioned at the first key `>= key`.
    pub fn lower_bound(&self, key: &str) -> Iter<'_> {
        Iter {
            raw: bound_frames(&self.roots, key.as_bytes(), false),
        }
    }

    /// An iterator positioned at the first key `> key`.
    pub fn upper_bound(&self, key: &str) -> Iter<'_> {
        Iter {
            raw: bound_frames(&self.roots, key.as_bytes(), true),
        }
    }

    pub fn equal_range(&self, key: &str) -> (Iter<'_>, Iter<'_>) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// A view of the keys that match `pattern` in full.
    ///
    /// The view runs an anchored automaton alongside the traversal and
    /// skips mismatching subtrees entirely, so it is much more efficient
    /// than checking every element. The set must not be mutated while the
    /// view exists (enforced by the borrow).
    pub fn filter(&self, pattern: &str) -> Result<FilteredView<'_>, PatternError> {
        Ok(FilteredView {
            raw: RawFiltered::new(&self.roots, pattern, FilterMode::Full)?,
        })
    }

    /// A view of the keys with a prefix matching `pattern`. Slightly more
    /// efficient than [`filter`](TrieSet::filter) with a pattern ending in
    /// `.*`: once a prefix matches, the whole subtree below it is accepted
    /// without further automaton work.
    pub fn filter_prefix(&self, pattern: &str) -> Result<FilteredView<'_>, PatternError> {
        Ok(FilteredView {
            raw: RawFiltered::new(&self.roots, pattern, FilterMode::Prefix)?,
        })
    }

    /// Whether any key matches `pattern` in full.
    pub fn contains_matching(&self, pattern: &str) -> Result<bool, PatternError> {
        Ok(!self.filter(pattern)?.raw.is_empty())
    }

    /// Whether any key has a prefix matching `pattern`.
    pub fn contains_prefix_matching(&self, pattern: &str) -> Result<bool, PatternError> {
        Ok(!self.filter_prefix(pattern)?.raw.is_empty())
    }

    /// Removes the key under `cursor` and returns the cursor of its
    /// in-order successor, or `None` when the removed key was the last.
    ///
    /// The cursor must have been obtained from this trie in its current
    /// state; using a cursor across unrelated mutations is a logic error.
    pub fn remove_at(&mut self, cursor: Cursor) -> Option<Cursor> {
        let key = node::key_at_path(&self.roots, &cursor.path);
        let removed = self.root_mut().remove_key(&key);
        debug_assert!(removed, "cursor does not point at a terminal");
        if removed {
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

    /// Like [`remove_at`](TrieSet::remove_at) without computing the
    /// successor.
    pub fn remove_at_fast(&mut self, cursor: Cursor) {
        let key = node::key_at_path(&self.roots, &cursor.path);
        let removed = self.root_mut().remove_key(&key);
        debug_assert!(removed, "cursor does not point at a terminal");
        if removed {
            self.size -= 1;
        }
    }

    #[doc(hidden)]
    pub fn assert_structurally_minimal(&self) {
        node::check_invariants(self.root(), true);
    }
}

impl Default for TrieSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TrieSet {
    fn eq(&self, other: &Self) -> bool {
        self.roots == other.roots
    }
}

impl Eq for TrieSet {}

impl PartialOrd for TrieSet {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TrieSet {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.roots.cmp(&other.roots)
    }
}

impl std::hash::Hash for TrieSet {
    fn hash<H: std::hash::Hasher>(&self, hasher: &mut H) {
        self.roots.hash(hasher);
    }
}

impl Fingerprint for TrieSet {
    fn combine(&self, state: &mut State) {
        self.roots.combine(state);
    }
}

impl<S: AsRef<str>> FromIterator<S> for TrieSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for TrieSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key.as_ref());
        }
    }
}

impl<'a> IntoIterator for &'a TrieSet {
    type Item = String;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over the keys, in ascending lexicographic order.
/// Materializes each key on demand by concatenating the edge fragments
/// along its stack.
#[derive(Clone, PartialEq, Eq)]
pub struct Iter<'a> {
    raw: RawIter<'a, bool, Forward>,
}

impl<'a> Iter<'a> {
    pub fn is_end(&self) -> bool {
        self.raw.is_end()
    }

    /// The key at the current position, without advancing.
    pub fn key(&self) -> Option<String> {
        if self.raw.is_end() {
            None
        } else {
            Some(self.raw.key_string())
        }
    }

    /// Detaches the current position into a [`Cursor`] usable with the
    /// removal operations.
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

impl<'a> Iterator for Iter<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.raw.is_end() {
            return None;
        }
        let key = self.raw.key_string();
        self.raw.advance();
        Some(key)
    }
}

/// Reverse iterator over the keys, in descending lexicographic order.
#[derive(Clone, PartialEq, Eq)]
pub struct RevIter<'a> {
    raw: RawIter<'a, bool, Reverse>,
}

impl<'a> Iterator for RevIter<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.raw.is_end() {
            return None;
        }
        let key = self.raw.key_string();
        self.raw.advance();
        Some(key)
    }
}

/// A regex-filtered view of a [`TrieSet`].
pub struct FilteredView<'t> {
    raw: RawFiltered<'t, bool>,
}

impl<'t> FilteredView<'t> {
    pub fn iter(&self) -> FilteredIter<'_> {
        FilteredIter {
            raw: self.raw.iter(),
        }
    }

    pub fn iter_rev(&self) -> FilteredRevIter<'_> {
        FilteredRevIter {
            raw: self.raw.iter_rev(),
        }
    }
}

impl<'a, 't> IntoIterator for &'a FilteredView<'t> {
    type Item = String;
    type IntoIter = FilteredIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct FilteredIter<'a> {
    raw: RawFilteredIter<'a, bool, Forward>,
}

impl<'a> Iterator for FilteredIter<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.raw.is_end() {
            return None;
        }
        let key = self.raw.key_string();
        self.raw.advance();
        Some(key)
    }
}

pub struct FilteredRevIter<'a> {
    raw: RawFilteredIter<'a, bool, Reverse>,
}

impl<'a> Iterator for FilteredRevIter<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.raw.is_end() {
            return None;
        }
        let key = self.raw.key_string();
        self.raw.advance();
        Some(key)
    }
}

use fingerprint::{Fingerprint, State};
use flat::FlatMap;

/// Labels a trie node. `bool` for sets, `Option<V>` for maps. A node is
/// terminal exactly when its label tests true.
pub trait Label: Default {
    fn test(&self) -> bool;
}

impl Label for bool {
    fn test(&self) -> bool {
        *self
    }
}

impl<V> Label for Option<V> {
    fn test(&self) -> bool {
        self.is_some()
    }
}

/// The child set of a node: edge fragment to child, sorted by fragment.
///
/// Fragments are byte strings because a key split point may fall inside a
/// multi-byte UTF-8 sequence; any root-to-terminal concatenation is a whole
/// original key and therefore valid UTF-8 again.
pub(crate) type NodeSet<L> = FlatMap<Vec<u8>, Node<L>>;

/// A trie node. This is the shared core of [`TrieSet`](crate::TrieSet) and
/// [`TrieMap`](crate::TrieMap).
///
/// Both containers embed a `NodeSet` holding exactly one entry at all
/// times: the empty fragment mapped to the root node. That way every point
/// of a traversal, the root included, is a position inside some child set,
/// which lets the iterators manage a uniform stack of frames instead of
/// recursing (see `iter.rs`).
///
/// Structural invariants, restored after every mutation:
///  * every fragment below the root is non-empty;
///  * no two sibling fragments share a first byte (a shared prefix would
///    have been split into a common ancestor edge);
///  * a non-terminal node has at least two children, except for the root.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Node<L> {
    pub(crate) label: L,
    pub(crate) children: NodeSet<L>,
}

impl<L: Label> Default for Node<L> {
    fn default() -> Self {
        Self {
            label: L::default(),
            children: NodeSet::new(),
        }
    }
}

pub(crate) fn new_roots<L: Label>() -> NodeSet<L> {
    let mut roots = NodeSet::new();
    roots.insert(Vec::new(), Node::default());
    roots
}

pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<L: Label> Node<L> {
    /// Index in `children` of the only child that can start with `first`,
    /// or an insertion position if there is none. At most one child
    /// qualifies because siblings never share a first byte.
    pub(crate) fn candidate(&self, first: u8) -> usize {
        self.children.partition_point(|frag| frag[0] < first)
    }

    pub(crate) fn is_empty(&self) -> bool {
        !self.label.test() && self.children.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.label = L::default();
        self.children.clear();
    }

    /// The node spelling `key`, if the trie contains that exact path
    /// (terminal or not).
    pub(crate) fn find_node(&self, key: &[u8]) -> Option<&Node<L>> {
        if key.is_empty() {
            return Some(self);
        }
        let index = self.candidate(key[0]);
        let (fragment, child) = self.children.get_index(index)?;
        let rest = key.strip_prefix(fragment.as_slice())?;
        child.find_node(rest)
    }

    pub(crate) fn find_node_mut(&mut self, key: &[u8]) -> Option<&mut Node<L>> {
        if key.is_empty() {
            return Some(self);
        }
        let index = self.candidate(key[0]);
        let (fragment, _) = self.children.get_index(index)?;
        if !key.starts_with(fragment) {
            return None;
        }
        let split = fragment.len();
        let (_, child) = self.children.get_index_mut(index)?;
        child.find_node_mut(&key[split..])
    }

    pub(crate) fn contains(&self, key: &[u8]) -> bool {
        self.find_node(key).is_some_and(|node| node.label.test())
    }

    /// Descends to the node for `key`, creating and splitting edges as
    /// needed, and returns it. The label of the returned node is left
    /// untouched; the caller decides how to set it.
    pub(crate) fn insert_path(&mut self, key: &[u8]) -> &mut Node<L> {
        if key.is_empty() {
            return self;
        }
        let index = self.candidate(key[0]);
        let prefix_len = match self.children.get_index(index) {
            Some((fragment, _)) if fragment[0] == key[0] => common_prefix_len(fragment, key),
            _ => 0,
        };
        if prefix_len == 0 {
            // No child shares a prefix with the needle.
            return self.children.get_or_insert_with(key.to_vec(), Node::default);
        }
        let fragment_len = self.children.get_index(index).map(|(f, _)| f.len()).unwrap_or(0);
        if prefix_len < fragment_len {
            // Only a proper prefix of the edge matches: split the edge,
            // interposing a node labeled with the shared prefix.
            let (fragment, old_child) = self.children.remove_index(index);
            let mut mid = Node::default();
            mid.children.insert(fragment[prefix_len..].to_vec(), old_child);
            self.children.insert(fragment[..prefix_len].to_vec(), mid);
        }
        // The candidate (or the freshly interposed node) kept its position:
        // the first byte did not change and siblings never collide on it.
        let (_, child) = self
            .children
            .get_index_mut(index)
            .expect("candidate child just positioned");
        child.insert_path(&key[prefix_len..])
    }

    /// Removes `key` from the subtree rooted here and returns the old
    /// label of its node (which tests false if the key was absent). On the
    /// way back up, a node left non-terminal is erased if childless and
    /// merged into its only child otherwise, keeping the trie minimal.
    pub(crate) fn remove_key(&mut self, key: &[u8]) -> L {
        if key.is_empty() {
            return std::mem::take(&mut self.label);
        }
        let index = self.candidate(key[0]);
        let fragment_len = match self.children.get_index(index) {
            Some((fragment, _)) if key.starts_with(fragment) => fragment.len(),
            _ => return L::default(),
        };
        let (_, child) = self
            .children
            .get_index_mut(index)
            .expect("candidate child just positioned");
        let removed = child.remove_key(&key[fragment_len..]);
        if removed.test() && !child.label.test() {
            match child.children.len() {
                0 => {
                    self.children.remove_index(index);
                }
                1 => self.merge_single_child(index),
                _ => {}
            }
        }
        removed
    }

    /// Replaces the child at `index` (non-terminal, exactly one child of
    /// its own) with that grandchild, concatenating the edge fragments.
    pub(crate) fn merge_single_child(&mut self, index: usize) {
        let (mut fragment, mut child) = self.children.remove_index(index);
        let (sub_fragment, grandchild) = child.children.remove_index(0);
        fragment.extend_from_slice(&sub_fragment);
        self.children.insert(fragment, grandchild);
    }
}

/// Key spelled by a frame path, for cursor-based operations.
pub(crate) fn key_at_path<L: Label>(roots: &NodeSet<L>, path: &[usize]) -> Vec<u8> {
    let mut key = Vec::new();
    let mut nodes = roots;
    for &index in path {
        let (fragment, node) = nodes.get_index(index).expect("stale cursor");
        key.extend_from_slice(fragment);
        nodes = &node.children;
    }
    key
}

/// Asserts the structural invariants of the subtree rooted at `node`.
/// Test support; not part of the container contract.
pub(crate) fn check_invariants<L: Label>(node: &Node<L>, is_root: bool) {
    if !is_root && !node.label.test() {
        assert!(
            node.children.len() >= 2,
            "non-terminal internal node with fewer than two children"
        );
    }
    let mut prev_first: Option<u8> = None;
    for (fragment, child) in node.children.iter() {
        assert!(!fragment.is_empty(), "empty edge fragment");
        if let Some(prev) = prev_first {
            assert!(prev < fragment[0], "sibling edges share a first byte");
        }
        prev_first = Some(fragment[0]);
        check_invariants(child, false);
    }
}

impl<L: Label + Fingerprint> Fingerprint for Node<L> {
    fn combine(&self, state: &mut State) {
        self.label.combine(state);
        state.add(self.children.len() as u64);
        for (fragment, child) in self.children.iter() {
            state.add(fragment.len() as u64);
            state.add_bytes(fragment);
            child.combine(state);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{new_roots, Node, NodeSet};

    fn root(roots: &mut NodeSet<bool>) -> &mut Node<bool> {
        roots.get_index_mut(0).unwrap().1
    }

    #[test]
    fn test_insert_splits_edges() {
        let mut roots = new_roots::<bool>();
        let r = root(&mut roots);
        r.insert_path(b"loremipsum").label = true;
        r.insert_path(b"loremdolor").label = true;
        // One shared "lorem" edge with two children.
        assert_eq!(r.children.len(), 1);
        let (fragment, lorem) = r.children.get_index(0).unwrap();
        assert_eq!(fragment.as_slice(), b"lorem");
        assert!(!lorem.label);
        assert_eq!(lorem.children.len(), 2);
    }

    #[test]
    fn test_remove_merges_single_child() {
        let mut roots = new_roots::<bool>();
        let r = root(&mut roots);
        r.insert_path(b"ab").label = true;
        r.insert_path(b"abc").label = true;
        assert!(r.remove_key(b"ab"));
        // "ab" and "c" collapse back into a single "abc" edge.
        assert_eq!(r.children.len(), 1);
        let (fragment, node) = r.children.get_index(0).unwrap();
        assert_eq!(fragment.as_slice(), b"abc");
        assert!(node.label);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_remove_erases_empty_chain() {
        let mut roots = new_roots::<bool>();
        let r = root(&mut roots);
        r.insert_path(b"lorem").label = true;
        assert!(r.remove_key(b"lorem"));
        assert!(r.is_empty());
        assert!(!r.remove_key(b"lorem"));
    }
}

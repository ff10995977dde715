use std::marker::PhantomData;

use crate::node::{Label, Node, NodeSet};

/// Traversal direction of an iterator. Maps a frame's position in
/// traversal order onto an index into the child set.
pub(crate) trait Course: Copy + Default {
    fn index(ord: usize, len: usize) -> usize;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Forward;

impl Course for Forward {
    fn index(ord: usize, _len: usize) -> usize {
        ord
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Reverse;

impl Course for Reverse {
    fn index(ord: usize, len: usize) -> usize {
        len - 1 - ord
    }
}

/// One level of the manually-managed recursion stack: a child set and a
/// position (in traversal order) within it.
///
/// These are the `pos`/`end` locals a recursive scan would keep on the call
/// stack; keeping them in an explicit stack is what makes the iterators
/// resumable and removes any need for parent pointers in the nodes.
pub(crate) struct Frame<'a, L> {
    pub(crate) nodes: &'a NodeSet<L>,
    pub(crate) ord: usize,
}

impl<'a, L> Clone for Frame<'a, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, L> Copy for Frame<'a, L> {}

impl<'a, L> PartialEq for Frame<'a, L> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.nodes, other.nodes) && self.ord == other.ord
    }
}

impl<'a, L> Eq for Frame<'a, L> {}

/// Core monodirectional iterator shared by the set and map fronts.
///
/// Sits either on a terminal node or past the last one (the "end" state,
/// an empty stack). Copying copies the stack, so copies are O(depth).
pub(crate) struct RawIter<'a, L, C> {
    frames: Vec<Frame<'a, L>>,
    _course: PhantomData<C>,
}

impl<'a, L, C> Clone for RawIter<'a, L, C> {
    fn clone(&self) -> Self {
        Self {
            frames: self.frames.clone(),
            _course: PhantomData,
        }
    }
}

impl<'a, L, C> PartialEq for RawIter<'a, L, C> {
    fn eq(&self, other: &Self) -> bool {
        self.frames == other.frames
    }
}

impl<'a, L, C> Eq for RawIter<'a, L, C> {}

impl<'a, L: Label, C: Course> RawIter<'a, L, C> {
    /// Positioned at the first terminal in traversal order.
    /// `roots` must hold exactly one entry, the root node.
    pub(crate) fn begin(roots: &'a NodeSet<L>) -> Self {
        let mut it = Self {
            frames: vec![Frame { nodes: roots, ord: 0 }],
            _course: PhantomData,
        };
        let root_is_terminal = it.current_node().map(|node| node.label.test()).unwrap_or(false);
        if !root_is_terminal {
            it.advance();
        }
        it
    }

    pub(crate) fn end() -> Self {
        Self {
            frames: Vec::new(),
            _course: PhantomData,
        }
    }

    pub(crate) fn from_frames(frames: Vec<Frame<'a, L>>) -> Self {
        Self {
            frames,
            _course: PhantomData,
        }
    }

    pub(crate) fn is_end(&self) -> bool {
        self.frames.is_empty()
    }

    fn top_entry(&self) -> Option<(&'a [u8], &'a Node<L>)> {
        let frame = self.frames.last()?;
        let len = frame.nodes.len();
        if frame.ord >= len {
            return None;
        }
        let nodes: &'a NodeSet<L> = frame.nodes;
        let (fragment, node) = nodes.get_index(C::index(frame.ord, len))?;
        Some((fragment, node))
    }

    pub(crate) fn current_node(&self) -> Option<&'a Node<L>> {
        self.top_entry().map(|(_, node)| node)
    }

    /// Materializes the key of the current position by concatenating the
    /// edge fragments of every frame.
    pub(crate) fn key_bytes(&self) -> Vec<u8> {
        let mut size = 0;
        let mut fragments = Vec::with_capacity(self.frames.len());
        for frame in &self.frames {
            let len = frame.nodes.len();
            if frame.ord < len {
                let nodes: &'a NodeSet<L> = frame.nodes;
                if let Some((fragment, _)) = nodes.get_index(C::index(frame.ord, len)) {
                    size += fragment.len();
                    fragments.push(fragment.as_slice());
                }
            }
        }
        let mut key = Vec::with_capacity(size);
        for fragment in fragments {
            key.extend_from_slice(fragment);
        }
        key
    }

    pub(crate) fn key_string(&self) -> String {
        // Terminal keys concatenate to whole original keys, so the bytes
        // are valid UTF-8 even though individual fragments may not be.
        String::from_utf8(self.key_bytes()).expect("trie keys are valid UTF-8")
    }

    /// Moves to the next node in traversal order: descend into the first
    /// child if any, else advance to the next sibling, else pop and
    /// advance the parent. This does not look for terminals; `advance`
    /// does.
    fn next_node(&mut self) {
        if let Some(&frame) = self.frames.last() {
            let len = frame.nodes.len();
            if frame.ord < len {
                let nodes: &'a NodeSet<L> = frame.nodes;
                if let Some((_, node)) = nodes.get_index(C::index(frame.ord, len)) {
                    if !node.children.is_empty() {
                        self.frames.push(Frame {
                            nodes: &node.children,
                            ord: 0,
                        });
                        return;
                    }
                }
            } else {
                self.frames.pop();
            }
        }
        while let Some(frame) = self.frames.last_mut() {
            frame.ord += 1;
            if frame.ord < frame.nodes.len() {
                return;
            }
            self.frames.pop();
        }
    }

    /// Moves to the next terminal node, or to the end state if there is
    /// none.
    pub(crate) fn advance(&mut self) {
        loop {
            self.next_node();
            if self.frames.is_empty() {
                return;
            }
            if let Some(node) = self.current_node() {
                if node.label.test() {
                    return;
                }
            }
        }
    }
}

impl<'a, L: Label> RawIter<'a, L, Forward> {
    /// Frame positions as plain indices, without any borrow of the trie.
    pub(crate) fn path(&self) -> Vec<usize> {
        self.frames.iter().map(|frame| frame.ord).collect()
    }

    /// Rebuilds an iterator from stored frame positions. Positions must
    /// come from an iterator over the same, unmodified trie.
    pub(crate) fn from_path(roots: &'a NodeSet<L>, path: &[usize]) -> Self {
        let mut frames = Vec::with_capacity(path.len());
        let mut nodes: &'a NodeSet<L> = roots;
        for (depth, &ord) in path.iter().enumerate() {
            frames.push(Frame { nodes, ord });
            if depth + 1 < path.len() {
                let (_, node) = nodes.get_index(ord).expect("stale cursor");
                nodes = &node.children;
            }
        }
        Self::from_frames(frames)
    }
}

/// Builds an iterator positioned at `key`, or the end iterator if the trie
/// does not contain it.
pub(crate) fn find_frames<'a, L: Label>(
    roots: &'a NodeSet<L>,
    key: &[u8],
) -> RawIter<'a, L, Forward> {
    let mut frames = vec![Frame { nodes: roots, ord: 0 }];
    let mut needle = key;
    while !needle.is_empty() {
        let node: &'a Node<L> = {
            let frame = frames.last().expect("at least the root frame");
            let nodes: &'a NodeSet<L> = frame.nodes;
            match nodes.get_index(frame.ord) {
                Some((_, node)) => node,
                None => return RawIter::end(),
            }
        };
        let index = node.candidate(needle[0]);
        let Some((fragment, _)) = node.children.get_index(index) else {
            return RawIter::end();
        };
        let Some(rest) = needle.strip_prefix(fragment.as_slice()) else {
            return RawIter::end();
        };
        needle = rest;
        frames.push(Frame {
            nodes: &node.children,
            ord: index,
        });
    }
    let it = RawIter::from_frames(frames);
    match it.current_node() {
        Some(node) if node.label.test() => it,
        _ => RawIter::end(),
    }
}

/// Builds an iterator at the first terminal whose key is `>= key`
/// (`strict = false`) or `> key` (`strict = true`).
///
/// The descent mirrors `find_frames` until the first level where the edge
/// does not match; at that point the frame already denotes the smallest
/// candidate subtree and a single `advance` lands on its first terminal.
pub(crate) fn bound_frames<'a, L: Label>(
    roots: &'a NodeSet<L>,
    key: &[u8],
    strict: bool,
) -> RawIter<'a, L, Forward> {
    let mut frames = vec![Frame { nodes: roots, ord: 0 }];
    let mut needle = key;
    loop {
        if needle.is_empty() {
            break;
        }
        let node: &'a Node<L> = {
            let frame = frames.last().expect("at least the root frame");
            let nodes: &'a NodeSet<L> = frame.nodes;
            match nodes.get_index(frame.ord) {
                Some((_, node)) => node,
                None => break,
            }
        };
        let index = node.children.partition_point(|fragment| fragment[0] < needle[0]);
        let Some((fragment, _)) = node.children.get_index(index) else {
            // No candidate: the frame is exhausted and `advance` will pop
            // to the next sibling of an ancestor.
            frames.push(Frame {
                nodes: &node.children,
                ord: index,
            });
            break;
        };
        if fragment[0] > needle[0] {
            // Everything in and after this subtree is greater.
            frames.push(Frame {
                nodes: &node.children,
                ord: index,
            });
            break;
        }
        let shared = crate::node::common_prefix_len(fragment, needle);
        if shared == fragment.len() {
            // The edge is wholly a prefix of the needle: consume it.
            frames.push(Frame {
                nodes: &node.children,
                ord: index,
            });
            needle = &needle[shared..];
            continue;
        }
        if shared == needle.len() || fragment[shared] > needle[shared] {
            // The subtree extends or exceeds the needle: all its keys are
            // greater.
            frames.push(Frame {
                nodes: &node.children,
                ord: index,
            });
        } else {
            // The subtree is entirely smaller: skip to the next sibling.
            frames.push(Frame {
                nodes: &node.children,
                ord: index + 1,
            });
        }
        break;
    }
    let exact = needle.is_empty();
    let mut it = RawIter::from_frames(frames);
    let terminal = it.current_node().map(|node| node.label.test()).unwrap_or(false);
    if terminal && !(strict && exact) {
        return it;
    }
    it.advance();
    it
}

/// A detached iterator position: the frame indices without the borrows.
///
/// Obtained from an iterator, consumed by the cursor-based removal
/// operations. A cursor is only meaningful against the exact trie state it
/// was taken from; any other mutation in between is a logic error (caught
/// by assertions at best).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) path: Vec<usize>,
}

use regex_automata::dfa::dense;
use regex_automata::dfa::{Automaton, StartKind};
use regex_automata::util::primitives::StateID;
use regex_automata::{Anchored, Input};

use crate::iter::{Course, Forward, Reverse};
use crate::node::{Label, Node, NodeSet};

/// Pattern compilation failure, surfaced by the `filter`/`filter_prefix`
/// constructors.
pub type PatternError = dense::BuildError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FilterMode {
    /// The whole key must match the pattern.
    Full,
    /// Some prefix of the key must match the pattern.
    Prefix,
}

/// An anchored byte DFA stepped incrementally across edge fragments.
///
/// The high-level `regex` API cannot be used here: pruning whole subtrees
/// requires carrying the automaton state from one edge to the next.
pub(crate) struct Matcher {
    dfa: dense::DFA<Vec<u32>>,
    start: StateID,
    mode: FilterMode,
}

/// The automaton state attached to a traversal position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scan {
    /// No completion of the consumed bytes can match: prune the subtree.
    Dead,
    /// Still scanning.
    Alive(StateID),
    /// Prefix mode only: a prefix already matched, the whole subtree is
    /// accepted and no further stepping is needed.
    Covered,
}

impl Matcher {
    pub(crate) fn new(pattern: &str, mode: FilterMode) -> Result<Self, PatternError> {
        let dfa = dense::Builder::new()
            .configure(dense::Config::new().start_kind(StartKind::Anchored))
            .build(pattern)?;
        let start = dfa
            .start_state_forward(&Input::new("").anchored(Anchored::Yes))
            .expect("anchored start state is always available");
        Ok(Self { dfa, start, mode })
    }

    pub(crate) fn start(&self) -> Scan {
        Scan::Alive(self.start)
    }

    /// Advances `scan` across an edge fragment.
    pub(crate) fn step(&self, scan: Scan, fragment: &[u8]) -> Scan {
        let mut sid = match scan {
            Scan::Alive(sid) => sid,
            other => return other,
        };
        for &byte in fragment {
            sid = self.dfa.next_state(sid, byte);
            if self.dfa.is_match_state(sid) && self.mode == FilterMode::Prefix {
                // The match ended just before `byte`; everything below
                // this point shares the matched prefix.
                return Scan::Covered;
            }
            if self.dfa.is_dead_state(sid) || self.dfa.is_quit_state(sid) {
                return Scan::Dead;
            }
        }
        Scan::Alive(sid)
    }

    /// Whether a terminal node reached with state `scan` is accepted.
    pub(crate) fn accepts(&self, scan: Scan) -> bool {
        match scan {
            Scan::Dead => false,
            Scan::Covered => true,
            Scan::Alive(sid) => {
                let eoi = self.dfa.next_eoi_state(sid);
                self.dfa.is_match_state(eoi)
            }
        }
    }
}

struct FilterFrame<'a, L> {
    nodes: &'a NodeSet<L>,
    ord: usize,
    /// Automaton state on entry to this child set (after the parent edge).
    enter: Scan,
    /// Automaton state after the current entry's edge fragment.
    at: Scan,
}

impl<'a, L> Clone for FilterFrame<'a, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, L> Copy for FilterFrame<'a, L> {}

/// Monodirectional iterator over the terminals whose keys the matcher
/// accepts. Mismatching subtrees are pruned wholesale: a dead automaton
/// state stops the descent.
pub(crate) struct RawFilteredIter<'a, L, C> {
    matcher: &'a Matcher,
    frames: Vec<FilterFrame<'a, L>>,
    _course: std::marker::PhantomData<C>,
}

impl<'a, L: Label, C: Course> RawFilteredIter<'a, L, C> {
    pub(crate) fn begin(matcher: &'a Matcher, roots: &'a NodeSet<L>) -> Self {
        let mut root_frame = FilterFrame {
            nodes: roots,
            ord: 0,
            enter: matcher.start(),
            at: matcher.start(),
        };
        root_frame.at = Self::scan_entry(matcher, &root_frame);
        let at = root_frame.at;
        let mut it = Self {
            matcher,
            frames: vec![root_frame],
            _course: std::marker::PhantomData,
        };
        let accepted_terminal = it
            .current_node()
            .map(|node| node.label.test() && matcher.accepts(at))
            .unwrap_or(false);
        if !accepted_terminal {
            it.advance();
        }
        it
    }

    pub(crate) fn is_end(&self) -> bool {
        self.frames.is_empty()
    }

    fn entry_of(frame: &FilterFrame<'a, L>) -> Option<(&'a [u8], &'a Node<L>)> {
        let len = frame.nodes.len();
        if frame.ord >= len {
            return None;
        }
        let nodes: &'a NodeSet<L> = frame.nodes;
        let (fragment, node) = nodes.get_index(C::index(frame.ord, len))?;
        Some((fragment, node))
    }

    fn scan_entry(matcher: &Matcher, frame: &FilterFrame<'a, L>) -> Scan {
        match Self::entry_of(frame) {
            Some((fragment, _)) => matcher.step(frame.enter, fragment),
            None => Scan::Dead,
        }
    }

    pub(crate) fn current_node(&self) -> Option<&'a Node<L>> {
        self.frames.last().and_then(Self::entry_of).map(|(_, node)| node)
    }

    pub(crate) fn key_bytes(&self) -> Vec<u8> {
        let mut key = Vec::new();
        for frame in &self.frames {
            if let Some((fragment, _)) = Self::entry_of(frame) {
                key.extend_from_slice(fragment);
            }
        }
        key
    }

    pub(crate) fn key_string(&self) -> String {
        String::from_utf8(self.key_bytes()).expect("trie keys are valid UTF-8")
    }

    fn next_node(&mut self) {
        if let Some(&frame) = self.frames.last() {
            if frame.ord < frame.nodes.len() {
                if let Some((_, node)) = Self::entry_of(&frame) {
                    if frame.at != Scan::Dead && !node.children.is_empty() {
                        let mut child = FilterFrame {
                            nodes: &node.children,
                            ord: 0,
                            enter: frame.at,
                            at: frame.at,
                        };
                        child.at = Self::scan_entry(self.matcher, &child);
                        self.frames.push(child);
                        return;
                    }
                }
            } else {
                self.frames.pop();
            }
        }
        while !self.frames.is_empty() {
            let top = self.frames.len() - 1;
            self.frames[top].ord += 1;
            if self.frames[top].ord < self.frames[top].nodes.len() {
                let frame = self.frames[top];
                self.frames[top].at = Self::scan_entry(self.matcher, &frame);
                return;
            }
            self.frames.pop();
        }
    }

    pub(crate) fn advance(&mut self) {
        loop {
            self.next_node();
            let Some(frame) = self.frames.last() else {
                return;
            };
            let at = frame.at;
            if at == Scan::Dead {
                continue;
            }
            if let Some(node) = self.current_node() {
                if node.label.test() && self.matcher.accepts(at) {
                    return;
                }
            }
        }
    }
}

/// Direction-erased view core shared by the set and map filter fronts.
pub(crate) struct RawFiltered<'t, L> {
    pub(crate) matcher: Matcher,
    pub(crate) roots: &'t NodeSet<L>,
}

impl<'t, L: Label> RawFiltered<'t, L> {
    pub(crate) fn new(
        roots: &'t NodeSet<L>,
        pattern: &str,
        mode: FilterMode,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            matcher: Matcher::new(pattern, mode)?,
            roots,
        })
    }

    pub(crate) fn iter(&self) -> RawFilteredIter<'_, L, Forward> {
        RawFilteredIter::begin(&self.matcher, self.roots)
    }

    pub(crate) fn iter_rev(&self) -> RawFilteredIter<'_, L, Reverse> {
        RawFilteredIter::begin(&self.matcher, self.roots)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.iter().is_end()
    }
}

//! Predefined [`Fingerprint`] implementations.
//!
//! Integers contribute their value as one sign-extended 64-bit word, floats
//! their raw little-endian byte image, strings their length followed by
//! their bytes, ordered ranges their length followed by each element, and
//! unordered ranges their length followed by the sorted per-element
//! fingerprints so that any two orderings yield the same digest.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use crate::{combine_ordered, combine_unordered, Fingerprint, State};

macro_rules! impl_for_integers {
    ($($t:ty),*) => {
        $(
            impl Fingerprint for $t {
                fn combine(&self, state: &mut State) {
                    state.add(*self as u64);
                }
            }
        )*
    };
}

impl_for_integers!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Fingerprint for i128 {
    fn combine(&self, state: &mut State) {
        state.add((*self >> 64) as u64);
        state.add(*self as u64);
    }
}

impl Fingerprint for u128 {
    fn combine(&self, state: &mut State) {
        state.add((*self >> 64) as u64);
        state.add(*self as u64);
    }
}

impl Fingerprint for bool {
    fn combine(&self, state: &mut State) {
        state.add(u64::from(*self));
    }
}

impl Fingerprint for char {
    fn combine(&self, state: &mut State) {
        state.add(u64::from(*self));
    }
}

impl Fingerprint for f32 {
    fn combine(&self, state: &mut State) {
        state.add_bytes(&self.to_le_bytes());
    }
}

impl Fingerprint for f64 {
    fn combine(&self, state: &mut State) {
        state.add_bytes(&self.to_le_bytes());
    }
}

impl Fingerprint for str {
    fn combine(&self, state: &mut State) {
        state.add(self.len() as u64);
        state.add_bytes(self.as_bytes());
    }
}

impl Fingerprint for String {
    fn combine(&self, state: &mut State) {
        self.as_str().combine(state);
    }
}

impl Fingerprint for time::Duration {
    fn combine(&self, state: &mut State) {
        state.add(self.whole_seconds() as u64);
        state.add(self.subsec_nanoseconds() as u64);
    }
}

impl Fingerprint for time::OffsetDateTime {
    fn combine(&self, state: &mut State) {
        state.add(self.unix_timestamp() as u64);
        state.add(u64::from(self.nanosecond()));
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for &T {
    fn combine(&self, state: &mut State) {
        (**self).combine(state);
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for &mut T {
    fn combine(&self, state: &mut State) {
        (**self).combine(state);
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for Box<T> {
    fn combine(&self, state: &mut State) {
        (**self).combine(state);
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for Rc<T> {
    fn combine(&self, state: &mut State) {
        (**self).combine(state);
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for Arc<T> {
    fn combine(&self, state: &mut State) {
        (**self).combine(state);
    }
}

impl<T: Fingerprint> Fingerprint for Option<T> {
    fn combine(&self, state: &mut State) {
        match self {
            Some(value) => {
                state.add(1);
                value.combine(state);
            }
            None => state.add(0),
        }
    }
}

macro_rules! impl_for_tuples {
    ($(($($name:ident : $index:tt),+);)*) => {
        $(
            impl<$($name: Fingerprint),+> Fingerprint for ($($name,)+) {
                fn combine(&self, state: &mut State) {
                    $(self.$index.combine(state);)+
                }
            }
        )*
    };
}

impl_for_tuples! {
    (A: 0);
    (A: 0, B: 1);
    (A: 0, B: 1, C: 2);
    (A: 0, B: 1, C: 2, D: 3);
    (A: 0, B: 1, C: 2, D: 3, E: 4);
    (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
    (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
    (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
}

impl<T: Fingerprint> Fingerprint for [T] {
    fn combine(&self, state: &mut State) {
        combine_ordered(state, self.len(), self);
    }
}

impl<T: Fingerprint, const N: usize> Fingerprint for [T; N] {
    fn combine(&self, state: &mut State) {
        combine_ordered(state, N, self);
    }
}

impl<T: Fingerprint> Fingerprint for Vec<T> {
    fn combine(&self, state: &mut State) {
        combine_ordered(state, self.len(), self);
    }
}

impl<T: Fingerprint> Fingerprint for VecDeque<T> {
    fn combine(&self, state: &mut State) {
        combine_ordered(state, self.len(), self);
    }
}

impl<T: Fingerprint> Fingerprint for BTreeSet<T> {
    fn combine(&self, state: &mut State) {
        combine_ordered(state, self.len(), self);
    }
}

impl<K: Fingerprint, V: Fingerprint> Fingerprint for BTreeMap<K, V> {
    fn combine(&self, state: &mut State) {
        state.add(self.len() as u64);
        for (key, value) in self {
            key.combine(state);
            value.combine(state);
        }
    }
}

impl<T: Fingerprint, S: BuildHasher> Fingerprint for HashSet<T, S> {
    fn combine(&self, state: &mut State) {
        combine_unordered(state, self);
    }
}

impl<K: Fingerprint, V: Fingerprint, S: BuildHasher> Fingerprint for HashMap<K, V, S> {
    fn combine(&self, state: &mut State) {
        let mut fingerprints: Vec<u64> = self
            .iter()
            .map(|(key, value)| {
                let mut entry = State::new();
                key.combine(&mut entry);
                value.combine(&mut entry);
                entry.finish()
            })
            .collect();
        fingerprints.sort_unstable();
        state.add(fingerprints.len() as u64);
        for fp in fingerprints {
            state.add(fp);
        }
    }
}

impl<T: Fingerprint, S: BuildHasher> Fingerprint for indexmap::IndexSet<T, S> {
    fn combine(&self, state: &mut State) {
        combine_unordered(state, self);
    }
}

impl<K: Fingerprint, V: Fingerprint, S: BuildHasher> Fingerprint for indexmap::IndexMap<K, V, S> {
    fn combine(&self, state: &mut State) {
        let mut fingerprints: Vec<u64> = self
            .iter()
            .map(|(key, value)| {
                let mut entry = State::new();
                key.combine(&mut entry);
                value.combine(&mut entry);
                entry.finish()
            })
            .collect();
        fingerprints.sort_unstable();
        state.add(fingerprints.len() as u64);
        for fp in fingerprints {
            state.add(fp);
        }
    }
}

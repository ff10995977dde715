//! Predefined [`ParseJson`] / [`StringifyJson`] implementations.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use flat::{FlatMap, FlatSet, Storage};
use trie::{TrieMap, TrieSet};

use crate::{Error, ParseJson, Parser, Stringifier, StringifyJson};

macro_rules! impl_for_integers {
    ($($t:ty),*) => {
        $(
            impl ParseJson for $t {
                fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
                    parser.read_integer::<$t>()
                }
            }

            impl StringifyJson for $t {
                fn stringify_json(&self, stringifier: &mut Stringifier) {
                    stringifier.write_number(*self);
                }
            }
        )*
    };
}

impl_for_integers!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_for_floats {
    ($($t:ty),*) => {
        $(
            impl ParseJson for $t {
                fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
                    parser.read_float::<$t>()
                }
            }

            impl StringifyJson for $t {
                fn stringify_json(&self, stringifier: &mut Stringifier) {
                    stringifier.write_number(*self);
                }
            }
        )*
    };
}

impl_for_floats!(f32, f64);

impl ParseJson for bool {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_boolean()
    }
}

impl StringifyJson for bool {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_boolean(*self);
    }
}

impl ParseJson for String {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_string()
    }
}

impl StringifyJson for String {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_string(self);
    }
}

impl StringifyJson for str {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_string(self);
    }
}

impl<T: StringifyJson + ?Sized> StringifyJson for &T {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        (**self).stringify_json(stringifier);
    }

    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: ParseJson> ParseJson for Option<T> {
    const NULLABLE: bool = true;

    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_value_or_null()
    }
}

impl<T: StringifyJson> StringifyJson for Option<T> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        match self {
            Some(value) => value.stringify_json(stringifier),
            None => stringifier.write_null(),
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

macro_rules! impl_for_owners {
    ($($owner:ident),*) => {
        $(
            impl<T: ParseJson> ParseJson for $owner<T> {
                const NULLABLE: bool = T::NULLABLE;

                fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
                    Ok($owner::new(T::parse_json(parser)?))
                }
            }

            impl<T: StringifyJson> StringifyJson for $owner<T> {
                fn stringify_json(&self, stringifier: &mut Stringifier) {
                    (**self).stringify_json(stringifier);
                }

                fn is_empty_value(&self) -> bool {
                    (**self).is_empty_value()
                }
            }
        )*
    };
}

impl_for_owners!(Box, Rc, Arc);

impl<T: ParseJson> ParseJson for Vec<T> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_vector()
    }
}

impl<T: StringifyJson> StringifyJson for Vec<T> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_sequence(self.iter());
    }
}

impl<T: ParseJson, const N: usize> ParseJson for [T; N] {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_array::<T, N>()
    }
}

impl<T: StringifyJson, const N: usize> StringifyJson for [T; N] {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_sequence(self.iter());
    }
}

// Pairs and tuples always serialize in single-line form: `[12, 34]`.
macro_rules! impl_for_tuples {
    ($(($($name:ident : $index:tt),+);)*) => {
        $(
            impl<$($name: ParseJson),+> ParseJson for ($($name,)+) {
                fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
                    parser.consume_whitespace();
                    parser.expect_prefix("[")?;
                    let mut first = true;
                    let result = ($(
                        {
                            parser.consume_whitespace();
                            if first {
                                first = false;
                            } else {
                                parser.require_prefix(",")?;
                                parser.consume_whitespace();
                            }
                            $name::parse_json(parser)?
                        },
                    )+);
                    parser.consume_whitespace();
                    parser.require_prefix("]")?;
                    Ok(result)
                }
            }

            impl<$($name: StringifyJson),+> StringifyJson for ($($name,)+) {
                fn stringify_json(&self, stringifier: &mut Stringifier) {
                    stringifier.open_inline_list();
                    let mut first = true;
                    $(
                        if first {
                            first = false;
                        } else {
                            stringifier.inline_separator();
                        }
                        self.$index.stringify_json(stringifier);
                    )+
                    stringifier.close_inline_list();
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

/// A set shape that JSON arrays decode into. Insertion reports duplicate
/// elements so that the parser can reject them.
pub trait JsonSet: Default {
    type Elem: ParseJson;

    fn insert_new(&mut self, value: Self::Elem) -> bool;
}

impl<T: ParseJson + Ord> JsonSet for BTreeSet<T> {
    type Elem = T;

    fn insert_new(&mut self, value: T) -> bool {
        self.insert(value)
    }
}

impl<T: ParseJson + Hash + Eq, S: BuildHasher + Default> JsonSet for HashSet<T, S> {
    type Elem = T;

    fn insert_new(&mut self, value: T) -> bool {
        self.insert(value)
    }
}

impl<T: ParseJson + Hash + Eq, S: BuildHasher + Default> JsonSet for IndexSet<T, S> {
    type Elem = T;

    fn insert_new(&mut self, value: T) -> bool {
        self.insert(value)
    }
}

impl<T: ParseJson + Ord, R: Storage<T>> JsonSet for FlatSet<T, R> {
    type Elem = T;

    fn insert_new(&mut self, value: T) -> bool {
        self.insert(value)
    }
}

impl JsonSet for TrieSet {
    type Elem = String;

    fn insert_new(&mut self, value: String) -> bool {
        self.insert(&value)
    }
}

impl ParseJson for TrieSet {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_set::<TrieSet>()
    }
}

impl StringifyJson for TrieSet {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_sequence(self.iter());
    }
}

impl<T: ParseJson + Ord> ParseJson for BTreeSet<T> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_set::<Self>()
    }
}

impl<T: StringifyJson> StringifyJson for BTreeSet<T> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_sequence(self.iter());
    }
}

impl<T: ParseJson + Hash + Eq, S: BuildHasher + Default> ParseJson for HashSet<T, S> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_set::<Self>()
    }
}

impl<T: StringifyJson, S> StringifyJson for HashSet<T, S> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_sequence(self.iter());
    }
}

impl<T: ParseJson + Hash + Eq, S: BuildHasher + Default> ParseJson for IndexSet<T, S> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_set::<Self>()
    }
}

impl<T: StringifyJson, S> StringifyJson for IndexSet<T, S> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_sequence(self.iter());
    }
}

impl<T: ParseJson + Ord, R: Storage<T>> ParseJson for FlatSet<T, R> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_set::<Self>()
    }
}

impl<T: StringifyJson + Ord, R: Storage<T>> StringifyJson for FlatSet<T, R> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_sequence(self.iter());
    }
}

/// A string-keyed map shape that JSON objects decode into. Insertion
/// reports duplicate keys so that the parser can reject them.
pub trait JsonMap<V>: Default {
    fn insert_new(&mut self, key: String, value: V) -> bool;
}

impl<V> JsonMap<V> for BTreeMap<String, V> {
    fn insert_new(&mut self, key: String, value: V) -> bool {
        if self.contains_key(&key) {
            false
        } else {
            self.insert(key, value);
            true
        }
    }
}

impl<V, S: BuildHasher + Default> JsonMap<V> for HashMap<String, V, S> {
    fn insert_new(&mut self, key: String, value: V) -> bool {
        if self.contains_key(&key) {
            false
        } else {
            self.insert(key, value);
            true
        }
    }
}

impl<V, S: BuildHasher + Default> JsonMap<V> for IndexMap<String, V, S> {
    fn insert_new(&mut self, key: String, value: V) -> bool {
        if self.contains_key(&key) {
            false
        } else {
            self.insert(key, value);
            true
        }
    }
}

impl<V, R: Storage<(String, V)>> JsonMap<V> for FlatMap<String, V, R> {
    fn insert_new(&mut self, key: String, value: V) -> bool {
        FlatMap::insert(self, key, value)
    }
}

impl<V> JsonMap<V> for TrieMap<V> {
    fn insert_new(&mut self, key: String, value: V) -> bool {
        self.try_insert(&key, value)
    }
}

impl<V: ParseJson> ParseJson for BTreeMap<String, V> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_dictionary::<V, Self>()
    }
}

impl<V: StringifyJson> StringifyJson for BTreeMap<String, V> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_dictionary(self.iter());
    }
}

impl<V: ParseJson, S: BuildHasher + Default> ParseJson for HashMap<String, V, S> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_dictionary::<V, Self>()
    }
}

impl<V: StringifyJson, S> StringifyJson for HashMap<String, V, S> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_dictionary(self.iter());
    }
}

impl<V: ParseJson, S: BuildHasher + Default> ParseJson for IndexMap<String, V, S> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_dictionary::<V, Self>()
    }
}

impl<V: StringifyJson, S> StringifyJson for IndexMap<String, V, S> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_dictionary(self.iter());
    }
}

impl<V: ParseJson, R: Storage<(String, V)>> ParseJson for FlatMap<String, V, R> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_dictionary::<V, Self>()
    }
}

impl<V: StringifyJson, R: Storage<(String, V)>> StringifyJson for FlatMap<String, V, R> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_dictionary(self.iter());
    }
}

impl<V: ParseJson> ParseJson for TrieMap<V> {
    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error> {
        parser.read_dictionary::<V, Self>()
    }
}

impl<V: StringifyJson> StringifyJson for TrieMap<V> {
    fn stringify_json(&self, stringifier: &mut Stringifier) {
        stringifier.write_dictionary(self.iter());
    }
}

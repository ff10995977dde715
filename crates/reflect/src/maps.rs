//! The type-erased map handle and its seven backing shapes.
//!
//! Rather than exploding the field-pointer sum into one arm per backing
//! container, the handle operates on a `dyn MapOps` computed at binding
//! time. [`MapOps`] is blanket-implemented for every [`MapShape`], so a
//! borrowed field coerces directly into the erased handle.
//!
//! Supported shapes: `BTreeMap`, `HashMap` (any hasher, which covers the
//! `FxHashMap` shape), `IndexMap`, Vec- and VecDeque-backed
//! [`FlatMap`](flat::FlatMap), and the string-keyed
//! [`TrieMap`](trie::TrieMap).

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use time::{Duration, OffsetDateTime};

use flat::{FlatMap, Storage};
use trie::TrieMap;

use crate::handles::{RawEnum, RawEnumRef, RawSubMessage, RawSubMessageRef};
use crate::{Error, FieldType, ValueDescriptor};

/// A map key, wrapped for type-erased access. Keys are drawn from the
/// fixed admissible set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapKey {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Bool(bool),
    String(String),
}

impl From<&str> for MapKey {
    fn from(key: &str) -> Self {
        MapKey::String(key.to_owned())
    }
}

/// Shared view of a map value. Scalars are copied out; strings, bytes,
/// enums and sub-messages are borrowed.
pub enum MapValueRef<'m> {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Bool(bool),
    String(&'m str),
    Bytes(&'m [u8]),
    F64(f64),
    F32(f32),
    Time(OffsetDateTime),
    Duration(Duration),
    Enum(RawEnumRef<'m>),
    Message(RawSubMessageRef<'m>),
}

/// Mutable view of a map value.
pub enum MapValueMut<'m> {
    I32(&'m mut i32),
    U32(&'m mut u32),
    I64(&'m mut i64),
    U64(&'m mut u64),
    Bool(&'m mut bool),
    String(&'m mut String),
    Bytes(&'m mut Vec<u8>),
    F64(&'m mut f64),
    F32(&'m mut f32),
    Time(&'m mut OffsetDateTime),
    Duration(&'m mut Duration),
    Enum(RawEnum<'m>),
    Message(RawSubMessage<'m>),
}

/// An admissible map key type.
pub trait MapKeyType: Clone + Ord + Hash + Eq + 'static {
    const FIELD_TYPE: FieldType;

    fn to_map_key(&self) -> MapKey;

    fn from_map_key(key: &MapKey) -> Result<Self, Error>;
}

macro_rules! impl_map_key {
    ($ty:ty, $field_type:expr, $arm:ident) => {
        impl MapKeyType for $ty {
            const FIELD_TYPE: FieldType = $field_type;

            fn to_map_key(&self) -> MapKey {
                MapKey::$arm(*self)
            }

            fn from_map_key(key: &MapKey) -> Result<Self, Error> {
                match key {
                    MapKey::$arm(value) => Ok(*value),
                    _ => Err(Error::KeyTypeMismatch),
                }
            }
        }
    };
}

impl_map_key!(i32, FieldType::Int32, I32);
impl_map_key!(u32, FieldType::UInt32, U32);
impl_map_key!(i64, FieldType::Int64, I64);
impl_map_key!(u64, FieldType::UInt64, U64);
impl_map_key!(bool, FieldType::Bool, Bool);

impl MapKeyType for String {
    const FIELD_TYPE: FieldType = FieldType::String;

    fn to_map_key(&self) -> MapKey {
        MapKey::String(self.clone())
    }

    fn from_map_key(key: &MapKey) -> Result<Self, Error> {
        match key {
            MapKey::String(value) => Ok(value.clone()),
            _ => Err(Error::KeyTypeMismatch),
        }
    }
}

/// An admissible map value type. Scalar implementations are predefined;
/// generated enums and messages opt in through
/// [`impl_map_value_for_enum!`](crate::impl_map_value_for_enum) and
/// [`impl_map_value_for_message!`](crate::impl_map_value_for_message).
pub trait MapValueType: 'static {
    const FIELD_TYPE: FieldType;

    fn value_descriptor() -> ValueDescriptor {
        ValueDescriptor::Void
    }

    fn default_value() -> Self
    where
        Self: Sized;

    fn as_value_ref(&self) -> MapValueRef<'_>;

    fn as_value_mut(&mut self) -> MapValueMut<'_>;
}

macro_rules! impl_map_value_scalar {
    ($ty:ty, $field_type:expr, $arm:ident, by_copy) => {
        impl MapValueType for $ty {
            const FIELD_TYPE: FieldType = $field_type;

            fn default_value() -> Self {
                Default::default()
            }

            fn as_value_ref(&self) -> MapValueRef<'_> {
                MapValueRef::$arm(*self)
            }

            fn as_value_mut(&mut self) -> MapValueMut<'_> {
                MapValueMut::$arm(self)
            }
        }
    };
}

impl_map_value_scalar!(i32, FieldType::Int32, I32, by_copy);
impl_map_value_scalar!(u32, FieldType::UInt32, U32, by_copy);
impl_map_value_scalar!(i64, FieldType::Int64, I64, by_copy);
impl_map_value_scalar!(u64, FieldType::UInt64, U64, by_copy);
impl_map_value_scalar!(bool, FieldType::Bool, Bool, by_copy);
impl_map_value_scalar!(f64, FieldType::Double, F64, by_copy);
impl_map_value_scalar!(f32, FieldType::Float, F32, by_copy);

impl MapValueType for String {
    const FIELD_TYPE: FieldType = FieldType::String;

    fn default_value() -> Self {
        String::new()
    }

    fn as_value_ref(&self) -> MapValueRef<'_> {
        MapValueRef::String(self)
    }

    fn as_value_mut(&mut self) -> MapValueMut<'_> {
        MapValueMut::String(self)
    }
}

impl MapValueType for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::Bytes;

    fn default_value() -> Self {
        Vec::new()
    }

    fn as_value_ref(&self) -> MapValueRef<'_> {
        MapValueRef::Bytes(self)
    }

    fn as_value_mut(&mut self) -> MapValueMut<'_> {
        MapValueMut::Bytes(self)
    }
}

impl MapValueType for OffsetDateTime {
    const FIELD_TYPE: FieldType = FieldType::Time;

    fn default_value() -> Self {
        OffsetDateTime::UNIX_EPOCH
    }

    fn as_value_ref(&self) -> MapValueRef<'_> {
        MapValueRef::Time(*self)
    }

    fn as_value_mut(&mut self) -> MapValueMut<'_> {
        MapValueMut::Time(self)
    }
}

impl MapValueType for Duration {
    const FIELD_TYPE: FieldType = FieldType::Duration;

    fn default_value() -> Self {
        Duration::ZERO
    }

    fn as_value_ref(&self) -> MapValueRef<'_> {
        MapValueRef::Duration(*self)
    }

    fn as_value_mut(&mut self) -> MapValueMut<'_> {
        MapValueMut::Duration(self)
    }
}

/// Makes a generated enum usable as a reflective map value.
#[macro_export]
macro_rules! impl_map_value_for_enum {
    ($ty:ty) => {
        impl $crate::MapValueType for $ty {
            const FIELD_TYPE: $crate::FieldType = $crate::FieldType::Enum;

            fn value_descriptor() -> $crate::ValueDescriptor {
                $crate::ValueDescriptor::Enum(<$ty as $crate::ReflectEnum>::descriptor())
            }

            fn default_value() -> Self {
                <Self as Default>::default()
            }

            fn as_value_ref(&self) -> $crate::MapValueRef<'_> {
                $crate::MapValueRef::Enum($crate::RawEnumRef::new(self))
            }

            fn as_value_mut(&mut self) -> $crate::MapValueMut<'_> {
                $crate::MapValueMut::Enum($crate::RawEnum::new(self))
            }
        }
    };
}

/// Makes a generated message usable as a reflective map value.
#[macro_export]
macro_rules! impl_map_value_for_message {
    ($ty:ty) => {
        impl $crate::MapValueType for $ty {
            const FIELD_TYPE: $crate::FieldType = $crate::FieldType::SubMessage;

            fn value_descriptor() -> $crate::ValueDescriptor {
                $crate::ValueDescriptor::Message(<$ty as $crate::ReflectMessage>::descriptor())
            }

            fn default_value() -> Self {
                <Self as Default>::default()
            }

            fn as_value_ref(&self) -> $crate::MapValueRef<'_> {
                $crate::MapValueRef::Message($crate::RawSubMessageRef::new(self))
            }

            fn as_value_mut(&mut self) -> $crate::MapValueMut<'_> {
                $crate::MapValueMut::Message($crate::RawSubMessage::new(self))
            }
        }
    };
}

/// One of the seven concrete backing containers of a reflective map
/// field.
pub trait MapShape {
    type Key: MapKeyType;
    type Value: MapValueType;

    const ORDERED: bool;

    fn len(&self) -> usize;
    fn clear(&mut self);

    /// No-op on shapes that do not support capacity reservation.
    fn reserve(&mut self, additional: usize) {
        let _ = additional;
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;
    fn get_mut(&mut self, key: &Self::Key) -> Option<&mut Self::Value>;

    /// Inserts only if absent; returns whether the insertion happened.
    fn insert_new(&mut self, key: Self::Key, value: Self::Value) -> bool;

    fn remove(&mut self, key: &Self::Key) -> bool;

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (MapKey, &'a Self::Value)> + 'a>;
    fn iter_mut<'a>(&'a mut self) -> Box<dyn Iterator<Item = (MapKey, &'a mut Self::Value)> + 'a>;
}

impl<K: MapKeyType, V: MapValueType> MapShape for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    const ORDERED: bool = true;

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    fn insert_new(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            false
        } else {
            self.insert(key, value);
            true
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        BTreeMap::remove(self, key).is_some()
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (MapKey, &'a V)> + 'a> {
        Box::new(BTreeMap::iter(self).map(|(key, value)| (key.to_map_key(), value)))
    }

    fn iter_mut<'a>(&'a mut self) -> Box<dyn Iterator<Item = (MapKey, &'a mut V)> + 'a> {
        Box::new(BTreeMap::iter_mut(self).map(|(key, value)| (key.to_map_key(), value)))
    }
}

impl<K: MapKeyType, V: MapValueType, S: BuildHasher> MapShape for HashMap<K, V, S> {
    type Key = K;
    type Value = V;

    const ORDERED: bool = false;

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        HashMap::reserve(self, additional);
    }

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        HashMap::get_mut(self, key)
    }

    fn insert_new(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            false
        } else {
            self.insert(key, value);
            true
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        HashMap::remove(self, key).is_some()
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (MapKey, &'a V)> + 'a> {
        Box::new(HashMap::iter(self).map(|(key, value)| (key.to_map_key(), value)))
    }

    fn iter_mut<'a>(&'a mut self) -> Box<dyn Iterator<Item = (MapKey, &'a mut V)> + 'a> {
        Box::new(HashMap::iter_mut(self).map(|(key, value)| (key.to_map_key(), value)))
    }
}

impl<K: MapKeyType, V: MapValueType, S: BuildHasher> MapShape for IndexMap<K, V, S> {
    type Key = K;
    type Value = V;

    const ORDERED: bool = false;

    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn clear(&mut self) {
        IndexMap::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        IndexMap::reserve(self, additional);
    }

    fn get(&self, key: &K) -> Option<&V> {
        IndexMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        IndexMap::get_mut(self, key)
    }

    fn insert_new(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            false
        } else {
            self.insert(key, value);
            true
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        self.shift_remove(key).is_some()
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (MapKey, &'a V)> + 'a> {
        Box::new(IndexMap::iter(self).map(|(key, value)| (key.to_map_key(), value)))
    }

    fn iter_mut<'a>(&'a mut self) -> Box<dyn Iterator<Item = (MapKey, &'a mut V)> + 'a> {
        Box::new(IndexMap::iter_mut(self).map(|(key, value)| (key.to_map_key(), value)))
    }
}

impl<K: MapKeyType, V: MapValueType, R: Storage<(K, V)>> MapShape for FlatMap<K, V, R> {
    type Key = K;
    type Value = V;

    const ORDERED: bool = true;

    fn len(&self) -> usize {
        FlatMap::len(self)
    }

    fn clear(&mut self) {
        FlatMap::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        FlatMap::reserve(self, additional);
    }

    fn get(&self, key: &K) -> Option<&V> {
        FlatMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        FlatMap::get_mut(self, key)
    }

    fn insert_new(&mut self, key: K, value: V) -> bool {
        FlatMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> bool {
        FlatMap::remove(self, key).is_some()
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (MapKey, &'a V)> + 'a> {
        Box::new(FlatMap::iter(self).map(|(key, value)| (key.to_map_key(), value)))
    }

    fn iter_mut<'a>(&'a mut self) -> Box<dyn Iterator<Item = (MapKey, &'a mut V)> + 'a> {
        Box::new(FlatMap::iter_mut(self).map(|(key, value)| (key.to_map_key(), value)))
    }
}

impl<V: MapValueType> MapShape for TrieMap<V> {
    type Key = String;
    type Value = V;

    const ORDERED: bool = true;

    fn len(&self) -> usize {
        TrieMap::len(self)
    }

    fn clear(&mut self) {
        TrieMap::clear(self);
    }

    fn get(&self, key: &String) -> Option<&V> {
        TrieMap::get(self, key)
    }

    fn get_mut(&mut self, key: &String) -> Option<&mut V> {
        TrieMap::get_mut(self, key)
    }

    fn insert_new(&mut self, key: String, value: V) -> bool {
        TrieMap::try_insert(self, &key, value)
    }

    fn remove(&mut self, key: &String) -> bool {
        TrieMap::remove(self, key).is_some()
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (MapKey, &'a V)> + 'a> {
        Box::new(TrieMap::iter(self).map(|(key, value)| (MapKey::String(key), value)))
    }

    fn iter_mut<'a>(&'a mut self) -> Box<dyn Iterator<Item = (MapKey, &'a mut V)> + 'a> {
        // The trie's own iterators hold shared frames, so mutable
        // iteration resolves each entry up front instead.
        let keys: Vec<String> = self.keys().collect();
        let mut entries: Vec<(String, *mut V)> = Vec::with_capacity(keys.len());
        for key in keys {
            let value = self.get_mut(&key).expect("key just enumerated") as *mut V;
            entries.push((key, value));
        }
        // Every pointer denotes a distinct entry and the map stays
        // mutably borrowed for 'a, so one &'a mut per entry is sound.
        Box::new(
            entries
                .into_iter()
                .map(|(key, value)| (MapKey::String(key), unsafe { &mut *value })),
        )
    }
}

/// Object-safe, type-erased surface over a concrete [`MapShape`]. This is
/// what the bound [`Map`] handle operates on.
pub trait MapOps {
    fn is_ordered(&self) -> bool;
    fn len(&self) -> usize;
    fn key_type(&self) -> FieldType;
    fn value_type(&self) -> FieldType;
    fn value_descriptor(&self) -> ValueDescriptor;
    fn clear(&mut self);
    fn reserve(&mut self, additional: usize);
    fn contains(&self, key: &MapKey) -> Result<bool, Error>;
    fn get(&self, key: &MapKey) -> Result<Option<MapValueRef<'_>>, Error>;
    fn get_mut(&mut self, key: &MapKey) -> Result<Option<MapValueMut<'_>>, Error>;
    fn insert_default(&mut self, key: &MapKey) -> Result<MapValueMut<'_>, Error>;
    fn remove(&mut self, key: &MapKey) -> Result<bool, Error>;
    fn iter(&self) -> Box<dyn Iterator<Item = (MapKey, MapValueRef<'_>)> + '_>;
    fn iter_mut(&mut self) -> Box<dyn Iterator<Item = (MapKey, MapValueMut<'_>)> + '_>;
}

impl<M: MapShape> MapOps for M {
    fn is_ordered(&self) -> bool {
        M::ORDERED
    }

    fn len(&self) -> usize {
        MapShape::len(self)
    }

    fn key_type(&self) -> FieldType {
        M::Key::FIELD_TYPE
    }

    fn value_type(&self) -> FieldType {
        M::Value::FIELD_TYPE
    }

    fn value_descriptor(&self) -> ValueDescriptor {
        M::Value::value_descriptor()
    }

    fn clear(&mut self) {
        MapShape::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        MapShape::reserve(self, additional);
    }

    fn contains(&self, key: &MapKey) -> Result<bool, Error> {
        let key = M::Key::from_map_key(key)?;
        Ok(MapShape::get(self, &key).is_some())
    }

    fn get(&self, key: &MapKey) -> Result<Option<MapValueRef<'_>>, Error> {
        let key = M::Key::from_map_key(key)?;
        Ok(MapShape::get(self, &key).map(MapValueType::as_value_ref))
    }

    fn get_mut(&mut self, key: &MapKey) -> Result<Option<MapValueMut<'_>>, Error> {
        let key = M::Key::from_map_key(key)?;
        Ok(MapShape::get_mut(self, &key).map(MapValueType::as_value_mut))
    }

    fn insert_default(&mut self, key: &MapKey) -> Result<MapValueMut<'_>, Error> {
        let key = M::Key::from_map_key(key)?;
        if !self.insert_new(key.clone(), M::Value::default_value()) {
            return Err(Error::DuplicateMapKey);
        }
        Ok(MapShape::get_mut(self, &key)
            .map(MapValueType::as_value_mut)
            .expect("entry just inserted"))
    }

    fn remove(&mut self, key: &MapKey) -> Result<bool, Error> {
        let key = M::Key::from_map_key(key)?;
        Ok(MapShape::remove(self, &key))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (MapKey, MapValueRef<'_>)> + '_> {
        Box::new(MapShape::iter(self).map(|(key, value)| (key, value.as_value_ref())))
    }

    fn iter_mut(&mut self) -> Box<dyn Iterator<Item = (MapKey, MapValueMut<'_>)> + '_> {
        Box::new(MapShape::iter_mut(self).map(|(key, value)| (key, value.as_value_mut())))
    }
}

/// Mutable handle to a map field, uniform over the seven backing shapes.
pub struct Map<'m> {
    ops: &'m mut dyn MapOps,
}

impl<'m> Map<'m> {
    pub fn new<S: MapOps>(field: &'m mut S) -> Self {
        Self { ops: field }
    }

    pub fn is_ordered(&self) -> bool {
        self.ops.is_ordered()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.len() == 0
    }

    pub fn key_type(&self) -> FieldType {
        self.ops.key_type()
    }

    pub fn value_type(&self) -> FieldType {
        self.ops.value_type()
    }

    pub fn value_descriptor(&self) -> ValueDescriptor {
        self.ops.value_descriptor()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// No-op on shapes that do not support capacity reservation.
    pub fn reserve(&mut self, additional: usize) {
        self.ops.reserve(additional);
    }

    /// Fails with a precondition error when the key's arm does not match
    /// the concrete map's key type.
    pub fn contains(&self, key: &MapKey) -> Result<bool, Error> {
        self.ops.contains(key)
    }

    pub fn get(&self, key: &MapKey) -> Result<Option<MapValueRef<'_>>, Error> {
        self.ops.get(key)
    }

    pub fn get_mut(&mut self, key: &MapKey) -> Result<Option<MapValueMut<'_>>, Error> {
        self.ops.get_mut(key)
    }

    /// Inserts a default-constructed value under `key` and returns a
    /// mutable view of it; duplicate keys are an error.
    pub fn insert_default(&mut self, key: &MapKey) -> Result<MapValueMut<'_>, Error> {
        self.ops.insert_default(key)
    }

    pub fn remove(&mut self, key: &MapKey) -> Result<bool, Error> {
        self.ops.remove(key)
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = (MapKey, MapValueRef<'_>)> + '_> {
        self.ops.iter()
    }

    pub fn iter_mut(&mut self) -> Box<dyn Iterator<Item = (MapKey, MapValueMut<'_>)> + '_> {
        self.ops.iter_mut()
    }
}

/// Shared handle to a map field.
pub struct MapRef<'m> {
    ops: &'m dyn MapOps,
}

impl<'m> MapRef<'m> {
    pub fn new<S: MapOps>(field: &'m S) -> Self {
        Self { ops: field }
    }

    pub fn is_ordered(&self) -> bool {
        self.ops.is_ordered()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.len() == 0
    }

    pub fn key_type(&self) -> FieldType {
        self.ops.key_type()
    }

    pub fn value_type(&self) -> FieldType {
        self.ops.value_type()
    }

    pub fn contains(&self, key: &MapKey) -> Result<bool, Error> {
        self.ops.contains(key)
    }

    pub fn get(&self, key: &MapKey) -> Result<Option<MapValueRef<'_>>, Error> {
        self.ops.get(key)
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = (MapKey, MapValueRef<'_>)> + '_> {
        self.ops.iter()
    }
}

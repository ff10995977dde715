//! Field handles: small proxies bundling a pointer to a field with the
//! descriptor needed to interpret it. Produced by
//! [`MessageReflection::field_value`](crate::MessageReflection::field_value)
//! and consumed by generic code such as the text-format parser.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use crate::descriptor::MessageReflection;
use crate::enums::{EnumReflection, ReflectEnum};
use crate::{Error, FieldType, Message, ReflectMessage};

// The slot traits below erase the concrete enum / message type of a field
// behind an object-safe surface. Handle constructors are generic and
// coerce the borrowed field into the matching slot, so the traits stay
// private.

trait EnumSlot {
    fn get_repr(&self) -> i64;
    fn set_repr(&mut self, value: i64) -> bool;
}

impl<E: ReflectEnum> EnumSlot for E {
    fn get_repr(&self) -> i64 {
        ReflectEnum::repr(*self)
    }

    fn set_repr(&mut self, value: i64) -> bool {
        match E::from_repr(value) {
            Some(decoded) => {
                *self = decoded;
                true
            }
            None => false,
        }
    }
}

trait OptionalEnumSlot {
    fn get_repr(&self) -> Option<i64>;
    fn set_repr(&mut self, value: i64) -> bool;
    fn erase(&mut self) -> bool;
}

impl<E: ReflectEnum> OptionalEnumSlot for Option<E> {
    fn get_repr(&self) -> Option<i64> {
        self.map(ReflectEnum::repr)
    }

    fn set_repr(&mut self, value: i64) -> bool {
        match E::from_repr(value) {
            Some(decoded) => {
                *self = Some(decoded);
                true
            }
            None => false,
        }
    }

    fn erase(&mut self) -> bool {
        self.take().is_some()
    }
}

trait RepeatedEnumSlot {
    fn len(&self) -> usize;
    fn repr_at(&self, index: usize) -> Option<i64>;
    fn push_repr(&mut self, value: i64) -> bool;
    fn clear(&mut self);
}

impl<E: ReflectEnum> RepeatedEnumSlot for Vec<E> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn repr_at(&self, index: usize) -> Option<i64> {
        self.get(index).map(|value| ReflectEnum::repr(*value))
    }

    fn push_repr(&mut self, value: i64) -> bool {
        match E::from_repr(value) {
            Some(decoded) => {
                self.push(decoded);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Mutable handle to an enum-typed field.
pub struct RawEnum<'m> {
    descriptor: &'static dyn EnumReflection,
    slot: &'m mut dyn EnumSlot,
}

impl<'m> RawEnum<'m> {
    pub fn new<E: ReflectEnum>(field: &'m mut E) -> Self {
        Self {
            descriptor: E::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn EnumReflection {
        self.descriptor
    }

    /// The underlying numeric value; always available, even when it does
    /// not correspond to a known name.
    pub fn underlying_value(&self) -> i64 {
        self.slot.get_repr()
    }

    pub fn has_known_value(&self) -> bool {
        self.descriptor.name_for_value(self.slot.get_repr()).is_ok()
    }

    pub fn name(&self) -> Result<&'static str, Error> {
        self.descriptor.name_for_value(self.slot.get_repr())
    }

    pub fn set_by_name(&mut self, name: &str) -> Result<(), Error> {
        let value = self.descriptor.value_for_name(name)?;
        if self.slot.set_repr(value) {
            Ok(())
        } else {
            Err(Error::UnknownEnumValue(value))
        }
    }
}

/// Shared handle to an enum-typed field.
pub struct RawEnumRef<'m> {
    descriptor: &'static dyn EnumReflection,
    slot: &'m dyn EnumSlot,
}

impl<'m> RawEnumRef<'m> {
    pub fn new<E: ReflectEnum>(field: &'m E) -> Self {
        Self {
            descriptor: E::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn EnumReflection {
        self.descriptor
    }

    pub fn underlying_value(&self) -> i64 {
        self.slot.get_repr()
    }

    pub fn has_known_value(&self) -> bool {
        self.descriptor.name_for_value(self.slot.get_repr()).is_ok()
    }

    pub fn name(&self) -> Result<&'static str, Error> {
        self.descriptor.name_for_value(self.slot.get_repr())
    }
}

/// Mutable handle to an optional enum-typed field.
pub struct OptionalEnum<'m> {
    descriptor: &'static dyn EnumReflection,
    slot: &'m mut dyn OptionalEnumSlot,
}

impl<'m> OptionalEnum<'m> {
    pub fn new<E: ReflectEnum>(field: &'m mut Option<E>) -> Self {
        Self {
            descriptor: E::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn EnumReflection {
        self.descriptor
    }

    pub fn has_value(&self) -> bool {
        self.slot.get_repr().is_some()
    }

    pub fn has_known_value(&self) -> bool {
        matches!(self.slot.get_repr(), Some(repr) if self.descriptor.name_for_value(repr).is_ok())
    }

    pub fn underlying_value(&self) -> Option<i64> {
        self.slot.get_repr()
    }

    /// `Ok(None)` when the field is absent; an error when the stored value
    /// has no known name.
    pub fn name(&self) -> Result<Option<&'static str>, Error> {
        match self.slot.get_repr() {
            None => Ok(None),
            Some(repr) => self.descriptor.name_for_value(repr).map(Some),
        }
    }

    pub fn set_by_name(&mut self, name: &str) -> Result<(), Error> {
        let value = self.descriptor.value_for_name(name)?;
        if self.slot.set_repr(value) {
            Ok(())
        } else {
            Err(Error::UnknownEnumValue(value))
        }
    }

    /// Clears the field; returns whether a value was present.
    pub fn erase(&mut self) -> bool {
        self.slot.erase()
    }
}

/// Shared handle to an optional enum-typed field.
pub struct OptionalEnumRef<'m> {
    descriptor: &'static dyn EnumReflection,
    slot: &'m dyn OptionalEnumSlot,
}

impl<'m> OptionalEnumRef<'m> {
    pub fn new<E: ReflectEnum>(field: &'m Option<E>) -> Self {
        Self {
            descriptor: E::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn EnumReflection {
        self.descriptor
    }

    pub fn has_value(&self) -> bool {
        self.slot.get_repr().is_some()
    }

    pub fn underlying_value(&self) -> Option<i64> {
        self.slot.get_repr()
    }

    pub fn name(&self) -> Result<Option<&'static str>, Error> {
        match self.slot.get_repr() {
            None => Ok(None),
            Some(repr) => self.descriptor.name_for_value(repr).map(Some),
        }
    }
}

/// Mutable handle to a repeated enum-typed field.
pub struct RepeatedEnum<'m> {
    descriptor: &'static dyn EnumReflection,
    slot: &'m mut dyn RepeatedEnumSlot,
}

impl<'m> RepeatedEnum<'m> {
    pub fn new<E: ReflectEnum>(field: &'m mut Vec<E>) -> Self {
        Self {
            descriptor: E::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn EnumReflection {
        self.descriptor
    }

    pub fn len(&self) -> usize {
        self.slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.len() == 0
    }

    pub fn underlying_value_at(&self, index: usize) -> Result<i64, Error> {
        self.slot.repr_at(index).ok_or(Error::IndexOutOfRange)
    }

    pub fn name_at(&self, index: usize) -> Result<&'static str, Error> {
        let repr = self.slot.repr_at(index).ok_or(Error::IndexOutOfRange)?;
        self.descriptor.name_for_value(repr)
    }

    pub fn has_known_value_at(&self, index: usize) -> bool {
        matches!(self.slot.repr_at(index), Some(repr) if self.descriptor.name_for_value(repr).is_ok())
    }

    /// Whether every element maps to a known name.
    pub fn all_values_are_known(&self) -> bool {
        (0..self.slot.len()).all(|index| self.has_known_value_at(index))
    }

    pub fn append(&mut self, name: &str) -> Result<(), Error> {
        let value = self.descriptor.value_for_name(name)?;
        if self.slot.push_repr(value) {
            Ok(())
        } else {
            Err(Error::UnknownEnumValue(value))
        }
    }

    pub fn set_all(&mut self, names: &[&str]) -> Result<(), Error> {
        self.slot.clear();
        for name in names {
            self.append(name)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slot.clear();
    }
}

/// Shared handle to a repeated enum-typed field.
pub struct RepeatedEnumRef<'m> {
    descriptor: &'static dyn EnumReflection,
    slot: &'m dyn RepeatedEnumSlot,
}

impl<'m> RepeatedEnumRef<'m> {
    pub fn new<E: ReflectEnum>(field: &'m Vec<E>) -> Self {
        Self {
            descriptor: E::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn EnumReflection {
        self.descriptor
    }

    pub fn len(&self) -> usize {
        self.slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.len() == 0
    }

    pub fn underlying_value_at(&self, index: usize) -> Result<i64, Error> {
        self.slot.repr_at(index).ok_or(Error::IndexOutOfRange)
    }

    pub fn name_at(&self, index: usize) -> Result<&'static str, Error> {
        let repr = self.slot.repr_at(index).ok_or(Error::IndexOutOfRange)?;
        self.descriptor.name_for_value(repr)
    }

    pub fn all_values_are_known(&self) -> bool {
        (0..self.slot.len()).all(|index| {
            matches!(self.slot.repr_at(index), Some(repr) if self.descriptor.name_for_value(repr).is_ok())
        })
    }
}

/// Mutable handle to a sub-message field: a pointer to the message plus
/// its descriptor. Cheap to construct and pass by value.
pub struct RawSubMessage<'m> {
    message: &'m mut dyn Message,
    descriptor: &'static dyn MessageReflection,
}

impl<'m> RawSubMessage<'m> {
    pub fn new<M: ReflectMessage>(field: &'m mut M) -> Self {
        Self {
            message: field,
            descriptor: M::descriptor(),
        }
    }

    pub(crate) fn from_parts(
        message: &'m mut dyn Message,
        descriptor: &'static dyn MessageReflection,
    ) -> Self {
        Self {
            message,
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &'static dyn MessageReflection {
        self.descriptor
    }

    pub fn message(&self) -> &dyn Message {
        &*self.message
    }

    pub fn message_mut(&mut self) -> &mut dyn Message {
        &mut *self.message
    }

    /// Surrenders the handle, keeping the full borrow. Used when the
    /// caller must keep mutating past the handle's own lifetime, e.g. the
    /// recursive descent of the text-format parser.
    pub fn into_message_mut(self) -> &'m mut dyn Message {
        self.message
    }
}

/// Shared handle to a sub-message field.
pub struct RawSubMessageRef<'m> {
    message: &'m dyn Message,
    descriptor: &'static dyn MessageReflection,
}

impl<'m> RawSubMessageRef<'m> {
    pub fn new<M: ReflectMessage>(field: &'m M) -> Self {
        Self {
            message: field,
            descriptor: M::descriptor(),
        }
    }

    pub fn descriptor(&self) -> &'static dyn MessageReflection {
        self.descriptor
    }

    pub fn message(&self) -> &'m dyn Message {
        self.message
    }
}

trait MessageSlot {
    fn has(&self) -> bool;
    fn get(&self) -> Option<&dyn Message>;
    fn get_mut(&mut self) -> Option<&mut dyn Message>;
    fn reset(&mut self) -> &mut dyn Message;
    fn erase(&mut self) -> bool;
}

impl<M: ReflectMessage> MessageSlot for Option<M> {
    fn has(&self) -> bool {
        self.is_some()
    }

    fn get(&self) -> Option<&dyn Message> {
        self.as_ref().map(|message| message as &dyn Message)
    }

    fn get_mut(&mut self) -> Option<&mut dyn Message> {
        self.as_mut().map(|message| message as &mut dyn Message)
    }

    fn reset(&mut self) -> &mut dyn Message {
        self.insert(M::default())
    }

    fn erase(&mut self) -> bool {
        self.take().is_some()
    }
}

impl<M: ReflectMessage> MessageSlot for Option<Box<M>> {
    fn has(&self) -> bool {
        self.is_some()
    }

    fn get(&self) -> Option<&dyn Message> {
        self.as_deref().map(|message| message as &dyn Message)
    }

    fn get_mut(&mut self) -> Option<&mut dyn Message> {
        self.as_deref_mut().map(|message| message as &mut dyn Message)
    }

    fn reset(&mut self) -> &mut dyn Message {
        &mut **self.insert(Box::new(M::default()))
    }

    fn erase(&mut self) -> bool {
        self.take().is_some()
    }
}

impl<M: ReflectMessage> MessageSlot for Option<Arc<M>> {
    fn has(&self) -> bool {
        self.is_some()
    }

    fn get(&self) -> Option<&dyn Message> {
        self.as_deref().map(|message| message as &dyn Message)
    }

    // Mutation through a shared owner is clone-on-write.
    fn get_mut(&mut self) -> Option<&mut dyn Message> {
        self.as_mut().map(|arc| Arc::make_mut(arc) as &mut dyn Message)
    }

    fn reset(&mut self) -> &mut dyn Message {
        let arc: &mut Arc<M> = self.insert(Arc::new(M::default()));
        let inner = Arc::make_mut(arc);
        inner as &mut dyn Message
    }

    fn erase(&mut self) -> bool {
        self.take().is_some()
    }
}

/// Mutable handle to an optional sub-message field. Uniform over the three
/// ownership shapes of such fields: inline `Option<M>`, uniquely owned
/// `Option<Box<M>>`, and shared `Option<Arc<M>>`.
pub struct OptionalSubMessage<'m> {
    descriptor: &'static dyn MessageReflection,
    slot: &'m mut dyn MessageSlot,
}

impl<'m> OptionalSubMessage<'m> {
    pub fn new_inline<M: ReflectMessage>(field: &'m mut Option<M>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn new_boxed<M: ReflectMessage>(field: &'m mut Option<Box<M>>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn new_shared<M: ReflectMessage>(field: &'m mut Option<Arc<M>>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn MessageReflection {
        self.descriptor
    }

    pub fn has_value(&self) -> bool {
        self.slot.has()
    }

    pub fn message(&self) -> Option<&dyn Message> {
        self.slot.get()
    }

    pub fn message_mut(&mut self) -> Option<&mut dyn Message> {
        self.slot.get_mut()
    }

    /// Replaces the field with a default-initialized message and returns
    /// it.
    pub fn reset(&mut self) -> &mut dyn Message {
        self.slot.reset()
    }

    /// Clears the field; returns whether a message was present.
    pub fn erase(&mut self) -> bool {
        self.slot.erase()
    }
}

/// Shared handle to an optional sub-message field.
pub struct OptionalSubMessageRef<'m> {
    descriptor: &'static dyn MessageReflection,
    slot: &'m dyn MessageSlot,
}

impl<'m> OptionalSubMessageRef<'m> {
    pub fn new_inline<M: ReflectMessage>(field: &'m Option<M>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn new_boxed<M: ReflectMessage>(field: &'m Option<Box<M>>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn new_shared<M: ReflectMessage>(field: &'m Option<Arc<M>>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn MessageReflection {
        self.descriptor
    }

    pub fn has_value(&self) -> bool {
        self.slot.has()
    }

    pub fn message(&self) -> Option<&dyn Message> {
        self.slot.get()
    }
}

trait RepeatedMessageSlot {
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Option<&dyn Message>;
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Message>;
    fn append(&mut self) -> &mut dyn Message;
    fn clear(&mut self);
    fn reserve(&mut self, additional: usize);
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a dyn Message> + 'a>;
}

impl<M: ReflectMessage> RepeatedMessageSlot for Vec<M> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Message> {
        self.as_slice().get(index).map(|message| message as &dyn Message)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Message> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|message| message as &mut dyn Message)
    }

    fn append(&mut self) -> &mut dyn Message {
        self.push(M::default());
        self.last_mut().expect("just pushed")
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a dyn Message> + 'a> {
        Box::new(self.as_slice().iter().map(|message| message as &dyn Message))
    }
}

/// Mutable handle to a repeated sub-message field.
pub struct RepeatedSubMessage<'m> {
    descriptor: &'static dyn MessageReflection,
    slot: &'m mut dyn RepeatedMessageSlot,
}

impl<'m> RepeatedSubMessage<'m> {
    pub fn new<M: ReflectMessage>(field: &'m mut Vec<M>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn MessageReflection {
        self.descriptor
    }

    pub fn len(&self) -> usize {
        self.slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.len() == 0
    }

    pub fn clear(&mut self) {
        self.slot.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slot.reserve(additional);
    }

    /// Appends a default-initialized element and returns it.
    pub fn append(&mut self) -> &mut dyn Message {
        self.slot.append()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Message> {
        self.slot.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Message> {
        self.slot.get_mut(index)
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &dyn Message> + '_> {
        self.slot.iter()
    }
}

/// Shared handle to a repeated sub-message field.
pub struct RepeatedSubMessageRef<'m> {
    descriptor: &'static dyn MessageReflection,
    slot: &'m dyn RepeatedMessageSlot,
}

impl<'m> RepeatedSubMessageRef<'m> {
    pub fn new<M: ReflectMessage>(field: &'m Vec<M>) -> Self {
        Self {
            descriptor: M::descriptor(),
            slot: field,
        }
    }

    pub fn descriptor(&self) -> &'static dyn MessageReflection {
        self.descriptor
    }

    pub fn len(&self) -> usize {
        self.slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&dyn Message> {
        self.slot.get(index)
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &dyn Message> + '_> {
        self.slot.iter()
    }
}

/// A scalar argument for [`OneOf::set_value`].
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    F64(f64),
    F32(f32),
    Time(OffsetDateTime),
    Duration(Duration),
}

/// Shared view of the currently held oneof arm.
pub enum OneOfFieldRef<'m> {
    I32(&'m i32),
    U32(&'m u32),
    I64(&'m i64),
    U64(&'m u64),
    Bool(&'m bool),
    String(&'m str),
    Bytes(&'m [u8]),
    F64(&'m f64),
    F32(&'m f32),
    Time(&'m OffsetDateTime),
    Duration(&'m Duration),
    Enum(RawEnumRef<'m>),
    Message(RawSubMessageRef<'m>),
}

/// Mutable view of the currently held oneof arm.
pub enum OneOfFieldMut<'m> {
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

/// Implemented by generated oneof enums: a tagged union with a canonical
/// empty arm at index 0.
pub trait OneOfValue: 'static {
    /// Number of arms, the leading empty arm included.
    fn arity(&self) -> usize;

    /// Index of the held arm; 0 means empty.
    fn index(&self) -> usize;

    /// The field type of the arm at `index`. Index 0 (the empty arm) and
    /// out-of-range indexes are errors.
    fn field_type_at(&self, index: usize) -> Result<FieldType, Error>;

    fn field(&self) -> Option<OneOfFieldRef<'_>>;

    fn field_mut(&mut self) -> Option<OneOfFieldMut<'_>>;

    /// Selects the arm at `index` with a scalar value. Fails with
    /// out-of-range for bad indexes, with a precondition failure for
    /// enum or sub-message arms (those have dedicated typed setters), and
    /// with a type mismatch when the scalar does not fit the arm.
    fn set_scalar(&mut self, index: usize, value: ScalarValue) -> Result<(), Error>;

    fn clear(&mut self);
}

/// Mutable handle to a oneof field.
pub struct OneOf<'m> {
    value: &'m mut dyn OneOfValue,
}

impl<'m> OneOf<'m> {
    pub fn new<O: OneOfValue>(field: &'m mut O) -> Self {
        Self { value: field }
    }

    /// Number of alternatives, the empty arm included.
    pub fn len(&self) -> usize {
        self.value.arity()
    }

    pub fn is_empty(&self) -> bool {
        self.value.index() == 0
    }

    pub fn index(&self) -> usize {
        self.value.index()
    }

    /// The field type of the held arm, or `None` when empty.
    pub fn field_type(&self) -> Option<FieldType> {
        let index = self.value.index();
        if index == 0 {
            None
        } else {
            self.value.field_type_at(index).ok()
        }
    }

    pub fn field_type_at(&self, index: usize) -> Result<FieldType, Error> {
        self.value.field_type_at(index)
    }

    pub fn value(&self) -> Option<OneOfFieldRef<'_>> {
        self.value.field()
    }

    pub fn value_mut(&mut self) -> Option<OneOfFieldMut<'_>> {
        self.value.field_mut()
    }

    pub fn set_value(&mut self, index: usize, value: ScalarValue) -> Result<(), Error> {
        self.value.set_scalar(index, value)
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Shared handle to a oneof field.
pub struct OneOfRef<'m> {
    value: &'m dyn OneOfValue,
}

impl<'m> OneOfRef<'m> {
    pub fn new<O: OneOfValue>(field: &'m O) -> Self {
        Self { value: field }
    }

    pub fn len(&self) -> usize {
        self.value.arity()
    }

    pub fn is_empty(&self) -> bool {
        self.value.index() == 0
    }

    pub fn index(&self) -> usize {
        self.value.index()
    }

    pub fn field_type(&self) -> Option<FieldType> {
        let index = self.value.index();
        if index == 0 {
            None
        } else {
            self.value.field_type_at(index).ok()
        }
    }

    pub fn field_type_at(&self, index: usize) -> Result<FieldType, Error> {
        self.value.field_type_at(index)
    }

    pub fn value(&self) -> Option<OneOfFieldRef<'_>> {
        self.value.field()
    }
}

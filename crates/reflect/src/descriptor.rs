//! Message descriptors: the name-to-accessor tables behind the
//! reflection API.

use time::{Duration, OffsetDateTime};

use flat::FixedFlatMap;

use crate::enums::EnumReflection;
use crate::handles::{
    OneOf, OneOfRef, OptionalEnum, OptionalEnumRef, OptionalSubMessage, OptionalSubMessageRef,
    RawEnum, RawEnumRef, RawSubMessage, RawSubMessageRef, RepeatedEnum, RepeatedEnumRef,
    RepeatedSubMessage, RepeatedSubMessageRef,
};
use crate::maps::{Map, MapRef};
use crate::{Error, FieldKind, FieldType, LabeledFieldType, Message};

/// Accessors for a plain (non-handle) field: the Rust rendition of a
/// member pointer. Descriptor definition sites fill these with
/// non-capturing closures that downcast and project.
pub struct RawField<T: 'static> {
    pub get: for<'m> fn(&'m dyn Message) -> &'m T,
    pub get_mut: for<'m> fn(&'m mut dyn Message) -> &'m mut T,
}

impl<T> Clone for RawField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawField<T> {}

macro_rules! handle_access {
    ($(#[$doc:meta])* $name:ident, $descriptor:ty, $bound:ident, $bound_ref:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy)]
        pub struct $name {
            pub descriptor: $descriptor,
            pub bind: for<'m> fn(&'m mut dyn Message) -> $bound<'m>,
            pub bind_ref: for<'m> fn(&'m dyn Message) -> $bound_ref<'m>,
        }
    };
}

handle_access!(
    /// Accessors and nested descriptor of an enum-typed field.
    EnumFieldAccess, &'static dyn EnumReflection, RawEnum, RawEnumRef
);
handle_access!(
    OptionalEnumFieldAccess, &'static dyn EnumReflection, OptionalEnum, OptionalEnumRef
);
handle_access!(
    RepeatedEnumFieldAccess, &'static dyn EnumReflection, RepeatedEnum, RepeatedEnumRef
);
handle_access!(
    /// Accessors and nested descriptor of a sub-message field.
    SubMessageFieldAccess, &'static dyn MessageReflection, RawSubMessage, RawSubMessageRef
);
handle_access!(
    OptionalSubMessageFieldAccess,
    &'static dyn MessageReflection,
    OptionalSubMessage,
    OptionalSubMessageRef
);
handle_access!(
    RepeatedSubMessageFieldAccess,
    &'static dyn MessageReflection,
    RepeatedSubMessage,
    RepeatedSubMessageRef
);

/// Accessors of a map field. The nested descriptors travel inside the
/// bound handle.
#[derive(Clone, Copy)]
pub struct MapFieldAccess {
    pub bind: for<'m> fn(&'m mut dyn Message) -> Map<'m>,
    pub bind_ref: for<'m> fn(&'m dyn Message) -> MapRef<'m>,
}

/// Accessors of a oneof field.
#[derive(Clone, Copy)]
pub struct OneOfFieldAccess {
    pub bind: for<'m> fn(&'m mut dyn Message) -> OneOf<'m>,
    pub bind_ref: for<'m> fn(&'m dyn Message) -> OneOfRef<'m>,
}

/// Per-field entry of a message descriptor: a sum over every supported
/// (type x kind) combination, each arm carrying what it takes to bind a
/// field handle to an instance.
#[derive(Clone, Copy)]
pub enum FieldPointer {
    RawInt32(RawField<i32>),
    OptionalInt32(RawField<Option<i32>>),
    RepeatedInt32(RawField<Vec<i32>>),
    RawUInt32(RawField<u32>),
    OptionalUInt32(RawField<Option<u32>>),
    RepeatedUInt32(RawField<Vec<u32>>),
    RawInt64(RawField<i64>),
    OptionalInt64(RawField<Option<i64>>),
    RepeatedInt64(RawField<Vec<i64>>),
    RawUInt64(RawField<u64>),
    OptionalUInt64(RawField<Option<u64>>),
    RepeatedUInt64(RawField<Vec<u64>>),
    RawBool(RawField<bool>),
    OptionalBool(RawField<Option<bool>>),
    RepeatedBool(RawField<Vec<bool>>),
    RawString(RawField<String>),
    OptionalString(RawField<Option<String>>),
    RepeatedString(RawField<Vec<String>>),
    RawBytes(RawField<Vec<u8>>),
    OptionalBytes(RawField<Option<Vec<u8>>>),
    RepeatedBytes(RawField<Vec<Vec<u8>>>),
    RawDouble(RawField<f64>),
    OptionalDouble(RawField<Option<f64>>),
    RepeatedDouble(RawField<Vec<f64>>),
    RawFloat(RawField<f32>),
    OptionalFloat(RawField<Option<f32>>),
    RepeatedFloat(RawField<Vec<f32>>),
    RawTime(RawField<OffsetDateTime>),
    OptionalTime(RawField<Option<OffsetDateTime>>),
    RepeatedTime(RawField<Vec<OffsetDateTime>>),
    RawDuration(RawField<Duration>),
    OptionalDuration(RawField<Option<Duration>>),
    RepeatedDuration(RawField<Vec<Duration>>),
    RawEnum(EnumFieldAccess),
    OptionalEnum(OptionalEnumFieldAccess),
    RepeatedEnum(RepeatedEnumFieldAccess),
    RawSubMessage(SubMessageFieldAccess),
    OptionalSubMessage(OptionalSubMessageFieldAccess),
    RepeatedSubMessage(RepeatedSubMessageFieldAccess),
    Map(MapFieldAccess),
    OneOf(OneOfFieldAccess),
}

impl FieldPointer {
    pub fn labeled_type(&self) -> LabeledFieldType {
        match self {
            FieldPointer::RawInt32(_) => LabeledFieldType::RawInt32,
            FieldPointer::OptionalInt32(_) => LabeledFieldType::OptionalInt32,
            FieldPointer::RepeatedInt32(_) => LabeledFieldType::RepeatedInt32,
            FieldPointer::RawUInt32(_) => LabeledFieldType::RawUInt32,
            FieldPointer::OptionalUInt32(_) => LabeledFieldType::OptionalUInt32,
            FieldPointer::RepeatedUInt32(_) => LabeledFieldType::RepeatedUInt32,
            FieldPointer::RawInt64(_) => LabeledFieldType::RawInt64,
            FieldPointer::OptionalInt64(_) => LabeledFieldType::OptionalInt64,
            FieldPointer::RepeatedInt64(_) => LabeledFieldType::RepeatedInt64,
            FieldPointer::RawUInt64(_) => LabeledFieldType::RawUInt64,
            FieldPointer::OptionalUInt64(_) => LabeledFieldType::OptionalUInt64,
            FieldPointer::RepeatedUInt64(_) => LabeledFieldType::RepeatedUInt64,
            FieldPointer::RawBool(_) => LabeledFieldType::RawBool,
            FieldPointer::OptionalBool(_) => LabeledFieldType::OptionalBool,
            FieldPointer::RepeatedBool(_) => LabeledFieldType::RepeatedBool,
            FieldPointer::RawString(_) => LabeledFieldType::RawString,
            FieldPointer::OptionalString(_) => LabeledFieldType::OptionalString,
            FieldPointer::RepeatedString(_) => LabeledFieldType::RepeatedString,
            FieldPointer::RawBytes(_) => LabeledFieldType::RawBytes,
            FieldPointer::OptionalBytes(_) => LabeledFieldType::OptionalBytes,
            FieldPointer::RepeatedBytes(_) => LabeledFieldType::RepeatedBytes,
            FieldPointer::RawDouble(_) => LabeledFieldType::RawDouble,
            FieldPointer::OptionalDouble(_) => LabeledFieldType::OptionalDouble,
            FieldPointer::RepeatedDouble(_) => LabeledFieldType::RepeatedDouble,
            FieldPointer::RawFloat(_) => LabeledFieldType::RawFloat,
            FieldPointer::OptionalFloat(_) => LabeledFieldType::OptionalFloat,
            FieldPointer::RepeatedFloat(_) => LabeledFieldType::RepeatedFloat,
            FieldPointer::RawTime(_) => LabeledFieldType::RawTime,
            FieldPointer::OptionalTime(_) => LabeledFieldType::OptionalTime,
            FieldPointer::RepeatedTime(_) => LabeledFieldType::RepeatedTime,
            FieldPointer::RawDuration(_) => LabeledFieldType::RawDuration,
            FieldPointer::OptionalDuration(_) => LabeledFieldType::OptionalDuration,
            FieldPointer::RepeatedDuration(_) => LabeledFieldType::RepeatedDuration,
            FieldPointer::RawEnum(_) => LabeledFieldType::RawEnum,
            FieldPointer::OptionalEnum(_) => LabeledFieldType::OptionalEnum,
            FieldPointer::RepeatedEnum(_) => LabeledFieldType::RepeatedEnum,
            FieldPointer::RawSubMessage(_) => LabeledFieldType::RawSubMessage,
            FieldPointer::OptionalSubMessage(_) => LabeledFieldType::OptionalSubMessage,
            FieldPointer::RepeatedSubMessage(_) => LabeledFieldType::RepeatedSubMessage,
            FieldPointer::Map(_) => LabeledFieldType::Map,
            FieldPointer::OneOf(_) => LabeledFieldType::OneOf,
        }
    }
}

/// A field handle bound to a mutable instance.
pub enum FieldValue<'m> {
    RawInt32(&'m mut i32),
    OptionalInt32(&'m mut Option<i32>),
    RepeatedInt32(&'m mut Vec<i32>),
    RawUInt32(&'m mut u32),
    OptionalUInt32(&'m mut Option<u32>),
    RepeatedUInt32(&'m mut Vec<u32>),
    RawInt64(&'m mut i64),
    OptionalInt64(&'m mut Option<i64>),
    RepeatedInt64(&'m mut Vec<i64>),
    RawUInt64(&'m mut u64),
    OptionalUInt64(&'m mut Option<u64>),
    RepeatedUInt64(&'m mut Vec<u64>),
    RawBool(&'m mut bool),
    OptionalBool(&'m mut Option<bool>),
    RepeatedBool(&'m mut Vec<bool>),
    RawString(&'m mut String),
    OptionalString(&'m mut Option<String>),
    RepeatedString(&'m mut Vec<String>),
    RawBytes(&'m mut Vec<u8>),
    OptionalBytes(&'m mut Option<Vec<u8>>),
    RepeatedBytes(&'m mut Vec<Vec<u8>>),
    RawDouble(&'m mut f64),
    OptionalDouble(&'m mut Option<f64>),
    RepeatedDouble(&'m mut Vec<f64>),
    RawFloat(&'m mut f32),
    OptionalFloat(&'m mut Option<f32>),
    RepeatedFloat(&'m mut Vec<f32>),
    RawTime(&'m mut OffsetDateTime),
    OptionalTime(&'m mut Option<OffsetDateTime>),
    RepeatedTime(&'m mut Vec<OffsetDateTime>),
    RawDuration(&'m mut Duration),
    OptionalDuration(&'m mut Option<Duration>),
    RepeatedDuration(&'m mut Vec<Duration>),
    RawEnum(RawEnum<'m>),
    OptionalEnum(OptionalEnum<'m>),
    RepeatedEnum(RepeatedEnum<'m>),
    RawSubMessage(RawSubMessage<'m>),
    OptionalSubMessage(OptionalSubMessage<'m>),
    RepeatedSubMessage(RepeatedSubMessage<'m>),
    Map(Map<'m>),
    OneOf(OneOf<'m>),
}

/// A field handle bound to a shared instance.
pub enum ConstFieldValue<'m> {
    RawInt32(&'m i32),
    OptionalInt32(&'m Option<i32>),
    RepeatedInt32(&'m Vec<i32>),
    RawUInt32(&'m u32),
    OptionalUInt32(&'m Option<u32>),
    RepeatedUInt32(&'m Vec<u32>),
    RawInt64(&'m i64),
    OptionalInt64(&'m Option<i64>),
    RepeatedInt64(&'m Vec<i64>),
    RawUInt64(&'m u64),
    OptionalUInt64(&'m Option<u64>),
    RepeatedUInt64(&'m Vec<u64>),
    RawBool(&'m bool),
    OptionalBool(&'m Option<bool>),
    RepeatedBool(&'m Vec<bool>),
    RawString(&'m String),
    OptionalString(&'m Option<String>),
    RepeatedString(&'m Vec<String>),
    RawBytes(&'m Vec<u8>),
    OptionalBytes(&'m Option<Vec<u8>>),
    RepeatedBytes(&'m Vec<Vec<u8>>),
    RawDouble(&'m f64),
    OptionalDouble(&'m Option<f64>),
    RepeatedDouble(&'m Vec<f64>),
    RawFloat(&'m f32),
    OptionalFloat(&'m Option<f32>),
    RepeatedFloat(&'m Vec<f32>),
    RawTime(&'m OffsetDateTime),
    OptionalTime(&'m Option<OffsetDateTime>),
    RepeatedTime(&'m Vec<OffsetDateTime>),
    RawDuration(&'m Duration),
    OptionalDuration(&'m Option<Duration>),
    RepeatedDuration(&'m Vec<Duration>),
    RawEnum(RawEnumRef<'m>),
    OptionalEnum(OptionalEnumRef<'m>),
    RepeatedEnum(RepeatedEnumRef<'m>),
    RawSubMessage(RawSubMessageRef<'m>),
    OptionalSubMessage(OptionalSubMessageRef<'m>),
    RepeatedSubMessage(RepeatedSubMessageRef<'m>),
    Map(MapRef<'m>),
    OneOf(OneOfRef<'m>),
}

/// Object-safe facade over the message descriptors.
pub trait MessageReflection: Sync {
    /// Field names, sorted.
    fn all_field_names(&self) -> &[&'static str];

    fn required_field_names(&self) -> &[&'static str];

    fn labeled_field_type(&self, name: &str) -> Result<LabeledFieldType, Error>;

    fn field_type_and_kind(&self, name: &str) -> Result<(FieldType, FieldKind), Error> {
        Ok(self.labeled_field_type(name)?.decompose())
    }

    fn field_type(&self, name: &str) -> Result<FieldType, Error> {
        Ok(self.field_type_and_kind(name)?.0)
    }

    fn field_kind(&self, name: &str) -> Result<FieldKind, Error> {
        Ok(self.field_type_and_kind(name)?.1)
    }

    /// A fresh, default-initialized instance of the described message.
    fn create_instance(&self) -> Box<dyn Message>;

    /// The nested descriptor of an enum field; a precondition failure on
    /// any other field category.
    fn enum_field_descriptor(&self, name: &str) -> Result<&'static dyn EnumReflection, Error>;

    /// The nested descriptor of a sub-message field; a precondition
    /// failure on any other field category.
    fn sub_message_field_descriptor(
        &self,
        name: &str,
    ) -> Result<&'static dyn MessageReflection, Error>;

    fn field_value<'m>(
        &self,
        message: &'m mut dyn Message,
        name: &str,
    ) -> Result<FieldValue<'m>, Error>;

    fn const_field_value<'m>(
        &self,
        message: &'m dyn Message,
        name: &str,
    ) -> Result<ConstFieldValue<'m>, Error>;
}

/// Describes a message type with `N` fields, `R` of them required.
/// Instances are generated as process-wide constants; the field table is
/// sorted at compile time.
pub struct MessageDescriptor<const N: usize, const R: usize> {
    create: fn() -> Box<dyn Message>,
    fields: FixedFlatMap<&'static str, FieldPointer, N>,
    field_names: [&'static str; N],
    required: [&'static str; R],
}

impl<const N: usize, const R: usize> MessageDescriptor<N, R> {
    pub const fn new(
        create: fn() -> Box<dyn Message>,
        fields: [(&'static str, FieldPointer); N],
        required: [&'static str; R],
    ) -> Self {
        let fields = FixedFlatMap::<&'static str, FieldPointer, N>::from_entries(fields);
        let mut field_names = [""; N];
        let sorted = fields.as_slice();
        let mut i = 0;
        while i < N {
            field_names[i] = sorted[i].0;
            i += 1;
        }
        Self {
            create,
            fields,
            field_names,
            required,
        }
    }

    fn pointer(&self, name: &str) -> Result<&FieldPointer, Error> {
        self.fields
            .get(name)
            .ok_or_else(|| Error::UnknownField(name.to_owned()))
    }
}

impl<const N: usize, const R: usize> MessageReflection for MessageDescriptor<N, R> {
    fn all_field_names(&self) -> &[&'static str] {
        &self.field_names
    }

    fn required_field_names(&self) -> &[&'static str] {
        &self.required
    }

    fn labeled_field_type(&self, name: &str) -> Result<LabeledFieldType, Error> {
        Ok(self.pointer(name)?.labeled_type())
    }

    fn create_instance(&self) -> Box<dyn Message> {
        (self.create)()
    }

    fn enum_field_descriptor(&self, name: &str) -> Result<&'static dyn EnumReflection, Error> {
        match self.pointer(name)? {
            FieldPointer::RawEnum(access) => Ok(access.descriptor),
            FieldPointer::OptionalEnum(access) => Ok(access.descriptor),
            FieldPointer::RepeatedEnum(access) => Ok(access.descriptor),
            _ => Err(Error::NotAnEnumField),
        }
    }

    fn sub_message_field_descriptor(
        &self,
        name: &str,
    ) -> Result<&'static dyn MessageReflection, Error> {
        match self.pointer(name)? {
            FieldPointer::RawSubMessage(access) => Ok(access.descriptor),
            FieldPointer::OptionalSubMessage(access) => Ok(access.descriptor),
            FieldPointer::RepeatedSubMessage(access) => Ok(access.descriptor),
            _ => Err(Error::NotASubMessageField),
        }
    }

    fn field_value<'m>(
        &self,
        message: &'m mut dyn Message,
        name: &str,
    ) -> Result<FieldValue<'m>, Error> {
        Ok(match self.pointer(name)? {
            FieldPointer::RawInt32(f) => FieldValue::RawInt32((f.get_mut)(message)),
            FieldPointer::OptionalInt32(f) => FieldValue::OptionalInt32((f.get_mut)(message)),
            FieldPointer::RepeatedInt32(f) => FieldValue::RepeatedInt32((f.get_mut)(message)),
            FieldPointer::RawUInt32(f) => FieldValue::RawUInt32((f.get_mut)(message)),
            FieldPointer::OptionalUInt32(f) => FieldValue::OptionalUInt32((f.get_mut)(message)),
            FieldPointer::RepeatedUInt32(f) => FieldValue::RepeatedUInt32((f.get_mut)(message)),
            FieldPointer::RawInt64(f) => FieldValue::RawInt64((f.get_mut)(message)),
            FieldPointer::OptionalInt64(f) => FieldValue::OptionalInt64((f.get_mut)(message)),
            FieldPointer::RepeatedInt64(f) => FieldValue::RepeatedInt64((f.get_mut)(message)),
            FieldPointer::RawUInt64(f) => FieldValue::RawUInt64((f.get_mut)(message)),
            FieldPointer::OptionalUInt64(f) => FieldValue::OptionalUInt64((f.get_mut)(message)),
            FieldPointer::RepeatedUInt64(f) => FieldValue::RepeatedUInt64((f.get_mut)(message)),
            FieldPointer::RawBool(f) => FieldValue::RawBool((f.get_mut)(message)),
            FieldPointer::OptionalBool(f) => FieldValue::OptionalBool((f.get_mut)(message)),
            FieldPointer::RepeatedBool(f) => FieldValue::RepeatedBool((f.get_mut)(message)),
            FieldPointer::RawString(f) => FieldValue::RawString((f.get_mut)(message)),
            FieldPointer::OptionalString(f) => FieldValue::OptionalString((f.get_mut)(message)),
            FieldPointer::RepeatedString(f) => FieldValue::RepeatedString((f.get_mut)(message)),
            FieldPointer::RawBytes(f) => FieldValue::RawBytes((f.get_mut)(message)),
            FieldPointer::OptionalBytes(f) => FieldValue::OptionalBytes((f.get_mut)(message)),
            FieldPointer::RepeatedBytes(f) => FieldValue::RepeatedBytes((f.get_mut)(message)),
            FieldPointer::RawDouble(f) => FieldValue::RawDouble((f.get_mut)(message)),
            FieldPointer::OptionalDouble(f) => FieldValue::OptionalDouble((f.get_mut)(message)),
            FieldPointer::RepeatedDouble(f) => FieldValue::RepeatedDouble((f.get_mut)(message)),
            FieldPointer::RawFloat(f) => FieldValue::RawFloat((f.get_mut)(message)),
            FieldPointer::OptionalFloat(f) => FieldValue::OptionalFloat((f.get_mut)(message)),
            FieldPointer::RepeatedFloat(f) => FieldValue::RepeatedFloat((f.get_mut)(message)),
            FieldPointer::RawTime(f) => FieldValue::RawTime((f.get_mut)(message)),
            FieldPointer::OptionalTime(f) => FieldValue::OptionalTime((f.get_mut)(message)),
            FieldPointer::RepeatedTime(f) => FieldValue::RepeatedTime((f.get_mut)(message)),
            FieldPointer::RawDuration(f) => FieldValue::RawDuration((f.get_mut)(message)),
            FieldPointer::OptionalDuration(f) => FieldValue::OptionalDuration((f.get_mut)(message)),
            FieldPointer::RepeatedDuration(f) => FieldValue::RepeatedDuration((f.get_mut)(message)),
            FieldPointer::RawEnum(f) => FieldValue::RawEnum((f.bind)(message)),
            FieldPointer::OptionalEnum(f) => FieldValue::OptionalEnum((f.bind)(message)),
            FieldPointer::RepeatedEnum(f) => FieldValue::RepeatedEnum((f.bind)(message)),
            FieldPointer::RawSubMessage(f) => FieldValue::RawSubMessage((f.bind)(message)),
            FieldPointer::OptionalSubMessage(f) => {
                FieldValue::OptionalSubMessage((f.bind)(message))
            }
            FieldPointer::RepeatedSubMessage(f) => {
                FieldValue::RepeatedSubMessage((f.bind)(message))
            }
            FieldPointer::Map(f) => FieldValue::Map((f.bind)(message)),
            FieldPointer::OneOf(f) => FieldValue::OneOf((f.bind)(message)),
        })
    }

    fn const_field_value<'m>(
        &self,
        message: &'m dyn Message,
        name: &str,
    ) -> Result<ConstFieldValue<'m>, Error> {
        Ok(match self.pointer(name)? {
            FieldPointer::RawInt32(f) => ConstFieldValue::RawInt32((f.get)(message)),
            FieldPointer::OptionalInt32(f) => ConstFieldValue::OptionalInt32((f.get)(message)),
            FieldPointer::RepeatedInt32(f) => ConstFieldValue::RepeatedInt32((f.get)(message)),
            FieldPointer::RawUInt32(f) => ConstFieldValue::RawUInt32((f.get)(message)),
            FieldPointer::OptionalUInt32(f) => ConstFieldValue::OptionalUInt32((f.get)(message)),
            FieldPointer::RepeatedUInt32(f) => ConstFieldValue::RepeatedUInt32((f.get)(message)),
            FieldPointer::RawInt64(f) => ConstFieldValue::RawInt64((f.get)(message)),
            FieldPointer::OptionalInt64(f) => ConstFieldValue::OptionalInt64((f.get)(message)),
            FieldPointer::RepeatedInt64(f) => ConstFieldValue::RepeatedInt64((f.get)(message)),
            FieldPointer::RawUInt64(f) => ConstFieldValue::RawUInt64((f.get)(message)),
            FieldPointer::OptionalUInt64(f) => ConstFieldValue::OptionalUInt64((f.get)(message)),
            FieldPointer::RepeatedUInt64(f) => ConstFieldValue::RepeatedUInt64((f.get)(message)),
            FieldPointer::RawBool(f) => ConstFieldValue::RawBool((f.get)(message)),
            FieldPointer::OptionalBool(f) => ConstFieldValue::OptionalBool((f.get)(message)),
            FieldPointer::RepeatedBool(f) => ConstFieldValue::RepeatedBool((f.get)(message)),
            FieldPointer::RawString(f) => ConstFieldValue::RawString((f.get)(message)),
            FieldPointer::OptionalString(f) => ConstFieldValue::OptionalString((f.get)(message)),
            FieldPointer::RepeatedString(f) => ConstFieldValue::RepeatedString((f.get)(message)),
            FieldPointer::RawBytes(f) => ConstFieldValue::RawBytes((f.get)(message)),
            FieldPointer::OptionalBytes(f) => ConstFieldValue::OptionalBytes((f.get)(message)),
            FieldPointer::RepeatedBytes(f) => ConstFieldValue::RepeatedBytes((f.get)(message)),
            FieldPointer::RawDouble(f) => ConstFieldValue::RawDouble((f.get)(message)),
            FieldPointer::OptionalDouble(f) => ConstFieldValue::OptionalDouble((f.get)(message)),
            FieldPointer::RepeatedDouble(f) => ConstFieldValue::RepeatedDouble((f.get)(message)),
            FieldPointer::RawFloat(f) => ConstFieldValue::RawFloat((f.get)(message)),
            FieldPointer::OptionalFloat(f) => ConstFieldValue::OptionalFloat((f.get)(message)),
            FieldPointer::RepeatedFloat(f) => ConstFieldValue::RepeatedFloat((f.get)(message)),
            FieldPointer::RawTime(f) => ConstFieldValue::RawTime((f.get)(message)),
            FieldPointer::OptionalTime(f) => ConstFieldValue::OptionalTime((f.get)(message)),
            FieldPointer::RepeatedTime(f) => ConstFieldValue::RepeatedTime((f.get)(message)),
            FieldPointer::RawDuration(f) => ConstFieldValue::RawDuration((f.get)(message)),
            FieldPointer::OptionalDuration(f) => {
                ConstFieldValue::OptionalDuration((f.get)(message))
            }
            FieldPointer::RepeatedDuration(f) => {
                ConstFieldValue::RepeatedDuration((f.get)(message))
            }
            FieldPointer::RawEnum(f) => ConstFieldValue::RawEnum((f.bind_ref)(message)),
            FieldPointer::OptionalEnum(f) => ConstFieldValue::OptionalEnum((f.bind_ref)(message)),
            FieldPointer::RepeatedEnum(f) => ConstFieldValue::RepeatedEnum((f.bind_ref)(message)),
            FieldPointer::RawSubMessage(f) => {
                ConstFieldValue::RawSubMessage((f.bind_ref)(message))
            }
            FieldPointer::OptionalSubMessage(f) => {
                ConstFieldValue::OptionalSubMessage((f.bind_ref)(message))
            }
            FieldPointer::RepeatedSubMessage(f) => {
                ConstFieldValue::RepeatedSubMessage((f.bind_ref)(message))
            }
            FieldPointer::Map(f) => ConstFieldValue::Map((f.bind_ref)(message)),
            FieldPointer::OneOf(f) => ConstFieldValue::OneOf((f.bind_ref)(message)),
        })
    }
}

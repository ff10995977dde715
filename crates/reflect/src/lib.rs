//! Runtime reflection over generated message types.
//!
//! The model lets generic code traverse and mutate any supported value
//! without compile-time knowledge of its exact type. A generated message
//! implements [`Message`] and carries a process-wide
//! [`MessageDescriptor`] constant; the descriptor maps field names to
//! type-erased accessors and materializes *field handles* bound to a
//! concrete instance: small proxies bundling a pointer to the field with
//! the descriptor needed to interpret it.
//!
//! The reflection API is not thread-safe, only thread-friendly: handles
//! borrow the instance they were obtained from, and the usual single
//! writer / many readers discipline applies (enforced by the borrow
//! checker for any single instance).
//!
//! The [`text`] module drives this model to populate messages from the
//! protobuf-like text format.

pub mod text;

mod descriptor;
mod enums;
mod handles;
mod maps;

pub use descriptor::{
    ConstFieldValue, EnumFieldAccess, FieldPointer, FieldValue, MapFieldAccess, MessageDescriptor,
    MessageReflection, OneOfFieldAccess, OptionalEnumFieldAccess, OptionalSubMessageFieldAccess,
    RawField, RepeatedEnumFieldAccess, RepeatedSubMessageFieldAccess, SubMessageFieldAccess,
};
pub use enums::{EnumDescriptor, EnumReflection, ReflectEnum};
pub use handles::{
    OneOf, OneOfFieldMut, OneOfFieldRef, OneOfRef, OneOfValue, OptionalEnum, OptionalEnumRef,
    OptionalSubMessage, OptionalSubMessageRef, RawEnum, RawEnumRef, RawSubMessage,
    RawSubMessageRef, RepeatedEnum, RepeatedEnumRef, RepeatedSubMessage, RepeatedSubMessageRef,
    ScalarValue,
};
pub use maps::{
    Map, MapKey, MapKeyType, MapOps, MapRef, MapShape, MapValueMut, MapValueRef, MapValueType,
};

use std::any::Any;

/// Implemented by every generated message type.
pub trait Message: Any + std::fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A generated message that knows its own descriptor.
pub trait ReflectMessage: Message + Default + Clone {
    fn descriptor() -> &'static dyn MessageReflection;
}

/// Recovers the concrete message behind a type-erased reference.
///
/// Descriptors only ever bind accessors to instances of their own message
/// type, so a mismatch here is a caller contract violation and aborts.
pub fn downcast<M: Message>(message: &dyn Message) -> &M {
    message.as_any().downcast_ref::<M>().expect("message type mismatch")
}

pub fn downcast_mut<M: Message>(message: &mut dyn Message) -> &mut M {
    message.as_any_mut().downcast_mut::<M>().expect("message type mismatch")
}

/// Describes the nested value of a map value or oneof arm:
/// [`ValueDescriptor::Void`] for primitives, or the enum / sub-message
/// descriptor otherwise.
#[derive(Clone, Copy)]
pub enum ValueDescriptor {
    Void,
    Enum(&'static dyn EnumReflection),
    Message(&'static dyn MessageReflection),
}

/// The placeholder descriptor of primitive arms.
pub const VOID_DESCRIPTOR: ValueDescriptor = ValueDescriptor::Void;

/// The value type of a field, ignoring its kind.
// The numbering is load-bearing: `LabeledFieldType` decomposes into
// (`FieldType`, `FieldKind`) arithmetically. Do not reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum FieldType {
    Int32 = 0,
    UInt32 = 1,
    Int64 = 2,
    UInt64 = 3,
    Bool = 4,
    String = 5,
    Bytes = 6,
    Double = 7,
    Float = 8,
    Time = 9,
    Duration = 10,
    Enum = 11,
    SubMessage = 12,
    Map = 13,
    OneOf = 14,
}

impl FieldType {
    fn from_index(index: i8) -> FieldType {
        match index {
            0 => FieldType::Int32,
            1 => FieldType::UInt32,
            2 => FieldType::Int64,
            3 => FieldType::UInt64,
            4 => FieldType::Bool,
            5 => FieldType::String,
            6 => FieldType::Bytes,
            7 => FieldType::Double,
            8 => FieldType::Float,
            9 => FieldType::Time,
            10 => FieldType::Duration,
            11 => FieldType::Enum,
            12 => FieldType::SubMessage,
            13 => FieldType::Map,
            _ => FieldType::OneOf,
        }
    }
}

/// The kind (cardinality) of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum FieldKind {
    Raw = 0,
    Optional = 1,
    Repeated = 2,
    Map = 3,
    OneOf = 4,
}

/// Type and kind fused into a single label. For non-map, non-oneof fields
/// the numbering is such that `labeled / 3` is the [`FieldType`] and
/// `labeled % 3` the [`FieldKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum LabeledFieldType {
    RawInt32 = 0,
    OptionalInt32 = 1,
    RepeatedInt32 = 2,
    RawUInt32 = 3,
    OptionalUInt32 = 4,
    RepeatedUInt32 = 5,
    RawInt64 = 6,
    OptionalInt64 = 7,
    RepeatedInt64 = 8,
    RawUInt64 = 9,
    OptionalUInt64 = 10,
    RepeatedUInt64 = 11,
    RawBool = 12,
    OptionalBool = 13,
    RepeatedBool = 14,
    RawString = 15,
    OptionalString = 16,
    RepeatedString = 17,
    RawBytes = 18,
    OptionalBytes = 19,
    RepeatedBytes = 20,
    RawDouble = 21,
    OptionalDouble = 22,
    RepeatedDouble = 23,
    RawFloat = 24,
    OptionalFloat = 25,
    RepeatedFloat = 26,
    RawTime = 27,
    OptionalTime = 28,
    RepeatedTime = 29,
    RawDuration = 30,
    OptionalDuration = 31,
    RepeatedDuration = 32,
    RawEnum = 33,
    OptionalEnum = 34,
    RepeatedEnum = 35,
    RawSubMessage = 36,
    OptionalSubMessage = 37,
    RepeatedSubMessage = 38,
    Map = 39,
    OneOf = 40,
}

impl LabeledFieldType {
    pub fn decompose(self) -> (FieldType, FieldKind) {
        match self {
            LabeledFieldType::Map => (FieldType::Map, FieldKind::Map),
            LabeledFieldType::OneOf => (FieldType::OneOf, FieldKind::OneOf),
            other => {
                let index = other as i8;
                let kind = match index % 3 {
                    0 => FieldKind::Raw,
                    1 => FieldKind::Optional,
                    _ => FieldKind::Repeated,
                };
                (FieldType::from_index(index / 3), kind)
            }
        }
    }

    pub fn field_type(self) -> FieldType {
        self.decompose().0
    }

    pub fn field_kind(self) -> FieldKind {
        self.decompose().1
    }
}

/// Coarse classification of an [`Error`], mirroring the status codes of
/// the original service stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    InvalidArgument,
    FailedPrecondition,
    OutOfRange,
    Unimplemented,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid enum value name: {0:?}")]
    InvalidEnumName(String),
    #[error("unknown enum value: {0}")]
    UnknownEnumValue(i64),
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("not an enum field")]
    NotAnEnumField,
    #[error("not a sub-message field")]
    NotASubMessageField,
    #[error("invalid key type")]
    KeyTypeMismatch,
    #[error("invalid oneof variant index")]
    OneOfIndexOutOfRange,
    #[error("index out of range")]
    IndexOutOfRange,
    #[error("use the dedicated enum setter for enum oneof arms")]
    OneOfEnumArm,
    #[error("use the dedicated sub-message setter for sub-message oneof arms")]
    OneOfSubMessageArm,
    #[error("oneof arm type mismatch")]
    OneOfTypeMismatch,
    #[error("invalid syntax")]
    Syntax,
    #[error("invalid format")]
    Format,
    #[error("invalid escape sequence {0:?}")]
    BadEscape(char),
    #[error("field {0:?} specified multiple times")]
    DuplicateField(String),
    #[error("duplicate map key")]
    DuplicateMapKey,
    #[error("multi-byte unicode escapes are not implemented")]
    UnimplementedEscape,
}

impl Error {
    pub fn code(&self) -> StatusCode {
        match self {
            Error::InvalidEnumName(_)
            | Error::UnknownEnumValue(_)
            | Error::UnknownField(_)
            | Error::Syntax
            | Error::Format
            | Error::BadEscape(_)
            | Error::DuplicateField(_)
            | Error::DuplicateMapKey => StatusCode::InvalidArgument,
            Error::NotAnEnumField
            | Error::NotASubMessageField
            | Error::KeyTypeMismatch
            | Error::OneOfEnumArm
            | Error::OneOfSubMessageArm
            | Error::OneOfTypeMismatch => StatusCode::FailedPrecondition,
            Error::OneOfIndexOutOfRange | Error::IndexOutOfRange => StatusCode::OutOfRange,
            Error::UnimplementedEscape => StatusCode::Unimplemented,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{FieldKind, FieldType, LabeledFieldType};

    #[test]
    fn test_labeled_type_decomposition() {
        assert_eq!(
            LabeledFieldType::RawInt32.decompose(),
            (FieldType::Int32, FieldKind::Raw)
        );
        assert_eq!(
            LabeledFieldType::OptionalString.decompose(),
            (FieldType::String, FieldKind::Optional)
        );
        assert_eq!(
            LabeledFieldType::RepeatedDuration.decompose(),
            (FieldType::Duration, FieldKind::Repeated)
        );
        assert_eq!(
            LabeledFieldType::RepeatedSubMessage.decompose(),
            (FieldType::SubMessage, FieldKind::Repeated)
        );
        assert_eq!(LabeledFieldType::Map.decompose(), (FieldType::Map, FieldKind::Map));
        assert_eq!(
            LabeledFieldType::OneOf.decompose(),
            (FieldType::OneOf, FieldKind::OneOf)
        );
    }
}

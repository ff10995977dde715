//! A hand-written rendition of what the code generator emits for a test
//! schema: message structs, enum and message descriptors, and the oneof
//! plumbing.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use fxhash::FxHashMap;

use reflect::{
    downcast, downcast_mut, EnumDescriptor, EnumFieldAccess, EnumReflection, FieldPointer,
    FieldType, Map, MapFieldAccess, MapRef, Message, MessageDescriptor, MessageReflection, OneOf,
    OneOfFieldAccess, OneOfFieldMut, OneOfFieldRef, OneOfRef, OneOfValue, OptionalEnum,
    OptionalEnumFieldAccess, OptionalEnumRef, OptionalSubMessage, OptionalSubMessageFieldAccess,
    OptionalSubMessageRef, RawEnum, RawEnumRef, RawField, RawSubMessage, RawSubMessageRef,
    ReflectEnum, ReflectMessage, RepeatedEnum, RepeatedEnumFieldAccess, RepeatedEnumRef,
    RepeatedSubMessage, RepeatedSubMessageFieldAccess, RepeatedSubMessageRef, ScalarValue,
    SubMessageFieldAccess,
};
use trie::TrieMap;

use reflect::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mood {
    #[default]
    Unknown = 0,
    Happy = 1,
    Grumpy = 2,
    // Deliberately not listed in the descriptor.
    Secret = 99,
}

pub static MOOD_DESCRIPTOR: EnumDescriptor<3> =
    EnumDescriptor::new([("UNKNOWN", 0), ("HAPPY", 1), ("GRUMPY", 2)]);

impl ReflectEnum for Mood {
    fn descriptor() -> &'static dyn EnumReflection {
        &MOOD_DESCRIPTOR
    }

    fn from_repr(value: i64) -> Option<Self> {
        match value {
            0 => Some(Mood::Unknown),
            1 => Some(Mood::Happy),
            2 => Some(Mood::Grumpy),
            99 => Some(Mood::Secret),
            _ => None,
        }
    }

    fn repr(self) -> i64 {
        self as i64
    }
}

reflect::impl_map_value_for_enum!(Mood);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inner {
    pub label: String,
    pub count: i32,
}

impl Message for Inner {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub static INNER_DESCRIPTOR: MessageDescriptor<2, 0> = MessageDescriptor::new(
    || Box::<Inner>::default(),
    [
        (
            "label",
            FieldPointer::RawString(RawField {
                get: |m| &downcast::<Inner>(m).label,
                get_mut: |m| &mut downcast_mut::<Inner>(m).label,
            }),
        ),
        (
            "count",
            FieldPointer::RawInt32(RawField {
                get: |m| &downcast::<Inner>(m).count,
                get_mut: |m| &mut downcast_mut::<Inner>(m).count,
            }),
        ),
    ],
    [],
);

impl ReflectMessage for Inner {
    fn descriptor() -> &'static dyn MessageReflection {
        &INNER_DESCRIPTOR
    }
}

reflect::impl_map_value_for_message!(Inner);

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Shape {
    #[default]
    Empty,
    Circle(f64),
    Name(String),
    Tag(Mood),
}

impl OneOfValue for Shape {
    fn arity(&self) -> usize {
        4
    }

    fn index(&self) -> usize {
        match self {
            Shape::Empty => 0,
            Shape::Circle(_) => 1,
            Shape::Name(_) => 2,
            Shape::Tag(_) => 3,
        }
    }

    fn field_type_at(&self, index: usize) -> Result<FieldType, Error> {
        match index {
            1 => Ok(FieldType::Double),
            2 => Ok(FieldType::String),
            3 => Ok(FieldType::Enum),
            _ => Err(Error::OneOfIndexOutOfRange),
        }
    }

    fn field(&self) -> Option<OneOfFieldRef<'_>> {
        match self {
            Shape::Empty => None,
            Shape::Circle(value) => Some(OneOfFieldRef::F64(value)),
            Shape::Name(value) => Some(OneOfFieldRef::String(value)),
            Shape::Tag(value) => Some(OneOfFieldRef::Enum(RawEnumRef::new(value))),
        }
    }

    fn field_mut(&mut self) -> Option<OneOfFieldMut<'_>> {
        match self {
            Shape::Empty => None,
            Shape::Circle(value) => Some(OneOfFieldMut::F64(value)),
            Shape::Name(value) => Some(OneOfFieldMut::String(value)),
            Shape::Tag(value) => Some(OneOfFieldMut::Enum(RawEnum::new(value))),
        }
    }

    fn set_scalar(&mut self, index: usize, value: ScalarValue) -> Result<(), Error> {
        match index {
            1 => match value {
                ScalarValue::F64(value) => {
                    *self = Shape::Circle(value);
                    Ok(())
                }
                _ => Err(Error::OneOfTypeMismatch),
            },
            2 => match value {
                ScalarValue::String(value) => {
                    *self = Shape::Name(value);
                    Ok(())
                }
                _ => Err(Error::OneOfTypeMismatch),
            },
            3 => Err(Error::OneOfEnumArm),
            _ => Err(Error::OneOfIndexOutOfRange),
        }
    }

    fn clear(&mut self) {
        *self = Shape::Empty;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestMessage {
    pub id: i32,
    pub label: String,
    pub ratio: Option<f64>,
    pub tags: Vec<String>,
    pub flag: bool,
    pub payload: Vec<u8>,
    pub mood: Mood,
    pub maybe_mood: Option<Mood>,
    pub moods: Vec<Mood>,
    pub inner: Inner,
    pub maybe_inner: Option<Inner>,
    pub boxed_inner: Option<Box<Inner>>,
    pub shared_inner: Option<Arc<Inner>>,
    pub inners: Vec<Inner>,
    pub counters: BTreeMap<String, i64>,
    // An unordered shape riding the hasher-generic adapter.
    pub lookup: FxHashMap<i32, String>,
    pub by_name: TrieMap<i32>,
    pub shape: Shape,
}

impl Message for TestMessage {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub static TEST_MESSAGE_DESCRIPTOR: MessageDescriptor<18, 2> = MessageDescriptor::new(
    || Box::<TestMessage>::default(),
    [
        (
            "id",
            FieldPointer::RawInt32(RawField {
                get: |m| &downcast::<TestMessage>(m).id,
                get_mut: |m| &mut downcast_mut::<TestMessage>(m).id,
            }),
        ),
        (
            "label",
            FieldPointer::RawString(RawField {
                get: |m| &downcast::<TestMessage>(m).label,
                get_mut: |m| &mut downcast_mut::<TestMessage>(m).label,
            }),
        ),
        (
            "ratio",
            FieldPointer::OptionalDouble(RawField {
                get: |m| &downcast::<TestMessage>(m).ratio,
                get_mut: |m| &mut downcast_mut::<TestMessage>(m).ratio,
            }),
        ),
        (
            "tags",
            FieldPointer::RepeatedString(RawField {
                get: |m| &downcast::<TestMessage>(m).tags,
                get_mut: |m| &mut downcast_mut::<TestMessage>(m).tags,
            }),
        ),
        (
            "flag",
            FieldPointer::RawBool(RawField {
                get: |m| &downcast::<TestMessage>(m).flag,
                get_mut: |m| &mut downcast_mut::<TestMessage>(m).flag,
            }),
        ),
        (
            "payload",
            FieldPointer::RawBytes(RawField {
                get: |m| &downcast::<TestMessage>(m).payload,
                get_mut: |m| &mut downcast_mut::<TestMessage>(m).payload,
            }),
        ),
        (
            "mood",
            FieldPointer::RawEnum(EnumFieldAccess {
                descriptor: &MOOD_DESCRIPTOR,
                bind: |m| RawEnum::new(&mut downcast_mut::<TestMessage>(m).mood),
                bind_ref: |m| RawEnumRef::new(&downcast::<TestMessage>(m).mood),
            }),
        ),
        (
            "maybe_mood",
            FieldPointer::OptionalEnum(OptionalEnumFieldAccess {
                descriptor: &MOOD_DESCRIPTOR,
                bind: |m| OptionalEnum::new(&mut downcast_mut::<TestMessage>(m).maybe_mood),
                bind_ref: |m| OptionalEnumRef::new(&downcast::<TestMessage>(m).maybe_mood),
            }),
        ),
        (
            "moods",
            FieldPointer::RepeatedEnum(RepeatedEnumFieldAccess {
                descriptor: &MOOD_DESCRIPTOR,
                bind: |m| RepeatedEnum::new(&mut downcast_mut::<TestMessage>(m).moods),
                bind_ref: |m| RepeatedEnumRef::new(&downcast::<TestMessage>(m).moods),
            }),
        ),
        (
            "inner",
            FieldPointer::RawSubMessage(SubMessageFieldAccess {
                descriptor: &INNER_DESCRIPTOR,
                bind: |m| RawSubMessage::new(&mut downcast_mut::<TestMessage>(m).inner),
                bind_ref: |m| RawSubMessageRef::new(&downcast::<TestMessage>(m).inner),
            }),
        ),
        (
            "maybe_inner",
            FieldPointer::OptionalSubMessage(OptionalSubMessageFieldAccess {
                descriptor: &INNER_DESCRIPTOR,
                bind: |m| {
                    OptionalSubMessage::new_inline(&mut downcast_mut::<TestMessage>(m).maybe_inner)
                },
                bind_ref: |m| {
                    OptionalSubMessageRef::new_inline(&downcast::<TestMessage>(m).maybe_inner)
                },
            }),
        ),
        (
            "boxed_inner",
            FieldPointer::OptionalSubMessage(OptionalSubMessageFieldAccess {
                descriptor: &INNER_DESCRIPTOR,
                bind: |m| {
                    OptionalSubMessage::new_boxed(&mut downcast_mut::<TestMessage>(m).boxed_inner)
                },
                bind_ref: |m| {
                    OptionalSubMessageRef::new_boxed(&downcast::<TestMessage>(m).boxed_inner)
                },
            }),
        ),
        (
            "shared_inner",
            FieldPointer::OptionalSubMessage(OptionalSubMessageFieldAccess {
                descriptor: &INNER_DESCRIPTOR,
                bind: |m| {
                    OptionalSubMessage::new_shared(&mut downcast_mut::<TestMessage>(m).shared_inner)
                },
                bind_ref: |m| {
                    OptionalSubMessageRef::new_shared(&downcast::<TestMessage>(m).shared_inner)
                },
            }),
        ),
        (
            "inners",
            FieldPointer::RepeatedSubMessage(RepeatedSubMessageFieldAccess {
                descriptor: &INNER_DESCRIPTOR,
                bind: |m| RepeatedSubMessage::new(&mut downcast_mut::<TestMessage>(m).inners),
                bind_ref: |m| RepeatedSubMessageRef::new(&downcast::<TestMessage>(m).inners),
            }),
        ),
        (
            "counters",
            FieldPointer::Map(MapFieldAccess {
                bind: |m| Map::new(&mut downcast_mut::<TestMessage>(m).counters),
                bind_ref: |m| MapRef::new(&downcast::<TestMessage>(m).counters),
            }),
        ),
        (
            "lookup",
            FieldPointer::Map(MapFieldAccess {
                bind: |m| Map::new(&mut downcast_mut::<TestMessage>(m).lookup),
                bind_ref: |m| MapRef::new(&downcast::<TestMessage>(m).lookup),
            }),
        ),
        (
            "by_name",
            FieldPointer::Map(MapFieldAccess {
                bind: |m| Map::new(&mut downcast_mut::<TestMessage>(m).by_name),
                bind_ref: |m| MapRef::new(&downcast::<TestMessage>(m).by_name),
            }),
        ),
        (
            "shape",
            FieldPointer::OneOf(OneOfFieldAccess {
                bind: |m| OneOf::new(&mut downcast_mut::<TestMessage>(m).shape),
                bind_ref: |m| OneOfRef::new(&downcast::<TestMessage>(m).shape),
            }),
        ),
    ],
    ["id", "label"],
);

impl ReflectMessage for TestMessage {
    fn descriptor() -> &'static dyn MessageReflection {
        &TEST_MESSAGE_DESCRIPTOR
    }
}

mod support;

use pretty_assertions::assert_eq;
use reflect::{
    ConstFieldValue, Error, FieldKind, FieldType, FieldValue, MapKey, MapValueMut, MapValueRef,
    MessageReflection, OneOfFieldRef, ReflectMessage, ScalarValue, StatusCode,
};
use support::{Inner, Mood, Shape, TestMessage, TEST_MESSAGE_DESCRIPTOR};

fn descriptor() -> &'static dyn MessageReflection {
    &TEST_MESSAGE_DESCRIPTOR
}

#[test]
fn test_field_names_are_sorted() {
    let names = descriptor().all_field_names();
    assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(names.len(), 18);
    assert_eq!(descriptor().required_field_names(), &["id", "label"]);
}

#[test]
fn test_field_type_and_kind_queries() {
    let d = descriptor();
    assert_eq!(d.field_type_and_kind("id"), Ok((FieldType::Int32, FieldKind::Raw)));
    assert_eq!(d.field_type_and_kind("ratio"), Ok((FieldType::Double, FieldKind::Optional)));
    assert_eq!(d.field_type_and_kind("tags"), Ok((FieldType::String, FieldKind::Repeated)));
    assert_eq!(d.field_type_and_kind("mood"), Ok((FieldType::Enum, FieldKind::Raw)));
    assert_eq!(d.field_type_and_kind("inners"), Ok((FieldType::SubMessage, FieldKind::Repeated)));
    assert_eq!(d.field_type_and_kind("counters"), Ok((FieldType::Map, FieldKind::Map)));
    assert_eq!(d.field_type_and_kind("shape"), Ok((FieldType::OneOf, FieldKind::OneOf)));
    assert_eq!(
        d.field_type("nonexistent"),
        Err(Error::UnknownField("nonexistent".to_owned()))
    );
    assert_eq!(
        d.field_type("nonexistent").unwrap_err().code(),
        StatusCode::InvalidArgument
    );
}

#[test]
fn test_scalar_field_access() {
    let mut message = TestMessage::default();
    match descriptor().field_value(&mut message, "id").unwrap() {
        FieldValue::RawInt32(slot) => *slot = 42,
        _ => panic!("wrong handle"),
    }
    match descriptor().field_value(&mut message, "tags").unwrap() {
        FieldValue::RepeatedString(slot) => slot.push("lorem".to_owned()),
        _ => panic!("wrong handle"),
    }
    assert_eq!(message.id, 42);
    assert_eq!(message.tags, vec!["lorem".to_owned()]);

    match descriptor().const_field_value(&message, "id").unwrap() {
        ConstFieldValue::RawInt32(slot) => assert_eq!(*slot, 42),
        _ => panic!("wrong handle"),
    }
}

#[test]
fn test_enum_handles() {
    let mut message = TestMessage::default();

    match descriptor().field_value(&mut message, "mood").unwrap() {
        FieldValue::RawEnum(mut handle) => {
            assert_eq!(handle.name(), Ok("UNKNOWN"));
            handle.set_by_name("HAPPY").unwrap();
            assert_eq!(handle.underlying_value(), 1);
            assert_eq!(
                handle.set_by_name("MAUVE"),
                Err(Error::InvalidEnumName("MAUVE".to_owned()))
            );
        }
        _ => panic!("wrong handle"),
    }
    assert_eq!(message.mood, Mood::Happy);

    // A value outside the descriptor is representable but unnamed.
    message.mood = Mood::Secret;
    match descriptor().field_value(&mut message, "mood").unwrap() {
        FieldValue::RawEnum(handle) => {
            assert!(!handle.has_known_value());
            assert_eq!(handle.underlying_value(), 99);
            assert_eq!(handle.name(), Err(Error::UnknownEnumValue(99)));
        }
        _ => panic!("wrong handle"),
    }

    match descriptor().field_value(&mut message, "maybe_mood").unwrap() {
        FieldValue::OptionalEnum(mut handle) => {
            assert!(!handle.has_value());
            assert_eq!(handle.name(), Ok(None));
            handle.set_by_name("GRUMPY").unwrap();
            assert!(handle.has_value());
            assert_eq!(handle.name(), Ok(Some("GRUMPY")));
            assert!(handle.erase());
            assert!(!handle.erase());
        }
        _ => panic!("wrong handle"),
    }

    match descriptor().field_value(&mut message, "moods").unwrap() {
        FieldValue::RepeatedEnum(mut handle) => {
            handle.set_all(&["HAPPY", "GRUMPY"]).unwrap();
            assert_eq!(handle.len(), 2);
            assert_eq!(handle.name_at(1), Ok("GRUMPY"));
            assert_eq!(handle.name_at(2), Err(Error::IndexOutOfRange));
            assert!(handle.all_values_are_known());
        }
        _ => panic!("wrong handle"),
    }
    message.moods.push(Mood::Secret);
    match descriptor().field_value(&mut message, "moods").unwrap() {
        FieldValue::RepeatedEnum(handle) => assert!(!handle.all_values_are_known()),
        _ => panic!("wrong handle"),
    }
}

#[test]
fn test_enum_field_descriptor_access() {
    let nested = descriptor().enum_field_descriptor("mood").unwrap();
    assert_eq!(nested.value_names(), &["UNKNOWN", "HAPPY", "GRUMPY"]);
    let error = descriptor().enum_field_descriptor("id").unwrap_err();
    assert_eq!(error, Error::NotAnEnumField);
    assert_eq!(error.code(), StatusCode::FailedPrecondition);
}

#[test]
fn test_optional_sub_message_shapes() {
    let mut message = TestMessage::default();

    for field in ["maybe_inner", "boxed_inner", "shared_inner"] {
        match descriptor().field_value(&mut message, field).unwrap() {
            FieldValue::OptionalSubMessage(mut handle) => {
                assert!(!handle.has_value(), "{field}");
                let fresh = handle.reset();
                let inner = reflect::downcast_mut::<Inner>(fresh);
                inner.label = field.to_owned();
                assert!(handle.has_value());
                assert!(handle.erase());
                assert!(!handle.has_value());
                handle.reset();
            }
            _ => panic!("wrong handle for {field}"),
        }
    }
    assert!(message.maybe_inner.is_some());
    assert!(message.boxed_inner.is_some());
    assert!(message.shared_inner.is_some());
}

#[test]
fn test_shared_sub_message_is_clone_on_write() {
    let mut message = TestMessage::default();
    let original = std::sync::Arc::new(Inner {
        label: "original".to_owned(),
        count: 1,
    });
    message.shared_inner = Some(original.clone());

    match descriptor().field_value(&mut message, "shared_inner").unwrap() {
        FieldValue::OptionalSubMessage(mut handle) => {
            let inner = reflect::downcast_mut::<Inner>(handle.message_mut().unwrap());
            inner.count = 2;
        }
        _ => panic!("wrong handle"),
    }
    // The externally held owner is untouched.
    assert_eq!(original.count, 1);
    assert_eq!(message.shared_inner.as_ref().unwrap().count, 2);
}

#[test]
fn test_repeated_sub_message() {
    let mut message = TestMessage::default();
    match descriptor().field_value(&mut message, "inners").unwrap() {
        FieldValue::RepeatedSubMessage(mut handle) => {
            handle.reserve(2);
            reflect::downcast_mut::<Inner>(handle.append()).count = 1;
            reflect::downcast_mut::<Inner>(handle.append()).count = 2;
            assert_eq!(handle.len(), 2);
            let counts: Vec<i32> = handle
                .iter()
                .map(|m| reflect::downcast::<Inner>(m).count)
                .collect();
            assert_eq!(counts, vec![1, 2]);
            handle.clear();
            assert!(handle.is_empty());
        }
        _ => panic!("wrong handle"),
    }
}

#[test]
fn test_map_handle_ordered() {
    let mut message = TestMessage::default();
    match descriptor().field_value(&mut message, "counters").unwrap() {
        FieldValue::Map(mut map) => {
            assert!(map.is_ordered());
            assert_eq!(map.key_type(), FieldType::String);
            assert_eq!(map.value_type(), FieldType::Int64);
            match map.insert_default(&MapKey::from("lorem")).unwrap() {
                MapValueMut::I64(slot) => *slot = 12,
                _ => panic!("wrong value arm"),
            }
            match map.insert_default(&MapKey::from("ipsum")).unwrap() {
                MapValueMut::I64(slot) => *slot = 34,
                _ => panic!("wrong value arm"),
            }
            assert_eq!(
                map.insert_default(&MapKey::from("lorem")).unwrap_err(),
                Error::DuplicateMapKey
            );
            assert_eq!(map.len(), 2);
            assert_eq!(map.contains(&MapKey::from("lorem")), Ok(true));
            // Key-type mismatches are precondition failures.
            assert_eq!(map.contains(&MapKey::I32(1)), Err(Error::KeyTypeMismatch));
            let entries: Vec<(MapKey, i64)> = map
                .iter()
                .map(|(key, value)| match value {
                    MapValueRef::I64(value) => (key, value),
                    _ => panic!("wrong value arm"),
                })
                .collect();
            assert_eq!(
                entries,
                vec![
                    (MapKey::from("ipsum"), 34),
                    (MapKey::from("lorem"), 12),
                ]
            );
            assert_eq!(map.remove(&MapKey::from("ipsum")), Ok(true));
            assert_eq!(map.remove(&MapKey::from("ipsum")), Ok(false));
        }
        _ => panic!("wrong handle"),
    }
    assert_eq!(message.counters.get("lorem"), Some(&12));
}

#[test]
fn test_map_handle_unordered_and_trie() {
    let mut message = TestMessage::default();
    match descriptor().field_value(&mut message, "lookup").unwrap() {
        FieldValue::Map(mut map) => {
            assert!(!map.is_ordered());
            map.reserve(4);
            match map.insert_default(&MapKey::I32(7)).unwrap() {
                MapValueMut::String(slot) => *slot = "seven".to_owned(),
                _ => panic!("wrong value arm"),
            }
            assert_eq!(map.len(), 1);
        }
        _ => panic!("wrong handle"),
    }
    assert_eq!(message.lookup.get(&7).map(String::as_str), Some("seven"));

    match descriptor().field_value(&mut message, "by_name").unwrap() {
        FieldValue::Map(mut map) => {
            assert!(map.is_ordered());
            match map.insert_default(&MapKey::from("trie")).unwrap() {
                MapValueMut::I32(slot) => *slot = 5,
                _ => panic!("wrong value arm"),
            }
            match map.get(&MapKey::from("trie")).unwrap() {
                Some(MapValueRef::I32(value)) => assert_eq!(value, 5),
                _ => panic!("missing entry"),
            }
        }
        _ => panic!("wrong handle"),
    }
    assert_eq!(message.by_name.get("trie"), Some(&5));
}

#[test]
fn test_one_of_handle() {
    let mut message = TestMessage::default();
    match descriptor().field_value(&mut message, "shape").unwrap() {
        FieldValue::OneOf(mut oneof) => {
            assert_eq!(oneof.len(), 4);
            assert_eq!(oneof.index(), 0);
            assert_eq!(oneof.field_type(), None);
            assert!(oneof.value().is_none());

            oneof.set_value(1, ScalarValue::F64(3.5)).unwrap();
            assert_eq!(oneof.index(), 1);
            assert_eq!(oneof.field_type(), Some(FieldType::Double));
            match oneof.value() {
                Some(OneOfFieldRef::F64(value)) => assert_eq!(*value, 3.5),
                _ => panic!("wrong arm"),
            }

            assert_eq!(
                oneof.set_value(1, ScalarValue::Bool(true)),
                Err(Error::OneOfTypeMismatch)
            );
            assert_eq!(
                oneof.set_value(9, ScalarValue::Bool(true)),
                Err(Error::OneOfIndexOutOfRange)
            );
            assert_eq!(
                oneof.set_value(9, ScalarValue::Bool(true)).unwrap_err().code(),
                StatusCode::OutOfRange
            );
            assert_eq!(
                oneof.set_value(3, ScalarValue::I64(1)),
                Err(Error::OneOfEnumArm)
            );

            oneof.clear();
            assert_eq!(oneof.index(), 0);
        }
        _ => panic!("wrong handle"),
    }
    assert_eq!(message.shape, Shape::Empty);
}

#[test]
fn test_create_instance() {
    let fresh = descriptor().create_instance();
    let concrete = reflect::downcast::<TestMessage>(fresh.as_ref());
    assert_eq!(concrete, &TestMessage::default());
}

#[test]
fn test_one_of_enum_arm_yields_enum_handle() {
    let mut message = TestMessage::default();
    message.shape = Shape::Tag(Mood::Happy);
    match descriptor().field_value(&mut message, "shape").unwrap() {
        FieldValue::OneOf(oneof) => {
            assert_eq!(oneof.field_type(), Some(FieldType::Enum));
            match oneof.value() {
                Some(OneOfFieldRef::Enum(handle)) => assert_eq!(handle.name(), Ok("HAPPY")),
                _ => panic!("wrong arm"),
            }
        }
        _ => panic!("wrong handle"),
    }
}

mod support;

use pretty_assertions::assert_eq;
use reflect::text::{parse_fields, parse_new};
use reflect::{Error, StatusCode};
use support::{Inner, Mood, Shape, TestMessage, TEST_MESSAGE_DESCRIPTOR};

fn parse(input: &str) -> Result<TestMessage, Error> {
    let mut message = TestMessage::default();
    parse_fields(input, &TEST_MESSAGE_DESCRIPTOR, &mut message)?;
    Ok(message)
}

#[test]
fn test_scalar_fields() {
    let message = parse(
        r#"
        # leading comment
        id: 42
        label: "lorem ipsum"
        flag: true,
        ratio: 3.25;
        "#,
    )
    .unwrap();
    assert_eq!(message.id, 42);
    assert_eq!(message.label, "lorem ipsum");
    assert!(message.flag);
    assert_eq!(message.ratio, Some(3.25));
}

#[test]
fn test_integer_radixes() {
    assert_eq!(parse("id: 0x2A").unwrap().id, 42);
    assert_eq!(parse("id: 052").unwrap().id, 42);
    assert_eq!(parse("id: -7").unwrap().id, -7);
    assert_eq!(parse("id: 0").unwrap().id, 0);
}

#[test]
fn test_string_escapes() {
    let message = parse(r#"label: "a\tb\n\"q\"\\\a\v\?\'""#).unwrap();
    assert_eq!(message.label, "a\tb\n\"q\"\\\x07\x0B?'");

    let message = parse(r#"payload: "\x""#);
    assert_eq!(message, Err(Error::BadEscape('x')));

    // Raw multi-byte characters pass through untouched.
    let message = parse(r#"label: "café""#).unwrap();
    assert_eq!(message.label, "café");

    // Unicode escapes decode only in the \u00XX range; anything above is
    // an explicit unimplemented limitation.
    let message = parse(r#"label: "caf\u00C3\u00A9""#).unwrap();
    assert_eq!(message.label, "café");
    let error = parse(r#"label: "\u0100""#).unwrap_err();
    assert_eq!(error, Error::UnimplementedEscape);
    assert_eq!(error.code(), StatusCode::Unimplemented);
}

#[test]
fn test_bytes() {
    let message = parse(r#"payload: "ab\u00FF\n""#).unwrap();
    assert_eq!(message.payload, vec![b'a', b'b', 0xFF, b'\n']);
}

#[test]
fn test_enums() {
    let message = parse("mood: HAPPY maybe_mood: GRUMPY moods: [HAPPY, UNKNOWN]").unwrap();
    assert_eq!(message.mood, Mood::Happy);
    assert_eq!(message.maybe_mood, Some(Mood::Grumpy));
    assert_eq!(message.moods, vec![Mood::Happy, Mood::Unknown]);

    assert_eq!(
        parse("mood: ECSTATIC"),
        Err(Error::InvalidEnumName("ECSTATIC".to_owned()))
    );
}

#[test]
fn test_sub_messages() {
    let message = parse(
        r#"
        inner { label: "a" count: 1 }
        maybe_inner: { label: "b", count: 2 }
        boxed_inner < label: "c"; count: 3 >
        inners: [{ count: 4 }, { count: 5 }]
        "#,
    )
    .unwrap();
    assert_eq!(message.inner, Inner { label: "a".to_owned(), count: 1 });
    assert_eq!(message.maybe_inner, Some(Inner { label: "b".to_owned(), count: 2 }));
    assert_eq!(
        message.boxed_inner.as_deref(),
        Some(&Inner { label: "c".to_owned(), count: 3 })
    );
    let counts: Vec<i32> = message.inners.iter().map(|inner| inner.count).collect();
    assert_eq!(counts, vec![4, 5]);
}

#[test]
fn test_mismatched_delimiters() {
    assert_eq!(parse("inner { label: \"a\" >"), Err(Error::Syntax));
    assert_eq!(parse("inner < label: \"a\" }"), Err(Error::Syntax));
}

#[test]
fn test_colon_rules() {
    // Scalars require the colon.
    assert_eq!(parse("id 42"), Err(Error::Syntax));
    // Singular braced sub-messages do not.
    assert!(parse("inner { count: 1 }").is_ok());
    assert!(parse("inner: { count: 1 }").is_ok());
    // Repeated fields keep it mandatory, sub-messages included.
    assert_eq!(parse("inners [{ count: 1 }]"), Err(Error::Syntax));
    assert_eq!(parse("inners { count: 1 }"), Err(Error::Syntax));
    assert!(parse("inners: [{ count: 1 }]").is_ok());
    assert!(parse("inners: { count: 2 }").is_ok());
    // Map entries behave like singular sub-messages.
    assert!(parse(r#"counters { key: "a" value: 1 }"#).is_ok());
}

#[test]
fn test_repeated_fields_concatenate() {
    let message = parse(
        r#"
        tags: "a"
        tags: ["b", "c"]
        tags: "d"
        "#,
    )
    .unwrap();
    assert_eq!(message.tags, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_duplicate_non_repeated_field() {
    assert_eq!(
        parse("id: 1 id: 2"),
        Err(Error::DuplicateField("id".to_owned()))
    );
}

#[test]
fn test_unknown_field() {
    assert_eq!(
        parse("bogus: 1"),
        Err(Error::UnknownField("bogus".to_owned()))
    );
}

#[test]
fn test_maps() {
    let message = parse(
        r#"
        counters { key: "lorem" value: 12 }
        counters { key: "ipsum", value: 34 }
        lookup { key: 7 value: "seven" }
        by_name { key: "trie" value: 5 }
        "#,
    )
    .unwrap();
    assert_eq!(message.counters.get("lorem"), Some(&12));
    assert_eq!(message.counters.get("ipsum"), Some(&34));
    assert_eq!(message.lookup.get(&7).map(String::as_str), Some("seven"));
    assert_eq!(message.by_name.get("trie"), Some(&5));
}

#[test]
fn test_duplicate_map_key() {
    assert_eq!(
        parse(r#"counters { key: "a" value: 1 } counters { key: "a" value: 2 }"#),
        Err(Error::DuplicateMapKey)
    );
}

#[test]
fn test_one_of_is_not_addressable() {
    assert_eq!(parse("shape: 1"), Err(Error::Format));
}

#[test]
fn test_parse_new_allocates_through_descriptor() {
    let message = parse_new("id: 9 label: \"x\"", &TEST_MESSAGE_DESCRIPTOR).unwrap();
    let message = reflect::downcast::<TestMessage>(message.as_ref());
    assert_eq!(message.id, 9);
    assert_eq!(message.label, "x");
    assert_eq!(message.shape, Shape::Empty);
}

#[test]
fn test_durations_and_times_are_absent_from_test_schema() {
    // The schema above has no time-typed fields; the lexer still rejects
    // garbage where a value is expected.
    assert_eq!(parse("id:"), Err(Error::Syntax));
}

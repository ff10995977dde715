use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;

use flat::{FlatMap, FlatSet};
use fxhash::FxHashMap;
use indexmap::IndexMap;
use json::{
    json_object, parse, parse_with_options, stringify, stringify_with_options, Error, LineFeedType,
    ParseOptions, StatusCode, StringifyOptions,
};
use trie::{TrieMap, TrieSet};

json_object! {
    pub struct TestObject {
        pub lorem: i32,
        pub ipsum: bool,
        pub dolor: String,
        pub sit: f64,
        pub amet: Vec<i32>,
        pub consectetur: [i32; 4],
        pub adipisci: (i32, bool, String),
        pub elit: Option<f64>,
    }
}

const TEST_INPUT: &str = concat!(
    r#"{"lorem":42,"ipsum":true,"dolor":"foobar","sit":3.14,"amet":[1,2,3],"#,
    r#""consectetur":[4,5,6,7],"adipisci":[43,false,"barbaz"],"elit":2.71}"#,
);

#[test]
fn test_round_trip() {
    let object: TestObject = parse(TEST_INPUT).unwrap();
    assert_eq!(object.lorem, 42);
    assert!(object.ipsum);
    assert_eq!(object.dolor, "foobar");
    assert_eq!(object.sit, 3.14);
    assert_eq!(object.amet, vec![1, 2, 3]);
    assert_eq!(object.consectetur, [4, 5, 6, 7]);
    assert_eq!(object.adipisci, (43, false, "barbaz".to_owned()));
    assert_eq!(object.elit, Some(2.71));

    // Re-emitting with default compact options reproduces the input.
    assert_eq!(stringify(&object), TEST_INPUT);
}

#[test]
fn test_pretty_printing() {
    let object: TestObject = parse(TEST_INPUT).unwrap();
    let pretty = stringify_with_options(
        &object,
        StringifyOptions {
            pretty: true,
            ..StringifyOptions::default()
        },
    );
    let expected = "{\n\
                    \x20 \"lorem\": 42,\n\
                    \x20 \"ipsum\": true,\n\
                    \x20 \"dolor\": \"foobar\",\n\
                    \x20 \"sit\": 3.14,\n\
                    \x20 \"amet\": [\n\
                    \x20   1,\n\
                    \x20   2,\n\
                    \x20   3\n\
                    \x20 ],\n\
                    \x20 \"consectetur\": [\n\
                    \x20   4,\n\
                    \x20   5,\n\
                    \x20   6,\n\
                    \x20   7\n\
                    \x20 ],\n\
                    \x20 \"adipisci\": [43, false, \"barbaz\"],\n\
                    \x20 \"elit\": 2.71\n\
                    }";
    assert_eq!(pretty, expected);

    // Pretty output parses back to the same record.
    let reparsed: TestObject = parse(&pretty).unwrap();
    assert_eq!(reparsed, object);
}

#[test]
fn test_line_feed_types() {
    let object: TestObject = parse(TEST_INPUT).unwrap();
    let crlf = stringify_with_options(
        &object,
        StringifyOptions {
            pretty: true,
            line_feed_type: LineFeedType::Crlf,
            ..StringifyOptions::default()
        },
    );
    assert!(crlf.contains("\r\n  \"lorem\": 42,"));
    let reparsed: TestObject = parse(&crlf).unwrap();
    assert_eq!(reparsed, object);
}

#[test]
fn test_trailing_newline() {
    assert_eq!(
        stringify_with_options(
            &true,
            StringifyOptions {
                trailing_newline: true,
                ..StringifyOptions::default()
            }
        ),
        "true\n"
    );
}

json_object! {
    pub struct SmallObject {
        pub lorem: i32,
        pub ipsum: bool,
    }
}

#[test]
fn test_extra_fields_and_fast_skipping() {
    let input = r#"{"lorem":42,"extra":null,"ipsum":true}"#;

    let strict = parse_with_options::<SmallObject>(
        input,
        ParseOptions {
            allow_extra_fields: false,
            fast_skipping: false,
        },
    );
    assert_eq!(strict, Err(Error::Format));
    assert_eq!(strict.unwrap_err().code(), StatusCode::InvalidArgument);

    let skipped: SmallObject = parse_with_options(input, ParseOptions::default()).unwrap();
    assert_eq!(skipped.lorem, 42);
    assert!(skipped.ipsum);

    let fast: SmallObject = parse_with_options(
        input,
        ParseOptions {
            allow_extra_fields: true,
            fast_skipping: true,
        },
    )
    .unwrap();
    assert_eq!(fast.lorem, 42);

    // Fast skipping does not validate the skipped content, so inputs that
    // strict skipping rejects may pass.
    let bad_escape = r#"{"lorem":42,"extra":"\x","ipsum":true}"#;
    assert_eq!(
        parse_with_options::<SmallObject>(bad_escape, ParseOptions::default()),
        Err(Error::Syntax)
    );
    let fast: SmallObject = parse_with_options(
        bad_escape,
        ParseOptions {
            allow_extra_fields: true,
            fast_skipping: true,
        },
    )
    .unwrap();
    assert!(fast.ipsum);

    // Nested structures are skipped by bracket structure.
    let nested = r#"{"lorem":1,"extra":{"a":[1,{"b":"}"}]},"ipsum":false}"#;
    let parsed: SmallObject = parse_with_options(
        nested,
        ParseOptions {
            allow_extra_fields: true,
            fast_skipping: true,
        },
    )
    .unwrap();
    assert_eq!(parsed.lorem, 1);
}

#[test]
fn test_missing_required_field() {
    assert_eq!(parse::<SmallObject>(r#"{"lorem":42}"#), Err(Error::Format));
    // Optional fields may be missing.
    let object: TestObject = parse(
        r#"{"lorem":42,"ipsum":true,"dolor":"x","sit":1.5,"amet":[],"consectetur":[1,2,3,4],"adipisci":[1,true,"y"]}"#,
    )
    .unwrap();
    assert_eq!(object.elit, None);
}

#[test]
fn test_duplicate_keys_are_rejected() {
    assert_eq!(
        parse::<SmallObject>(r#"{"lorem":1,"lorem":2,"ipsum":true}"#),
        Err(Error::Format)
    );
}

#[test]
fn test_null_for_optional() {
    let object: TestObject = parse(
        r#"{"lorem":42,"ipsum":true,"dolor":"x","sit":1.5,"amet":[],"consectetur":[1,2,3,4],"adipisci":[1,true,"y"],"elit":null}"#,
    )
    .unwrap();
    assert_eq!(object.elit, None);
}

#[test]
fn test_output_empty_fields() {
    let mut object: TestObject = parse(TEST_INPUT).unwrap();
    object.elit = None;
    // Omitted by default...
    assert!(!stringify(&object).contains("elit"));
    // ...serialized as null on request.
    let output = stringify_with_options(
        &object,
        StringifyOptions {
            output_empty_fields: true,
            ..StringifyOptions::default()
        },
    );
    assert!(output.ends_with(r#""elit":null}"#));
}

#[test]
fn test_root_scalars() {
    assert_eq!(parse::<bool>("true"), Ok(true));
    assert_eq!(parse::<bool>(" false "), Ok(false));
    assert_eq!(parse::<i64>("-12"), Ok(-12));
    assert_eq!(parse::<u8>("255"), Ok(255));
    assert_eq!(parse::<u8>("256"), Err(Error::Format));
    assert_eq!(parse::<u32>("-1"), Err(Error::Format));
    assert_eq!(parse::<f64>("2.5e3"), Ok(2500.0));
    assert_eq!(parse::<String>(r#""lorem""#), Ok("lorem".to_owned()));
    assert_eq!(stringify(&true), "true");
    assert_eq!(stringify(&-12i64), "-12");
    assert_eq!(stringify("lorem"), r#""lorem""#);
}

#[test]
fn test_number_grammar() {
    assert_eq!(parse::<i32>("0123"), Err(Error::Syntax));
    assert_eq!(parse::<f64>("1."), Err(Error::Syntax));
    assert_eq!(parse::<f64>(".5"), Err(Error::Syntax));
    assert_eq!(parse::<f64>("1e"), Err(Error::Syntax));
    assert_eq!(parse::<f64>("1e+2"), Ok(100.0));
    assert_eq!(parse::<i32>("1 2"), Err(Error::Syntax));
}

#[test]
fn test_string_escapes() {
    let decoded: String = parse(r#""a\tb\\c\"d\/e\b\f\n\r""#).unwrap();
    assert_eq!(decoded, "a\tb\\c\"d/e\u{8}\u{c}\n\r");

    // The seven special characters get their two-character escapes.
    assert_eq!(stringify(&"a\tb\\c\"d\n".to_owned()), r#""a\tb\\c\"d\n""#);

    assert_eq!(parse::<String>(r#""\q""#), Err(Error::Syntax));
    assert_eq!(parse::<String>(r#""unterminated"#), Err(Error::Syntax));

    // Multi-byte escapes stay an explicit unimplemented limitation.
    let error = parse::<String>(r#""\u0100""#).unwrap_err();
    assert_eq!(error, Error::UnimplementedEscape);
    assert_eq!(error.code(), StatusCode::Unimplemented);
}

#[test]
fn test_high_bytes_round_trip_through_escapes() {
    let original = "caf\u{e9}".to_owned();
    let encoded = stringify(&original);
    // Each high byte of the UTF-8 encoding becomes a \u00XX escape.
    assert_eq!(encoded, "\"caf\\u00C3\\u00A9\"");
    let decoded: String = parse(&encoded).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_dictionaries_over_all_shapes() {
    let input = r#"{"ipsum":34,"lorem":12}"#;

    let btree: BTreeMap<String, i64> = parse(input).unwrap();
    assert_eq!(btree.get("lorem"), Some(&12));
    assert_eq!(stringify(&btree), input);

    let hash: HashMap<String, i64> = parse(input).unwrap();
    assert_eq!(hash.get("ipsum"), Some(&34));

    let fx: FxHashMap<String, i64> = parse(input).unwrap();
    assert_eq!(fx.get("lorem"), Some(&12));

    let index: IndexMap<String, i64> = parse(input).unwrap();
    assert_eq!(stringify(&index), input); // insertion order preserved

    let flat: FlatMap<String, i64> = parse(input).unwrap();
    assert_eq!(stringify(&flat), input); // sorted

    let trie: TrieMap<i64> = parse(input).unwrap();
    assert_eq!(stringify(&trie), input); // sorted

    assert_eq!(
        parse::<BTreeMap<String, i64>>(r#"{"a":1,"a":2}"#),
        Err(Error::Format)
    );
}

#[test]
fn test_sets_over_all_shapes() {
    let input = r#"[1,2,3]"#;
    let btree: BTreeSet<i64> = parse(input).unwrap();
    assert_eq!(stringify(&btree), input);
    let hash: HashSet<i64> = parse(input).unwrap();
    assert_eq!(hash.len(), 3);
    let flat: FlatSet<i64> = parse("[3,1,2]").unwrap();
    assert_eq!(stringify(&flat), input); // sorted

    let trie: TrieSet = parse(r#"["lorem","ipsum"]"#).unwrap();
    assert!(trie.contains("lorem"));
    assert_eq!(stringify(&trie), r#"["ipsum","lorem"]"#); // sorted

    assert_eq!(parse::<BTreeSet<i64>>("[1,1]"), Err(Error::Format));
}

#[test]
fn test_array_element_count_is_checked() {
    assert_eq!(parse::<[i32; 3]>("[1,2,3]"), Ok([1, 2, 3]));
    assert_eq!(parse::<[i32; 3]>("[1,2]"), Err(Error::Syntax));
    assert_eq!(parse::<[i32; 3]>("[1,2,3,4]"), Err(Error::Syntax));
    assert_eq!(parse::<[i32; 0]>("[]"), Ok([]));
}

#[test]
fn test_pair_stays_single_line_in_pretty_mode() {
    let pair = (12i32, 34i32);
    assert_eq!(stringify(&pair), "[12,34]");
    assert_eq!(
        stringify_with_options(
            &pair,
            StringifyOptions {
                pretty: true,
                ..StringifyOptions::default()
            }
        ),
        "[12, 34]"
    );
}

json_object! {
    pub struct OuterObject {
        pub name: String,
        pub nested: SmallObject,
        pub boxed: Option<Box<SmallObject>>,
    }
}

#[test]
fn test_nested_records() {
    let input = r#"{"name":"outer","nested":{"lorem":1,"ipsum":false}}"#;
    let outer: OuterObject = parse(input).unwrap();
    assert_eq!(outer.nested.lorem, 1);
    assert_eq!(outer.boxed, None);
    assert_eq!(stringify(&outer), input);

    let with_boxed: OuterObject = parse(
        r#"{"name":"outer","nested":{"lorem":1,"ipsum":false},"boxed":{"lorem":2,"ipsum":true}}"#,
    )
    .unwrap();
    assert_eq!(with_boxed.boxed.as_ref().unwrap().lorem, 2);
}

#[test]
fn test_record_fingerprints() {
    let lhs: TestObject = parse(TEST_INPUT).unwrap();
    let rhs: TestObject = parse(TEST_INPUT).unwrap();
    assert_eq!(fingerprint::fingerprint(&lhs), fingerprint::fingerprint(&rhs));
    let mut changed = rhs;
    changed.lorem = 43;
    assert_ne!(fingerprint::fingerprint(&lhs), fingerprint::fingerprint(&changed));
}

#[test]
fn test_trailing_garbage_is_rejected() {
    assert_eq!(parse::<bool>("true false"), Err(Error::Syntax));
    assert_eq!(parse::<i32>("1}"), Err(Error::Syntax));
}

#[quickcheck]
fn prop_i64_round_trips(value: i64) -> bool {
    parse::<i64>(&stringify(&value)) == Ok(value)
}

#[quickcheck]
fn prop_string_round_trips(value: String) -> bool {
    parse::<String>(&stringify(&value)) == Ok(value.clone())
}

#[quickcheck]
fn prop_vec_round_trips_pretty(values: Vec<i32>) -> bool {
    let options = StringifyOptions {
        pretty: true,
        indent_width: 4,
        ..StringifyOptions::default()
    };
    parse::<Vec<i32>>(&stringify_with_options(&values, options)) == Ok(values.clone())
}

#[quickcheck]
fn prop_map_round_trips(entries: BTreeMap<String, i64>) -> bool {
    parse::<BTreeMap<String, i64>>(&stringify(&entries)) == Ok(entries.clone())
}

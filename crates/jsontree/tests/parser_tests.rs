use jsontree::{Document, Lookup, ParseErrorKind, ParseOptions, TreeError, ValueType};

/// Helper: decode `text` and re-encode it compactly.
fn reencode(text: &str) -> String {
    let mut doc = Document::new();
    let root = doc.decode(text).unwrap();
    doc.encode(root).unwrap()
}

/// Helper: decode `text`, expecting a parse error, and return (offset, reason).
fn parse_error(text: &str) -> (usize, ParseErrorKind) {
    let mut doc = Document::new();
    match doc.decode(text) {
        Err(TreeError::Parse(err)) => (err.offset, err.reason),
        other => panic!("expected parse error for {text:?}, got {other:?}"),
    }
}

// ============================================================================
// Top-level primitives
// ============================================================================

#[test]
fn decode_null() {
    let mut doc = Document::new();
    let root = doc.decode("null").unwrap();
    assert_eq!(doc.type_of(root).unwrap(), ValueType::Null);
    assert_eq!(doc.value(root).unwrap(), Lookup::Null);
}

#[test]
fn decode_booleans() {
    let mut doc = Document::new();
    let t = doc.decode("true").unwrap();
    let f = doc.decode("false").unwrap();
    assert_eq!(doc.value(t).unwrap(), Lookup::Bool(true));
    assert_eq!(doc.value(f).unwrap(), Lookup::Bool(false));
}

#[test]
fn decode_bare_number() {
    let mut doc = Document::new();
    let root = doc.decode("42").unwrap();
    assert_eq!(doc.type_of(root).unwrap(), ValueType::Number);
    assert_eq!(doc.value(root).unwrap(), Lookup::Number(42.0));
}

#[test]
fn decode_bare_string() {
    let mut doc = Document::new();
    let root = doc.decode(r#""hello world""#).unwrap();
    assert_eq!(doc.value(root).unwrap(), Lookup::String("hello world".into()));
}

#[test]
fn decode_surrounding_whitespace() {
    assert_eq!(reencode(" \t\r\n 7 \n"), "7");
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn decode_number_forms() {
    let cases = [
        ("0", 0.0),
        ("-0", 0.0),
        ("-7", -7.0),
        ("3.14", 3.14),
        ("1e3", 1000.0),
        ("1E+2", 100.0),
        ("2.5e-3", 0.0025),
        ("-0.5", -0.5),
    ];
    let mut doc = Document::new();
    for (text, expected) in cases {
        let root = doc.decode(text).unwrap();
        assert_eq!(doc.value(root).unwrap(), Lookup::Number(expected), "input {text}");
    }
}

#[test]
fn all_numbers_are_doubles() {
    let mut doc = Document::new();
    let root = doc.decode("9007199254740993").unwrap();
    // Beyond 2^53 the nearest double is kept.
    assert_eq!(doc.value(root).unwrap(), Lookup::Number(9007199254740992.0));
}

#[test]
fn reject_malformed_numbers() {
    assert_eq!(parse_error("-").1, ParseErrorKind::InvalidNumber);
    assert_eq!(parse_error("1.").1, ParseErrorKind::InvalidNumber);
    assert_eq!(parse_error("1e").1, ParseErrorKind::InvalidNumber);
    assert_eq!(parse_error("-x").1, ParseErrorKind::InvalidNumber);
    assert_eq!(parse_error("+1").1, ParseErrorKind::UnexpectedByte(b'+'));
    assert_eq!(parse_error(".5").1, ParseErrorKind::UnexpectedByte(b'.'));
}

#[test]
fn leading_zero_is_trailing_garbage() {
    assert_eq!(parse_error("01"), (1, ParseErrorKind::TrailingCharacters));
    assert_eq!(parse_error("[01]"), (2, ParseErrorKind::UnexpectedByte(b'1')));
}

#[test]
fn reject_number_overflow() {
    assert_eq!(parse_error("1e400"), (0, ParseErrorKind::NumberOutOfRange));
    assert_eq!(parse_error("[-1e400]"), (1, ParseErrorKind::NumberOutOfRange));
}

// ============================================================================
// Strings and escapes
// ============================================================================

#[test]
fn decode_standard_escapes() {
    let mut doc = Document::new();
    let root = doc.decode(r#""\"\\\/\b\f\n\r\t""#).unwrap();
    assert_eq!(
        doc.value(root).unwrap(),
        Lookup::String("\"\\/\u{08}\u{0c}\n\r\t".into())
    );
}

#[test]
fn decode_unicode_escape_bmp() {
    let mut doc = Document::new();
    let root = doc.decode(r#""caf\u00e9 \u4F60""#).unwrap();
    assert_eq!(doc.value(root).unwrap(), Lookup::String("caf\u{e9} \u{4f60}".into()));
}

#[test]
fn decode_surrogate_pair() {
    let mut doc = Document::new();
    let root = doc.decode(r#""\ud83d\ude00""#).unwrap();
    assert_eq!(doc.value(root).unwrap(), Lookup::String("\u{1f600}".into()));
}

#[test]
fn decode_raw_utf8_passthrough() {
    let mut doc = Document::new();
    let root = doc.decode("\"\u{4f60}\u{597d} \u{1f600}\"").unwrap();
    assert_eq!(doc.value(root).unwrap(), Lookup::String("\u{4f60}\u{597d} \u{1f600}".into()));
}

#[test]
fn reject_lone_surrogates() {
    assert_eq!(parse_error(r#""\ud83d""#), (1, ParseErrorKind::InvalidUnicodeEscape));
    assert_eq!(parse_error(r#""\ude00""#), (1, ParseErrorKind::InvalidUnicodeEscape));
    assert_eq!(
        parse_error(r#""\ud83dA""#),
        (1, ParseErrorKind::InvalidUnicodeEscape)
    );
}

#[test]
fn reject_bad_hex_in_unicode_escape() {
    assert_eq!(parse_error(r#""\u12g4""#), (1, ParseErrorKind::InvalidUnicodeEscape));
    assert_eq!(parse_error(r#""\u12"#), (1, ParseErrorKind::InvalidUnicodeEscape));
}

#[test]
fn reject_invalid_escape() {
    assert_eq!(parse_error(r#"["ok","\x"]"#), (7, ParseErrorKind::InvalidEscape));
}

#[test]
fn reject_unterminated_string() {
    assert_eq!(parse_error(r#""abc"#), (4, ParseErrorKind::UnexpectedEnd));
    assert_eq!(parse_error(r#""abc\"#), (5, ParseErrorKind::UnexpectedEnd));
}

#[test]
fn reject_raw_control_character() {
    assert_eq!(parse_error("\"a\nb\""), (2, ParseErrorKind::ControlCharacterInString));
}

#[test]
fn reject_invalid_utf8() {
    let mut doc = Document::new();
    let err = doc.decode(b"[\"ab\xff\"]").unwrap_err();
    match err {
        TreeError::Parse(err) => {
            assert_eq!(err.offset, 4);
            assert_eq!(err.reason, ParseErrorKind::InvalidUtf8);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn decode_empty_containers() {
    assert_eq!(reencode("[]"), "[]");
    assert_eq!(reencode("{}"), "{}");
    assert_eq!(reencode("[ ]"), "[]");
    assert_eq!(reencode("{ \n }"), "{}");
}

#[test]
fn decode_nested_structure() {
    let text = r#"{ "a" : [ 1 , { "b" : null } , [ ] ] , "c" : "d" }"#;
    assert_eq!(reencode(text), r#"{"a":[1,{"b":null},[]],"c":"d"}"#);
}

#[test]
fn decode_preserves_key_order() {
    assert_eq!(reencode(r#"{"z":1,"a":2,"m":3}"#), r#"{"z":1,"a":2,"m":3}"#);
}

#[test]
fn duplicate_keys_last_wins_in_first_position() {
    let mut doc = Document::new();
    let root = doc.decode(r#"{"a":[1,2],"b":2,"a":3}"#).unwrap();
    assert_eq!(doc.encode(root).unwrap(), r#"{"a":3,"b":2}"#);
    // the replaced array and its two items were freed
    assert_eq!(doc.live_nodes(), 3);
}

#[test]
fn duplicate_keys_in_wide_object() {
    let mut text = String::from("{");
    for i in 0..1_000 {
        text.push_str(&format!("\"k{i}\":{i},"));
    }
    text.push_str(r#""k10":"again","k999":[true]}"#);

    let mut doc = Document::new();
    let root = doc.decode(&text).unwrap();
    let keys = doc.keys(root).unwrap();
    assert_eq!(keys.len(), 1_000);
    assert_eq!(keys[10], "k10");
    assert_eq!(keys[999], "k999");
    assert_eq!(doc.get(root, "k10").unwrap().as_str(), Some("again"));
    assert_eq!(doc.get(root, "k11").unwrap().as_f64(), Some(11.0));
    // root, 1000 values, and the array's single item
    assert_eq!(doc.live_nodes(), 1 + 1_000 + 1);
}

#[test]
fn wide_object_decodes_in_linear_time() {
    let keys = 200_000;
    let mut text = String::with_capacity(keys * 16);
    text.push('{');
    for i in 0..keys {
        if i > 0 {
            text.push(',');
        }
        text.push_str(&format!("\"k{i}\":{i}"));
    }
    text.push('}');

    let started = std::time::Instant::now();
    let mut doc = Document::new();
    let root = doc.decode(&text).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(doc.len(root).unwrap(), keys);
    assert!(
        elapsed < std::time::Duration::from_secs(10),
        "decoding {keys} keys took {elapsed:?}"
    );
}

#[test]
fn parsed_children_are_owned() {
    let mut doc = Document::new();
    let root = doc.decode(r#"{"list":[1]}"#).unwrap();
    let list = doc.get(root, "list").unwrap().as_node().unwrap();
    assert_eq!(doc.parent(list).unwrap(), Some(root));
    assert!(doc.is_root(root).unwrap());
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn reject_missing_value_offset() {
    assert_eq!(parse_error(r#"{"a":}"#), (5, ParseErrorKind::UnexpectedByte(b'}')));
}

#[test]
fn reject_empty_input() {
    assert_eq!(parse_error(""), (0, ParseErrorKind::Empty));
    assert_eq!(parse_error(" \n\t\r "), (5, ParseErrorKind::Empty));
}

#[test]
fn reject_trailing_garbage() {
    assert_eq!(parse_error("[1] x"), (4, ParseErrorKind::TrailingCharacters));
    assert_eq!(parse_error("{}{}"), (2, ParseErrorKind::TrailingCharacters));
}

#[test]
fn reject_trailing_commas() {
    assert_eq!(parse_error("[1,]"), (3, ParseErrorKind::UnexpectedByte(b']')));
    assert_eq!(parse_error(r#"{"a":1,}"#), (7, ParseErrorKind::UnexpectedByte(b'}')));
}

#[test]
fn reject_unquoted_key() {
    assert_eq!(parse_error("{a:1}"), (1, ParseErrorKind::UnexpectedByte(b'a')));
}

#[test]
fn reject_truncated_containers() {
    assert_eq!(parse_error("[1,2"), (4, ParseErrorKind::UnexpectedEnd));
    assert_eq!(parse_error(r#"{"a":1"#), (6, ParseErrorKind::UnexpectedEnd));
    assert_eq!(parse_error(r#"{"a""#), (4, ParseErrorKind::UnexpectedEnd));
}

#[test]
fn reject_bad_literals() {
    assert_eq!(parse_error("tru"), (0, ParseErrorKind::InvalidLiteral));
    assert_eq!(parse_error("[nul]"), (1, ParseErrorKind::InvalidLiteral));
    assert_eq!(parse_error("falsey"), (5, ParseErrorKind::TrailingCharacters));
}

#[test]
fn parse_error_display_includes_offset() {
    let mut doc = Document::new();
    let err = doc.decode(r#"{"a":}"#).unwrap_err();
    assert_eq!(err.to_string(), "parse error at byte 5: unexpected byte 0x7d");
}

#[test]
fn failed_decode_leaves_nothing_allocated() {
    let mut doc = Document::new();
    let kept = doc.decode("[1,2]").unwrap();
    let before = doc.live_nodes();

    for bad in [
        r#"{"a":[1,2,{"b":"c"}],"d":}"#,
        r#"[[[[1]]],"unterminated"#,
        r#"{"a":[1,2],"a":{"x":1},"b":tru}"#,
    ] {
        assert!(doc.decode(bad).is_err());
        assert_eq!(doc.live_nodes(), before, "leak after {bad:?}");
    }
    assert_eq!(doc.encode(kept).unwrap(), "[1,2]");
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn nesting_limit_is_enforced() {
    let mut doc = Document::new();
    let options = ParseOptions::with_max_depth(3);
    assert!(doc.decode_with("[[[1]]]", &options).is_ok());

    match doc.decode_with(r#"[[{"a":[]}]]"#, &options) {
        Err(TreeError::Parse(err)) => {
            assert_eq!(err.reason, ParseErrorKind::NestingTooDeep(3));
            assert_eq!(err.offset, 7);
        }
        other => panic!("expected nesting error, got {other:?}"),
    }
}

#[test]
fn default_options_accept_deep_input() {
    let depth = 500;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let mut doc = Document::new();
    let root = doc.decode(&text).unwrap();
    assert_eq!(doc.encode(root).unwrap(), text);
}

#[test]
fn strict_options_reject_deep_input() {
    let text = format!("{}{}", "[".repeat(65), "]".repeat(65));
    let mut doc = Document::new();
    assert!(doc.decode_with(&text, &ParseOptions::strict()).is_err());
    assert_eq!(doc.live_nodes(), 0);
}

//! Document model, editor, and serializer tests

use std::rc::Rc;

use pretty_assertions::assert_eq;

use ejson_rust::{
    add_to_array, add_to_array_at, create_array_value, create_double_value, create_integer_value,
    create_null_value, create_object_value, create_string_value, dump_to_string, free_value,
    parse_document,
    parse_to_value, remove_from_array, remove_object_property, set_object_property, status_is_bad,
    status_is_good, value_to_string, Config, CountingAllocator, JsonErrorType, JsonValue,
    TokenType,
};

fn parse(json: &str) -> JsonValue {
    parse_to_value(&Config::system(), json.as_bytes()).expect("parse failed")
}

fn compact(value: &JsonValue) -> String {
    dump_to_string(value, false).expect("dump failed")
}

#[test]
fn test_object_scenario() {
    let root = parse(r#"{"a":1,"b":true}"#);

    assert_eq!(root.value_type(), TokenType::Object);
    assert_eq!(root.as_object().unwrap().len(), 2);
    assert_eq!(root.get_child("a").unwrap().as_integer(), Some(1));
    assert_eq!(root.get_child("b").unwrap().as_boolean(), Some(true));
    assert!(root.get_child("missing").is_none());
}

#[test]
fn test_array_remove_scenario() {
    let config = Config::system();
    let mut root = parse("[1,2,3]");

    remove_from_array(&config, &mut root, 1).unwrap();
    assert_eq!(compact(&root), "[1,3]");
}

#[test]
fn test_edit_and_dump_scenario() {
    let config = Config::system();
    let mut root = parse(r#"{"children":[]}"#);

    let mut child = create_object_value();
    let name = create_string_value(&config, "x").unwrap();
    set_object_property(&config, &mut child, name, "name").unwrap();

    let children = root.get_child_mut("children").unwrap();
    assert_eq!(children.value_type(), TokenType::Array);
    // Index past the end clamps to an append
    add_to_array_at(&config, children, child, 1).unwrap();

    assert_eq!(compact(&root), r#"{"children":[{"name":"x"}]}"#);
}

#[test]
fn test_unicode_escape_round_trips_verbatim() {
    let root = parse(r#""\u00FF""#);
    assert_eq!(root.as_str(), Some(r"\u00FF"));
    assert_eq!(compact(&root), r#""\u00FF""#);
}

#[test]
fn test_truncated_object_is_partial_input() {
    let err = parse_to_value(&Config::system(), br#"{"x":1"#).unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::PartialInput);
}

#[cfg(not(feature = "strict"))]
#[test]
fn test_dangling_key_composes_as_undefined() {
    let root = parse(r#"{"x":}"#);
    assert_eq!(
        root.get_child("x").unwrap().value_type(),
        TokenType::Undefined
    );
}

#[cfg(feature = "strict")]
#[test]
fn test_dangling_key_rejected_in_strict_builds() {
    let err = parse_to_value(&Config::system(), br#"{"x":}"#).unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::InvalidInput);
}

#[test]
fn test_empty_containers() {
    let object = parse("{}");
    assert_eq!(object.as_object().unwrap().len(), 0);
    assert_eq!(compact(&object), "{}");

    let array = parse("[]");
    assert_eq!(array.as_array().unwrap().len(), 0);
    assert_eq!(compact(&array), "[]");
}

#[test]
fn test_null_round_trip() {
    let root = parse(r#"{"n":null}"#);
    assert_eq!(
        root.get_child("n").unwrap().value_type(),
        TokenType::Undefined
    );
    assert_eq!(compact(&root), r#"{"n":null}"#);
}

#[test]
fn test_duplicate_keys_keep_first_on_lookup() {
    let root = parse(r#"{"a":1,"a":2}"#);
    assert_eq!(root.as_object().unwrap().len(), 2);
    assert_eq!(root.get_child("a").unwrap().as_integer(), Some(1));
}

#[test]
fn test_set_property_is_idempotent_and_keeps_position() {
    let config = Config::system();
    let mut root = parse(r#"{"a":1,"b":2}"#);

    set_object_property(&config, &mut root, create_integer_value(9), "a").unwrap();
    let first = root.clone();

    set_object_property(&config, &mut root, create_integer_value(9), "a").unwrap();
    assert_eq!(root, first);
    assert_eq!(root.as_object().unwrap()[0].key, "a");
    assert_eq!(compact(&root), r#"{"a":9,"b":2}"#);
}

#[test]
fn test_remove_cancels_addition() {
    let config = Config::system();
    let mut root = parse("[1,2,3]");
    let before = root.clone();

    add_to_array(&config, &mut root, create_integer_value(7)).unwrap();
    let count = root.as_array().unwrap().len();
    remove_from_array(&config, &mut root, count - 1).unwrap();

    assert_eq!(root, before);
}

#[test]
fn test_editor_rejects_without_consuming_the_item() {
    let config = Config::system();
    let mut target = create_integer_value(5);

    let item = create_string_value(&config, "boo").unwrap();
    let rejected = add_to_array(&config, &mut target, item).unwrap_err();
    let (error, item) = rejected.into_parts();

    assert_eq!(error.error_type, JsonErrorType::InvalidArguments);
    assert_eq!(item.as_str(), Some("boo"));
    assert_eq!(target, create_integer_value(5));
}

#[test]
fn test_editor_not_found_cases() {
    let config = Config::system();

    let mut array = parse("[1]");
    let err = remove_from_array(&config, &mut array, 5).unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::NotFound);

    let mut object = parse(r#"{"a":1}"#);
    let err = remove_object_property(&config, &mut object, "zzz").unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::NotFound);
}

#[test]
fn test_remove_object_property_shifts_members() {
    let config = Config::system();
    let mut root = parse(r#"{"a":1,"b":2,"c":3}"#);

    remove_object_property(&config, &mut root, "b").unwrap();
    assert_eq!(compact(&root), r#"{"a":1,"c":3}"#);
}

#[test]
fn test_counting_allocator_balances_after_free() {
    let counter = Rc::new(CountingAllocator::new());
    let config = Config::new(counter.clone());

    let mut root = parse_to_value(
        &config,
        br#"{"a":[1,2,{"deep":"value"}],"s":"hello","n":null}"#,
    )
    .unwrap();
    assert!(counter.live_bytes() > 0);

    // Edits keep the books straight too
    remove_object_property(&config, &mut root, "s").unwrap();
    let item = create_string_value(&config, "replacement").unwrap();
    set_object_property(&config, &mut root, item, "a").unwrap();

    free_value(&config, root);
    assert_eq!(counter.live_bytes(), 0);
}

#[test]
fn test_factory_tree_balances_after_free() {
    let counter = Rc::new(CountingAllocator::new());
    let config = Config::new(counter.clone());

    let mut root = create_object_value();
    let mut list = create_array_value();
    add_to_array(&config, &mut list, create_integer_value(1)).unwrap();
    add_to_array(&config, &mut list, create_double_value(2.5)).unwrap();
    add_to_array(&config, &mut list, create_null_value()).unwrap();
    set_object_property(&config, &mut root, list, "items").unwrap();
    let text = create_string_value(&config, "abc").unwrap();
    set_object_property(&config, &mut root, text, "text").unwrap();

    assert!(counter.live_bytes() > 0);
    free_value(&config, root);
    assert_eq!(counter.live_bytes(), 0);
}

#[test]
fn test_budget_allocator_rejects_parse() {
    // Too small even for the token buffer: refused up front, no retries
    let counter = Rc::new(CountingAllocator::with_budget(64));
    let config = Config::new(counter.clone());

    let err = parse_to_value(&config, br#"{"a":"abcdefgh"}"#).unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::OutOfMemory);
    assert_eq!(counter.live_bytes(), 0);

    // Room for the token buffer but not for the tree: the composer's
    // partial build is unwound before the error surfaces
    let token_buffer = 1024 * std::mem::size_of::<ejson_rust::Token>();
    let counter = Rc::new(CountingAllocator::with_budget(token_buffer + 8));
    let config = Config::new(counter.clone());

    let err = parse_to_value(&config, br#"{"a":"abcdefgh"}"#).unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::OutOfMemory);
    assert_eq!(counter.live_bytes(), 0);
}

#[test]
fn test_token_buffer_growth() {
    // 1500 elements need 1501 tokens: one doubling past the initial 1024
    let json = format!("[{}]", (0..1500).map(|i| i.to_string()).collect::<Vec<_>>().join(","));
    let root = parse(&json);
    assert_eq!(root.as_array().unwrap().len(), 1500);
}

#[test]
fn test_token_buffer_ceiling() {
    // 9000 elements exceed the 8192-token ceiling
    let json = format!("[{}]", (0..9000).map(|i| i.to_string()).collect::<Vec<_>>().join(","));
    let err = parse_to_value(&Config::system(), json.as_bytes()).unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::OutOfMemory);
}

#[test]
fn test_pretty_dump_layout() {
    let root = parse(r#"{"a":[1,2],"b":{}}"#);
    let expected = "{\n    \"a\": [\n        1,\n        2\n    ],\n    \"b\": {}\n}";
    assert_eq!(dump_to_string(&root, true).unwrap(), expected);
}

#[test]
fn test_value_to_string_bounded_buffer() {
    let root = parse("[1,3]");

    let mut buffer = [0u8; 5];
    let written = value_to_string(&root, &mut buffer, false).unwrap();
    assert_eq!(written, 5);
    assert_eq!(&buffer[..written], b"[1,3]");

    let mut small = [0u8; 4];
    let err = value_to_string(&root, &mut small, false).unwrap_err();
    assert_eq!(err.error_type, JsonErrorType::OutOfMemory);
}

#[test]
fn test_double_emission() {
    assert_eq!(compact(&create_double_value(1.5)), "1.5");
    // Whole doubles keep their doubleness in text form
    assert_eq!(compact(&create_double_value(1.0)), "1.0");
    assert_eq!(compact(&create_double_value(f64::NAN)), "null");
    assert_eq!(compact(&create_double_value(f64::INFINITY)), "null");

    let reparsed = parse(&format!("[{}]", compact(&create_double_value(4.0))));
    assert_eq!(reparsed.as_array().unwrap()[0].value_type(), TokenType::Double);
}

#[test]
fn test_parse_document_with_utf8_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"a":1}"#);

    let root = parse_document(&Config::system(), &bytes).unwrap();
    assert_eq!(root.get_child("a").unwrap().as_integer(), Some(1));
}

#[test]
fn test_parse_document_with_utf16le() {
    // With BOM
    let mut bytes = vec![0xFF, 0xFE];
    for b in br#"{"a":1}"# {
        bytes.push(*b);
        bytes.push(0);
    }
    let root = parse_document(&Config::system(), &bytes).unwrap();
    assert_eq!(root.get_child("a").unwrap().as_integer(), Some(1));

    // Without BOM: the NUL-pattern heuristic catches it
    let root = parse_document(&Config::system(), &bytes[2..]).unwrap();
    assert_eq!(root.get_child("a").unwrap().as_integer(), Some(1));
}

#[test]
fn test_status_predicates() {
    let good = parse_to_value(&Config::system(), b"[]");
    assert!(status_is_good(&good));
    assert!(!status_is_bad(&good));

    let bad = parse_to_value(&Config::system(), b"]");
    assert!(status_is_bad(&bad));
    assert!(!status_is_good(&bad));
}

#[test]
fn test_get_child_on_non_object() {
    let root = parse("[1,2]");
    assert!(root.get_child("a").is_none());
    assert!(root.get_mapped_child("a").is_none());
}

use alloc::{string::ToString, vec, vec::Vec};

use rstest::rstest;

use crate::{Map, ParserOptions, Value, from_str, from_str_with_options};

fn object<const N: usize>(members: [(&str, Value); N]) -> Value {
    Value::Object(members.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<Map>())
}

#[rstest]
#[case("null", Value::Null)]
#[case("true", Value::Boolean(true))]
#[case("false", Value::Boolean(false))]
#[case("0", Value::Number(0.0))]
#[case("-12.5e-1", Value::Number(-1.25))]
#[case(r#""""#, Value::String("".into()))]
#[case(r#""été""#, Value::String("été".into()))]
#[case("[]", Value::Array(vec![]))]
#[case("{}", Value::Object(Map::new()))]
#[case(" \t\r\n [ \n ] \n", Value::Array(vec![]))]
fn single_values(#[case] input: &str, #[case] expected: Value) {
    assert_eq!(from_str(input).unwrap(), expected);
}

#[test]
fn mixed_document() {
    let input = r#"
        {
            "name": "ccjson",
            "tags": ["lexer", "parser"],
            "version": 1.0,
            "stable": false,
            "license": null,
            "nested": {"empty": {}, "list": [[], [1, [2]]]}
        }
    "#;
    let expected = object([
        ("license", Value::Null),
        ("name", "ccjson".into()),
        (
            "nested",
            object([
                ("empty", object([])),
                (
                    "list",
                    Value::Array(vec![
                        Value::Array(vec![]),
                        Value::Array(vec![1.0.into(), Value::Array(vec![2.0.into()])]),
                    ]),
                ),
            ]),
        ),
        ("stable", false.into()),
        ("tags", Value::Array(vec!["lexer".into(), "parser".into()])),
        ("version", 1.0.into()),
    ]);
    assert_eq!(from_str(input).unwrap(), expected);
}

#[test]
fn keys_are_decoded_and_compared_after_unescaping() {
    let value = from_str(r#"{"a": 1, "\u0061": 2}"#).unwrap();
    assert_eq!(value, object([("a", 2.0.into())]));
}

#[test]
fn escaped_keys_round_trip() {
    let value = from_str(r#"{"line\nbreak": "tab\there", "quote\"": "\\"}"#).unwrap();
    assert_eq!(value.get("line\nbreak").and_then(Value::as_str), Some("tab\there"));
    assert_eq!(value.get("quote\"").and_then(Value::as_str), Some("\\"));
    assert_eq!(from_str(&value.to_string()).unwrap(), value);
}

#[test]
fn large_and_small_numbers() {
    let value = from_str("[1e308, -1e308, 5e-324, 1e-400, 123456789012345678901234567890]").unwrap();
    let numbers: Vec<f64> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_f64)
        .collect();
    let big: f64 = "123456789012345678901234567890".parse().unwrap();
    assert_eq!(numbers, vec![1e308, -1e308, 5e-324, 0.0, big]);
}

#[test]
fn deep_nesting_within_limit() {
    let depth = 100;
    let text = "[".repeat(depth) + &"]".repeat(depth);
    assert!(from_str(&text).is_ok());

    let text = "[".repeat(500) + &"]".repeat(500);
    assert!(from_str_with_options(&text, ParserOptions::unbounded()).is_ok());
}

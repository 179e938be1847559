#![allow(missing_docs)]

use ccjson::{
    Error, LexErrorKind, Map, ParseErrorKind, ParserOptions, Token, TokenKind, Value, from_str,
    from_str_with_options, lex, parse,
};
use rstest::rstest;

/// Converts `serde_json`'s tree into ours so both parsers can be compared.
fn from_serde(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().expect("finite number")),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_serde).collect()),
        serde_json::Value::Object(members) => Value::Object(
            members
                .into_iter()
                .map(|(k, v)| (k, from_serde(v)))
                .collect::<Map>(),
        ),
    }
}

#[rstest]
#[case("null")]
#[case("[]")]
#[case("{}")]
#[case(r#"{"a":1,"b":[true,false,null],"c":{"d":"e"}}"#)]
#[case(r#"[0, -0, 1.5, -2.25e3, 6.02E23, 1e-7, 9007199254740993]"#)]
#[case(r#""é😀\n\t\"\\\/""#)]
#[case(r#"{"dup": 1, "dup": {"x": []}}"#)]
#[case(" \n\t\r{ \"spaced\" : [ 1 , 2 ] } \n")]
#[case(r#"["olá", "こんにちは", "💩"]"#)]
fn agrees_with_serde_json_on_valid_input(#[case] input: &str) {
    let expected = from_serde(serde_json::from_str(input).unwrap());
    assert_eq!(from_str(input).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("[1,]")]
#[case(r#"{"a":1,}"#)]
#[case("[01]")]
#[case("1.")]
#[case(".5")]
#[case("+1")]
#[case("1e")]
#[case("-")]
#[case("NaN")]
#[case("Infinity")]
#[case("'single'")]
#[case(r#""\x""#)]
#[case(r#""\u12""#)]
#[case("\"raw\u{1}control\"")]
#[case(r#""unterminated"#)]
#[case("[1 2]")]
#[case("{1: 2}")]
#[case(r#"{"a" 1}"#)]
#[case("1 2")]
#[case("tru")]
#[case("nulll")]
#[case("[")]
#[case("}")]
#[case("1e400")]
#[case("\u{feff}{}")]
fn agrees_with_serde_json_on_invalid_input(#[case] input: &str) {
    assert!(serde_json::from_str::<serde_json::Value>(input).is_err());
    assert!(from_str(input).is_err(), "accepted {input:?}");
}

#[test]
fn stages_can_be_run_separately() {
    let lexed = lex(r#"{"k": [1, "two"]}"#);
    assert!(lexed.is_ok());
    assert_eq!(
        lexed.tokens.iter().map(Token::kind).collect::<Vec<_>>(),
        vec![
            TokenKind::LeftBrace,
            TokenKind::String,
            TokenKind::Colon,
            TokenKind::LeftBracket,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::String,
            TokenKind::RightBracket,
            TokenKind::RightBrace,
            TokenKind::EndOfInput,
        ]
    );

    let value = parse(lexed.tokens).unwrap();
    assert_eq!(value.get("k").and_then(|v| v.get_index(1)), Some(&Value::from("two")));
}

#[test]
fn parse_accepts_hand_built_tokens() {
    let tokens = vec![
        Token::LeftBrace,
        Token::String("n".into()),
        Token::Colon,
        Token::Number(7.0),
        Token::RightBrace,
        Token::EndOfInput,
    ];
    assert_eq!(parse(tokens).unwrap().to_string(), r#"{"n":7}"#);

    let err = parse(vec![Token::Colon, Token::EndOfInput]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ExpectedValue { found: TokenKind::Colon });
    assert_eq!(err.index, 0);
    assert_eq!(err.position, None);
}

#[test]
fn error_variants() {
    match from_str("[1, 2").unwrap_err() {
        Error::Parse(err) => assert_eq!(
            err.kind,
            ParseErrorKind::ExpectedSeparator {
                close: TokenKind::RightBracket,
                found: TokenKind::EndOfInput,
            }
        ),
        other => panic!("unexpected error: {other:?}"),
    }

    match from_str("[1, @]").unwrap_err() {
        Error::Lex(err) => {
            assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('@'));
            assert_eq!(err.position.offset, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}

    let err = from_str("[").unwrap_err();
    assert_error(&err);
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert!(boxed.to_string().starts_with("expected value but found end of input"));
}

#[test]
fn depth_option() {
    let text = "[".repeat(10) + &"]".repeat(10);
    assert!(from_str_with_options(&text, ParserOptions { max_depth: Some(10) }).is_ok());
    assert!(matches!(
        from_str_with_options(&text, ParserOptions { max_depth: Some(9) }),
        Err(Error::Parse(e)) if e.kind == ParseErrorKind::NestingTooDeep { limit: 9 }
    ));
    assert_eq!(ParserOptions::default().max_depth, Some(ccjson::DEFAULT_MAX_DEPTH));
    assert_eq!(ParserOptions::unbounded().max_depth, None);
}

#[test]
fn printed_output_is_accepted_by_serde_json() {
    let value = from_str(r#"{"s": "line sep\u0007", "n": [1e15, -0.001, 3]}"#).unwrap();
    for text in [value.to_string(), value.to_pretty_string()] {
        let reparsed = from_serde(serde_json::from_str(&text).unwrap());
        assert_eq!(reparsed, value);
    }
}

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::{Value, from_str, lex, parse};

fn test_count() -> u64 {
    #[cfg(not(feature = "test-fast"))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(feature = "test-fast")]
    let tests = 10;
    tests
}

/// Property: printing a value and reading it back yields the same value.
#[test]
fn compact_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        from_str(&value.to_string()).as_ref() == Ok(&value)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: indentation is only whitespace between tokens.
#[test]
fn pretty_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let pretty = value.to_pretty_string();
        let compact = value.to_string();
        from_str(&pretty).as_ref() == Ok(&value)
            && lex(&pretty).tokens == lex(&compact).tokens
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: removing one character from a valid document is accepted or
/// rejected exactly as `serde_json` decides.
#[test]
fn deletion_agrees_with_serde_json_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, at: usize) -> bool {
        let chars: Vec<char> = value.to_string().chars().collect();
        let at = at % chars.len();
        let mutated: String = chars
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != at)
            .map(|(_, c)| *c)
            .collect();

        let ours = from_str(&mutated).is_ok();
        let reference = serde_json::from_str::<serde_json::Value>(&mutated).is_ok();
        ours == reference
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value, usize) -> bool);
}

/// Property: the lexer and parser are pure functions of their input.
#[quickcheck]
fn lex_and_parse_are_deterministic(text: String) -> bool {
    let first = lex(&text);
    let second = lex(&text);
    if first != second {
        return false;
    }
    match first.into_result() {
        Ok(tokens) => parse(tokens.clone()) == parse(tokens),
        Err(_) => true,
    }
}

/// Property: arbitrary text never panics either stage, and a failed lex
/// never hands back a terminated token sequence.
#[quickcheck]
fn arbitrary_text_is_handled(text: String) -> bool {
    let lexed = lex(&text);
    let terminated = lexed.tokens.last() == Some(&crate::Token::EndOfInput);
    if lexed.tokens.len() != lexed.positions.len() || lexed.is_ok() != terminated {
        return false;
    }
    let _ = from_str(&text);
    true
}

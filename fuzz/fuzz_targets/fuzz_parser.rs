#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use ccjson::{Error, ParseErrorKind, ParserOptions, Token};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte depth seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// JSON whitespace first; the rest must be rejected between tokens.
static WHITESPACE: &[&str] = &[
    " ", "\t", "\n", "\r", "\u{a0}", "\u{2028}", "\u{3000}", "\u{feff}",
];

/// Bytes that commonly turn a valid document into an interesting invalid one.
static CORRUPTIONS: &[&[u8]] = &[
    b",", b"]", b"}", b"\"", b"\\", b"0", b"-", b".", b"e", b"\x01", b"\\u", b"\\ud800",
];

fn with_rng<R>(f: impl FnOnce(&mut SmallRng) -> R) -> R {
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Writes as much of `bytes` as fits into `buf`, returning the count.
fn put(buf: &mut [u8], bytes: &[u8]) -> usize {
    let len = bytes.len().min(buf.len());
    buf[..len].copy_from_slice(&bytes[..len]);
    len
}

/// Replaces the input with a freshly generated document, mostly valid, with
/// random whitespace around it and sometimes a corrupted byte inside.
fn generate(data: &mut [u8], size: usize, max_size: usize) -> usize {
    let max_size = max_size.min(data.len());
    if max_size <= HEADER {
        return fuzzer_mutate(data, size, max_size);
    }

    with_rng(|rng| {
        data[0] = rng.random::<u8>();
        data[1..HEADER].copy_from_slice(&rng.random::<u32>().to_le_bytes());
    });

    let mut doc = Vec::new();
    with_rng(|rng| {
        for _ in 0..rng.random_range(0..3) {
            doc.extend_from_slice(WHITESPACE[rng.random_range(0..WHITESPACE.len())].as_bytes());
        }
    });
    doc.extend(serde_json::to_vec(&random_value(size.max(16))).unwrap_or_default());
    with_rng(|rng| {
        if !doc.is_empty() && rng.random_ratio(1, 4) {
            let at = rng.random_range(0..doc.len());
            let patch = CORRUPTIONS[rng.random_range(0..CORRUPTIONS.len())];
            doc.splice(at..at, patch.iter().copied());
        }
        for _ in 0..rng.random_range(0..3) {
            doc.extend_from_slice(WHITESPACE[rng.random_range(0..WHITESPACE.len())].as_bytes());
        }
    });

    HEADER + put(&mut data[HEADER..max_size], &doc)
}

fn random_value(budget: usize) -> Value {
    loop {
        let bytes: Vec<u8> = with_rng(|rng| (0..budget).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut Unstructured::new(&bytes)) {
            return value.0;
        }
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    if size < HEADER || seed % 8 == 0 {
        generate(data, size, max_size)
    } else {
        fuzzer_mutate(data, size, max_size)
    }
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(16)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2..=4 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            5..=9 => Value::String(u.arbitrary()?),
            10..=12 => {
                let items: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(items.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let members: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(members.into_iter().map(|(k, v)| (k, v.0)).collect::<Map<_, _>>())
            }
        };
        Ok(ArbitraryValue(value))
    }
}

/// Converts `serde_json`'s tree into ours.
fn from_serde(value: Value) -> ccjson::Value {
    match value {
        Value::Null => ccjson::Value::Null,
        Value::Bool(b) => ccjson::Value::Boolean(b),
        Value::Number(n) => ccjson::Value::Number(n.as_f64().expect("finite number")),
        Value::String(s) => ccjson::Value::String(s),
        Value::Array(items) => ccjson::Value::Array(items.into_iter().map(from_serde).collect()),
        Value::Object(members) => ccjson::Value::Object(
            members
                .into_iter()
                .map(|(k, v)| (k, from_serde(v)))
                .collect(),
        ),
    }
}

fn too_deep(result: &Result<ccjson::Value, Error>) -> bool {
    matches!(
        result,
        Err(Error::Parse(err)) if matches!(err.kind, ParseErrorKind::NestingTooDeep { .. })
    )
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let depth_seed = u32::from_le_bytes(data[1..5].try_into().unwrap()) as usize;
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let options = match flags & 3 {
        0 => ParserOptions::default(),
        1 => ParserOptions::unbounded(),
        _ => ParserOptions {
            max_depth: Some(depth_seed % 64),
        },
    };

    // The lexer's own bookkeeping.
    let lexed = ccjson::lex(&text);
    assert_eq!(lexed.tokens.len(), lexed.positions.len());
    assert_eq!(
        lexed.is_ok(),
        lexed.tokens.last() == Some(&Token::EndOfInput)
    );
    assert!(lexed.positions.windows(2).all(|w| w[0].offset < w[1].offset));

    let ours = ccjson::from_str_with_options(&text, options);
    let reference = serde_json::from_str::<Value>(&text);

    // serde_json has a fixed recursion limit of its own.
    let depth_related = too_deep(&ours)
        || reference
            .as_ref()
            .is_err_and(|e| e.to_string().contains("recursion limit exceeded"));
    if !depth_related {
        match (&ours, reference) {
            (Ok(value), Ok(expected)) => assert_eq!(*value, from_serde(expected)),
            (Err(_), Err(_)) => {}
            (ours, reference) => panic!(
                "disagreement on {text:?}: ccjson {ours:?}, serde_json {reference:?}"
            ),
        }
    }

    if let Ok(value) = ours {
        let printed = value.to_string();
        assert_eq!(
            ccjson::from_str_with_options(&printed, ParserOptions::unbounded()).as_ref(),
            Ok(&value)
        );
    }
}

fuzz_target!(|data: &[u8]| parser(data));

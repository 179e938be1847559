//! A strict JSON validator built from a hand-written lexer and a
//! recursive-descent parser.
//!
//! Input flows one way: raw text is turned into a [`Token`] sequence by
//! [`lex`], and that sequence is turned into a [`Value`] tree by [`parse`].
//! Each stage stops at the first error it finds.
//!
//! ```
//! use ccjson::{Value, from_str};
//!
//! let value = from_str(r#"{"a": [1, 2, 3], "a": true}"#).unwrap();
//! assert_eq!(value.get("a"), Some(&Value::Boolean(true)));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod lexer;
mod options;
mod parser;
mod token;
mod value;

#[cfg(test)]
mod tests;

pub use error::{Error, LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use lexer::{Lexed, lex};
pub use options::{DEFAULT_MAX_DEPTH, ParserOptions};
pub use parser::{Parser, parse, parse_with_options};
pub use token::{Position, Token, TokenKind};
pub use value::{Array, Map, Value};

/// Lexes and parses `text` with the default [`ParserOptions`].
///
/// # Errors
///
/// Returns [`Error::Lex`] for the first malformed lexeme, or [`Error::Parse`]
/// for the first grammar violation. Parse errors carry the source position of
/// the offending token.
pub fn from_str(text: &str) -> Result<Value, Error> {
    from_str_with_options(text, ParserOptions::default())
}

/// Lexes and parses `text` with the given options.
///
/// # Errors
///
/// See [`from_str`].
pub fn from_str_with_options(text: &str, options: ParserOptions) -> Result<Value, Error> {
    let Lexed {
        tokens,
        positions,
        error,
    } = lex(text);
    if let Some(err) = error {
        return Err(err.into());
    }

    parse_with_options(tokens, options).map_err(|err| {
        let position = positions
            .get(err.index)
            .or_else(|| positions.last())
            .copied()
            .unwrap_or_default();
        err.at(position).into()
    })
}

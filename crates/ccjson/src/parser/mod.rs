//! Recursive-descent parser: [`Token`]s to a [`Value`] tree.
//!
//! Each grammar rule is one method, reading the token stream through a single
//! token of lookahead:
//!
//! ```text
//! Value   := String | Number | True | False | Null | Object | Array
//! Object  := '{' (Member (',' Member)*)? '}'
//! Member  := String ':' Value
//! Array   := '[' (Value (',' Value)*)? ']'
//! ```
//!
//! A document is exactly one `Value` followed by `EndOfInput`. The first rule
//! that cannot be satisfied aborts the parse with a [`ParseError`].
//!
//! Every nested array or object costs one level of recursion, so
//! [`ParserOptions::max_depth`] is checked on the way in.


use alloc::{string::String, vec::Vec};
use core::iter::Peekable;

use crate::{
    error::{ParseError, ParseErrorKind},
    options::ParserOptions,
    token::{Token, TokenKind},
    value::{Array, Map, Value},
};

/// Parses a complete token sequence with the default [`ParserOptions`].
///
/// ```
/// use ccjson::{Value, lex, parse};
///
/// let tokens = lex("[1, 2, 3]").into_result().unwrap();
/// let value = parse(tokens).unwrap();
/// assert_eq!(value, Value::Array(vec![1.0.into(), 2.0.into(), 3.0.into()]));
/// ```
///
/// # Errors
///
/// Returns the first grammar violation. A sequence that runs out before
/// [`Token::EndOfInput`] reads as if it ended with one; tokens after it are
/// rejected.
pub fn parse(tokens: Vec<Token>) -> Result<Value, ParseError> {
    parse_with_options(tokens, ParserOptions::default())
}

/// Parses a complete token sequence.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options(tokens: Vec<Token>, options: ParserOptions) -> Result<Value, ParseError> {
    let result = Parser::new(tokens, options).parse_document();
    match &result {
        Ok(value) => tracing::debug!(root = value.type_name(), "parsed document"),
        Err(err) => tracing::debug!(error = %err, "parsing stopped"),
    }
    result
}

/// A one-shot parser over an owned token sequence.
///
/// Tokens are moved out as they are consumed, so string payloads are handed
/// to the value tree without copying.
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    /// Index of the next token to be consumed.
    index: usize,
    depth: usize,
    options: ParserOptions,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Creates a parser over `tokens`.
    pub fn new<T: IntoIterator<IntoIter = I>>(tokens: T, options: ParserOptions) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            index: 0,
            depth: 0,
            options,
        }
    }

    /// Parses one value and requires the sequence to end right after it.
    ///
    /// # Errors
    ///
    /// Returns the first grammar violation, including any token left over
    /// after [`Token::EndOfInput`].
    pub fn parse_document(mut self) -> Result<Value, ParseError> {
        let value = self.parse_value()?;
        self.expect(TokenKind::EndOfInput)?;
        if let Some(found) = self.tokens.peek().map(Token::kind) {
            return Err(self.error(ParseErrorKind::TrailingTokens { found }));
        }
        Ok(value)
    }

    /// Kind of the next token; an exhausted sequence reads as end of input.
    fn peek(&mut self) -> TokenKind {
        self.tokens.peek().map_or(TokenKind::EndOfInput, Token::kind)
    }

    fn bump(&mut self) -> Token {
        self.index += 1;
        self.tokens.next().unwrap_or(Token::EndOfInput)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        let err = ParseError::new(kind, self.index);
        tracing::trace!(error = %err, depth = self.depth, "grammar violation");
        err
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let found = self.peek();
        if found != expected {
            return Err(self.error(ParseErrorKind::UnexpectedToken { expected, found }));
        }
        Ok(self.bump())
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            TokenKind::LeftBrace => self.parse_object(),
            TokenKind::LeftBracket => self.parse_array(),
            TokenKind::String
            | TokenKind::Number
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => Ok(match self.bump() {
                Token::String(s) => Value::String(s),
                Token::Number(n) => Value::Number(n),
                Token::True => Value::Boolean(true),
                Token::False => Value::Boolean(false),
                _ => Value::Null,
            }),
            found => Err(self.error(ParseErrorKind::ExpectedValue { found })),
        }
    }

    /// Consumes the opening token of a container, one level deeper.
    fn enter(&mut self, open: TokenKind) -> Result<(), ParseError> {
        if let Some(limit) = self.options.max_depth {
            if self.depth >= limit {
                return Err(self.error(ParseErrorKind::NestingTooDeep { limit }));
            }
        }
        self.expect(open)?;
        self.depth += 1;
        Ok(())
    }

    /// Consumes the closing token of a container.
    fn leave(&mut self) {
        self.bump();
        self.depth -= 1;
    }

    /// After an element: `,` means another follows, `close` ends the
    /// container.
    fn separator(&mut self, close: TokenKind) -> Result<bool, ParseError> {
        match self.peek() {
            TokenKind::Comma => {
                self.bump();
                Ok(true)
            }
            found if found == close => {
                self.leave();
                Ok(false)
            }
            found => Err(self.error(ParseErrorKind::ExpectedSeparator { close, found })),
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.enter(TokenKind::LeftBrace)?;
        let mut map = Map::new();

        if self.peek() == TokenKind::RightBrace {
            self.leave();
            return Ok(Value::Object(map));
        }

        loop {
            let key = self.parse_key()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_value()?;
            // Last write wins on duplicate keys.
            map.insert(key, value);

            if !self.separator(TokenKind::RightBrace)? {
                return Ok(Value::Object(map));
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, ParseError> {
        match self.tokens.next_if(|t| matches!(t, Token::String(_))) {
            Some(Token::String(key)) => {
                self.index += 1;
                Ok(key)
            }
            _ => {
                let found = self.peek();
                Err(self.error(ParseErrorKind::ExpectedKey { found }))
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.enter(TokenKind::LeftBracket)?;
        let mut array = Array::new();

        if self.peek() == TokenKind::RightBracket {
            self.leave();
            return Ok(Value::Array(array));
        }

        loop {
            array.push(self.parse_value()?);

            if !self.separator(TokenKind::RightBracket)? {
                return Ok(Value::Array(array));
            }
        }
    }
}

//! Tokenizer: raw text to [`Token`]s.
//!
//! A single cursor walks the input once, left to right, never backing up.
//! Between tokens the lexer is in its default state; a `"` switches it into
//! string scanning (with a nested escape state after `\`), and a `-` or digit
//! into number scanning. Literals are matched by comparing the text at the
//! cursor against `true`, `false` and `null`.
//!
//! Scanning stops at the first malformed lexeme. The tokens produced up to
//! that point are kept so callers can inspect them, but they never end in
//! [`Token::EndOfInput`].

mod escape_buffer;


use alloc::{string::String, vec::Vec};

use escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate};

use crate::{
    error::{LexError, LexErrorKind},
    token::{Position, Token},
};

/// Output of [`lex`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    /// Tokens in source order. Ends with [`Token::EndOfInput`] iff `error` is
    /// `None`.
    pub tokens: Vec<Token>,
    /// `positions[i]` is where `tokens[i]` starts. For `EndOfInput` this is
    /// the position just past the last character.
    pub positions: Vec<Position>,
    /// The first malformed lexeme, if any.
    pub error: Option<LexError>,
}

impl Lexed {
    /// Returns `true` if lexing finished without error.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drops the partial output on failure.
    ///
    /// # Errors
    ///
    /// Returns the lex error, if there was one.
    pub fn into_result(self) -> Result<Vec<Token>, LexError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tokens),
        }
    }
}

/// Tokenizes `text`.
///
/// ```
/// use ccjson::{Token, lex};
///
/// let lexed = lex(r#"{"a": [1, true]}"#);
/// assert!(lexed.error.is_none());
/// assert_eq!(lexed.tokens.len(), 10);
/// assert_eq!(lexed.tokens.last(), Some(&Token::EndOfInput));
///
/// let lexed = lex("[01]");
/// assert_eq!(lexed.tokens, vec![Token::LeftBracket]);
/// assert!(lexed.error.is_some());
/// ```
#[must_use]
pub fn lex(text: &str) -> Lexed {
    let mut lexer = Lexer::new(text);
    let error = lexer.run().err();

    match &error {
        None => tracing::debug!(tokens = lexer.tokens.len(), "lexed input"),
        Some(err) => tracing::debug!(error = %err, tokens = lexer.tokens.len(), "lexing stopped"),
    }

    Lexed {
        tokens: lexer.tokens,
        positions: lexer.positions,
        error,
    }
}

struct Lexer<'src> {
    src: &'src str,
    /// Byte index of the cursor into `src`.
    byte: usize,
    pos: Position,
    tokens: Vec<Token>,
    positions: Vec<Position>,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            byte: 0,
            pos: Position::START,
            tokens: Vec::new(),
            positions: Vec::new(),
        }
    }

    #[inline]
    fn rest(&self) -> &'src str {
        &self.src[self.byte..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.byte += c.len_utf8();
        self.pos.step(c);
        Some(c)
    }

    /// Moves the cursor over the next `len` bytes, which must end on a char
    /// boundary.
    fn advance_bytes(&mut self, len: usize) -> &'src str {
        let run = &self.rest()[..len];
        for c in run.chars() {
            self.pos.step(c);
        }
        self.byte += len;
        run
    }

    fn error(kind: LexErrorKind, position: Position) -> LexError {
        LexError { kind, position }
    }

    fn push(&mut self, token: Token, start: Position) {
        self.tokens.push(token);
        self.positions.push(start);
    }

    fn skip_whitespace(&mut self) {
        let len = self
            .rest()
            .find(|c: char| !matches!(c, ' ' | '\t' | '\n' | '\r'))
            .unwrap_or(self.rest().len());
        self.advance_bytes(len);
    }

    fn run(&mut self) -> Result<(), LexError> {
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(c) = self.peek() else {
                self.push(Token::EndOfInput, start);
                return Ok(());
            };

            let token = match c {
                '{' | '}' | ':' | ',' | '[' | ']' => {
                    self.advance();
                    match c {
                        '{' => Token::LeftBrace,
                        '}' => Token::RightBrace,
                        ':' => Token::Colon,
                        ',' => Token::Comma,
                        '[' => Token::LeftBracket,
                        _ => Token::RightBracket,
                    }
                }
                '"' => self.read_string(start)?,
                '-' | '0'..='9' => self.read_number(start)?,
                't' | 'f' | 'n' => self.read_literal(c, start)?,
                _ => return Err(Self::error(LexErrorKind::UnexpectedCharacter(c), start)),
            };
            self.push(token, start);
        }
    }

    fn read_literal(&mut self, first: char, start: Position) -> Result<Token, LexError> {
        let (word, token) = match first {
            't' => ("true", Token::True),
            'f' => ("false", Token::False),
            _ => ("null", Token::Null),
        };
        if !self.rest().starts_with(word) {
            return Err(Self::error(LexErrorKind::UnexpectedCharacter(first), start));
        }
        self.advance_bytes(word.len());
        Ok(token)
    }

    fn read_string(&mut self, start: Position) -> Result<Token, LexError> {
        // opening quote
        self.advance();
        let mut out = String::new();

        loop {
            // Copy the run of characters that need no attention in one go.
            let plain = self
                .rest()
                .find(|c: char| c == '"' || c == '\\' || c < '\u{20}')
                .unwrap_or(self.rest().len());
            out.push_str(self.advance_bytes(plain));

            let here = self.pos;
            match self.advance() {
                None => return Err(Self::error(LexErrorKind::UnterminatedString, start)),
                Some('"') => return Ok(Token::String(out)),
                Some('\\') => out.push(self.read_escape(here)?),
                Some(c) => {
                    return Err(Self::error(LexErrorKind::ControlCharacterInString(c), here));
                }
            }
        }
    }

    /// Reads the escape after a backslash found at `at`.
    fn read_escape(&mut self, at: Position) -> Result<char, LexError> {
        let Some(c) = self.advance() else {
            return Err(Self::error(LexErrorKind::UnterminatedEscape, at));
        };
        Ok(match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => self.read_unicode_escape(at)?,
            other => return Err(Self::error(LexErrorKind::InvalidEscapeCharacter(other), at)),
        })
    }

    fn read_unicode_escape(&mut self, at: Position) -> Result<char, LexError> {
        let invalid = || Self::error(LexErrorKind::InvalidUnicodeEscape, at);

        let unit = self.read_hex4(at)?;
        if is_high_surrogate(unit) {
            // Only a directly following `\uXXXX` low surrogate completes it.
            if !self.rest().starts_with("\\u") {
                return Err(invalid());
            }
            self.advance_bytes(2);
            let low = self.read_hex4(at)?;
            return combine_surrogates(unit, low).ok_or_else(invalid);
        }

        // Fails for an unpaired low surrogate.
        char::from_u32(u32::from(unit)).ok_or_else(invalid)
    }

    fn read_hex4(&mut self, at: Position) -> Result<u16, LexError> {
        let mut buf = UnicodeEscapeBuffer::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(Self::error(LexErrorKind::InvalidUnicodeEscape, at));
            };
            if let Some(unit) = buf.feed(c).map_err(|kind| Self::error(kind, at))? {
                return Ok(unit);
            }
        }
    }

    /// Skips ASCII digits, returning how many there were.
    fn skip_digits(&mut self) -> usize {
        let len = self
            .rest()
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest().len());
        self.advance_bytes(len);
        len
    }

    fn read_number(&mut self, start: Position) -> Result<Token, LexError> {
        let begin = self.byte;

        if self.peek() == Some('-') {
            self.advance();
        }

        match self.peek() {
            Some('0') => {
                self.advance();
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(Self::error(LexErrorKind::LeadingZeros, start));
                }
            }
            Some('1'..='9') => {
                self.skip_digits();
            }
            _ => return Err(Self::error(LexErrorKind::MissingSignDigits, start)),
        }

        if self.peek() == Some('.') {
            self.advance();
            if self.skip_digits() == 0 {
                return Err(Self::error(LexErrorKind::MissingDecimalDigits, start));
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.skip_digits() == 0 {
                return Err(Self::error(LexErrorKind::MissingExponentDigits, start));
            }
        }

        let lexeme = &self.src[begin..self.byte];
        match lexeme.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::Number(value)),
            _ => Err(Self::error(LexErrorKind::NumberOutOfRange, start)),
        }
    }
}

use core::fmt;

use thiserror::Error;

use crate::token::{Position, TokenKind};

/// Error returned by [`from_str`](crate::from_str): whichever stage failed
/// first.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The tokens do not form a single JSON value.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Source position of the error, when known.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex(err) => Some(err.position),
            Error::Parse(err) => err.position,
        }
    }
}

/// The first malformed lexeme found by [`lex`](crate::lex).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {position}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Where the offending lexeme or character starts.
    pub position: Position,
}

/// Classification of a [`LexError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// End of input before the closing quote.
    #[error("unterminated string")]
    UnterminatedString,
    /// End of input right after a backslash.
    #[error("unterminated escape sequence")]
    UnterminatedEscape,
    /// `\u` not followed by four hex digits, or an unpaired surrogate.
    #[error("invalid unicode escape sequence")]
    InvalidUnicodeEscape,
    /// A backslash followed by a character that is not a JSON escape.
    #[error("invalid escape character: \\{0}")]
    InvalidEscapeCharacter(char),
    /// A raw character below U+0020 inside a string.
    #[error("invalid string: control characters must be escaped (found U+{:04X})", code_point(.0))]
    ControlCharacterInString(char),
    /// `0` followed by another digit.
    #[error("invalid number: leading zeros are not allowed")]
    LeadingZeros,
    /// `-` not followed by a digit.
    #[error("invalid number: expected digit after minus sign")]
    MissingSignDigits,
    /// `.` not followed by a digit.
    #[error("invalid number: missing digits after decimal point")]
    MissingDecimalDigits,
    /// `e`/`E` (and optional sign) not followed by a digit.
    #[error("invalid number: missing digits in exponent")]
    MissingExponentDigits,
    /// The literal does not fit in a finite `f64`.
    #[error("invalid number: out of range")]
    NumberOutOfRange,
    /// A character that cannot start any token.
    #[error("unexpected character '{}'", escaped(.0))]
    UnexpectedCharacter(char),
}

fn code_point(c: &char) -> u32 {
    u32::from(*c)
}

fn escaped(c: &char) -> core::char::EscapeDebug {
    c.escape_debug()
}

/// The first grammar violation found by [`parse`](crate::parse).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at {}", location(.position, .index))]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Index of the offending token in the sequence handed to the parser.
    pub index: usize,
    /// Source position of the offending token. Only filled in when the error
    /// comes from [`from_str`](crate::from_str), which still has the lexer's
    /// positions at hand.
    pub position: Option<Position>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, index: usize) -> Self {
        Self {
            kind,
            index,
            position: None,
        }
    }

    pub(crate) fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Where a [`ParseError`] happened: a source position once known, otherwise
/// the token index.
enum Location {
    Source(Position),
    Token(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Source(position) => write!(f, "{position}"),
            Location::Token(index) => write!(f, "token {index}"),
        }
    }
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn location(position: &Option<Position>, index: &usize) -> Location {
    position.map_or(Location::Token(*index), Location::Source)
}

/// Classification of a [`ParseError`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token was required.
    #[error("expected {expected} but found {found}")]
    UnexpectedToken {
        /// The token the grammar requires here.
        expected: TokenKind,
        /// The token actually present.
        found: TokenKind,
    },
    /// The token cannot start a value.
    #[error("expected value but found {found}")]
    ExpectedValue {
        /// The token actually present.
        found: TokenKind,
    },
    /// An object member did not start with a string.
    #[error("expected string key but found {found}")]
    ExpectedKey {
        /// The token actually present.
        found: TokenKind,
    },
    /// After an element, neither `,` nor the closing bracket followed.
    #[error("expected ',' or {close} but found {found}")]
    ExpectedSeparator {
        /// The closing token of the enclosing container.
        close: TokenKind,
        /// The token actually present.
        found: TokenKind,
    },
    /// More tokens follow the [`TokenKind::EndOfInput`] that ends the document.
    #[error("unexpected {found} after end of input")]
    TrailingTokens {
        /// The first token after the end.
        found: TokenKind,
    },
    /// Arrays and objects nest deeper than the configured limit.
    #[error("nesting exceeds the limit of {limit} levels")]
    NestingTooDeep {
        /// The configured [`ParserOptions::max_depth`](crate::ParserOptions).
        limit: usize,
    },
}

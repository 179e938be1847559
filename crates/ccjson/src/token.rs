use core::fmt;

use alloc::string::String;

/// A classified unit of JSON input.
///
/// A sequence produced by a successful [`lex`](crate::lex) always ends with
/// exactly one [`Token::EndOfInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// A string literal with its escapes already decoded.
    String(String),
    /// A number literal. Always finite.
    Number(f64),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// End of the token sequence.
    EndOfInput,
}

impl Token {
    /// Returns the payload-free tag of this token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::LeftBrace => TokenKind::LeftBrace,
            Token::RightBrace => TokenKind::RightBrace,
            Token::Colon => TokenKind::Colon,
            Token::Comma => TokenKind::Comma,
            Token::LeftBracket => TokenKind::LeftBracket,
            Token::RightBracket => TokenKind::RightBracket,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
            Token::Null => TokenKind::Null,
            Token::EndOfInput => TokenKind::EndOfInput,
        }
    }
}

/// The tag of a [`Token`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// A string literal.
    String,
    /// A number literal.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// End of the token sequence.
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::EndOfInput => "end of input",
        })
    }
}

/// Location of a character in the source text.
///
/// `offset` counts characters from zero; `line` and `column` count from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Character index into the source.
    pub offset: usize,
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number within the line, starting at 1.
    pub column: usize,
}

impl Position {
    pub(crate) const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Advances past `c`.
    pub(crate) fn step(&mut self, c: char) {
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

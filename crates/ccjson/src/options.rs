/// Nesting limit applied by [`ParserOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for the parser.
///
/// # Examples
///
/// ```rust
/// use ccjson::{ParserOptions, from_str_with_options};
///
/// let options = ParserOptions {
///     max_depth: Some(2),
/// };
/// assert!(from_str_with_options("[[1]]", options).is_ok());
/// assert!(from_str_with_options("[[[1]]]", options).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum number of nested arrays and objects.
    ///
    /// The parser descends one level of recursion per container, so this
    /// bounds its stack usage. Input nested deeper than the limit is rejected
    /// with [`ParseErrorKind::NestingTooDeep`](crate::ParseErrorKind). `None`
    /// removes the limit.
    ///
    /// # Default
    ///
    /// `Some(128)`
    pub max_depth: Option<usize>,
}

impl ParserOptions {
    /// Options without a nesting limit.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

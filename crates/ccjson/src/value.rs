//! JSON value types and printing.
//!
//! This module defines the [`Value`] tree produced by the parser, and renders
//! it back to JSON text either compactly ([`Display`](core::fmt::Display)) or
//! indented ([`Value::to_pretty_string`]).
//!
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{self, Write};

/// Object members. Keys are unique; a repeated key keeps its last value.
pub type Map = BTreeMap<String, Value>;
/// Array elements, in source order.
pub type Array = Vec<Value>;

/// A parsed JSON value.
///
/// Each node owns its children, so a `Value` is always a tree.
///
/// # Examples
///
/// ```
/// use ccjson::{Value, Map};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// A finite number.
    Number(f64),
    /// A string with escapes decoded.
    String(String),
    /// An ordered sequence of values.
    Array(Array),
    /// A mapping from keys to values.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The members, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Looks up element `index` if this is an array.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array()?.get(index)
    }

    /// Name of the variant, for messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Renders the value as JSON indented by two spaces per level, with a
    /// space after each `:`.
    ///
    /// ```
    /// let v = ccjson::from_str(r#"{"a":[1,{}]}"#).unwrap();
    /// assert_eq!(v.to_pretty_string(), "{\n  \"a\": [\n    1,\n    {}\n  ]\n}");
    /// ```
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_pretty(self, 0, &mut out);
        out
    }
}

const INDENT: &str = "  ";

fn write_indent<W: Write>(f: &mut W, level: usize) -> fmt::Result {
    for _ in 0..level {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_pretty<W: Write>(value: &Value, level: usize, f: &mut W) -> fmt::Result {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            f.write_str("[\n")?;
            for (i, v) in arr.iter().enumerate() {
                if i > 0 {
                    f.write_str(",\n")?;
                }
                write_indent(f, level + 1)?;
                write_pretty(v, level + 1, f)?;
            }
            f.write_char('\n')?;
            write_indent(f, level)?;
            f.write_char(']')
        }
        Value::Object(map) if !map.is_empty() => {
            f.write_str("{\n")?;
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(",\n")?;
                }
                write_indent(f, level + 1)?;
                f.write_char('"')?;
                write_escaped_string(k, f)?;
                f.write_str("\": ")?;
                write_pretty(v, level + 1, f)?;
            }
            f.write_char('\n')?;
            write_indent(f, level)?;
            f.write_char('}')
        }
        // Scalars and empty containers print the same as the compact form.
        other => write!(f, "{other}"),
    }
}

/// Escapes a string for inclusion in a JSON string literal.
///
/// Quotes, backslashes, and control characters are escaped; everything else is
/// written as-is. The output always lexes back to `src`.
pub(crate) fn write_escaped_string<W: Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{0008}' => f.write_str("\\b")?,
            '\u{000C}' => f.write_str("\\f")?,
            // Escape Unicode line separators which pre-2019 JSON parsers may not handle correctly
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            // Finite by construction; `Display` for f64 is the shortest
            // representation that reads back to the same value.
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

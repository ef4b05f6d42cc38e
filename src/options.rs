//! Configuration options for MDSF serialization.
//!
//! - [`StringifyOptions`]: Main configuration struct
//! - [`Replacer`]: Per-key value substitution or an allow-list of object keys
//! - [`Indent`]: Pretty-printing indentation
//!
//! ## Examples
//!
//! ```rust
//! use serde_mdsf::{mdsf, stringify_with_options, Indent, Replacer, StringifyOptions};
//!
//! let value = mdsf!({ "a": 1, "b": [1, 2] });
//!
//! let options = StringifyOptions::new().with_replacer(Replacer::keys(["a"]));
//! assert_eq!(stringify_with_options(&value, &options), "{a:1}");
//!
//! let options = StringifyOptions::new().with_indent(Indent::Text("\t".into()));
//! assert_eq!(
//!     stringify_with_options(&value, &options),
//!     "{\n\ta: 1,\n\tb: [\n\t\t1,\n\t\t2\n\t]\n}"
//! );
//! ```

use crate::ser::format_number;
use crate::Value;
use std::fmt;
use std::sync::Arc;

/// Widest indentation unit, in spaces or characters.
pub const MAX_INDENT: usize = 10;

type ReplacerFn = dyn Fn(&str, &Value, &Value) -> Value + Send + Sync;

/// Substitutes values during serialization.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::{mdsf, stringify_with_options, Replacer, StringifyOptions, Value};
///
/// let replacer = Replacer::function(|key, value, _holder| match value {
///     Value::Number(n) if key == "secret" => Value::from(n.signum()),
///     other => other.clone(),
/// });
/// let options = StringifyOptions::new().with_replacer(replacer);
///
/// let value = mdsf!({ "secret": 42, "public": 7 });
/// assert_eq!(stringify_with_options(&value, &options), "{secret:1,public:7}");
/// ```
#[derive(Clone)]
pub enum Replacer {
    /// Called as `(key, value, holder)` for every value, the root included (key
    /// `""`, holder `{"": root}`). Its result is serialized in place of `value`;
    /// returning `Value::Undefined` drops the field.
    Function(Arc<ReplacerFn>),
    /// Only these keys of objects are written, at every depth. Arrays are not
    /// filtered.
    AllowList(Vec<String>),
}

impl Replacer {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, &Value, &Value) -> Value + Send + Sync + 'static,
    {
        Replacer::Function(Arc::new(f))
    }

    /// Builds an allow-list from arbitrary values.
    ///
    /// Strings and numbers are kept (numbers as their canonical text), boxed
    /// strings and numbers are unwrapped, and everything else is ignored.
    /// Duplicates are dropped.
    ///
    /// ```rust
    /// use serde_mdsf::{Boxed, Replacer, Value};
    ///
    /// let replacer = Replacer::allow_list([
    ///     Value::from(0),
    ///     Boxed::value("a"),
    ///     Value::Bool(true),
    ///     Value::from("a"),
    /// ]);
    /// match replacer {
    ///     Replacer::AllowList(keys) => assert_eq!(keys, vec!["0", "a"]),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn allow_list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut keys: Vec<String> = Vec::new();
        for value in values {
            let value = match value.into() {
                Value::Host(host) => host.unboxed().unwrap_or(Value::Undefined),
                other => other,
            };
            let key = match value {
                Value::String(s) => s,
                Value::Number(n) => format_number(n),
                _ => continue,
            };
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Replacer::AllowList(keys)
    }

    /// Shorthand for an allow-list of plain keys.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Replacer::allow_list(keys.into_iter().map(|key| Value::String(key.into())))
    }
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacer::Function(_) => f.write_str("Replacer::Function(..)"),
            Replacer::AllowList(keys) => f.debug_tuple("Replacer::AllowList").field(keys).finish(),
        }
    }
}

/// Indentation of pretty-printed output.
///
/// Spaces are capped at 10, text is cut to its first 10 characters. Zero or
/// negative widths and empty text mean compact output.
///
/// ```rust
/// use serde_mdsf::{Indent, Value};
///
/// assert_eq!(Indent::Spaces(3).unit(), "   ");
/// assert_eq!(Indent::Spaces(20).unit().len(), 10);
/// assert_eq!(Indent::Spaces(-1).unit(), "");
/// assert_eq!(Indent::from_value(&Value::from(2.9)), Indent::Spaces(2));
/// assert_eq!(Indent::from_value(&Value::Bool(true)), Indent::None);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Indent {
    #[default]
    None,
    Spaces(i64),
    Text(String),
}

impl Indent {
    /// Interprets a dynamic value the way the `space` argument of a JSON
    /// serializer is interpreted: numbers are truncated, strings are used as
    /// is, boxed numbers and strings are unwrapped, and anything else disables
    /// indentation.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) if n.is_nan() => Indent::Spaces(0),
            Value::Number(n) => Indent::Spaces(n.trunc() as i64),
            Value::String(s) => Indent::Text(s.clone()),
            Value::Host(host) => match host.unboxed() {
                Some(inner @ (Value::Number(_) | Value::String(_))) => Indent::from_value(&inner),
                _ => Indent::None,
            },
            _ => Indent::None,
        }
    }

    /// The text inserted once per nesting level. Empty means compact output.
    #[must_use]
    pub fn unit(&self) -> String {
        match self {
            Indent::None => String::new(),
            Indent::Spaces(n) => " ".repeat((*n).clamp(0, MAX_INDENT as i64) as usize),
            Indent::Text(s) => s.chars().take(MAX_INDENT).collect(),
        }
    }
}

impl From<usize> for Indent {
    fn from(spaces: usize) -> Self {
        Indent::Spaces(spaces.min(MAX_INDENT) as i64)
    }
}

impl From<&str> for Indent {
    fn from(text: &str) -> Self {
        Indent::Text(text.to_string())
    }
}

/// Configuration options for [`stringify_with_options`](crate::stringify_with_options).
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::{Indent, StringifyOptions};
///
/// // Compact output, no replacer
/// let options = StringifyOptions::new();
/// assert_eq!(options.indent, Indent::None);
///
/// // Two-space indentation
/// let options = StringifyOptions::pretty();
/// assert_eq!(options.indent, Indent::Spaces(2));
///
/// let options = StringifyOptions::new().with_indent(Indent::Spaces(4));
/// assert_eq!(options.indent.unit(), "    ");
/// ```
#[derive(Clone, Debug, Default)]
pub struct StringifyOptions {
    pub replacer: Option<Replacer>,
    pub indent: Indent,
}

impl StringifyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pretty() -> Self {
        StringifyOptions {
            indent: Indent::Spaces(2),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<Indent>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn with_replacer(mut self, replacer: Replacer) -> Self {
        self.replacer = Some(replacer);
        self
    }
}

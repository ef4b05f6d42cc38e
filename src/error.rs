//! Error types for MDSF parsing, framing and the serde bridge.
//!
//! The codec itself has exactly one failure mode: [`SyntaxError`], raised by
//! [`parse`](crate::parse) and [`reassemble`](crate::reassemble). It carries a
//! human-readable description and the byte offset at which parsing stopped.
//!
//! [`Error`] wraps it for the serde-facing functions, which can additionally fail
//! while mapping a [`Value`](crate::Value) onto a Rust type or while doing I/O.
//!
//! ## Examples
//!
//! ```rust
//! use serde_mdsf::parse;
//!
//! let err = parse("[42,").unwrap_err();
//! assert_eq!(err.offset(), 4);
//! assert_eq!(err.to_string(), "unexpected end of data at position 4");
//! ```

use std::fmt;
use thiserror::Error;

/// A malformed MDSF document.
///
/// Parsing stops at the first error; there is no recovery. `offset` is the byte
/// offset into the parsed text (for framed records, into the record).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {offset}")]
pub struct SyntaxError {
    message: String,
    offset: usize,
}

impl SyntaxError {
    /// Creates a syntax error at the given byte offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_mdsf::SyntaxError;
    ///
    /// let err = SyntaxError::new("`:` expected", 5);
    /// assert_eq!(err.to_string(), "`:` expected at position 5");
    /// ```
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        SyntaxError {
            message: message.into(),
            offset,
        }
    }

    /// The description of what was expected or unexpected.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset at which the error was raised.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Represents all errors of the serde-facing API.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The text is not valid MDSF
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Raised by `Serialize`/`Deserialize` implementations
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_mdsf::Error;
    ///
    /// let err = Error::custom("missing field `id`");
    /// assert!(err.to_string().contains("missing field"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the underlying syntax error, if this is one.
    #[must_use]
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new("unexpected `}`", 12);
        assert_eq!(err.message(), "unexpected `}`");
        assert_eq!(err.offset(), 12);
        assert_eq!(err.to_string(), "unexpected `}` at position 12");
    }

    #[test]
    fn test_error_wraps_syntax() {
        let err: Error = SyntaxError::new("`]` expected", 3).into();
        assert_eq!(err.as_syntax().map(SyntaxError::offset), Some(3));
        assert!(err.to_string().starts_with("Syntax error: "));
        assert!(Error::custom("boom").as_syntax().is_none());
    }
}

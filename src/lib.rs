//! # serde_mdsf
//!
//! A codec for MDSF, a JSON5-like text format with richer scalars, plus the
//! record framer used to carry it over a stream transport.
//!
//! ## What is MDSF?
//!
//! MDSF extends JSON with comments, single-quoted strings, unquoted keys,
//! sparse arrays, `undefined`, non-finite numbers, and
//! binary/octal/hexadecimal integers. Values also include timestamps, binary
//! payloads and opaque host objects that decide their own representation.
//! Records on the wire are objects separated by a NUL character.
//!
//! ## Key Features
//!
//! - **Strict parser**: every error names what went wrong and the byte offset
//! - **JSON-style serializer**: replacer functions, key allow-lists, indentation
//! - **Hooks**: host values convert themselves through [`ToMdsf`] or [`ToJson`]
//! - **Framing**: [`reassemble`], [`frame`] and the stateful [`RecordBuffer`]
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]`
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_mdsf::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     nickname: Option<String>,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), nickname: None };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "{id:123,name:'Alice'}");
//!
//! let back: User = from_str(&text).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use serde_mdsf::{parse, stringify, Value};
//!
//! let value = parse("{ list: [1,,0x10], /* comment */ 'quoted key': NaN }").unwrap();
//! assert_eq!(value.get("list").and_then(Value::as_array).map(Vec::len), Some(3));
//! assert_eq!(stringify(&value), "{list:[1,,16],'quoted key':NaN}");
//! ```
//!
//! ### Framing
//!
//! ```rust
//! use serde_mdsf::{mdsf, frame, RecordBuffer};
//!
//! let wire = frame(&mdsf!({ "event": "ready" }));
//! let mut buffer = RecordBuffer::new();
//! assert!(buffer.push(&wire[..4]).unwrap().is_empty());
//! assert_eq!(buffer.push(&wire[4..]).unwrap(), vec![mdsf!({ "event": "ready" })]);
//! ```
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Serde round trip
//! - **`macro.rs`** - Building values with the mdsf! macro
//! - **`dynamic_values.rs`** - Parsing and inspecting [`Value`] trees
//! - **`custom_options.rs`** - Replacers, allow-lists, indentation and hooks
//! - **`framing.rs`** - Reassembling records from a chunked stream
//!
//! Run any demo with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod framer;
pub mod grammar;
pub mod host;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
mod scanner;
pub mod ser;
pub mod value;

pub use de::{from_value, Deserializer};
pub use error::{Error, Result, SyntaxError};
pub use framer::{frame, reassemble, RecordBuffer, DELIMITER};
pub use host::{Boxed, Callable, HostRef, HostValue, ToJson, ToMdsf};
pub use map::Map;
pub use options::{Indent, Replacer, StringifyOptions, MAX_INDENT};
pub use parser::{parse, parse_slice};
pub use ser::{
    format_number, stringify, stringify_pretty, stringify_with_options, to_value,
    ValueSerializer,
};
pub use value::{Slot, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to an MDSF string.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "{x:1,y:2}");
/// ```
///
/// # Errors
///
/// Returns an error if the value's `Serialize` implementation fails, for
/// example on a map with non-scalar keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &StringifyOptions::default())
}

/// Serialize any `T: Serialize` to a pretty-printed MDSF string.
///
/// ```rust
/// use serde_mdsf::to_string_pretty;
///
/// assert_eq!(to_string_pretty(&vec![1, 2]).unwrap(), "[\n  1,\n  2\n]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted to a [`Value`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &StringifyOptions::pretty())
}

/// Serialize any `T: Serialize` to an MDSF string with custom options.
///
/// ```rust
/// use serde_mdsf::{to_string_with_options, Replacer, StringifyOptions};
/// use std::collections::BTreeMap;
///
/// let map: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
/// let options = StringifyOptions::new().with_replacer(Replacer::keys(["b"]));
/// assert_eq!(to_string_with_options(&map, &options).unwrap(), "{b:2}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted to a [`Value`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &StringifyOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    Ok(stringify_with_options(&value, options))
}

/// Serialize any `T: Serialize` to a writer in MDSF format.
///
/// ```rust
/// use serde_mdsf::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &("a", true)).unwrap();
/// assert_eq!(buffer, b"['a',true]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of MDSF text.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{ x: 1, y: +2, }").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the input is not valid MDSF, or
/// [`Error::Custom`] if it does not fit type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(s)?)
}

/// Deserialize an instance of type `T` from an I/O stream of MDSF.
///
/// ```rust
/// use serde_mdsf::from_reader;
/// use std::io::Cursor;
///
/// let nums: Vec<u8> = from_reader(Cursor::new(b"[1, 2, 3]")).unwrap();
/// assert_eq!(nums, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid
/// MDSF, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

/// Deserialize an instance of type `T` from bytes of MDSF text.
///
/// ```rust
/// use serde_mdsf::from_slice;
///
/// let flag: bool = from_slice(b" true // yes").unwrap();
/// assert!(flag);
/// assert!(from_slice::<bool>(b"\xfftrue").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid MDSF, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse_slice(v)?)
}

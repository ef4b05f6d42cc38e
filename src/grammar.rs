//! MDSF Format Reference
//!
//! This module documents the MDSF text format as read by [`parse`](crate::parse)
//! and written by [`stringify`](crate::stringify). It contains no code.
//!
//! # Overview
//!
//! MDSF is JSON5 with a few extra scalars. Every JSON document is a valid MDSF
//! document. On top of JSON it accepts comments, single-quoted strings,
//! unquoted and numeric keys, trailing commas, sparse arrays, `undefined`,
//! `NaN`, `Infinity` and binary/octal/hexadecimal integers.
//!
//! # Grammar
//!
//! ```text
//! value         := number | ident-literal | string | array | object
//! number        := ['+'|'-'] ( '0' ('b'|'o'|'x') basedigits | decimal | 'Infinity' | 'NaN' )
//! ident-literal := 'undefined' | 'null' | 'true' | 'false' | 'NaN' | 'Infinity'
//! string        := "'" chars "'" | '"' chars '"'
//! array         := '[' (slot (',' slot)*)? ']'
//! object        := '{' (pair (',' pair)*)? '}'
//! pair          := key ':' value
//! key           := string | number | identifier
//! ```
//!
//! Whitespace and comments (`// ...` up to a line terminator, `/* ... */`) may
//! appear between any two tokens and around the document.
//!
//! ## Numbers
//!
//! | Source | Value |
//! |--------|-------|
//! | `42`, `-3`, `+1` | 42, -3, 1 |
//! | `.5`, `5.`, `1e+100` | 0.5, 5, 1e100 |
//! | `0b1010`, `0o123`, `0xAF` | 10, 83, 175 |
//! | `Infinity`, `-Infinity`, `NaN` | non-finite values |
//!
//! A leading zero followed by another digit (`012`) is rejected as a legacy
//! octal literal. A decimal is read the way a lenient float parser reads it:
//! the longest valid prefix wins, so `1e` is `1`.
//!
//! ## Strings
//!
//! Either quote character may delimit a string; the other one needs no escape.
//! Recognized escapes:
//!
//! | Escape | Meaning |
//! |--------|---------|
//! | `\b \f \n \r \t \v` | control characters |
//! | `\0` to `\377` | octal code unit |
//! | `\xHH` | two hex digits |
//! | `\uHHHH` | four hex digits; a surrogate pair combines into one character |
//! | `\u{H...}` | one to eight hex digits, at most `10FFFF` |
//! | `\` + line terminator | line continuation, produces nothing |
//! | `\` + other | the character itself |
//!
//! An unescaped line terminator (`\n`, `\r`, U+2028, U+2029) inside a string
//! is an error.
//!
//! ## Arrays
//!
//! An empty slot between commas is a *hole*. `[1,,3]` has three slots and the
//! middle one is a hole. A single trailing comma adds nothing, so `[1,]` has
//! one slot while `[1,,]` has two and `[,]` has one.
//!
//! ## Objects
//!
//! A key is a quoted string, a number (stored as its canonical text, so `0x10`
//! becomes `"16"`) or an identifier. Identifiers follow Unicode XID rules and
//! also accept `$`, `_` and `\uHHHH` escapes. Fields whose value is `undefined`
//! are dropped. Later duplicates replace earlier values in place.
//!
//! # Writing
//!
//! The serializer emits the smallest text that reads back as the same tree:
//!
//! - strings use single quotes
//! - keys are bare when they match `[A-Za-z_$][A-Za-z0-9_$]*`
//! - numbers use their shortest round-trip text (`1e+21`, `1e-7`, `-0`)
//! - `undefined` fields and unresolvable host values are omitted
//! - holes and omitted array elements leave an empty slot
//! - timestamps become ISO-8601 strings with milliseconds, binary data becomes
//!   base64 strings
//!
//! ```rust
//! use serde_mdsf::{mdsf, parse, stringify};
//!
//! let text = stringify(&mdsf!({ "id": 7, "first-name": "Ada", "gone": undefined }));
//! assert_eq!(text, "{id:7,'first-name':'Ada'}");
//! assert_eq!(stringify(&parse(&text).unwrap()), text);
//! ```
//!
//! # Framing
//!
//! On the wire every record is an object followed by a NUL character
//! (`\0`). See [`reassemble`](crate::reassemble).

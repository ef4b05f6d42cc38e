//! Recursive-descent parser for MDSF text.
//!
//! Each grammar production is a method on [`Parser`]; they recurse into each
//! other through [`Parser::parse_value`]. Parsing stops at the first error.

use crate::error::SyntaxError;
use crate::scanner::{is_line_terminator, is_whitespace, Scanner};
use crate::ser::format_number;
use crate::{Map, Slot, Value};
use unicode_xid::UnicodeXID;

type Result<T> = std::result::Result<T, SyntaxError>;

/// Parses a complete MDSF document.
///
/// Leading and trailing whitespace and comments are allowed; anything else
/// after the value is an error.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::{parse, Value};
///
/// let value = parse("{ key: 'value', list: [1, 2, 0x10] }").unwrap();
/// assert_eq!(value.get("key").and_then(Value::as_str), Some("value"));
/// assert_eq!(value.get("list").and_then(|l| l.index(2)), Some(&Value::from(16)));
///
/// let err = parse("{ key: function() {} }").unwrap_err();
/// assert_eq!(err.message(), "unexpected identifier `function`");
/// ```
pub fn parse(source: &str) -> Result<Value> {
    Parser::new(source).parse_document()
}

/// Parses a document held in a byte buffer.
///
/// Invalid UTF-8 is reported as a [`SyntaxError`] at the first offending byte.
///
/// ```rust
/// use serde_mdsf::parse_slice;
///
/// assert!(parse_slice(b"[true]").is_ok());
/// let err = parse_slice(b"['\xff']").unwrap_err();
/// assert_eq!(err.offset(), 2);
/// ```
pub fn parse_slice(bytes: &[u8]) -> Result<Value> {
    let source = std::str::from_utf8(bytes)
        .map_err(|err| SyntaxError::new("invalid UTF-8", err.valid_up_to()))?;
    parse(source)
}

pub(crate) struct Parser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(source),
        }
    }

    /// `value` followed by nothing but clutter.
    pub fn parse_document(&mut self) -> Result<Value> {
        let value = self.parse_value()?;
        self.ensure_end()?;
        Ok(value)
    }

    /// A framed record: an `object` followed by nothing but clutter.
    pub fn parse_record(&mut self) -> Result<Value> {
        let value = self.parse_object()?;
        self.ensure_end()?;
        Ok(value)
    }

    fn ensure_end(&mut self) -> Result<()> {
        self.scanner.skip_clutter()?;
        if self.scanner.is_at_end() {
            Ok(())
        } else {
            Err(self.scanner.unexpected())
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.scanner.skip_clutter()?;
        match self.scanner.lookahead() {
            Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_literal(),
            Some('\'' | '"') => self.parse_string().map(Value::String),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            _ => Err(self.scanner.unexpected()),
        }
    }

    fn take_letters(&mut self) -> (usize, &'a str) {
        let start = self.scanner.pos();
        while self.scanner.lookahead().map_or(false, |c| c.is_ascii_alphabetic()) {
            self.scanner.eat_any();
        }
        (start, self.scanner.since(start))
    }

    fn parse_literal(&mut self) -> Result<Value> {
        let (start, identifier) = self.take_letters();
        match identifier {
            "undefined" => Ok(Value::Undefined),
            "null" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "NaN" => Ok(Value::Number(f64::NAN)),
            "Infinity" => Ok(Value::Number(f64::INFINITY)),
            _ => Err(unexpected_identifier(identifier, start)),
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.scanner.pos();
        let negative = match self.scanner.lookahead() {
            Some('-') => {
                self.scanner.eat_any();
                true
            }
            Some('+') => {
                self.scanner.eat_any();
                false
            }
            _ => false,
        };

        let magnitude = if self.scanner.lookahead().map_or(false, |c| c.is_ascii_alphabetic()) {
            let (at, identifier) = self.take_letters();
            match identifier {
                "Infinity" => f64::INFINITY,
                "NaN" => f64::NAN,
                _ => return Err(unexpected_identifier(identifier, at)),
            }
        } else if self.scanner.lookahead() == Some('0') {
            match self.scanner.lookahead2() {
                Some(c) if c.is_ascii_digit() => {
                    self.scanner.eat_any();
                    return Err(self.scanner.error("legacy octal literals are not supported"));
                }
                Some('b' | 'B') => self.parse_radix_digits(2)?,
                Some('o' | 'O') => self.parse_radix_digits(8)?,
                Some('x' | 'X') => self.parse_radix_digits(16)?,
                _ => self.parse_decimal(start)?,
            }
        } else {
            self.parse_decimal(start)?
        };

        Ok(Value::Number(if negative { -magnitude } else { magnitude }))
    }

    /// Digits after a `0b`/`0o`/`0x` prefix. The lookahead is the `0`.
    fn parse_radix_digits(&mut self, radix: u32) -> Result<f64> {
        self.scanner.eat_any();
        self.scanner.eat_any();

        let mut exact: Option<u64> = Some(0);
        let mut approx = 0f64;
        let mut count = 0usize;
        while let Some(digit) = self.scanner.lookahead().and_then(|c| c.to_digit(radix)) {
            self.scanner.eat_any();
            count += 1;
            exact = exact
                .and_then(|n| n.checked_mul(u64::from(radix)))
                .and_then(|n| n.checked_add(u64::from(digit)));
            approx = approx * f64::from(radix) + f64::from(digit);
        }

        if count == 0 {
            return Err(self.scanner.error("invalid number format"));
        }
        Ok(exact.map_or(approx, |n| n as f64))
    }

    fn parse_decimal(&mut self, start: usize) -> Result<f64> {
        let digits_start = self.scanner.pos();
        let (mut dot, mut sign, mut exponent) = (false, false, false);

        while let Some(c) = self.scanner.lookahead() {
            let seen = match c {
                '0'..='9' => None,
                '.' => Some(&mut dot),
                '+' | '-' => Some(&mut sign),
                'e' | 'E' => Some(&mut exponent),
                _ => break,
            };
            if let Some(seen) = seen {
                if *seen {
                    return Err(self.scanner.unexpected());
                }
                *seen = true;
            }
            self.scanner.eat_any();
        }

        float_prefix(self.scanner.since(digits_start))
            .ok_or_else(|| SyntaxError::new("invalid number format", start))
    }

    fn parse_string(&mut self) -> Result<String> {
        let quote = self.scanner.advance()?;
        let mut out = String::new();

        loop {
            let at = self.scanner.pos();
            let c = self.scanner.advance()?;
            if c == quote {
                return Ok(out);
            }
            if c == '\\' {
                self.parse_escape(&mut out)?;
            } else if is_line_terminator(c) {
                return Err(SyntaxError::new("unescaped multiline string", at));
            } else {
                out.push(c);
            }
        }
    }

    /// The part of an escape sequence after the backslash.
    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        if self.skip_line_continuation() {
            return Ok(());
        }

        let c = self.scanner.advance()?;
        match c {
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '0'..='7' => {
                self.scanner.retreat();
                let mut code = 0;
                for _ in 0..3 {
                    match self.scanner.lookahead().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            self.scanner.eat_any();
                            code = code * 8 + digit;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'x' => {
                let code = self.read_hex_digits(2, "invalid hexadecimal escape sequence")?;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => out.push(self.parse_unicode_escape()?),
            other => out.push(other),
        }
        Ok(())
    }

    /// Backslash, optional blanks, then a line terminator (CRLF counts as one).
    fn skip_line_continuation(&mut self) -> bool {
        let mark = self.scanner.mark();
        while self
            .scanner
            .lookahead()
            .map_or(false, |c| is_whitespace(c) && !is_line_terminator(c))
        {
            self.scanner.eat_any();
        }
        match self.scanner.lookahead() {
            Some('\r') => {
                self.scanner.eat_any();
                self.scanner.eat('\n');
                true
            }
            Some(c) if is_line_terminator(c) => {
                self.scanner.eat_any();
                true
            }
            _ => {
                self.scanner.reset(mark);
                false
            }
        }
    }

    /// The part of a `\u` escape after the `u`, combining an escaped
    /// surrogate pair into one character.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let code = self.read_code_unit()?;
        if (0xD800..=0xDBFF).contains(&code) && self.scanner.rest().starts_with("\\u") {
            let mark = self.scanner.mark();
            self.scanner.eat_any();
            self.scanner.eat_any();
            let low = self.read_code_unit()?;
            if (0xDC00..=0xDFFF).contains(&low) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(combined).unwrap_or('\u{FFFD}'));
            }
            self.scanner.reset(mark);
        }
        Ok(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    /// `HHHH` or `{H...}`.
    fn read_code_unit(&mut self) -> Result<u32> {
        if !self.scanner.eat('{') {
            return self.read_hex_digits(4, "invalid Unicode escape sequence");
        }

        let start = self.scanner.pos();
        let mut code = 0u32;
        loop {
            let c = self.scanner.advance()?;
            if c == '}' {
                break;
            }
            match c.to_digit(16) {
                Some(digit) => code = code.saturating_mul(16).saturating_add(digit),
                None => return Err(SyntaxError::new("invalid code point", start)),
            }
        }

        let count = self.scanner.pos() - start - 1;
        if count == 0 || count > 8 || code > 0x10FFFF {
            return Err(SyntaxError::new("invalid code point", start));
        }
        Ok(code)
    }

    fn read_hex_digits(&mut self, count: usize, message: &str) -> Result<u32> {
        let start = self.scanner.pos();
        let mut code = 0u32;
        for _ in 0..count {
            match self.scanner.lookahead().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    self.scanner.eat_any();
                    code = code * 16 + digit;
                }
                None => return Err(SyntaxError::new(message, start)),
            }
        }
        Ok(code)
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.scanner.expect('[')?;
        let mut slots = Vec::new();

        loop {
            self.scanner.skip_clutter()?;
            match self.scanner.lookahead() {
                Some(']') => break,
                Some(',') => slots.push(Slot::Hole),
                _ => slots.push(Slot::Present(self.parse_value()?)),
            }

            self.scanner.skip_clutter()?;
            if self.scanner.lookahead() != Some(']') {
                self.scanner.expect(',')?;
            }
        }

        self.scanner.expect(']')?;
        Ok(Value::Array(slots))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.scanner.skip_clutter()?;
        self.scanner.expect('{')?;
        let mut object = Map::new();

        loop {
            self.scanner.skip_clutter()?;
            if self.scanner.eat('}') {
                return Ok(Value::Object(object));
            }

            let key = self.parse_key()?;
            self.scanner.skip_clutter()?;
            self.scanner.expect(':')?;
            let value = self.parse_value()?;
            if !value.is_undefined() {
                object.insert(key, value);
            }

            self.scanner.skip_clutter()?;
            if self.scanner.lookahead() != Some('}') {
                self.scanner.expect(',')?;
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.scanner.lookahead() {
            Some('\'' | '"') => self.parse_string(),
            Some(c) if c.is_ascii_digit() || c == '.' => match self.parse_number()? {
                Value::Number(n) => Ok(format_number(n)),
                _ => Err(self.scanner.error("invalid number format")),
            },
            Some(c) if c == '\\' || is_identifier_start(c) => self.parse_identifier(),
            _ => Err(self.scanner.unexpected()),
        }
    }

    fn parse_identifier(&mut self) -> Result<String> {
        let mut name = String::new();

        while let Some(c) = self.scanner.lookahead() {
            let start = self.scanner.pos();
            let c = if c == '\\' {
                self.scanner.eat_any();
                if !self.scanner.eat('u') {
                    return Err(SyntaxError::new("invalid identifier escape", start));
                }
                self.parse_unicode_escape()?
            } else if is_identifier_part(c) {
                self.scanner.eat_any();
                c
            } else {
                break;
            };

            let valid = if name.is_empty() {
                is_identifier_start(c)
            } else {
                is_identifier_part(c)
            };
            if !valid {
                return Err(SyntaxError::new("invalid identifier escape", start));
            }
            name.push(c);
        }

        Ok(name)
    }
}

fn unexpected_identifier(identifier: &str, offset: usize) -> SyntaxError {
    SyntaxError::new(format!("unexpected identifier `{}`", identifier), offset)
}

fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || UnicodeXID::is_xid_start(c)
}

fn is_identifier_part(c: char) -> bool {
    c == '$' || c == '\u{200C}' || c == '\u{200D}' || UnicodeXID::is_xid_continue(c)
}

/// The value of the longest prefix of `text` that reads as a decimal literal,
/// or `None` if there is none. `1e` reads as `1`, `.` reads as nothing.
fn float_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let has_int = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            end = frac_end;
        } else if has_int {
            // `1.` and `1.e5` keep the dot
            end += 1;
        } else {
            return None;
        }
    } else if !has_int {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(source: &str) -> f64 {
        parse(source).unwrap().as_f64().unwrap()
    }

    fn error(source: &str) -> String {
        parse(source).unwrap_err().message().to_string()
    }

    #[test]
    fn test_float_prefix() {
        assert_eq!(float_prefix("1.5e3"), Some(1500.0));
        assert_eq!(float_prefix("1e"), Some(1.0));
        assert_eq!(float_prefix("1."), Some(1.0));
        assert_eq!(float_prefix(".5"), Some(0.5));
        assert_eq!(float_prefix("5-3"), Some(5.0));
        assert_eq!(float_prefix("."), None);
        assert_eq!(float_prefix(""), None);
        assert_eq!(float_prefix("e5"), None);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(number("0b1010"), 10.0);
        assert_eq!(number("0o123"), 83.0);
        assert_eq!(number("0xAF"), 175.0);
        assert_eq!(number("0XaF"), 175.0);
        assert_eq!(number("-3"), -3.0);
        assert_eq!(number("+.5"), 0.5);
        assert_eq!(number("1e+100"), 1e100);
        assert_eq!(number("-Infinity"), f64::NEG_INFINITY);
        assert!(number("NaN").is_nan());
        assert!(number("-0").is_sign_negative());
        assert_eq!(number("0xFFFFFFFFFFFFFFFFFF"), 4722366482869645213696.0);
        assert_eq!(number("1."), 1.0);
        assert_eq!(number("1.e5"), 100000.0);
        assert_eq!(number("2.e-1"), 0.2);
        assert_eq!(number("5.E+2"), 500.0);
        assert_eq!(number(".5e1"), 5.0);
        assert_eq!(
            crate::stringify(&parse("{a: 2.e1}").unwrap()),
            "{a:20}"
        );
    }

    #[test]
    fn test_number_errors() {
        assert_eq!(error("0123"), "legacy octal literals are not supported");
        assert_eq!(error("0x"), "invalid number format");
        assert_eq!(error("1.2.3"), "unexpected `.`");
        assert_eq!(error("1e2e3"), "unexpected `e`");
        assert_eq!(error("."), "invalid number format");
        assert_eq!(error("-foo"), "unexpected identifier `foo`");
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("undefined"), Ok(Value::Undefined));
        assert_eq!(parse(" null "), Ok(Value::Null));
        assert_eq!(parse("true"), Ok(Value::Bool(true)));
        assert_eq!(error("process"), "unexpected identifier `process`");
        assert_eq!(error("#+"), "unexpected `#`");
    }

    #[test]
    fn test_string_escapes() {
        let s = |source: &str| parse(source).unwrap().as_str().unwrap().to_string();
        assert_eq!(s(r"'\x48\x65\x6c\x6c\x6f'"), "Hello");
        assert_eq!(s(r"'\u{1F49A}\u{1F49B}'"), "\u{1F49A}\u{1F49B}");
        assert_eq!(s(r"'💚'"), "\u{1F49A}");
        assert_eq!(s(r"'\uD83D'"), "\u{FFFD}");
        assert_eq!(s(r"'\101\0'"), "A\0");
        assert_eq!(s(r#""it's \"quoted\"""#), "it's \"quoted\"");
        assert_eq!(s("'a\\  \r\nb'"), "ab");
        assert_eq!(s(r"'\q'"), "q");
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(error(r"'\u{'"), "invalid code point");
        assert_eq!(error(r"'\u{1F49A"), "unexpected end of data");
        assert_eq!(error(r"'\u{}'"), "invalid code point");
        assert_eq!(error(r"'\u{420420}'"), "invalid code point");
        assert_eq!(error(r"'\u12'"), "invalid Unicode escape sequence");
        assert_eq!(error("'a\nb'"), "unescaped multiline string");
        assert_eq!(error("'open"), "unexpected end of data");
    }

    #[test]
    fn test_arrays() {
        let value = parse("[1,,3,]").unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Slot::Present(Value::from(1)),
                Slot::Hole,
                Slot::Present(Value::from(3)),
            ])
        );
        assert_eq!(parse("[,]").unwrap(), Value::Array(vec![Slot::Hole]));
        assert_eq!(parse("[ /* c */ ]").unwrap(), Value::Array(vec![]));
        assert_eq!(error("[1 2]"), "`,` expected");
    }

    #[test]
    fn test_objects() {
        let value = parse("{ a: 1, 'b c': 2, 3: 4, $_x: 5, ünï: 6, \\u0061b: 7, }").unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b c", "3", "$_x", "ünï", "ab"]);

        let value = parse("{a: undefined, b: null}").unwrap();
        assert!(value.get("a").is_none());
        assert_eq!(value.get("b"), Some(&Value::Null));

        let value = parse("{1e3: true, .5: false}").unwrap();
        assert!(value.get("1000").is_some());
        assert!(value.get("0.5").is_some());
    }

    #[test]
    fn test_object_errors() {
        assert_eq!(error("{key:"), "unexpected end of data");
        assert_eq!(error("{key:,}"), "unexpected `,`");
        assert_eq!(error("{key 1}"), "`:` expected");
        assert_eq!(error("{get a() {}}"), "`:` expected");
        assert_eq!(error(r"{\x61: 1}"), "invalid identifier escape");
    }

    #[test]
    fn test_trailing_content() {
        let err = parse("{a:1} x").unwrap_err();
        assert_eq!(err.message(), "unexpected `x`");
        assert_eq!(err.offset(), 6);
        assert!(parse("{a:1} // done").is_ok());
    }

    #[test]
    fn test_record_must_be_object() {
        assert!(Parser::new(" {a:1} ").parse_record().is_ok());
        assert_eq!(
            Parser::new("[1]").parse_record().unwrap_err().message(),
            "`{` expected"
        );
    }
}

//! MDSF serialization.
//!
//! Two directions live here:
//!
//! - [`stringify_with_options`] and its shortcuts render a [`Value`] tree as
//!   MDSF text. Rendering is total: every tree has a textual form.
//! - [`ValueSerializer`] turns any `T: Serialize` into a [`Value`]; see
//!   [`to_value`](crate::to_value).
//!
//! ## Output Format
//!
//! - Strings are single-quoted: `'it\'s'`
//! - Object keys are bare when they are plain identifiers: `{a:1,'b-c':2}`
//! - `undefined` fields and opaque host values are left out
//! - Holes in arrays stay empty: `[1,,3]`
//! - Timestamps are ISO-8601 strings, binary payloads are base64 strings
//!
//! ```rust
//! use serde_mdsf::{parse, stringify, stringify_pretty};
//!
//! let value = parse("{ name: \"it's\", 'list': [1, , 3], skip: undefined }").unwrap();
//! assert_eq!(stringify(&value), "{name:'it\\'s',list:[1,,3]}");
//! assert_eq!(
//!     stringify_pretty(&value),
//!     "{\n  name: 'it\\'s',\n  list: [\n    1,\n    ,\n    3\n  ]\n}"
//! );
//! ```

use crate::{Error, Map, Replacer, Result, Slot, StringifyOptions, Value};
use base64::Engine;
use chrono::SecondsFormat;
use serde::{ser, Serialize};
use std::borrow::Cow;
use std::fmt::Write;

/// Renders a value as compact MDSF text.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::{mdsf, stringify, Value};
///
/// assert_eq!(stringify(&mdsf!({ "a": [1, true, null] })), "{a:[1,true,null]}");
/// assert_eq!(stringify(&Value::Undefined), "undefined");
/// ```
#[must_use]
pub fn stringify(value: &Value) -> String {
    stringify_with_options(value, &StringifyOptions::default())
}

/// Renders a value with two-space indentation.
#[must_use]
pub fn stringify_pretty(value: &Value) -> String {
    stringify_with_options(value, &StringifyOptions::pretty())
}

/// Renders a value using a replacer and/or indentation.
///
/// Every value, the root included, is resolved before it is written:
///
/// 1. a host value's conversion hook is applied (see [`crate::host`]);
/// 2. a function [`Replacer`] is called with the key, the value and its holder;
/// 3. a boxed scalar is unwrapped.
///
/// A root that resolves to nothing renders as `undefined`.
#[must_use]
pub fn stringify_with_options(value: &Value, options: &StringifyOptions) -> String {
    let mut stringifier = Stringifier {
        output: String::with_capacity(128),
        unit: options.indent.unit(),
        indent: String::new(),
        replacer: options.replacer.as_ref(),
    };

    let written = match options.replacer {
        Some(Replacer::Function(_)) => {
            let mut wrapper = Map::with_capacity(1);
            wrapper.insert(String::new(), value.clone());
            let holder = Value::Object(wrapper);
            let resolved = stringifier.resolve("", value, &holder);
            stringifier.write_value(&resolved)
        }
        _ => {
            let resolved = stringifier.resolve("", value, &Value::Undefined);
            stringifier.write_value(&resolved)
        }
    };

    if written {
        stringifier.output
    } else {
        "undefined".to_string()
    }
}

struct Stringifier<'o> {
    output: String,
    unit: String,
    indent: String,
    replacer: Option<&'o Replacer>,
}

impl<'o> Stringifier<'o> {
    fn resolve<'v>(&self, key: &str, value: &'v Value, holder: &Value) -> Cow<'v, Value> {
        let mut value = Cow::Borrowed(value);

        if let Value::Host(host) = value.as_ref() {
            if let Some(converted) = host.convert(key) {
                value = Cow::Owned(converted);
            }
        }

        if let Some(Replacer::Function(replace)) = self.replacer {
            value = Cow::Owned(replace(key, &value, holder));
        }

        if let Value::Host(host) = value.as_ref() {
            if let Some(primitive) = host.unboxed() {
                value = Cow::Owned(primitive);
            }
        }

        value
    }

    fn is_allowed(&self, key: &str) -> bool {
        match self.replacer {
            Some(Replacer::AllowList(keys)) => keys.iter().any(|allowed| allowed == key),
            _ => true,
        }
    }

    /// Writes a resolved value. Returns `false`, writing nothing, for values
    /// without a textual form.
    fn write_value(&mut self, value: &Value) -> bool {
        match value {
            Value::Undefined | Value::Host(_) => return false,
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.output.push_str(&format_number(*n)),
            Value::String(s) => write_quoted(&mut self.output, s),
            Value::Timestamp(ts) => write_quoted(
                &mut self.output,
                &ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            Value::Binary(bytes) => write_quoted(
                &mut self.output,
                &base64::engine::general_purpose::STANDARD.encode(bytes),
            ),
            Value::Array(slots) => self.write_array(value, slots),
            Value::Object(map) => self.write_object(value, map),
        }
        true
    }

    fn write_newline(&mut self) {
        if !self.unit.is_empty() {
            self.output.push('\n');
            self.output.push_str(&self.indent);
        }
    }

    fn write_array(&mut self, holder: &Value, slots: &[Slot]) {
        if slots.is_empty() {
            self.output.push_str("[]");
            return;
        }

        self.output.push('[');
        let outer_len = self.indent.len();
        self.indent.push_str(&self.unit);

        let hole = Value::Undefined;
        let mut last_written = true;
        for (index, slot) in slots.iter().enumerate() {
            if index > 0 {
                self.output.push(',');
            }
            self.write_newline();

            let element = match slot {
                Slot::Present(element) => element,
                Slot::Hole => &hole,
            };
            let resolved = self.resolve(&index.to_string(), element, holder);
            last_written = self.write_value(&resolved);
        }
        // [1,,] keeps its trailing hole; [1,] would not
        if !last_written {
            self.output.push(',');
        }

        self.indent.truncate(outer_len);
        self.write_newline();
        self.output.push(']');
    }

    fn write_object(&mut self, holder: &Value, map: &Map) {
        let start = self.output.len();
        self.output.push('{');
        let outer_len = self.indent.len();
        self.indent.push_str(&self.unit);

        let mut any = false;
        for (key, field) in map {
            if !self.is_allowed(key) {
                continue;
            }
            let resolved = self.resolve(key, field, holder);

            let field_start = self.output.len();
            if any {
                self.output.push(',');
            }
            self.write_newline();
            write_key(&mut self.output, key);
            self.output.push(':');
            if !self.unit.is_empty() {
                self.output.push(' ');
            }
            if self.write_value(&resolved) {
                any = true;
            } else {
                self.output.truncate(field_start);
            }
        }

        self.indent.truncate(outer_len);
        if any {
            self.write_newline();
            self.output.push('}');
        } else {
            self.output.truncate(start);
            self.output.push_str("{}");
        }
    }
}

/// Formats a number the way ECMAScript's `Number.prototype.toString` does,
/// except that negative zero keeps its sign.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::format_number;
///
/// assert_eq!(format_number(42.0), "42");
/// assert_eq!(format_number(0.001), "0.001");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(1.5e-7), "1.5e-7");
/// assert_eq!(format_number(-0.0), "-0");
/// assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
/// ```
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits: "1.2345e-7"
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let point = exponent + 1;
    let mut out = String::with_capacity(24);
    if n < 0.0 {
        out.push('-');
    }

    if k <= point && point <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((point - k) as usize));
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < point && point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-point) as usize));
        out.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let e = point - 1;
        let _ = write!(out, "e{}{}", if e < 0 { '-' } else { '+' }, e.abs());
    }
    out
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn write_key(output: &mut String, key: &str) {
    if is_bare_key(key) {
        output.push_str(key);
    } else {
        write_quoted(output, key);
    }
}

fn write_quoted(output: &mut String, s: &str) {
    output.reserve(s.len() + 2);
    output.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => output.push_str("\\'"),
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{08}' => output.push_str("\\b"),
            '\u{0C}' => output.push_str("\\f"),
            '\u{2028}' => output.push_str("\\u2028"),
            '\u{2029}' => output.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                let _ = write!(output, "\\u{:04x}", c as u32);
            }
            c => output.push(c),
        }
    }
    output.push('\'');
}

/// Serializer whose output is a [`Value`].
///
/// `None` becomes `Undefined` (so `Option` fields disappear from objects),
/// `()` becomes `Null`, byte slices become `Binary`, and enums use the
/// externally tagged layout: `Variant` or `{Variant: payload}`.
///
/// ```rust
/// use serde::Serialize;
/// use serde_mdsf::{stringify, ValueSerializer};
///
/// #[derive(Serialize)]
/// enum Shape { Point, Circle { r: f64 } }
///
/// let value = Shape::Circle { r: 1.5 }.serialize(ValueSerializer).unwrap();
/// assert_eq!(stringify(&value), "{Circle:{r:1.5}}");
/// let value = Shape::Point.serialize(ValueSerializer).unwrap();
/// assert_eq!(stringify(&value), "'Point'");
/// ```
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Slot>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Binary(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Undefined)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

fn tagged(variant: &'static str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Object(map)
}

impl SerializeVec {
    fn new(len: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(len),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(Slot::Present(to_value(value)?));
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(self.vec);
        match self.variant {
            Some(variant) => tagged(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(len: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Map::with_capacity(len),
            current_key: None,
            variant,
        }
    }

    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        let value = to_value(value)?;
        if !value.is_undefined() {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Value {
        let object = Value::Object(self.map);
        match self.variant {
            Some(variant) => tagged(variant, object),
            None => object,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            Value::Number(n) => {
                self.current_key = Some(format_number(n));
                Ok(())
            }
            Value::Bool(b) => {
                self.current_key = Some(b.to_string());
                Ok(())
            }
            _ => Err(Error::custom("map keys must be strings or numbers")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_mdsf::{to_value, Value};
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32, label: Option<String> }
///
/// let value = to_value(&Point { x: 1, y: 2, label: None }).unwrap();
/// assert_eq!(value.get("x"), Some(&Value::from(1)));
/// assert!(value.get("label").is_none());
/// ```
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Boxed, Callable};
    use crate::{mdsf, Indent};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_number() {
        let cases = [
            (0.0, "0"),
            (1.0, "1"),
            (-3.0, "-3"),
            (0.5, "0.5"),
            (123.456, "123.456"),
            (1e100, "1e+100"),
            (1e-3, "0.001"),
            (1e-7, "1e-7"),
            (1e20, "100000000000000000000"),
            (1e21, "1e+21"),
            (0.000001, "0.000001"),
            (-1.5e300, "-1.5e+300"),
            (5e-324, "5e-324"),
            (0.1 + 0.2, "0.30000000000000004"),
            (9007199254740993.0, "9007199254740992"),
        ];
        for (n, expected) in cases {
            assert_eq!(format_number(n), expected, "formatting {:e}", n);
        }
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_quoting() {
        let mut out = String::new();
        write_quoted(&mut out, "01\u{0}\u{1}'\"\\\u{2028}");
        assert_eq!(out, "'01\\u0000\\u0001\\'\\\"\\\\\\u2028'");
    }

    #[test]
    fn test_keys() {
        assert!(is_bare_key("abc_$1"));
        assert!(is_bare_key("$"));
        assert!(!is_bare_key("1a"));
        assert!(!is_bare_key(""));
        assert!(!is_bare_key("a-b"));
        assert!(!is_bare_key("ключ"));
        let value = mdsf!({ "a-b": 1, "": 2, "ok": 3 });
        assert_eq!(stringify(&value), "{'a-b':1,'':2,ok:3}");
    }

    #[test]
    fn test_scalars() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(stringify(&Value::from(ts)), "'2024-01-15T10:30:00.000Z'");
        assert_eq!(
            stringify(&Value::Binary(b"some binary data".to_vec())),
            "'c29tZSBiaW5hcnkgZGF0YQ=='"
        );
        assert_eq!(stringify(&Value::Null), "null");
        assert_eq!(stringify(&Value::from(-0.0)), "-0");
    }

    #[test]
    fn test_omission() {
        let mut map = Map::new();
        map.insert("a".into(), Value::Undefined);
        map.insert("f".into(), Value::host(Callable::new("f", |_| Value::Null)));
        map.insert("b".into(), Boxed::value(1));
        assert_eq!(stringify(&Value::Object(map)), "{b:1}");

        let only_omitted: Map = [("x".to_string(), Value::Undefined)].into_iter().collect();
        let only_omitted = Value::Object(only_omitted);
        assert_eq!(stringify_pretty(&only_omitted), "{}");
        assert_eq!(stringify(&Value::host(Callable::new("f", |_| Value::Null))), "undefined");
    }

    #[test]
    fn test_sparse_arrays() {
        let value = Value::Array(vec![Slot::Present(Value::from(1)), Slot::Hole]);
        assert_eq!(stringify(&value), "[1,,]");
        assert_eq!(stringify(&Value::Array(vec![Slot::Hole])), "[,]");
        assert_eq!(stringify(&Value::Array(vec![Slot::Hole, Slot::Hole])), "[,,]");
        let value = Value::array([Value::Undefined, Value::from(2)]);
        assert_eq!(stringify(&value), "[,2]");
        assert_eq!(stringify_pretty(&Value::Array(vec![])), "[]");
    }

    #[test]
    fn test_indent_cap() {
        let value = mdsf!([1]);
        let options = StringifyOptions::new().with_indent(Indent::Spaces(15));
        assert_eq!(stringify_with_options(&value, &options), "[\n          1\n]");
        let options = StringifyOptions::new().with_indent(Indent::Spaces(0));
        assert_eq!(stringify_with_options(&value, &options), "[1]");
    }

    #[test]
    fn test_replacer_sees_holder() {
        let replacer = Replacer::function(|key, value, holder| {
            if key.is_empty() {
                assert_eq!(holder.get(""), Some(value));
                return value.clone();
            }
            Value::from(holder.as_array().map_or(0, Vec::len))
        });
        let options = StringifyOptions::new().with_replacer(replacer);
        assert_eq!(stringify_with_options(&mdsf!([7, 8, 9]), &options), "[3,3,3]");
    }

    #[test]
    fn test_to_value_variants() {
        #[derive(Serialize)]
        enum Message {
            Ping(u32),
            Pair(i8, i8),
        }

        assert_eq!(stringify(&to_value(&Message::Ping(3)).unwrap()), "{Ping:3}");
        assert_eq!(stringify(&to_value(&Message::Pair(1, -1)).unwrap()), "{Pair:[1,-1]}");
        assert_eq!(stringify(&to_value(&[Some(1), None]).unwrap()), "[1,,]");
    }
}

//! Dynamic value representation for MDSF data.
//!
//! [`Value`] is what [`parse`](crate::parse) produces and what
//! [`stringify`](crate::stringify) consumes. Compared to a JSON tree it adds a
//! distinct `Undefined`, timestamps, binary payloads, sparse arrays (see
//! [`Slot`]) and handles to live host objects (see [`crate::host`]).
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_mdsf::{mdsf, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = mdsf!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_object());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use serde_mdsf::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```
//!
//! ### Sparse Arrays
//!
//! ```rust
//! use serde_mdsf::{parse, Slot, Value};
//!
//! let value = parse("[1,,3]").unwrap();
//! let slots = value.as_array().unwrap();
//! assert_eq!(slots[1], Slot::Hole);
//! assert_eq!(value.index(2), Some(&Value::from(3)));
//! ```

use crate::host::{HostRef, HostValue};
use crate::Map;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A dynamically-typed representation of any MDSF value.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::Value;
///
/// let null = Value::Null;
/// let undefined = Value::Undefined;
///
/// assert!(null.is_null());
/// assert!(undefined.is_undefined());
/// assert_ne!(null, undefined);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Binary(Vec<u8>),
    Array(Vec<Slot>),
    Object(Map),
    /// A live host object. Never produced by the parser.
    Host(HostRef),
}

/// One position of an array: either a value or a hole (`[1,,3]`).
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    Present(Value),
    Hole,
}

impl Slot {
    #[inline]
    #[must_use]
    pub const fn is_hole(&self) -> bool {
        matches!(self, Slot::Hole)
    }

    #[inline]
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Present(value) => Some(value),
            Slot::Hole => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Slot::Present(value) => Some(value),
            Slot::Hole => None,
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        Slot::Present(value)
    }
}

impl Value {
    /// Wraps a host object.
    pub fn host<H: HostValue + 'static>(host: H) -> Value {
        Value::Host(HostRef::new(host))
    }

    /// Builds a dense array.
    pub fn array<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(items.into_iter().map(|v| Slot::Present(v.into())).collect())
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is `undefined`.
    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_host(&self) -> bool {
        matches!(self, Value::Host(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_mdsf::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool(), Some(true));
    /// assert_eq!(Value::from(42).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a whole number within `i64` range, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_mdsf::Value;
    ///
    /// assert_eq!(Value::from(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(42.5).as_i64(), None);
    /// assert_eq!(Value::from(f64::NAN).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => whole_i64(*n),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Slot>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Slot>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the timestamp held by this value.
    ///
    /// Timestamps travel as ISO-8601 strings, so a `String` that parses as
    /// RFC 3339 is accepted too.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_mdsf::parse;
    ///
    /// let value = parse("'2024-01-15T10:30:00.000Z'").unwrap();
    /// let ts = value.as_timestamp().unwrap();
    /// assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    /// ```
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Returns the bytes held by this value, decoding a base64 `String` if needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_mdsf::Value;
    ///
    /// let value = Value::from("c29tZSBiaW5hcnkgZGF0YQ==");
    /// assert_eq!(value.as_binary().as_deref(), Some(&b"some binary data"[..]));
    /// ```
    #[must_use]
    pub fn as_binary(&self) -> Option<Cow<'_, [u8]>> {
        match self {
            Value::Binary(bytes) => Some(Cow::Borrowed(bytes)),
            Value::String(s) => base64::engine::general_purpose::STANDARD
                .decode(s)
                .ok()
                .map(Cow::Owned),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_host(&self) -> Option<&HostRef> {
        match self {
            Value::Host(host) => Some(host),
            _ => None,
        }
    }

    /// Looks up a field of an object. Returns `None` for non-objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Returns the array element at `index`, or `None` for holes, out-of-range
    /// indexes and non-arrays.
    #[must_use]
    pub fn index(&self, index: usize) -> Option<&Value> {
        self.as_array()
            .and_then(|arr| arr.get(index))
            .and_then(Slot::as_value)
    }
}

fn whole_i64(n: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX as f64 rounds up to it.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.is_finite() && n.fract() == 0.0 && (-LIMIT..LIMIT).contains(&n) {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ser::stringify(self))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Undefined => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match whole_i64(*n) {
                Some(i) if !(*n == 0.0 && n.is_sign_negative()) => serializer.serialize_i64(i),
                _ => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Binary(bytes) => serializer.serialize_bytes(bytes),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for slot in arr {
                    match slot {
                        Slot::Present(value) => seq.serialize_element(value)?,
                        Slot::Hole => seq.serialize_element(&Value::Undefined)?,
                    }
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                // undefined fields are absent, as in the text form
                let len = obj.values().filter(|v| !v.is_undefined()).count();
                let mut map = serializer.serialize_map(Some(len))?;
                for (k, v) in obj.iter().filter(|(_, v)| !v.is_undefined()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Host(host) => match host.convert("").or_else(|| host.unboxed()) {
                Some(value) => value.serialize(serializer),
                None => serializer.serialize_none(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid MDSF value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(Value::Binary(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Value::Binary(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Undefined)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element::<Value>()? {
                    vec.push(match elem {
                        Value::Undefined => Slot::Hole,
                        value => Slot::Present(value),
                    });
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    if !value.is_undefined() {
                        values.insert(key, value);
                    }
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => whole_i64(n).ok_or_else(|| {
                crate::Error::custom(format!("cannot convert number {} to i64", n))
            }),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for DateTime<Utc> {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value.as_timestamp().ok_or_else(|| {
            crate::Error::custom(format!("expected timestamp, found {:?}", value))
        })
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value.into_iter().map(Slot::Present).collect())
    }
}

impl From<Vec<Slot>> for Value {
    fn from(value: Vec<Slot>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

impl From<HostRef> for Value {
    fn from(value: HostRef) -> Self {
        Value::Host(value)
    }
}

/// `None` becomes `Undefined`, so optional fields disappear from objects.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        assert_eq!(i64::try_from(Value::Number(42.0)).unwrap(), 42);
        assert!(i64::try_from(Value::Number(42.5)).is_err());
        assert!(i64::try_from(Value::Number(f64::INFINITY)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_f64() {
        assert_eq!(f64::try_from(Value::Number(3.5)).unwrap(), 3.5);
        assert!(f64::try_from(Value::Number(f64::NAN)).unwrap().is_nan());
        assert!(f64::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_tryfrom_bool_and_string() {
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::from(1)).is_err());
        assert_eq!(String::try_from(Value::from("hello")).unwrap(), "hello");
        assert!(String::try_from(Value::from(42)).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Number(42.0));
        assert_eq!(Value::from(42u64), Value::Number(42.0));
        assert_eq!(Value::from(3.5f64), Value::Number(3.5));
        assert_eq!(Value::from("test"), Value::String("test".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Undefined);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_from_collections() {
        let value = Value::from(vec![Value::from(1), Value::from(2)]);
        assert_eq!(
            value,
            Value::Array(vec![Slot::Present(Value::from(1)), Slot::Present(Value::from(2))])
        );
        assert_eq!(Value::array([1, 2]), value);

        let mut map = Map::new();
        map.insert("key".to_string(), Value::from(42));
        assert_eq!(Value::from(map.clone()), Value::Object(map));
    }

    #[test]
    fn test_accessors() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(Value::from(ts).as_timestamp(), Some(ts));
        assert_eq!(
            Value::from("2024-01-15T10:30:00.000Z").as_timestamp(),
            Some(ts)
        );
        assert_eq!(Value::from("yesterday").as_timestamp(), None);

        let bin = Value::Binary(vec![1, 2, 3]);
        assert_eq!(bin.as_binary().as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(Value::from("not base64!").as_binary().is_none());

        let arr = Value::Array(vec![Slot::Hole, Slot::Present(Value::Null)]);
        assert_eq!(arr.index(0), None);
        assert_eq!(arr.index(1), Some(&Value::Null));
        assert_eq!(arr.index(2), None);
    }

    #[test]
    fn test_negative_zero_survives_serde() {
        let value: Value = serde_json::from_str("-0.0").unwrap();
        assert!(value.as_f64().unwrap().is_sign_negative());
        assert_eq!(serde_json::to_string(&Value::Number(-0.0)).unwrap(), "-0.0");
        assert_eq!(serde_json::to_string(&Value::Number(7.0)).unwrap(), "7");
    }

    #[test]
    fn test_holes_become_null_in_json() {
        let arr = Value::Array(vec![Slot::Present(Value::from(1)), Slot::Hole]);
        assert_eq!(serde_json::to_string(&arr).unwrap(), "[1,null]");
    }

    #[test]
    fn test_const_is_methods() {
        const fn check_undefined(v: &Value) -> bool {
            v.is_undefined()
        }

        assert!(check_undefined(&Value::Undefined));
        assert!(!check_undefined(&Value::Null));
    }
}

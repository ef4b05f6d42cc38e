//! MDSF deserialization.
//!
//! Text is first parsed into a [`Value`], then a [`Deserializer`] walks the
//! tree and drives the target type's `Deserialize` implementation.
//!
//! ## Type Mapping
//!
//! - `null` and `undefined` both read as `None` for `Option<T>`; missing
//!   object fields do too
//! - Holes in arrays read as `undefined`
//! - Timestamps read as ISO-8601 strings, binary payloads as byte buffers
//! - Enums are externally tagged: `'Variant'` or `{Variant: payload}`
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_mdsf::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: Option<i32>, tags: Vec<String> }
//!
//! let data: Data = from_str("{x: 1, /* no y */ tags: ['a', \"b\"]}").unwrap();
//! assert_eq!(data, Data { x: 1, y: None, tags: vec!["a".into(), "b".into()] });
//! ```

use crate::{Error, Map, Result, Slot, Value};
use chrono::SecondsFormat;
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

/// Deserializer over an owned [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_mdsf::{parse, Deserializer};
///
/// let value = parse("[1, 2, 3]").unwrap();
/// let nums = Vec::<u8>::deserialize(Deserializer::new(value)).unwrap();
/// assert_eq!(nums, vec![1, 2, 3]);
/// ```
pub struct Deserializer {
    value: Value,
}

impl Deserializer {
    pub fn new(value: Value) -> Self {
        Deserializer { value }
    }

    /// Parses `input` and wraps the resulting tree.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        Ok(Deserializer::new(crate::parse(input)?))
    }
}

fn visit_number<'de, V>(n: f64, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;
    const I64_MIN: f64 = -9_223_372_036_854_775_808.0;

    let whole = n.is_finite() && n.fract() == 0.0 && !(n == 0.0 && n.is_sign_negative());
    if whole && (0.0..U64_LIMIT).contains(&n) {
        visitor.visit_u64(n as u64)
    } else if whole && (I64_MIN..0.0).contains(&n) {
        visitor.visit_i64(n as i64)
    } else {
        visitor.visit_f64(n)
    }
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Undefined => visitor.visit_none(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visit_number(n, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Timestamp(ts) => {
                visitor.visit_string(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Binary(bytes) => visitor.visit_byte_buf(bytes),
            Value::Array(slots) => visitor.visit_seq(SeqDeserializer::new(slots)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Host(host) => match host.convert("").or_else(|| host.unboxed()) {
                Some(value) => Deserializer::new(value).deserialize_any(visitor),
                None => visitor.visit_none(),
            },
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null | Value::Undefined => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null | Value::Undefined => visitor.visit_unit(),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // binary payloads travel as base64 strings
        if let Value::String(_) = self.value {
            if let Some(bytes) = self.value.as_binary() {
                return visitor.visit_byte_buf(bytes.into_owned());
            }
        }
        self.deserialize_any(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) if obj.len() == 1 => match obj.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer::new(variant, value)),
                None => Err(Error::custom("expected enum variant")),
            },
            Value::Object(_) => Err(Error::custom(
                "expected an object with a single key naming the variant",
            )),
            _ => Err(Error::custom("expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        seq tuple tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Slot>,
}

impl SeqDeserializer {
    fn new(slots: Vec<Slot>) -> Self {
        SeqDeserializer {
            iter: slots.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(slot) => {
                let value = slot.into_value().unwrap_or(Value::Undefined);
                seed.deserialize(Deserializer::new(value)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Map) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(KeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Deserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Object keys are always text; numeric and boolean map keys are read back by
/// parsing it.
struct KeyDeserializer {
    key: String,
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident),* $(,)?) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.key.parse() {
                Ok(parsed) => visitor.$visit(parsed),
                Err(_) => visitor.visit_string(self.key),
            }
        }
    )*};
}

impl<'de> de::Deserializer<'de> for KeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    deserialize_parsed_key! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf option unit unit_struct
        seq tuple tuple_struct map struct identifier ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Deserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null | Value::Undefined => Ok(()),
            _ => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(Deserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(slots) => visitor.visit_seq(SeqDeserializer::new(slots)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

/// Interprets a [`Value`] as an instance of type `T`.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_mdsf::{from_value, mdsf};
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// enum Event { Joined { user: String }, Left(u32) }
///
/// let event: Event = from_value(mdsf!({ "Joined": { "user": "ada" } })).unwrap();
/// assert_eq!(event, Event::Joined { user: "ada".into() });
/// let event: Event = from_value(mdsf!({ "Left": 7 })).unwrap();
/// assert_eq!(event, Event::Left(7));
/// ```
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(Deserializer::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mdsf, parse, Boxed};
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[test]
    fn test_holes_read_as_none() {
        let value = parse("[1,,3]").unwrap();
        let items: Vec<Option<i32>> = from_value(value).unwrap();
        assert_eq!(items, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_numbers_keep_their_kind() {
        let n: u64 = from_value(parse("0xFFFFFFFF").unwrap()).unwrap();
        assert_eq!(n, 0xFFFF_FFFF);
        let n: i64 = from_value(parse("-42").unwrap()).unwrap();
        assert_eq!(n, -42);
        assert!(from_value::<i32>(parse("1.5").unwrap()).is_err());
        let f: f64 = from_value(parse("-0").unwrap()).unwrap();
        assert!(f.is_sign_negative());
    }

    #[test]
    fn test_whole_floats_outside_integer_range() {
        let f: f64 = from_value(Value::Number(2e19)).unwrap();
        assert_eq!(f, 2e19);
        let f: f64 = from_value(parse("-1e300").unwrap()).unwrap();
        assert_eq!(f, -1e300);
        let f: f64 = from_value(Value::Number(18_446_744_073_709_551_616.0)).unwrap();
        assert_eq!(f, 18_446_744_073_709_551_616.0);
        assert!(from_value::<u64>(Value::Number(2e19)).is_err());
        assert!(from_value::<i64>(Value::Number(-1e19)).is_err());
    }

    struct ByteBuf(Vec<u8>);

    impl<'de> Deserialize<'de> for ByteBuf {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: de::Deserializer<'de>,
        {
            struct BytesVisitor;

            impl<'de> de::Visitor<'de> for BytesVisitor {
                type Value = ByteBuf;

                fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str("a byte buffer")
                }

                fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> std::result::Result<ByteBuf, E> {
                    Ok(ByteBuf(v))
                }
            }

            deserializer.deserialize_byte_buf(BytesVisitor)
        }
    }

    #[test]
    fn test_timestamp_and_binary() {
        #[derive(Deserialize)]
        struct Record {
            at: DateTime<Utc>,
            payload: ByteBuf,
        }

        let record: Record = from_value(
            parse("{at: '2024-01-15T10:30:00.000Z', payload: 'c29tZSBiaW5hcnkgZGF0YQ=='}").unwrap(),
        )
        .unwrap();
        assert_eq!(record.at.timestamp(), 1_705_314_600);
        assert_eq!(record.payload.0, b"some binary data");

        let direct: ByteBuf = from_value(Value::Binary(vec![1, 2, 3])).unwrap();
        assert_eq!(direct.0, vec![1, 2, 3]);
        let at: DateTime<Utc> = from_value(Value::Timestamp(record.at)).unwrap();
        assert_eq!(at, record.at);
    }

    #[test]
    fn test_unit_and_unit_variants() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Status {
            Active,
            Idle,
        }

        let status: Status = from_value(mdsf!("Idle")).unwrap();
        assert_eq!(status, Status::Idle);
        let statuses: Vec<Status> = from_value(parse("['Active', 'Idle']").unwrap()).unwrap();
        assert_eq!(statuses, vec![Status::Active, Status::Idle]);
        from_value::<()>(Value::Undefined).unwrap();
        assert!(from_value::<Status>(mdsf!({ "Active": null, "Idle": null })).is_err());
    }

    #[test]
    fn test_numeric_map_keys() {
        use std::collections::BTreeMap;

        let map: BTreeMap<u32, bool> = from_value(parse("{1: true, 0x10: false}").unwrap()).unwrap();
        assert_eq!(map.into_iter().collect::<Vec<_>>(), vec![(1, true), (16, false)]);
        assert!(from_value::<BTreeMap<u32, bool>>(parse("{a: true}").unwrap()).is_err());
    }

    #[test]
    fn test_boxed_host_unwraps() {
        let n: i32 = from_value(Boxed::value(5)).unwrap();
        assert_eq!(n, 5);
    }
}

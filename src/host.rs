//! Live host values that can sit inside a [`Value`] tree.
//!
//! Besides plain data, a tree handed to the serializer may contain handles to
//! application objects: boxed scalars, objects that know how to convert
//! themselves, or callables. They are stored as [`Value::Host`] and consulted
//! through the capabilities of [`HostValue`]:
//!
//! 1. [`ToMdsf`], the format-specific conversion hook, wins if present;
//! 2. otherwise [`ToJson`], the conversion hook shared with JSON-style serializers;
//! 3. a boxed scalar is replaced by [`HostValue::unboxed`];
//! 4. anything left is opaque and is omitted from the output.
//!
//! The parser never produces host values.
//!
//! ## Examples
//!
//! ```rust
//! use serde_mdsf::{stringify, HostValue, ToMdsf, Value};
//!
//! #[derive(Debug)]
//! struct Point { x: f64, y: f64 }
//!
//! impl ToMdsf for Point {
//!     fn to_mdsf(&self, _key: &str) -> Value {
//!         Value::from(vec![Value::from(self.x), Value::from(self.y)])
//!     }
//! }
//!
//! impl HostValue for Point {
//!     fn mdsf_hook(&self) -> Option<&dyn ToMdsf> {
//!         Some(self)
//!     }
//! }
//!
//! let value = Value::host(Point { x: 1.0, y: 2.5 });
//! assert_eq!(stringify(&value), "[1,2.5]");
//! ```

use crate::Value;
use std::fmt;
use std::sync::Arc;

/// The format-specific conversion hook.
pub trait ToMdsf {
    /// Returns the value to serialize in place of `self`. `key` is the object key
    /// or array index under which `self` is stored (`""` at the root).
    fn to_mdsf(&self, key: &str) -> Value;
}

/// The generic "to transport form" hook shared with JSON-style serializers.
pub trait ToJson {
    fn to_json(&self, key: &str) -> Value;
}

/// Capabilities of a host value. Every method defaults to "not supported".
pub trait HostValue: fmt::Debug + Send + Sync {
    /// The primitive wrapped by a boxed number, string or boolean.
    fn unboxed(&self) -> Option<Value> {
        None
    }

    fn mdsf_hook(&self) -> Option<&dyn ToMdsf> {
        None
    }

    fn json_hook(&self) -> Option<&dyn ToJson> {
        None
    }
}

/// Shared handle to a host value.
///
/// Two handles are equal only when they point at the same host object.
#[derive(Clone)]
pub struct HostRef(Arc<dyn HostValue>);

impl HostRef {
    pub fn new<H: HostValue + 'static>(host: H) -> Self {
        HostRef(Arc::new(host))
    }

    /// Runs the conversion hooks, specific one first. Returns `None` when the
    /// host exposes neither.
    #[must_use]
    pub fn convert(&self, key: &str) -> Option<Value> {
        if let Some(hook) = self.0.mdsf_hook() {
            Some(hook.to_mdsf(key))
        } else {
            self.0.json_hook().map(|hook| hook.to_json(key))
        }
    }

    #[must_use]
    pub fn unboxed(&self) -> Option<Value> {
        self.0.unboxed()
    }
}

impl From<Arc<dyn HostValue>> for HostRef {
    fn from(host: Arc<dyn HostValue>) -> Self {
        HostRef(host)
    }
}

impl PartialEq for HostRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A boxed scalar: a wrapper object around a number, string or boolean.
///
/// ```rust
/// use serde_mdsf::{stringify, Boxed, Value};
///
/// assert_eq!(stringify(&Boxed::value(42)), "42");
/// assert_eq!(stringify(&Boxed::value("test data")), "'test data'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Boxed(Value);

impl Boxed {
    /// Wraps a primitive. Non-primitive values are kept but never unwrapped, so
    /// the box behaves as an opaque object.
    pub fn new(value: impl Into<Value>) -> Self {
        Boxed(value.into())
    }

    /// Shorthand for `Value::host(Boxed::new(value))`.
    pub fn value(value: impl Into<Value>) -> Value {
        Value::host(Boxed::new(value))
    }
}

impl HostValue for Boxed {
    fn unboxed(&self) -> Option<Value> {
        match &self.0 {
            Value::Number(_) | Value::String(_) | Value::Bool(_) => Some(self.0.clone()),
            _ => None,
        }
    }
}

type Function = dyn Fn(&[Value]) -> Value + Send + Sync;

/// An opaque function handle. Callables have no textual form: object fields
/// holding one are omitted.
#[derive(Clone)]
pub struct Callable {
    name: String,
    function: Arc<Function>,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Callable {
            name: name.into(),
            function: Arc::new(function),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.function)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

impl HostValue for Callable {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Both;

    impl ToMdsf for Both {
        fn to_mdsf(&self, key: &str) -> Value {
            Value::from(format!("mdsf:{}", key))
        }
    }

    impl ToJson for Both {
        fn to_json(&self, _key: &str) -> Value {
            Value::from(30)
        }
    }

    impl HostValue for Both {
        fn mdsf_hook(&self) -> Option<&dyn ToMdsf> {
            Some(self)
        }

        fn json_hook(&self) -> Option<&dyn ToJson> {
            Some(self)
        }
    }

    #[test]
    fn test_specific_hook_wins() {
        let host = HostRef::new(Both);
        assert_eq!(host.convert("k"), Some(Value::from("mdsf:k")));
    }

    #[test]
    fn test_host_equality_is_identity() {
        let a = HostRef::new(Boxed::new(1));
        let b = HostRef::new(Boxed::new(1));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_boxed_only_unwraps_primitives() {
        assert_eq!(Boxed::new(true).unboxed(), Some(Value::Bool(true)));
        assert_eq!(Boxed::new(Value::Null).unboxed(), None);
    }

    #[test]
    fn test_callable() {
        let double = Callable::new("double", |args| {
            Value::from(args.first().and_then(Value::as_f64).unwrap_or(0.0) * 2.0)
        });
        assert_eq!(double.call(&[Value::from(21)]), Value::from(42.0));
        assert_eq!(format!("{:?}", double), "[Function: double]");
        assert!(double.unboxed().is_none());
        assert!(HostRef::new(double).convert("").is_none());
    }
}

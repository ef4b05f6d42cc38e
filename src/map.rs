//! Ordered map type for MDSF objects.
//!
//! Object fields are serialized in insertion order, so [`Map`] wraps an
//! [`IndexMap`] rather than a `HashMap`. Inserting an existing key replaces the
//! value in place: the key keeps the position of its first insertion, which is
//! how duplicate keys in a parsed record behave as well.
//!
//! ## Examples
//!
//! ```rust
//! use serde_mdsf::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to MDSF values.
///
/// # Examples
///
/// ```rust
/// use serde_mdsf::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
/// map.insert("first".to_string(), Value::from(3));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// assert_eq!(map.get("first").and_then(|v| v.as_f64()), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map(IndexMap<String, Value>);

impl Map {
    /// Creates an empty `Map`.
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    /// Creates an empty `Map` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and the
    /// key keeps its position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining fields.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for Map {
    fn from(map: HashMap<String, Value>) -> Self {
        Map(map.into_iter().collect())
    }
}

impl From<Map> for HashMap<String, Value> {
    fn from(map: Map) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_keeps_order() {
        let mut map: Map = [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();

        assert_eq!(map.remove("b"), Some(Value::from(2)));
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert!(!map.contains_key("b"));
    }
}

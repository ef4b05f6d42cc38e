/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Keys must be string literals. Leaf values may be `null`, `undefined`,
/// `true`, `false`, nested arrays and objects, or any single token tree that
/// implements `Serialize` (wrap longer expressions in parentheses).
///
/// ```rust
/// use serde_mdsf::{mdsf, stringify};
///
/// let limit = 10;
/// let value = mdsf!({
///     "query": "users",
///     "limit": limit,
///     "cursor": undefined,
///     "filters": [true, null, (limit * 2)]
/// });
/// assert_eq!(stringify(&value), "{query:'users',limit:10,filters:[true,null,20]}");
/// ```
#[macro_export]
macro_rules! mdsf {
    (null) => {
        $crate::Value::Null
    };

    (undefined) => {
        $crate::Value::Undefined
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::Slot::Present($crate::mdsf!($elem))),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::mdsf!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Anything else goes through serde
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Map, Slot, Value};

    #[test]
    fn test_mdsf_macro_primitives() {
        assert_eq!(mdsf!(null), Value::Null);
        assert_eq!(mdsf!(undefined), Value::Undefined);
        assert_eq!(mdsf!(true), Value::Bool(true));
        assert_eq!(mdsf!(false), Value::Bool(false));
        assert_eq!(mdsf!(42), Value::Number(42.0));
        assert_eq!(mdsf!(3.5), Value::Number(3.5));
        assert_eq!(mdsf!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_mdsf_macro_arrays() {
        assert_eq!(mdsf!([]), Value::Array(vec![]));

        let arr = mdsf!([1, 2, 3]);
        match arr {
            Value::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], Slot::Present(Value::Number(1.0)));
                assert_eq!(vec[2], Slot::Present(Value::Number(3.0)));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_mdsf_macro_objects() {
        assert_eq!(mdsf!({}), Value::Object(Map::new()));

        let obj = mdsf!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
                assert_eq!(map.get("age"), Some(&Value::Number(30.0)));
            }
            _ => panic!("Expected object"),
        }
    }
}

//! Attribute values carried by detected resources.
//!
//! Detectors produce tree shaped values: scalars, arrays and nested maps.
//! [`to_inspectable`] turns them into plain [`serde_json::Value`]s for
//! logging, and the `opentelemetry` conversions let SDK resources flow in
//! and out of the engine.
use indexmap::IndexMap;
use opentelemetry::{Array, StringValue, Value};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

/// Ordered, key-unique attribute map.
///
/// Insertion order is kept so that logged resources are deterministic.
pub type Attributes = IndexMap<String, AttributeValue>;

/// A single attribute value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AttributeValue {
    /// No value.
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// Opaque bytes. Not representable in inspectable form.
    Bytes(Vec<u8>),
    Array(Vec<AttributeValue>),
    Map(Attributes),
}

impl AttributeValue {
    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts this value into an `opentelemetry` [`Value`].
    ///
    /// Homogeneous arrays of scalars map to the matching [`Array`] variant,
    /// an empty array to an empty string array.
    /// Nested maps and mixed arrays are rendered as their JSON text since the
    /// SDK has no equivalent. Empty values and bytes return `None`.
    pub fn to_otel_value(&self) -> Option<Value> {
        match self {
            AttributeValue::Bool(b) => Some(Value::Bool(*b)),
            AttributeValue::Int(i) => Some(Value::I64(*i)),
            AttributeValue::Double(d) => Some(Value::F64(*d)),
            AttributeValue::String(s) => Some(Value::String(s.clone().into())),
            AttributeValue::Array(values) => Some(
                to_otel_array(values)
                    .map(Value::Array)
                    .unwrap_or_else(|| Value::String(to_inspectable(self).to_string().into())),
            ),
            AttributeValue::Map(_) => Some(Value::String(to_inspectable(self).to_string().into())),
            AttributeValue::Empty | AttributeValue::Bytes(_) => None,
        }
    }
}

fn to_otel_array(values: &[AttributeValue]) -> Option<Array> {
    let Some(first) = values.first() else {
        return Some(Array::String(Vec::new()));
    };
    match first {
        AttributeValue::Bool(_) => values
            .iter()
            .map(|v| match v {
                AttributeValue::Bool(b) => Some(*b),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::Bool),
        AttributeValue::Int(_) => values
            .iter()
            .map(|v| match v {
                AttributeValue::Int(i) => Some(*i),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::I64),
        AttributeValue::Double(_) => values
            .iter()
            .map(|v| match v {
                AttributeValue::Double(d) => Some(*d),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::F64),
        AttributeValue::String(_) => values
            .iter()
            .map(|v| match v {
                AttributeValue::String(s) => Some(StringValue::from(s.clone())),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::String),
        AttributeValue::Empty
        | AttributeValue::Bytes(_)
        | AttributeValue::Array(_)
        | AttributeValue::Map(_) => None,
    }
}

/// Converts a value into its plain, inspectable form.
///
/// Arrays and maps are converted element-wise. Empty values, bytes and
/// doubles that JSON cannot represent (NaN, infinities) become `null`.
pub fn to_inspectable(value: &AttributeValue) -> JsonValue {
    match value {
        AttributeValue::Bool(b) => JsonValue::Bool(*b),
        AttributeValue::Int(i) => JsonValue::Number((*i).into()),
        AttributeValue::Double(d) => Number::from_f64(*d)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AttributeValue::String(s) => JsonValue::String(s.clone()),
        AttributeValue::Array(values) => JsonValue::Array(values.iter().map(to_inspectable).collect()),
        AttributeValue::Map(attributes) => JsonValue::Object(attributes_to_map(attributes)),
        AttributeValue::Empty | AttributeValue::Bytes(_) => JsonValue::Null,
    }
}

/// Converts a whole attribute map, keeping its order.
pub fn attributes_to_map(attributes: &Attributes) -> JsonMap<String, JsonValue> {
    attributes
        .iter()
        .map(|(key, value)| (key.clone(), to_inspectable(value)))
        .collect()
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value.into())
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(values: Vec<AttributeValue>) -> Self {
        AttributeValue::Array(values)
    }
}

impl From<Attributes> for AttributeValue {
    fn from(attributes: Attributes) -> Self {
        AttributeValue::Map(attributes)
    }
}

impl From<Value> for AttributeValue {
    #[allow(unreachable_patterns)]
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::I64(i) => AttributeValue::Int(i),
            Value::F64(d) => AttributeValue::Double(d),
            Value::String(s) => AttributeValue::String(s.as_str().to_owned()),
            Value::Array(array) => AttributeValue::Array(match array {
                Array::Bool(values) => values.into_iter().map(AttributeValue::Bool).collect(),
                Array::I64(values) => values.into_iter().map(AttributeValue::Int).collect(),
                Array::F64(values) => values.into_iter().map(AttributeValue::Double).collect(),
                Array::String(values) => values
                    .iter()
                    .map(|s| AttributeValue::String(s.as_str().to_owned()))
                    .collect(),
                _ => Vec::new(),
            }),
            _ => AttributeValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_to_inspectable() {
        assert_eq!(to_inspectable(&true.into()), json!(true));
        assert_eq!(to_inspectable(&i64::MAX.into()), json!(i64::MAX));
        assert_eq!(to_inspectable(&i64::MIN.into()), json!(i64::MIN));
        assert_eq!(to_inspectable(&0.1f64.into()), json!(0.1));
        assert_eq!(to_inspectable(&"linux".into()), json!("linux"));
    }

    #[test]
    fn test_leaves_are_preserved_exactly() {
        let value = to_inspectable(&AttributeValue::Double(1.0e-300));
        assert_eq!(value.as_f64(), Some(1.0e-300));

        let value = to_inspectable(&AttributeValue::Int(9_007_199_254_740_993));
        assert_eq!(value.as_i64(), Some(9_007_199_254_740_993));
    }

    #[test]
    fn test_unsupported_values_become_null() {
        assert_eq!(to_inspectable(&AttributeValue::Empty), JsonValue::Null);
        assert_eq!(to_inspectable(&AttributeValue::Bytes(vec![1, 2])), JsonValue::Null);
        assert_eq!(to_inspectable(&f64::NAN.into()), JsonValue::Null);
    }

    #[test]
    fn test_nested_values_to_inspectable() {
        let mut inner = Attributes::new();
        inner.insert("zone".into(), "eu-west-1a".into());
        inner.insert("ids".into(), AttributeValue::Array(vec![1i64.into(), 2i64.into()]));

        let mut outer = Attributes::new();
        outer.insert("cloud".into(), inner.into());
        outer.insert(
            "mixed".into(),
            AttributeValue::Array(vec![
                true.into(),
                "a".into(),
                AttributeValue::Empty,
                AttributeValue::Array(vec![1.5f64.into()]),
            ]),
        );

        assert_eq!(
            JsonValue::Object(attributes_to_map(&outer)),
            json!({
                "cloud": { "zone": "eu-west-1a", "ids": [1, 2] },
                "mixed": [true, "a", null, [1.5]],
            })
        );
    }

    #[test]
    fn test_inspectable_map_keeps_insertion_order() {
        let mut attributes = Attributes::new();
        attributes.insert("z".into(), 1i64.into());
        attributes.insert("a".into(), 2i64.into());
        attributes.insert("m".into(), 3i64.into());

        let keys: Vec<_> = attributes_to_map(&attributes).keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_to_otel_value() {
        assert_eq!(AttributeValue::Int(3).to_otel_value(), Some(Value::I64(3)));
        assert_eq!(
            AttributeValue::Array(vec!["a".into(), "b".into()]).to_otel_value(),
            Some(Value::Array(Array::String(vec!["a".into(), "b".into()])))
        );
        assert_eq!(
            AttributeValue::Array(vec![1i64.into(), "b".into()]).to_otel_value(),
            Some(Value::String(r#"[1,"b"]"#.into()))
        );
        assert_eq!(AttributeValue::Empty.to_otel_value(), None);
        assert_eq!(AttributeValue::Bytes(vec![0]).to_otel_value(), None);
    }

    #[test]
    fn test_empty_array_stays_an_array() {
        let empty = AttributeValue::Array(Vec::new());
        let otel = empty.to_otel_value();
        assert_eq!(otel, Some(Value::Array(Array::String(Vec::new()))));
        assert_eq!(otel.map(AttributeValue::from), Some(empty));
    }

    #[test]
    fn test_from_otel_value() {
        assert_eq!(AttributeValue::from(Value::from("x")), AttributeValue::from("x"));
        assert_eq!(
            AttributeValue::from(Value::Array(Array::F64(vec![1.0, 2.5]))),
            AttributeValue::Array(vec![1.0f64.into(), 2.5f64.into()])
        );
    }
}

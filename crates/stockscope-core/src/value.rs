//! Loosely typed metric values and the sanitizer.
//!
//! Provider payloads are heterogeneous: numbers arrive as signed or unsigned
//! integers or floats (sometimes NaN), text fields may be missing, and nested
//! objects carry their own structure. [`Value`] models all of that with an
//! explicit [`Value::Absent`] marker, and [`sanitize`] rewrites a value tree so
//! that no NaN or infinity survives.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A scalar or nested metric value.
///
/// Maps keep insertion order so that statement line items and periods are
/// reported in the order the provider produced them.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value available. Serialized as `null`.
    #[default]
    Absent,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer (the canonical integer form).
    Int(i64),
    /// Unsigned integer that does not fit in an `i64`, or not yet canonicalized.
    UInt(u64),
    /// Floating point number. May be non-finite before sanitizing.
    Float(f64),
    /// Text.
    Text(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Ordered key/value pairs.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Returns true for the absent marker.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the value as a finite `f64` if it is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::UInt(v) => Some(v as f64),
            Self::Float(v) => sanitize_f64(v),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a key if this value is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Rewrites a value tree so it is safe to serialize.
///
/// - Non-finite floats become [`Value::Absent`].
/// - Unsigned integers that fit in an `i64` become [`Value::Int`].
/// - Lists and maps are rewritten element by element.
/// - Everything else is returned unchanged.
///
/// The function is idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
#[must_use]
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Float(v) => sanitize_f64(v).map_or(Value::Absent, Value::Float),
        Value::UInt(v) => i64::try_from(v).map_or(Value::UInt(v), Value::Int),
        Value::List(items) => Value::List(items.into_iter().map(sanitize).collect()),
        Value::Map(entries) => {
            Value::Map(entries.into_iter().map(|(k, v)| (k, sanitize(v))).collect())
        }
        other => other,
    }
}

/// Scalar form of [`sanitize`] for typed numeric fields.
#[must_use]
pub fn sanitize_f64(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("N/A"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::UInt(v) => serializer.serialize_u64(*v),
            Self::Float(v) => match sanitize_f64(*v) {
                Some(v) => serializer.serialize_f64(v),
                None => serializer.serialize_none(),
            },
            Self::Text(v) => serializer.serialize_str(v),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Absent)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Absent)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(sanitize(Value::UInt(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, item)) = map.next_entry::<String, Value>()? {
            entries.push((key, item));
        }
        Ok(Value::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_non_finite_becomes_absent(#[case] v: f64) {
        assert_eq!(sanitize(Value::Float(v)), Value::Absent);
        assert_eq!(sanitize_f64(v), None);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.5)]
    #[case(1e300)]
    #[case(f64::MIN_POSITIVE)]
    fn test_finite_is_preserved(#[case] v: f64) {
        assert_eq!(sanitize(Value::Float(v)), Value::Float(v));
        assert_eq!(sanitize_f64(v), Some(v));
    }

    #[test]
    fn test_unsigned_is_canonicalized() {
        assert_eq!(sanitize(Value::UInt(42)), Value::Int(42));
        assert_eq!(sanitize(Value::UInt(u64::MAX)), Value::UInt(u64::MAX));
    }

    #[test]
    fn test_nested_structures() {
        let raw = Value::Map(vec![
            ("price".to_string(), Value::Float(f64::NAN)),
            (
                "history".to_string(),
                Value::List(vec![Value::Float(1.0), Value::Float(f64::INFINITY), Value::UInt(7)]),
            ),
            ("name".to_string(), Value::from("Apple")),
        ]);

        let clean = sanitize(raw);

        assert_eq!(clean.get("price"), Some(&Value::Absent));
        assert_eq!(
            clean.get("history"),
            Some(&Value::List(vec![Value::Float(1.0), Value::Absent, Value::Int(7)]))
        );
        assert_eq!(clean.get("name"), Some(&Value::from("Apple")));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = vec![
            Value::Absent,
            Value::Float(f64::NAN),
            Value::Float(3.25),
            Value::UInt(u64::MAX),
            Value::UInt(5),
            Value::from("N/A"),
            Value::Map(vec![(
                "nested".to_string(),
                Value::List(vec![Value::Float(f64::NEG_INFINITY), Value::Int(-3)]),
            )]),
        ];

        for sample in samples {
            let once = sanitize(sample);
            let twice = sanitize(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_json_roundtrip_preserves_key_order() {
        let json = r#"{"zeta": 1, "alpha": null, "mid": [1.5, "x"]}"#;
        let value: Value = serde_json::from_str(json).unwrap();

        match &value {
            Value::Map(entries) => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
            }
            other => panic!("expected map, got {other:?}"),
        }

        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"zeta":1,"alpha":null,"mid":[1.5,"x"]}"#
        );
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
        assert_eq!(Value::from("3").as_f64(), None);
        assert_eq!(Value::Absent.as_f64(), None);
    }
}

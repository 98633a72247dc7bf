//! Dynamic attribute values carried by resource nodes.

use std::fmt;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::NodeTypeId;

/// Named values attached to a node or declared on a node type.
///
/// Insertion order is preserved so listings are stable.
pub type Attributes = IndexMap<CompactString, Value>;

/// A dynamic value stored as a node attribute.
///
/// Serialized untagged, except [`Value::Type`], which is written as
/// `{"$type": <id>}` so it reads back as a type rather than an integer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/absent value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Integer value.
    Integer(i64),

    /// Floating point value.
    Float(f64),

    /// String value.
    String(String),

    /// Array/list value.
    Array(Vec<Value>),

    /// Handle to a declared node type.
    Type(#[serde(with = "type_ref")] NodeTypeId),

    /// Object/table/map value.
    Object(Attributes),
}

mod type_ref {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::id::NodeTypeId;

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct TypeRef {
        #[serde(rename = "$type")]
        id: NodeTypeId,
    }

    pub fn serialize<S: Serializer>(id: &NodeTypeId, serializer: S) -> Result<S::Ok, S::Error> {
        TypeRef { id: *id }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeTypeId, D::Error> {
        TypeRef::deserialize(deserializer).map(|r| r.id)
    }
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&Attributes> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Try to get this value as a node type handle.
    pub fn as_type(&self) -> Option<NodeTypeId> {
        match self {
            Self::Type(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(obj) => {
                write!(f, "{{")?;
                for (i, (key, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
            Self::Type(id) => write!(f, "<type #{}>", id.0),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i as i64)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Self::Integer(u as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<NodeTypeId> for Value {
    fn from(id: NodeTypeId) -> Self {
        Self::Type(id)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(arr: Vec<T>) -> Self {
        Self::Array(arr.into_iter().map(Into::into).collect())
    }
}

impl From<Attributes> for Value {
    fn from(obj: Attributes) -> Self {
        Self::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from(5).as_i64(), Some(5));
        assert_eq!(Value::from(5).as_f64(), Some(5.0));
        assert_eq!(Value::from("bar").as_str(), Some("bar"));
        assert_eq!(Value::from(NodeTypeId::new(2)).as_type(), Some(NodeTypeId::new(2)));
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("abc").to_string(), "\"abc\"");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from(NodeTypeId::new(4)).to_string(), "<type #4>");

        let mut obj = Attributes::new();
        obj.insert("id".into(), Value::from(5));
        assert_eq!(Value::from(obj).to_string(), "{\"id\": 5}");
    }

    #[test]
    fn test_type_value_json() {
        let json = serde_json::to_string(&Value::from(NodeTypeId::new(3))).unwrap();
        assert_eq!(json, r#"{"$type":3}"#);

        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Type(NodeTypeId::new(3)));

        let plain: Value = serde_json::from_str("3").unwrap();
        assert_eq!(plain, Value::Integer(3));

        let object: Value = serde_json::from_str(r#"{"$type": 3, "extra": 1}"#).unwrap();
        assert!(object.as_object().is_some());
    }
}

//! Value and semantic attribute types.
//!
//! Values are the atomic data stored in attribute plugs. The engine supports
//! scalar types (Bool, Int, Float, String), container values (List) and node
//! references. `AttrType` describes the declared semantic type of an
//! attribute and owns the host's implicit coercion rules: a value written to
//! a plug is conformed to the plug's declared type or rejected.

use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A value stored in an attribute plug.
///
/// Serialization is untagged so that schema artifact defaults read as plain
/// JSON (`0.0`, `""`, `[0.0, 0.0, 0.0]`, `true`, `null`). Node references
/// never appear in artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/missing value (message attributes, unset references).
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values (compound and array attributes).
    List(Vec<Value>),
    /// Reference to a node (message connections).
    NodeRef(NodeId),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float if this is a Float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a list slice if this is a List value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as node ID if this is a NodeRef value.
    pub fn as_node_ref(&self) -> Option<NodeId> {
        match self {
            Value::NodeRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the type name of this value, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::NodeRef(_) => "node",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::NodeRef(id) => write!(f, "#{}", id),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::NodeRef(id)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// A value did not conform to an attribute's declared type.
#[derive(Debug, Error)]
#[error("expected {expected}, got {actual}")]
pub struct CoerceError {
    /// Label of the declared type.
    pub expected: String,
    /// Type name of the offending value.
    pub actual: String,
}

/// Declared semantic type of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrType {
    /// Boolean attribute.
    Bool,
    /// Integer attribute.
    Int,
    /// Floating point attribute.
    Float,
    /// String attribute.
    String,
    /// Enumerated attribute; the stored value is the field index.
    Enum { fields: Vec<String> },
    /// Compound/array attribute with a uniform element type.
    Array(Box<AttrType>),
    /// Reference-to-node attribute. Carries no storable value of its own.
    Message,
}

impl AttrType {
    /// Human-readable type label, in the host's vocabulary.
    pub fn label(&self) -> String {
        match self {
            AttrType::Bool => "bool".to_string(),
            AttrType::Int => "long".to_string(),
            AttrType::Float => "double".to_string(),
            AttrType::String => "string".to_string(),
            AttrType::Enum { .. } => "enum".to_string(),
            AttrType::Array(elem) => format!("{}[]", elem.label()),
            AttrType::Message => "message".to_string(),
        }
    }

    /// The zero value used when a definition declares no explicit default.
    pub fn zero_value(&self) -> Value {
        match self {
            AttrType::Bool => Value::Bool(false),
            AttrType::Int => Value::Int(0),
            AttrType::Float => Value::Float(0.0),
            AttrType::String => Value::String(String::new()),
            AttrType::Enum { .. } => Value::Int(0),
            AttrType::Array(_) => Value::List(Vec::new()),
            AttrType::Message => Value::Null,
        }
    }

    /// Whether a plug of this type can be driven by a plug of `source` type.
    ///
    /// Connection compatibility follows the same conversions the host applies
    /// on the wire: numeric types interconvert, enums ride as integers,
    /// message only pairs with message.
    pub fn accepts_source(&self, source: &AttrType) -> bool {
        use AttrType::*;
        match (self, source) {
            (Bool, Bool) | (Int, Int) | (Float, Float) | (String, String) => true,
            (Message, Message) => true,
            (Bool, Int) | (Bool, Float) => true,
            (Int, Bool) | (Int, Float) => true,
            (Float, Int) | (Float, Bool) => true,
            (Enum { .. }, Int) | (Int, Enum { .. }) => true,
            (Enum { .. }, Enum { .. }) => true,
            (Array(a), Array(b)) => a.accepts_source(b),
            _ => false,
        }
    }

    /// Conform a value to this type, applying the host's implicit coercions.
    ///
    /// Returns the stored representation on success. Numeric widening
    /// (int to float) and narrowing (float to int, truncating) both apply;
    /// booleans follow the zero/nonzero convention; enum values accept an
    /// in-range index or an exact field name.
    pub fn coerce(&self, value: Value) -> Result<Value, CoerceError> {
        let err = |actual: &Value| CoerceError {
            expected: self.label(),
            actual: actual.type_name().to_string(),
        };
        match self {
            AttrType::Bool => match value {
                Value::Bool(_) => Ok(value),
                Value::Int(i) => Ok(Value::Bool(i != 0)),
                Value::Float(f) => Ok(Value::Bool(f != 0.0)),
                other => Err(err(&other)),
            },
            AttrType::Int => match value {
                Value::Int(_) => Ok(value),
                Value::Bool(b) => Ok(Value::Int(b as i64)),
                Value::Float(f) => Ok(Value::Int(f as i64)),
                other => Err(err(&other)),
            },
            AttrType::Float => match value {
                Value::Float(_) => Ok(value),
                Value::Int(i) => Ok(Value::Float(i as f64)),
                Value::Bool(b) => Ok(Value::Float(b as i64 as f64)),
                other => Err(err(&other)),
            },
            AttrType::String => match value {
                Value::String(_) => Ok(value),
                other => Err(err(&other)),
            },
            AttrType::Enum { fields } => match value {
                Value::Int(i) if i >= 0 && (i as usize) < fields.len() => Ok(Value::Int(i)),
                Value::String(s) => match fields.iter().position(|f| f == &s) {
                    Some(index) => Ok(Value::Int(index as i64)),
                    None => Err(CoerceError {
                        expected: self.label(),
                        actual: format!("\"{}\"", s),
                    }),
                },
                other => Err(err(&other)),
            },
            AttrType::Array(elem) => match value {
                Value::List(items) => {
                    let items = items
                        .into_iter()
                        .map(|item| elem.coerce(item))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::List(items))
                }
                other => Err(err(&other)),
            },
            AttrType::Message => match value {
                Value::Null | Value::NodeRef(_) => Ok(value),
                other => Err(err(&other)),
            },
        }
    }
}

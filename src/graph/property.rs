//! Attribute value types for vertices and edges
//!
//! Attributes form a closed set of scalar kinds. Anything else arriving from an
//! untyped source (JSON booleans, null, arrays, objects) is rejected at the
//! boundary before it reaches the store.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use super::store::{GraphError, GraphResult};

/// Attribute value
///
/// Supports:
/// - Text
/// - Integer (i64)
/// - Real (f64)
/// - Timestamp (UTC, serialized as RFC 3339)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Timestamp(DateTime<Utc>),
}

impl AttributeValue {
    /// Get text value if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get real value if this is a real
    pub fn as_real(&self) -> Option<f64> {
        match self {
            AttributeValue::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Get timestamp value if this is a timestamp
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            AttributeValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Get kind name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Text(_) => "Text",
            AttributeValue::Integer(_) => "Integer",
            AttributeValue::Real(_) => "Real",
            AttributeValue::Timestamp(_) => "Timestamp",
        }
    }

    /// Order two values of the same kind.
    ///
    /// Returns `None` when the kinds differ (no numeric coercion between
    /// Integer and Real, no parsing of Text) or when a Real is NaN.
    pub fn compare(&self, other: &AttributeValue) -> Option<Ordering> {
        match (self, other) {
            (AttributeValue::Text(a), AttributeValue::Text(b)) => Some(a.cmp(b)),
            (AttributeValue::Integer(a), AttributeValue::Integer(b)) => Some(a.cmp(b)),
            (AttributeValue::Real(a), AttributeValue::Real(b)) => a.partial_cmp(b),
            (AttributeValue::Timestamp(a), AttributeValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Type a textual literal: integer, then real, then RFC 3339 timestamp,
    /// falling back to text.
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return AttributeValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return AttributeValue::Real(f);
            }
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
            return AttributeValue::Timestamp(ts.with_timezone(&Utc));
        }
        AttributeValue::Text(raw.to_string())
    }

    /// Convert an untyped JSON value, rejecting kinds outside the closed set.
    pub fn from_json(key: &str, value: &serde_json::Value) -> GraphResult<Self> {
        match value {
            serde_json::Value::String(s) => Ok(AttributeValue::Text(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(AttributeValue::Integer(i))
                } else if n.is_u64() {
                    Err(GraphError::UnsupportedValue {
                        key: key.to_string(),
                        kind: "unsigned integer out of range",
                    })
                } else {
                    n.as_f64()
                        .map(AttributeValue::Real)
                        .ok_or_else(|| GraphError::UnsupportedValue {
                            key: key.to_string(),
                            kind: "number",
                        })
                }
            }
            serde_json::Value::Bool(_) => Err(GraphError::UnsupportedValue {
                key: key.to_string(),
                kind: "boolean",
            }),
            serde_json::Value::Null => Err(GraphError::UnsupportedValue {
                key: key.to_string(),
                kind: "null",
            }),
            serde_json::Value::Array(_) => Err(GraphError::UnsupportedValue {
                key: key.to_string(),
                kind: "array",
            }),
            serde_json::Value::Object(_) => Err(GraphError::UnsupportedValue {
                key: key.to_string(),
                kind: "object",
            }),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{}", s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Real(fl) => write!(f, "{:?}", fl),
            AttributeValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

// Convenience conversions
impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Real(f)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(ts: DateTime<Utc>) -> Self {
        AttributeValue::Timestamp(ts)
    }
}

/// Insertion-ordered attribute map for vertices and edges
pub type AttributeMap = IndexMap<String, AttributeValue>;

//! Attribute values stored on parcels.
//!
//! This module provides the [`Value`] enum, which represents the descriptive
//! and scoring fields attached to a parcel (zoning codes, assessed values,
//! walkability scores, and so on). These fields are opaque to the store: no
//! invariants are enforced on their content beyond presence or absence.
//!
//! # Example
//!
//! ```
//! use parceldb_core::Value;
//!
//! let zoning: Value = "R1".into();
//! let units: Value = 2i64.into();
//! let score: Value = 87.5f64.into();
//! let occupied: Value = true.into();
//!
//! assert_eq!(zoning.as_str(), Some("R1"));
//! assert_eq!(units.as_int(), Some(2));
//! assert_eq!(score.as_float(), Some(87.5));
//! assert_eq!(occupied.as_bool(), Some(true));
//! ```

use serde::{Deserialize, Serialize};

/// An attribute value stored on a parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
}

impl Value {
    /// Returns `true` if the value is `Null`.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is one.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// A short name for the value's type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
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
        Self::Int(i)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::String("R1".into()).as_str(), Some("R1"));
    }

    #[test]
    fn accessors_reject_other_variants() {
        assert_eq!(Value::Int(1).as_bool(), None);
        assert_eq!(Value::Bool(true).as_int(), None);
        assert_eq!(Value::String("x".into()).as_float(), None);
        assert_eq!(Value::Float(0.0).as_str(), None);
    }

    #[test]
    fn from_conversions() {
        let v: Value = "R1".into();
        assert_eq!(v, Value::String("R1".to_string()));
        let v: Value = 10i64.into();
        assert_eq!(v, Value::Int(10));
        let v: Value = 2.25f64.into();
        assert_eq!(v, Value::Float(2.25));
        let v: Value = false.into();
        assert_eq!(v, Value::Bool(false));
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Int(0).type_name(), "int");
        assert_eq!(Value::String(String::new()).type_name(), "string");
    }
}

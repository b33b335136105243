//! Tagged configuration values and ordered mappings.
//!
//! Every node in a task document is one of a fixed set of variants. Nothing
//! downstream inspects "any-shaped" data: a gain vector is a `Vector`, a
//! controller tag is a `Str`, a nested block is a `Mapping`.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::document::reference::Reference;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    /// Fixed-length numeric vector, e.g. `[0.1, 0.1, 0.1]`.
    Vector(Vec<f64>),
    Mapping(Mapping),
    /// Not yet substituted. Never present in a resolved config.
    Reference(Reference),
}

/// Coarse type tag of a [`Value`], used in error messages and type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Integer,
    Float,
    Bool,
    String,
    Vector,
    Mapping,
    Reference,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::Vector => "vector",
            ValueKind::Mapping => "mapping",
            ValueKind::Reference => "reference",
        }
    }

    /// Integers and floats are interchangeable wherever a number is expected.
    pub fn is_compatible_with(&self, other: ValueKind) -> bool {
        let numeric = |k: ValueKind| matches!(k, ValueKind::Integer | ValueKind::Float);
        *self == other || (numeric(*self) && numeric(other))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::String,
            Value::Vector(_) => ValueKind::Vector,
            Value::Mapping(_) => ValueKind::Mapping,
            Value::Reference(_) => ValueKind::Reference,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// True if this value or anything nested inside it is a reference.
    pub fn contains_reference(&self) -> bool {
        match self {
            Value::Reference(_) => true,
            Value::Mapping(m) => m.values().any(Value::contains_reference),
            _ => false,
        }
    }

    /// Convert to a JSON value for serde-based extraction into typed structs.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Vector(v) => v
                .iter()
                .map(|x| {
                    serde_json::Number::from_f64(*x)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                })
                .collect(),
            Value::Mapping(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.to_string(), v.to_json())).collect(),
            ),
            Value::Reference(r) => serde_json::Value::String(r.to_string()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::Vector(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Vector(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for x in v {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Value::Mapping(m) => m.serialize(serializer),
            Value::Reference(r) => serializer.serialize_str(&r.to_string()),
        }
    }
}

/// Insertion-ordered mapping from string keys to values.
///
/// Order is kept for reproducible serialization only; two mappings with the
/// same entries in a different order compare equal.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Walk nested mappings along `path`.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let value = self.get(first.as_ref())?;
        if rest.is_empty() {
            return Some(value);
        }
        value.as_mapping()?.get_path(rest)
    }

    /// Insert along `path`, creating intermediate mappings as needed.
    ///
    /// A non-mapping value sitting where an intermediate mapping is needed is
    /// replaced, matching the whole-value override rule.
    pub fn insert_path<S: AsRef<str>>(&mut self, path: &[S], value: Value) {
        let Some((first, rest)) = path.split_first() else {
            return;
        };
        if rest.is_empty() {
            self.insert(first.as_ref(), value);
            return;
        }
        if !matches!(self.get(first.as_ref()), Some(Value::Mapping(_))) {
            self.insert(first.as_ref(), Value::Mapping(Mapping::new()));
        }
        if let Some(Value::Mapping(child)) = self.get_mut(first.as_ref()) {
            child.insert_path(rest, value);
        }
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Parse a bare scalar the way a YAML scalar would be read.
///
/// Quoted text is always a string; `128` is an integer, `1.0e-6` a float,
/// `true` a bool, anything else a string. Empty input is the empty string.
pub fn parse_scalar(text: &str) -> Value {
    let trimmed = text.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return Value::Str(trimmed[1..trimmed.len() - 1].to_string());
        }
    }
    match serde_yaml::from_str::<serde_yaml::Value>(trimmed) {
        Ok(serde_yaml::Value::Number(n)) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or_else(|| trimmed.into()),
        },
        Ok(serde_yaml::Value::Bool(b)) => Value::Bool(b),
        Ok(serde_yaml::Value::String(s)) => Value::Str(s),
        _ => Value::Str(trimmed.to_string()),
    }
}

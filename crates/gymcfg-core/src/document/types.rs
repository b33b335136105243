use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::document::errors::DocumentError;
use crate::document::value::{Mapping, Value};

/// Key holding the ordered list of base documents.
pub const DEFAULTS_KEY: &str = "defaults";
/// Marker in the defaults list for "this document itself".
pub const SELF_MARKER: &str = "_self_";

/// One entry of a document's `defaults` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultsEntry {
    /// A base document, by name.
    Document(String),
    /// Position of the declaring document in its own layer order.
    SelfRef,
}

impl fmt::Display for DefaultsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultsEntry::Document(name) => f.write_str(name),
            DefaultsEntry::SelfRef => f.write_str(SELF_MARKER),
        }
    }
}

/// A parsed, unresolved task document.
///
/// `body` may still contain references. `defaults` is kept apart from the
/// body because it drives composition and never reaches a consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    pub defaults: Vec<DefaultsEntry>,
    pub body: Mapping,
}

impl ConfigDocument {
    pub fn new(body: Mapping) -> Self {
        Self {
            defaults: Vec::new(),
            body,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_defaults(mut self, defaults: Vec<DefaultsEntry>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Task identifier, from the top-level `name` key.
    pub fn name(&self) -> Option<&str> {
        self.body.get("name").and_then(Value::as_str)
    }

    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(self).map_err(|e| DocumentError::Serialize {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Serialize {
            message: e.to_string(),
        })
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(!self.defaults.is_empty());
        let mut map = serializer.serialize_map(Some(self.body.len() + extra))?;
        if !self.defaults.is_empty() {
            let names: Vec<String> = self.defaults.iter().map(ToString::to_string).collect();
            map.serialize_entry(DEFAULTS_KEY, &names)?;
        }
        for (k, v) in self.body.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

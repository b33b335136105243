use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::document::{ConfigDocument, DocumentError, Mapping, Value, ValueKind};
use crate::resolve::errors::AccessError;

/// A fully merged, reference-free task tree.
///
/// Only the resolver and the registry's default filling construct one, so
/// holding a `ResolvedConfig` means no `${...}` is left anywhere inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    tree: Mapping,
}

impl ResolvedConfig {
    pub(crate) fn from_literal_tree(tree: Mapping) -> Self {
        debug_assert!(
            !tree.values().any(Value::contains_reference),
            "resolved tree still holds a reference"
        );
        Self { tree }
    }

    pub fn tree(&self) -> &Mapping {
        &self.tree
    }

    pub fn into_tree(self) -> Mapping {
        self.tree
    }

    pub fn name(&self) -> Option<&str> {
        self.tree.get("name").and_then(Value::as_str)
    }

    /// Look up a value by dotted path, e.g. `ctrl.all.jacobian_type`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let keys: Vec<&str> = path.split('.').collect();
        self.tree.get_path(&keys)
    }

    pub fn section(&self, name: &str) -> Option<&Mapping> {
        self.tree.get(name).and_then(Value::as_mapping)
    }

    pub fn require(&self, path: &str) -> Result<&Value, AccessError> {
        self.get(path).ok_or_else(|| AccessError::Missing {
            path: path.to_string(),
        })
    }

    pub fn get_str(&self, path: &str) -> Result<&str, AccessError> {
        let value = self.require(path)?;
        value.as_str().ok_or_else(|| wrong_type(path, ValueKind::String, value))
    }

    pub fn get_bool(&self, path: &str) -> Result<bool, AccessError> {
        let value = self.require(path)?;
        value.as_bool().ok_or_else(|| wrong_type(path, ValueKind::Bool, value))
    }

    pub fn get_i64(&self, path: &str) -> Result<i64, AccessError> {
        let value = self.require(path)?;
        value.as_i64().ok_or_else(|| wrong_type(path, ValueKind::Integer, value))
    }

    pub fn get_f64(&self, path: &str) -> Result<f64, AccessError> {
        let value = self.require(path)?;
        value.as_f64().ok_or_else(|| wrong_type(path, ValueKind::Float, value))
    }

    pub fn get_vector(&self, path: &str) -> Result<&[f64], AccessError> {
        let value = self.require(path)?;
        value.as_vector().ok_or_else(|| wrong_type(path, ValueKind::Vector, value))
    }

    /// Deserialize the subtree at `path` into a typed struct.
    ///
    /// An empty path extracts the whole tree.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> Result<T, AccessError> {
        let json = if path.is_empty() {
            Value::Mapping(self.tree.clone()).to_json()
        } else {
            self.require(path)?.to_json()
        };
        serde_json::from_value(json).map_err(|e| AccessError::Deserialize {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Wrap the tree back into a document, e.g. to feed it in as a layer.
    pub fn to_document(&self) -> ConfigDocument {
        ConfigDocument::new(self.tree.clone())
    }

    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(&self.tree).map_err(|e| DocumentError::Serialize {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.tree).map_err(|e| DocumentError::Serialize {
            message: e.to_string(),
        })
    }
}

fn wrong_type(path: &str, expected: ValueKind, found: &Value) -> AccessError {
    AccessError::WrongType {
        path: path.to_string(),
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

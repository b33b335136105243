//! Schema registry: the table of recognized sections and keys.
//!
//! Built once through [`SchemaRegistryBuilder`], then frozen. Lookups on a
//! built [`SchemaRegistry`] take `&self` only, so the process-wide instance
//! behind [`builtin_registry`] is shared across threads without locking.

use std::sync::LazyLock;

use crate::document::{Mapping, Value};
use crate::resolve::ResolvedConfig;
use crate::schema::errors::SchemaError;
use crate::schema::factory;
use crate::schema::types::{SectionSchema, SectionSpec};

/// Reserved section holding the document's top-level scalar keys
/// (`name`, `physics_engine`).
pub const TASK_SECTION: &str = "task";

/// Global registry for the factory task family.
static BUILTIN: LazyLock<Result<SchemaRegistry, SchemaError>> =
    LazyLock::new(factory::build_registry);

/// Collects section declarations before freezing them.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    sections: Vec<SectionSchema>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the schema for one top-level section.
    ///
    /// # Errors
    ///
    /// Fails if the section is already registered or any key in it is
    /// malformed (no type tag, empty enum, default of the wrong type).
    pub fn register(&mut self, section: &str, spec: SectionSpec) -> Result<&mut Self, SchemaError> {
        if self.sections.iter().any(|s| s.name == section) {
            return Err(SchemaError::DuplicateSection {
                section: section.to_string(),
            });
        }
        let schema = spec.into_schema(section, section)?;
        self.sections.push(schema);
        Ok(self)
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            sections: self.sections,
        }
    }
}

/// Immutable section table.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    sections: Vec<SectionSchema>,
}

impl SchemaRegistry {
    /// Look up the schema of a top-level section.
    pub fn lookup(&self, section: &str) -> Result<&SectionSchema, SchemaError> {
        self.sections
            .iter()
            .find(|s| s.name == section)
            .ok_or_else(|| SchemaError::UnknownSection {
                section: section.to_string(),
            })
    }

    pub fn contains(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s.name == section)
    }

    /// Sections in registration order.
    pub fn sections(&self) -> &[SectionSchema] {
        &self.sections
    }

    /// Fill keys that are absent from `config` but declare a default.
    ///
    /// Values present in the config are never touched, whatever they hold.
    pub fn apply_defaults(&self, config: &ResolvedConfig) -> ResolvedConfig {
        let mut tree = config.tree().clone();
        for section in &self.sections {
            if section.name == TASK_SECTION {
                fill_defaults(&mut tree, section);
                continue;
            }
            match tree.get_mut(&section.name) {
                Some(Value::Mapping(existing)) => fill_defaults(existing, section),
                Some(_) => {}
                None if section.has_defaults() => {
                    let mut created = Mapping::new();
                    fill_defaults(&mut created, section);
                    tree.insert(section.name.clone(), Value::Mapping(created));
                }
                None => {}
            }
        }
        ResolvedConfig::from_literal_tree(tree)
    }
}

fn fill_defaults(target: &mut Mapping, schema: &SectionSchema) {
    for key in &schema.keys {
        if let Some(default) = &key.default
            && !target.contains_key(&key.name)
        {
            target.insert(key.name.clone(), default.clone());
        }
    }
    for child in &schema.sections {
        match target.get_mut(&child.name) {
            Some(Value::Mapping(existing)) => fill_defaults(existing, child),
            Some(_) => {}
            None if child.has_defaults() => {
                let mut created = Mapping::new();
                fill_defaults(&mut created, child);
                target.insert(child.name.clone(), Value::Mapping(created));
            }
            None => {}
        }
    }
}

/// The process-wide registry for the factory nut/bolt task family.
///
/// Constructed on first use and never mutated afterwards.
pub fn builtin_registry() -> Result<&'static SchemaRegistry, SchemaError> {
    BUILTIN.as_ref().map_err(Clone::clone)
}

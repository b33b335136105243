//! Defaults-list expansion.
//!
//! A document's `defaults` list names base documents to layer underneath
//! it. `_self_` marks where the document's own body goes; without it the
//! body goes last. Expansion is depth-first, so a base's own bases come
//! before the base.

use crate::document::{ConfigDocument, DefaultsEntry};
use crate::pipeline::errors::LoadError;
use crate::pipeline::source::DocumentSource;

/// One document in merge order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub document: ConfigDocument,
}

/// Expand `task` into its ordered layer list.
pub fn compose(task: &str, source: &dyn DocumentSource) -> Result<Vec<Layer>, LoadError> {
    let mut layers = Vec::new();
    let mut stack = Vec::new();
    expand(task, source, &mut stack, &mut layers)?;
    Ok(layers)
}

fn expand(
    name: &str,
    source: &dyn DocumentSource,
    stack: &mut Vec<String>,
    layers: &mut Vec<Layer>,
) -> Result<(), LoadError> {
    if stack.iter().any(|n| n == name) {
        let mut chain = stack.clone();
        chain.push(name.to_string());
        return Err(LoadError::DefaultsCycle {
            chain: chain.join(" -> "),
        });
    }
    let document = source.load(name)?;
    stack.push(name.to_string());

    let mut placed_self = false;
    for entry in &document.defaults {
        match entry {
            DefaultsEntry::Document(base) => expand(base, source, stack, layers)?,
            DefaultsEntry::SelfRef => {
                layers.push(own_layer(name, &document));
                placed_self = true;
            }
        }
    }
    if !placed_self {
        layers.push(own_layer(name, &document));
    }

    stack.pop();
    Ok(())
}

fn own_layer(name: &str, document: &ConfigDocument) -> Layer {
    Layer {
        name: name.to_string(),
        document: ConfigDocument::new(document.body.clone()),
    }
}

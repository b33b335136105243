//! Reference substitution over a merged tree.
//!
//! The task tree is addressed as if mounted under `mount` inside the parent
//! scope. A relative reference declared in mapping `m` starts at `m`; every
//! dot past the first climbs one level. Climbing above the task root lands
//! in the parent scope, climbing above the parent scope is an error.
//!
//! Targets are read from the merged tree before any substitution, so a
//! target that is itself a reference is always seen as one.

use crate::document::{DefaultTarget, Mapping, PathRef, Reference, Value, ValueKind};
use crate::resolve::errors::ResolutionError;

/// What a path lookup found.
enum Target<'a> {
    Value(&'a Value),
    /// The whole task tree, which is never a valid substitution.
    TaskRoot,
    Missing,
}

pub(crate) struct Interpolator<'a> {
    tree: &'a Mapping,
    parent: Option<&'a Mapping>,
    mount: &'a str,
}

impl<'a> Interpolator<'a> {
    pub(crate) fn new(tree: &'a Mapping, parent: Option<&'a Mapping>, mount: &'a str) -> Self {
        Self {
            tree,
            parent,
            mount,
        }
    }

    /// Produce a copy of the tree with every reference replaced by a literal.
    pub(crate) fn substitute(&self) -> Result<Mapping, ResolutionError> {
        let mut container = Vec::new();
        self.walk(self.tree, &mut container)
    }

    fn walk(&self, mapping: &Mapping, container: &mut Vec<String>) -> Result<Mapping, ResolutionError> {
        let mut out = Mapping::new();
        for (key, value) in mapping.iter() {
            let resolved = match value {
                Value::Reference(reference) => self.resolve(reference, container, key)?,
                Value::Mapping(child) => {
                    container.push(key.to_string());
                    let walked = self.walk(child, container);
                    container.pop();
                    Value::Mapping(walked?)
                }
                literal => literal.clone(),
            };
            out.insert(key, resolved);
        }
        Ok(out)
    }

    fn resolve(
        &self,
        reference: &Reference,
        container: &[String],
        key: &str,
    ) -> Result<Value, ResolutionError> {
        let site = Site {
            path: location(container, key),
            reference: reference.to_string(),
        };
        match reference {
            Reference::Path(path) => {
                let (target, target_name) = self.lookup(path, container, &site)?;
                match target {
                    Target::Value(Value::Reference(next)) => Err(site.chained(target_name, next)),
                    Target::Value(Value::Mapping(_)) | Target::TaskRoot => {
                        Err(site.mismatch("literal", ValueKind::Mapping))
                    }
                    Target::Value(literal) => Ok(literal.clone()),
                    Target::Missing => Err(ResolutionError::Unresolved {
                        path: site.path,
                        reference: site.reference,
                        target: target_name,
                    }),
                }
            }
            Reference::ResolveDefault { default, target } => {
                let found = match target {
                    DefaultTarget::Literal(literal) => Some(literal.as_ref().clone()),
                    DefaultTarget::Path(path) => {
                        let (target, target_name) = self.lookup(path, container, &site)?;
                        match target {
                            Target::Value(Value::Reference(next)) => {
                                return Err(site.chained(target_name, next));
                            }
                            Target::Value(Value::Mapping(_)) | Target::TaskRoot => {
                                return Err(site.mismatch(default.kind().as_str(), ValueKind::Mapping));
                            }
                            Target::Value(literal) => Some(literal.clone()),
                            Target::Missing => None,
                        }
                    }
                };
                match found {
                    // empty string counts as unset
                    None => Ok(default.as_ref().clone()),
                    Some(Value::Str(s)) if s.is_empty() => Ok(default.as_ref().clone()),
                    Some(value) if value.kind().is_compatible_with(default.kind()) => Ok(value),
                    Some(value) => Err(site.mismatch(default.kind().as_str(), value.kind())),
                }
            }
        }
    }

    /// Locate the target of `path` as seen from the mapping at `container`.
    ///
    /// Returns the target together with its absolute dotted name for messages.
    fn lookup(
        &self,
        path: &PathRef,
        container: &[String],
        site: &Site,
    ) -> Result<(Target<'a>, String), ResolutionError> {
        let mut full: Vec<&str> = Vec::new();
        if !path.is_absolute() {
            full.push(self.mount);
            full.extend(container.iter().map(String::as_str));
            let climb = path.up - 1;
            if climb > full.len() {
                return Err(ResolutionError::EscapesScope {
                    path: site.path.clone(),
                    reference: site.reference.clone(),
                    up: path.up,
                });
            }
            full.truncate(full.len() - climb);
        }
        full.extend(path.keys.iter().map(String::as_str));
        let name = full.join(".");
        Ok((self.find(&full), name))
    }

    fn find(&self, full: &[&str]) -> Target<'a> {
        let Some((first, rest)) = full.split_first() else {
            return Target::Missing;
        };
        if *first == self.mount {
            if rest.is_empty() {
                return Target::TaskRoot;
            }
            return self.tree.get_path(rest).map_or(Target::Missing, Target::Value);
        }
        self.parent
            .and_then(|scope| scope.get_path(full))
            .map_or(Target::Missing, Target::Value)
    }
}

struct Site {
    path: String,
    reference: String,
}

impl Site {
    fn chained(&self, target: String, next: &Reference) -> ResolutionError {
        ResolutionError::ChainedReference {
            path: self.path.clone(),
            reference: self.reference.clone(),
            target,
            next: next.to_string(),
        }
    }

    fn mismatch(&self, expected: &str, found: ValueKind) -> ResolutionError {
        ResolutionError::TypeMismatch {
            path: self.path.clone(),
            reference: self.reference.clone(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

fn location(container: &[String], key: &str) -> String {
    if container.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", container.join("."), key)
    }
}

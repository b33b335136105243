//! # Layered Override Resolution
//!
//! Layers are deep-merged in order, later wins, then every `${...}` reference
//! in the merged tree is replaced by the literal it names. The result is a
//! [`ResolvedConfig`] with no references left in it.
//!
//! Merging literal layers is associative: resolving `[a, b, c]` gives the
//! same tree as resolving `a` with `b` first and layering `c` on top.

pub mod errors;
mod interpolate;
pub mod merge;
mod resolved;

pub use errors::{AccessError, ResolutionError};
pub use merge::{merge, merge_into};
pub use resolved::ResolvedConfig;

use tracing::debug;

use crate::document::{ConfigDocument, Mapping};
use interpolate::Interpolator;

/// Key under which the task tree is addressed from its parent scope.
pub const DEFAULT_MOUNT: &str = "task";

/// Merges layers and substitutes references against an optional parent scope.
#[derive(Debug, Clone)]
pub struct Resolver {
    scope: Option<Mapping>,
    mount: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scope: None,
            mount: DEFAULT_MOUNT.to_string(),
        }
    }

    /// Enclosing configuration that relative references may climb into.
    pub fn with_scope(mut self, scope: Mapping) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    pub fn resolve(
        &self,
        base: &ConfigDocument,
        overlay: &ConfigDocument,
    ) -> Result<ResolvedConfig, ResolutionError> {
        self.resolve_layers([base, overlay])
    }

    /// Merge `layers` in order and substitute references in the result.
    pub fn resolve_layers<'a, I>(&self, layers: I) -> Result<ResolvedConfig, ResolutionError>
    where
        I: IntoIterator<Item = &'a ConfigDocument>,
    {
        let mut merged = Mapping::new();
        let mut count = 0usize;
        for layer in layers {
            merge_into(&mut merged, layer.body.clone());
            count += 1;
        }
        debug!(
            event = "core.resolve.layers_merged",
            layers = count,
            mount = %self.mount,
            has_scope = self.scope.is_some(),
        );
        let tree = Interpolator::new(&merged, self.scope.as_ref(), &self.mount).substitute()?;
        Ok(ResolvedConfig::from_literal_tree(tree))
    }
}

/// Resolve `overlay` on top of `base` with no parent scope.
pub fn resolve(
    base: &ConfigDocument,
    overlay: &ConfigDocument,
) -> Result<ResolvedConfig, ResolutionError> {
    Resolver::new().resolve(base, overlay)
}

/// Resolve an ordered list of layers with no parent scope.
pub fn resolve_layers(layers: &[ConfigDocument]) -> Result<ResolvedConfig, ResolutionError> {
    Resolver::new().resolve_layers(layers)
}

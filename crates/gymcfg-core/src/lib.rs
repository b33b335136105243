//! gymcfg-core: layered task configuration for simulated manipulation tasks
//!
//! A task is described by a stack of YAML/TOML documents. This library
//! merges them, substitutes `${...}` references, fills schema defaults and
//! validates the result before any consumer reads it.
//!
//! # Main Entry Points
//!
//! - [`pipeline`] - Load a task by name: compose, resolve, validate
//! - [`resolve`] - Merge layers and substitute references
//! - [`schema`] - Registry of recognized sections and keys
//! - [`validate`] - Check a resolved config against the registry
//! - [`task`] - Typed views (controller settings, task parameters)
//! - [`settings`] - Settings of the tool itself

pub mod document;
pub mod errors;
pub mod events;
pub mod logging;
pub mod pipeline;
pub mod resolve;
pub mod schema;
pub mod settings;
pub mod task;
pub mod validate;

// Re-export commonly used types at crate root for convenience
pub use document::{ConfigDocument, Mapping, Value, parse_toml, parse_yaml};
pub use errors::{GymcfgError, GymcfgResult};
pub use pipeline::{
    DirectorySource, DocumentSource, LoadError, LoadRequest, LoadedTask, MemorySource,
    PipelineError, load_task,
};
pub use resolve::{AccessError, ResolutionError, ResolvedConfig, Resolver, merge, resolve, resolve_layers};
pub use schema::{RobotModel, SchemaError, SchemaRegistry, builtin_registry};
pub use settings::GymcfgSettings;
pub use task::{ControllerSettings, ControllerType, TaskParams};
pub use validate::{Finding, FindingKind, Severity, ValidationError, ValidationReport, validate};

// Re-export logging initialization
pub use logging::init_logging;

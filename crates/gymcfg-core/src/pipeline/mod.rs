//! # Task Loading
//!
//! Ties the pieces together: find documents by name, expand `defaults`
//! lists into layers, add command-line overrides, resolve against the
//! launcher scope, fill schema defaults and validate.

pub mod compose;
pub mod errors;
pub mod load;
pub mod overrides;
pub mod source;

pub use compose::{Layer, compose};
pub use errors::{LoadError, PipelineError};
pub use load::{LoadRequest, LoadedTask, OVERRIDES_LAYER, load_task, load_task_with, resolve_task};
pub use overrides::{assignments_mapping, overrides_document, parse_override};
pub use source::{DirectorySource, DocumentSource, MemorySource};

//! # Task Documents
//!
//! The in-memory form of a task definition before resolution: a tree of
//! tagged values, a `defaults` list naming base documents, and unresolved
//! `${...}` references.

pub mod errors;
pub mod parse;
pub mod reference;
pub mod types;
pub mod value;

pub use errors::{DocumentError, ReferenceError};
pub use parse::{parse_toml, parse_yaml, parse_yaml_value};
pub use reference::{DefaultTarget, PathRef, Reference};
pub use types::{ConfigDocument, DefaultsEntry};
pub use value::{Mapping, Value, ValueKind, parse_scalar};

//! # Validation
//!
//! Checks a resolved config against the schema registry and a robot model.
//! Missing keys, bad enum values, wrong vector lengths and wrong types are
//! fatal. Unknown keys and out-of-range numbers are warnings.

mod check;
pub mod errors;
pub mod types;

pub use check::validate;
pub use errors::ValidationError;
pub use types::{Finding, FindingKind, Severity, ValidationReport};

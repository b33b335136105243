use crate::errors::GymcfgError;

/// Registry misconfiguration. Raised while the schema table is built, before
/// any task document is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Section '{section}' is registered more than once")]
    DuplicateSection { section: String },

    #[error("Key '{key}' is declared more than once in section '{section}'")]
    DuplicateKey { section: String, key: String },

    #[error("Key '{key}' in section '{section}' has no type")]
    MissingType { section: String, key: String },

    #[error("Enum key '{key}' in section '{section}' allows no values")]
    EmptyEnum { section: String, key: String },

    #[error("Default for '{section}.{key}' is a {found}, but the key is declared as {expected}")]
    DefaultTypeMismatch {
        section: String,
        key: String,
        expected: String,
        found: String,
    },

    #[error("Selector '{key}' in section '{section}' must be an enum key of that section")]
    InvalidSelector { section: String, key: String },

    #[error("No schema registered for section '{section}'")]
    UnknownSection { section: String },
}

impl GymcfgError for SchemaError {
    fn error_code(&self) -> &'static str {
        match self {
            SchemaError::DuplicateSection { .. } => "SCHEMA_DUPLICATE_SECTION",
            SchemaError::DuplicateKey { .. } => "SCHEMA_DUPLICATE_KEY",
            SchemaError::MissingType { .. } => "SCHEMA_MISSING_TYPE",
            SchemaError::EmptyEnum { .. } => "SCHEMA_EMPTY_ENUM",
            SchemaError::DefaultTypeMismatch { .. } => "SCHEMA_DEFAULT_TYPE_MISMATCH",
            SchemaError::InvalidSelector { .. } => "SCHEMA_INVALID_SELECTOR",
            SchemaError::UnknownSection { .. } => "SCHEMA_UNKNOWN_SECTION",
        }
    }
}

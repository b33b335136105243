use crate::errors::GymcfgError;

/// Reference substitution failures. Fatal for the task being loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Reference {reference} at '{path}' points to '{target}', which is not set")]
    Unresolved {
        path: String,
        reference: String,
        target: String,
    },

    #[error(
        "Reference {reference} at '{path}' points to '{target}', which is itself a reference ({next}); references may not be chained"
    )]
    ChainedReference {
        path: String,
        reference: String,
        target: String,
        next: String,
    },

    #[error("Reference {reference} at '{path}' climbs {up} levels, past the root scope")]
    EscapesScope {
        path: String,
        reference: String,
        up: usize,
    },

    #[error("Reference {reference} at '{path}' resolved to a {found}, expected {expected}")]
    TypeMismatch {
        path: String,
        reference: String,
        expected: String,
        found: String,
    },
}

impl GymcfgError for ResolutionError {
    fn error_code(&self) -> &'static str {
        match self {
            ResolutionError::Unresolved { .. } => "REFERENCE_UNRESOLVED",
            ResolutionError::ChainedReference { .. } => "REFERENCE_CHAINED",
            ResolutionError::EscapesScope { .. } => "REFERENCE_ESCAPES_SCOPE",
            ResolutionError::TypeMismatch { .. } => "REFERENCE_TYPE_MISMATCH",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

/// Typed read from a resolved config failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Configuration key '{path}' is not set")]
    Missing { path: String },

    #[error("Configuration key '{path}' is a {found}, expected {expected}")]
    WrongType {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Configuration key '{path}' has value '{value}', expected one of: {allowed}")]
    InvalidChoice {
        path: String,
        value: String,
        allowed: String,
    },

    #[error("Configuration '{path}' does not match the expected shape: {message}")]
    Deserialize { path: String, message: String },
}

impl GymcfgError for AccessError {
    fn error_code(&self) -> &'static str {
        match self {
            AccessError::Missing { .. } => "CONFIG_KEY_MISSING",
            AccessError::WrongType { .. } => "CONFIG_KEY_WRONG_TYPE",
            AccessError::InvalidChoice { .. } => "CONFIG_KEY_INVALID_CHOICE",
            AccessError::Deserialize { .. } => "CONFIG_DESERIALIZE_ERROR",
        }
    }
}

use crate::errors::GymcfgError;

/// Errors raised while turning document text into a [`ConfigDocument`](super::ConfigDocument).
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to parse YAML document: {message}")]
    Yaml { message: String },

    #[error("Failed to parse TOML document: {message}")]
    Toml { message: String },

    #[error("Document root must be a mapping, found {found}")]
    RootNotMapping { found: String },

    #[error("Unsupported value at '{path}': {found}")]
    UnsupportedValue { path: String, found: String },

    #[error("Invalid reference '{text}' at '{path}': {reason}")]
    InvalidReference {
        path: String,
        text: String,
        reason: String,
    },

    #[error(
        "Unsupported interpolation '{directive}' at '{path}'. Supported: scoped path lookup, resolve_default"
    )]
    UnsupportedDirective { path: String, directive: String },

    #[error("Invalid defaults list: {message}")]
    InvalidDefaults { message: String },

    #[error("Failed to serialize document: {message}")]
    Serialize { message: String },
}

impl GymcfgError for DocumentError {
    fn error_code(&self) -> &'static str {
        match self {
            DocumentError::Yaml { .. } => "DOCUMENT_YAML_ERROR",
            DocumentError::Toml { .. } => "DOCUMENT_TOML_ERROR",
            DocumentError::RootNotMapping { .. } => "DOCUMENT_ROOT_NOT_MAPPING",
            DocumentError::UnsupportedValue { .. } => "DOCUMENT_UNSUPPORTED_VALUE",
            DocumentError::InvalidReference { .. } => "DOCUMENT_INVALID_REFERENCE",
            DocumentError::UnsupportedDirective { .. } => "DOCUMENT_UNSUPPORTED_DIRECTIVE",
            DocumentError::InvalidDefaults { .. } => "DOCUMENT_INVALID_DEFAULTS",
            DocumentError::Serialize { .. } => "DOCUMENT_SERIALIZE_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(self, DocumentError::Serialize { .. })
    }
}

/// Reference syntax errors, before a document path is attached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("{reason}")]
    Malformed { reason: String },

    #[error("unsupported directive '{directive}'")]
    UnsupportedDirective { directive: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_directive_display() {
        let error = DocumentError::UnsupportedDirective {
            path: "sim.use_gpu_pipeline".to_string(),
            directive: "eq".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported interpolation 'eq' at 'sim.use_gpu_pipeline'. Supported: scoped path lookup, resolve_default"
        );
        assert_eq!(error.error_code(), "DOCUMENT_UNSUPPORTED_DIRECTIVE");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_serialize_error_is_not_user_error() {
        let error = DocumentError::Serialize {
            message: "boom".to_string(),
        };
        assert!(!error.is_user_error());
    }
}

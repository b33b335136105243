use crate::document::DocumentError;
use crate::errors::GymcfgError;
use crate::resolve::{AccessError, ResolutionError};
use crate::schema::SchemaError;
use crate::validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Task document '{name}' not found (searched: {searched})")]
    NotFound { name: String, searched: String },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Task document '{name}' is invalid: {source}")]
    Document {
        name: String,
        #[source]
        source: DocumentError,
    },

    #[error("Defaults list forms a cycle: {chain}")]
    DefaultsCycle { chain: String },

    #[error("Invalid override '{text}': {reason}")]
    InvalidOverride { text: String, reason: String },
}

impl GymcfgError for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "TASK_NOT_FOUND",
            LoadError::Io { .. } => "TASK_IO_ERROR",
            LoadError::Document { .. } => "TASK_DOCUMENT_INVALID",
            LoadError::DefaultsCycle { .. } => "TASK_DEFAULTS_CYCLE",
            LoadError::InvalidOverride { .. } => "TASK_INVALID_OVERRIDE",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(self, LoadError::Io { .. })
    }
}

/// Any failure between naming a task and holding its validated config.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl GymcfgError for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Load(e) => e.error_code(),
            PipelineError::Resolution(e) => e.error_code(),
            PipelineError::Validation(e) => e.error_code(),
            PipelineError::Schema(e) => e.error_code(),
            PipelineError::Access(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            PipelineError::Load(e) => e.is_user_error(),
            PipelineError::Resolution(e) => e.is_user_error(),
            PipelineError::Validation(e) => e.is_user_error(),
            PipelineError::Schema(e) => e.is_user_error(),
            PipelineError::Access(e) => e.is_user_error(),
        }
    }
}

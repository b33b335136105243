use std::error::Error;

/// Base trait for all gymcfg errors
pub trait GymcfgError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error was caused by the document author rather than the tool.
    ///
    /// A malformed task document is an author error; a broken schema table or
    /// an unreadable file is not.
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the library
pub type GymcfgResult<T> = Result<T, Box<dyn GymcfgError>>;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to parse settings file '{path}': {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    #[error("IO error reading settings: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl GymcfgError for SettingsError {
    fn error_code(&self) -> &'static str {
        match self {
            SettingsError::ParseError { .. } => "SETTINGS_PARSE_ERROR",
            SettingsError::InvalidSettings { .. } => "INVALID_SETTINGS",
            SettingsError::IoError { .. } => "SETTINGS_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SettingsError::ParseError { .. } | SettingsError::InvalidSettings { .. }
        )
    }
}

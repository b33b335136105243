use crate::errors::GymcfgError;
use crate::validate::types::ValidationReport;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The report holds every finding, warnings included.
    #[error("Validation failed: {}", .report.summary())]
    Failed { report: ValidationReport },
}

impl ValidationError {
    pub fn report(&self) -> &ValidationReport {
        match self {
            ValidationError::Failed { report } => report,
        }
    }
}

impl GymcfgError for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Failed { .. } => "VALIDATION_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::types::{Finding, FindingKind};

    #[test]
    fn test_failed_message_summarizes_report() {
        let report = ValidationReport {
            findings: vec![
                Finding::new("env.numEnvs", FindingKind::MissingKey),
                Finding::new("env.extra", FindingKind::UnknownKey),
            ],
        };
        let err = ValidationError::Failed { report };

        assert_eq!(err.to_string(), "Validation failed: 1 error(s), 1 warning(s)");
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert!(err.is_user_error());
        assert_eq!(err.report().fatal().count(), 1);
    }
}

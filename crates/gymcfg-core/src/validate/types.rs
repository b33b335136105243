use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Fatal => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    MissingKey,
    UnknownKey,
    InvalidEnum {
        value: String,
        allowed: Vec<String>,
    },
    LengthMismatch {
        expected: usize,
        actual: usize,
    },
    TypeMismatch {
        expected: String,
        found: String,
    },
    RangeWarning {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::UnknownKey | FindingKind::RangeWarning { .. } => Severity::Warning,
            _ => Severity::Fatal,
        }
    }
}

/// One problem at one path in the resolved tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub path: String,
    #[serde(flatten)]
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(path: impl Into<String>, kind: FindingKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at '{}': ", self.severity(), self.path)?;
        match &self.kind {
            FindingKind::MissingKey => f.write_str("required key is missing"),
            FindingKind::UnknownKey => f.write_str("key is not recognized"),
            FindingKind::InvalidEnum { value, allowed } => {
                write!(f, "'{}' is not one of [{}]", value, allowed.join(", "))
            }
            FindingKind::LengthMismatch { expected, actual } => {
                write!(f, "expected {} elements, found {}", expected, actual)
            }
            FindingKind::TypeMismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            FindingKind::RangeWarning { value, min, max } => {
                let bound = |b: &Option<f64>| b.map_or_else(|| "..".to_string(), |x| x.to_string());
                write!(
                    f,
                    "{} is outside [{}, {}]",
                    value,
                    bound(min),
                    bound(max)
                )
            }
        }
    }
}

/// Every finding from one validation run, fatal and warning alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.findings.iter().any(Finding::is_fatal)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_fatal())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s)",
            self.fatal().count(),
            self.warnings().count()
        )
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{}", finding)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_by_kind() {
        assert_eq!(FindingKind::UnknownKey.severity(), Severity::Warning);
        assert_eq!(FindingKind::MissingKey.severity(), Severity::Fatal);
        assert_eq!(
            FindingKind::RangeWarning {
                value: 2.0,
                min: Some(0.0),
                max: Some(1.0)
            }
            .severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding::new(
            "ctrl.joint_space_id.joint_prop_gains",
            FindingKind::LengthMismatch {
                expected: 7,
                actual: 6,
            },
        );
        assert_eq!(
            finding.to_string(),
            "error at 'ctrl.joint_space_id.joint_prop_gains': expected 7 elements, found 6"
        );
    }

    #[test]
    fn test_report_summary() {
        let report = ValidationReport {
            findings: vec![
                Finding::new("env.foo", FindingKind::UnknownKey),
                Finding::new("env.numEnvs", FindingKind::MissingKey),
            ],
        };
        assert!(report.has_fatal());
        assert_eq!(report.summary(), "1 error(s), 1 warning(s)");
    }

    #[test]
    fn test_finding_serializes_flat() {
        let finding = Finding::new("ctrl.ctrl_type", FindingKind::InvalidEnum {
            value: "pid".to_string(),
            allowed: vec!["gym_default".to_string()],
        });
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["path"], "ctrl.ctrl_type");
        assert_eq!(json["kind"], "invalid_enum");
        assert_eq!(json["value"], "pid");
    }
}

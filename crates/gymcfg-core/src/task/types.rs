//! Controller vocabulary shared by the schema and the typed views.

use serde::{Deserialize, Serialize};

/// Control law selected by `ctrl.ctrl_type`.
///
/// Each variant names a branch under `ctrl` holding that law's gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerType {
    GymDefault,
    JointSpaceIk,
    JointSpaceId,
    TaskSpaceImpedance,
    OperationalSpaceMotion,
    OpenLoopForce,
    ClosedLoopForce,
    HybridForceMotion,
}

impl ControllerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerType::GymDefault => "gym_default",
            ControllerType::JointSpaceIk => "joint_space_ik",
            ControllerType::JointSpaceId => "joint_space_id",
            ControllerType::TaskSpaceImpedance => "task_space_impedance",
            ControllerType::OperationalSpaceMotion => "operational_space_motion",
            ControllerType::OpenLoopForce => "open_loop_force",
            ControllerType::ClosedLoopForce => "closed_loop_force",
            ControllerType::HybridForceMotion => "hybrid_force_motion",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }

    pub fn all() -> &'static [ControllerType] {
        &[
            ControllerType::GymDefault,
            ControllerType::JointSpaceIk,
            ControllerType::JointSpaceId,
            ControllerType::TaskSpaceImpedance,
            ControllerType::OperationalSpaceMotion,
            ControllerType::OpenLoopForce,
            ControllerType::ClosedLoopForce,
            ControllerType::HybridForceMotion,
        ]
    }

    pub fn names() -> &'static [&'static str] {
        &[
            "gym_default",
            "joint_space_ik",
            "joint_space_id",
            "task_space_impedance",
            "operational_space_motion",
            "open_loop_force",
            "closed_loop_force",
            "hybrid_force_motion",
        ]
    }

    /// Whether gains for this law are expressed per joint.
    pub fn is_joint_space(&self) -> bool {
        matches!(
            self,
            ControllerType::GymDefault | ControllerType::JointSpaceIk | ControllerType::JointSpaceId
        )
    }
}

impl std::fmt::Display for ControllerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ControllerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Unknown controller type '{}'. Supported: {}",
                s,
                Self::names().join(", ")
            )
        })
    }
}

/// Inverse-kinematics solver for the joint-space laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IkMethod {
    /// Jacobian pseudo-inverse.
    Pinv,
    /// Jacobian transpose.
    Trans,
    /// Damped least squares.
    Dls,
    /// Levenberg-Marquardt.
    Lm,
}

impl IkMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IkMethod::Pinv => "pinv",
            IkMethod::Trans => "trans",
            IkMethod::Dls => "dls",
            IkMethod::Lm => "lm",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pinv" => Some(IkMethod::Pinv),
            "trans" => Some(IkMethod::Trans),
            "dls" => Some(IkMethod::Dls),
            "lm" => Some(IkMethod::Lm),
            _ => None,
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["pinv", "trans", "dls", "lm"]
    }
}

impl std::fmt::Display for IkMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JacobianType {
    Geometric,
    Analytic,
}

impl JacobianType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JacobianType::Geometric => "geometric",
            JacobianType::Analytic => "analytic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "geometric" => Some(JacobianType::Geometric),
            "analytic" => Some(JacobianType::Analytic),
            _ => None,
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["geometric", "analytic"]
    }
}

impl std::fmt::Display for JacobianType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who drives the arm motors: the simulator's PD loop or torques we compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorCtrlMode {
    Gym,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainSpace {
    Joint,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceCtrlMethod {
    Open,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_as_str() {
        let from_variants: Vec<&str> = ControllerType::all().iter().map(|t| t.as_str()).collect();
        assert_eq!(from_variants, ControllerType::names());
        for name in IkMethod::names() {
            assert_eq!(IkMethod::parse(name).map(|m| m.as_str()), Some(*name));
        }
        for name in JacobianType::names() {
            assert_eq!(JacobianType::parse(name).map(|j| j.as_str()), Some(*name));
        }
    }

    #[test]
    fn test_controller_type_parse() {
        assert_eq!(
            ControllerType::parse("joint_space_id"),
            Some(ControllerType::JointSpaceId)
        );
        assert_eq!(ControllerType::parse("JOINT_SPACE_ID"), None);
        let err = "pid".parse::<ControllerType>().unwrap_err();
        assert!(err.starts_with("Unknown controller type 'pid'"));
        assert!(err.contains("hybrid_force_motion"));
    }

    #[test]
    fn test_joint_space_types() {
        let joint: Vec<_> = ControllerType::all()
            .iter()
            .filter(|t| t.is_joint_space())
            .collect();
        assert_eq!(joint.len(), 3);
        assert!(!ControllerType::OpenLoopForce.is_joint_space());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ControllerType::TaskSpaceImpedance).unwrap();
        assert_eq!(json, "\"task_space_impedance\"");
        let parsed: IkMethod = serde_json::from_str("\"dls\"").unwrap();
        assert_eq!(parsed, IkMethod::Dls);
    }
}

//! Settings for the gymcfg tool itself, read from TOML.
//!
//! ```toml
//! [search]
//! paths = ["configs/task", "/opt/tasks"]
//!
//! [robot]
//! arm_dofs = 7
//! gripper_dofs = 2
//!
//! [validation]
//! warnings_as_errors = true
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::schema::RobotModel;
use crate::settings::defaults::DEFAULT_SEARCH_PATH;

/// Merged settings. Every field is optional so a file only overrides what
/// it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GymcfgSettings {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub robot: RobotSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Directories searched, in order, for task documents.
    pub paths: Option<Vec<PathBuf>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotSettings {
    pub arm_dofs: Option<usize>,
    pub gripper_dofs: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub warnings_as_errors: Option<bool>,
}

impl GymcfgSettings {
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.search
            .paths
            .clone()
            .unwrap_or_else(|| vec![PathBuf::from(DEFAULT_SEARCH_PATH)])
    }

    pub fn robot_model(&self) -> RobotModel {
        let franka = RobotModel::franka();
        RobotModel {
            arm_dofs: self.robot.arm_dofs.unwrap_or(franka.arm_dofs),
            gripper_dofs: self.robot.gripper_dofs.unwrap_or(franka.gripper_dofs),
        }
    }

    pub fn warnings_as_errors(&self) -> bool {
        self.validation.warnings_as_errors.unwrap_or(false)
    }
}
